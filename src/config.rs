//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/autodoc/autodoc.toml`
//! 3. Local config: `--config <file>`, or `./autodoc.toml` if present
//! 4. Environment variables: `AUTODOC_*` prefix, `__` between sections
//!    (e.g. `AUTODOC_LOG__UTC=true`, `AUTODOC_SCAN__EXTENSIONS=.py,.pyi`)

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::infrastructure::scanner::ScanOptions;
use crate::infrastructure::InfraResult;
use crate::logging::{ColorLogFormatter, Palette, TimeZoneMode};

/// File name of the project-local config.
pub const LOCAL_CONFIG_FILE: &str = "autodoc.toml";

/// How log lines are rendered on stderr.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LogSettings {
    /// Emit ANSI colors (NO_COLOR / CLICOLOR are honored on top)
    pub color: bool,
    /// Break timestamps down in UTC instead of local time
    pub utc: bool,
    /// Base line format, e.g. "{asctime} - {name} - {levelname} - {message}"
    pub format: Option<String>,
    /// strftime format for `{asctime}`; default renders milliseconds
    pub date_format: Option<String>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            color: true,
            utc: false,
            format: None,
            date_format: None,
        }
    }
}

impl LogSettings {
    /// Formatter configured from these settings.
    pub fn formatter(&self) -> InfraResult<ColorLogFormatter> {
        let time_zone = if self.utc {
            TimeZoneMode::Utc
        } else {
            TimeZoneMode::Local
        };
        let mut formatter = ColorLogFormatter::new()
            .with_time_zone(time_zone)
            .with_date_format(self.date_format.as_deref())?;
        if let Some(format) = &self.format {
            formatter = formatter.with_format(format)?;
        }
        if !self.color {
            formatter = formatter.with_palette(Palette::plain());
        }
        Ok(formatter)
    }
}

/// Unified configuration for autodoc.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Settings {
    pub log: LogSettings,
    pub scan: ScanOptions,
}

/// Get the XDG config directory for autodoc.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "autodoc").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("autodoc.toml"))
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// An explicit `local` file must exist; the implicit `./autodoc.toml` is
    /// optional.
    pub fn load(local: Option<&Path>) -> InfraResult<Self> {
        let local = match local {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(LOCAL_CONFIG_FILE), false),
        };
        Self::load_layers(global_config_path(), Some(local), "AUTODOC")
    }

    fn load_layers(
        global: Option<PathBuf>,
        local: Option<(PathBuf, bool)>,
        env_prefix: &str,
    ) -> InfraResult<Self> {
        // 1. Start with defaults
        let mut builder = Config::builder().add_source(Config::try_from(&Settings::default())?);

        // 2. Global config
        if let Some(global_path) = global {
            builder = builder.add_source(File::from(global_path).required(false));
        }

        // 3. Local config
        if let Some((local_path, required)) = local {
            builder = builder.add_source(File::from(local_path).required(required));
        }

        // 4. Environment variables (replace, explicit override)
        builder = builder.add_source(
            Environment::with_prefix(env_prefix)
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("scan.extensions")
                .with_list_parse_key("scan.exclude_dirs")
                .with_list_parse_key("scan.exclude_files")
                .try_parsing(true),
        );

        let settings: Self = builder.build()?.try_deserialize()?;
        Ok(settings)
    }
}
