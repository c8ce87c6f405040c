//! Severity levels

use std::fmt;

use crate::logging::palette::PaletteColor;

/// The closed set of levels the formatter has templates for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl Level {
    pub const ALL: [Level; 5] = [
        Level::Debug,
        Level::Info,
        Level::Warning,
        Level::Error,
        Level::Critical,
    ];

    /// Canonical display name.
    pub fn name(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
        }
    }

    pub fn value(&self) -> u32 {
        match self {
            Level::Debug => 10,
            Level::Info => 20,
            Level::Warning => 30,
            Level::Error => 40,
            Level::Critical => 50,
        }
    }

    pub fn color(&self) -> PaletteColor {
        match self {
            Level::Debug => PaletteColor::Blue,
            Level::Info => PaletteColor::Green,
            Level::Warning => PaletteColor::Yellow,
            Level::Error => PaletteColor::Red,
            Level::Critical => PaletteColor::Purple,
        }
    }

    /// Case-insensitive lookup; aliases resolve to their canonical level.
    pub fn parse(name: &str) -> Option<Level> {
        match name.to_ascii_lowercase().as_str() {
            "debug" => Some(Level::Debug),
            "info" => Some(Level::Info),
            "warning" | "warn" => Some(Level::Warning),
            "error" | "err" => Some(Level::Error),
            "critical" | "fatal" => Some(Level::Critical),
            _ => None,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Level carried by a record: one of the known levels, or a custom level
/// supplied by some other part of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Severity {
    Standard(Level),
    Custom { name: String, value: u32 },
}

impl Severity {
    /// Resolve a level name, keeping unrecognized names as custom levels.
    pub fn from_name(name: &str, value: u32) -> Self {
        match Level::parse(name) {
            Some(level) => Severity::Standard(level),
            None => Severity::Custom {
                name: name.to_ascii_uppercase(),
                value,
            },
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self {
            Severity::Standard(level) => Some(*level),
            Severity::Custom { .. } => None,
        }
    }

    pub fn levelname(&self) -> &str {
        match self {
            Severity::Standard(level) => level.name(),
            Severity::Custom { name, .. } => name,
        }
    }

    pub fn levelno(&self) -> u32 {
        match self {
            Severity::Standard(level) => level.value(),
            Severity::Custom { value, .. } => *value,
        }
    }
}

impl From<Level> for Severity {
    fn from(level: Level) -> Self {
        Severity::Standard(level)
    }
}
