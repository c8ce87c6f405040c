//! Severity-colored log line formatter.
//!
//! A line is `color escape + base format + reset escape`. The base format is a
//! brace template over the record fields:
//!
//! - `{asctime}` - timestamp, see [`ColorLogFormatter::format_time`]
//! - `{name}` - logger name
//! - `{levelname}` / `{levelno}` - level name and numeric value
//! - `{message}` - message with its arguments merged in
//! - `{created}` / `{msecs}` - raw timestamp and its millisecond part
//! - `{color}` - escape of the record's level
//!
//! Every known level gets its own template. A record with a custom level is
//! formatted with the template and color of the fallback level (DEBUG unless
//! configured otherwise).

use std::fmt;

use chrono::format::strftime::StrftimeItems;
use chrono::format::Item;
use chrono::{DateTime, Local, TimeZone, Utc};

use crate::logging::error::{FormatError, FormatResult};
use crate::logging::level::{Level, Severity};
use crate::logging::palette::Palette;
use crate::logging::record::{ExceptionInfo, LogRecord};
use crate::logging::template::{FieldKey, Template};

pub const DEFAULT_FORMAT: &str = "{asctime} - {name} - {levelname} - {message}";
pub const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// `{time}` is the rendered default time format, `{msecs}` the zero-padded
/// milliseconds.
pub const DEFAULT_MSEC_FORMAT: &str = "{time},{msecs}";

const RECORD_FIELDS: [&str; 8] = [
    "asctime",
    "name",
    "levelname",
    "levelno",
    "message",
    "created",
    "msecs",
    "color",
];

/// Time zone used to break down record timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeZoneMode {
    #[default]
    Local,
    Utc,
}

#[derive(Debug, Clone)]
pub struct ColorLogFormatter {
    palette: Palette,
    /// Indexed by `Level as usize`
    templates: [Template; 5],
    fallback: Level,
    date_format: Option<String>,
    default_time_format: String,
    default_msec_format: Option<String>,
    time_zone: TimeZoneMode,
}

impl Default for ColorLogFormatter {
    fn default() -> Self {
        let base = line_template(DEFAULT_FORMAT).expect("default format is valid");
        Self {
            palette: Palette::default(),
            templates: Level::ALL.map(|_| base.clone()),
            fallback: Level::Debug,
            date_format: None,
            default_time_format: DEFAULT_TIME_FORMAT.to_string(),
            default_msec_format: Some(DEFAULT_MSEC_FORMAT.to_string()),
            time_zone: TimeZoneMode::default(),
        }
    }
}

impl ColorLogFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `fmt` as the base format of every level.
    pub fn with_format(mut self, fmt: &str) -> FormatResult<Self> {
        let template = line_template(fmt)?;
        self.templates = Level::ALL.map(|_| template.clone());
        Ok(self)
    }

    /// Override the base format of a single level.
    pub fn with_level_format(mut self, level: Level, fmt: &str) -> FormatResult<Self> {
        self.templates[level as usize] = line_template(fmt)?;
        Ok(self)
    }

    /// Level whose template and color custom levels borrow.
    pub fn with_fallback_level(mut self, level: Level) -> Self {
        self.fallback = level;
        self
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// strftime format used for `{asctime}`; `None` restores the default with
    /// milliseconds.
    pub fn with_date_format(mut self, date_format: Option<&str>) -> FormatResult<Self> {
        if let Some(fmt) = date_format {
            validate_time_format(fmt)?;
        }
        self.date_format = date_format.map(str::to_string);
        Ok(self)
    }

    pub fn with_time_zone(mut self, time_zone: TimeZoneMode) -> Self {
        self.time_zone = time_zone;
        self
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Level and template used for a record of the given severity.
    fn resolve(&self, severity: &Severity) -> (Level, &Template) {
        let level = severity.level().unwrap_or(self.fallback);
        (level, &self.templates[level as usize])
    }

    /// Render one record. Fails only when the message and its arguments do
    /// not fit together; a timestamp chrono cannot represent is rendered raw.
    pub fn format(&self, record: &LogRecord) -> FormatResult<String> {
        let (level, template) = self.resolve(&record.severity);
        let message = record.message()?;
        let asctime = if template.references("asctime") {
            match self.format_time(record, self.date_format.as_deref()) {
                Ok(time) => Some(time),
                // unrepresentable instants show the raw timestamp
                Err(FormatError::TimestampOutOfRange(created)) => Some(created.to_string()),
                Err(e) => return Err(e),
            }
        } else {
            None
        };
        let color = self.palette.escape(level.color());

        let mut line = template.render(|key| match key {
            FieldKey::Name(name) => match name.as_str() {
                "asctime" => asctime.clone(),
                "name" => Some(record.name.clone()),
                "levelname" => Some(record.severity.levelname().to_string()),
                "levelno" => Some(record.severity.levelno().to_string()),
                "message" => Some(message.clone()),
                "created" => Some(record.created.to_string()),
                "msecs" => {
                    let nanos = split_timestamp(record.created).1;
                    Some(format!("{:03}", nanos / 1_000_000))
                }
                "color" => Some(color.to_string()),
                _ => None,
            },
            FieldKey::Index(_) => None,
        })?;

        if let Some(exc_info) = &record.exc_info {
            line.push('\n');
            line.push_str(&self.format_exception(exc_info));
        }
        if let Some(stack_info) = &record.stack_info {
            line.push('\n');
            line.push_str(&self.format_stack(stack_info));
        }
        line.push_str(self.palette.reset());
        Ok(line)
    }

    /// Render the record timestamp.
    ///
    /// With `date_format` the broken-down time is expanded with it as is.
    /// Otherwise the default time format is used and the truncated
    /// milliseconds are spliced in via the millisecond sub-format.
    pub fn format_time(
        &self,
        record: &LogRecord,
        date_format: Option<&str>,
    ) -> FormatResult<String> {
        let (secs, nanos) = split_timestamp(record.created);
        let utc = DateTime::<Utc>::from_timestamp(secs, nanos)
            .ok_or(FormatError::TimestampOutOfRange(record.created))?;

        let fmt = date_format.unwrap_or(self.default_time_format.as_str());
        validate_time_format(fmt)?;
        let time = match self.time_zone {
            TimeZoneMode::Utc => strftime(&utc, fmt),
            TimeZoneMode::Local => strftime(&utc.with_timezone(&Local), fmt),
        };

        match (date_format, &self.default_msec_format) {
            (None, Some(msec_format)) => Ok(msec_format
                .replace("{time}", &time)
                .replace("{msecs}", &format!("{:03}", nanos / 1_000_000))),
            _ => Ok(time),
        }
    }

    /// `"<kind>: <message>"`, one line per frame, then the cause chain.
    pub fn format_exception(&self, exc_info: &ExceptionInfo) -> String {
        let mut lines = vec![format!("{}: {}", exc_info.kind, exc_info.message)];
        for frame in &exc_info.frames {
            lines.push(format!(
                "  at {} ({}:{})",
                frame.function, frame.file, frame.line
            ));
        }
        for cause in &exc_info.causes {
            lines.push(format!("caused by: {cause}"));
        }
        lines.join("\n").trim_end_matches('\n').to_string()
    }

    pub fn format_stack(&self, stack_info: &str) -> String {
        stack_info.to_string()
    }

    /// Whether any template needs `{asctime}`.
    pub fn uses_time(&self) -> bool {
        self.templates
            .iter()
            .any(|template| template.references("asctime"))
    }
}

/// Prefix the color placeholder and make sure only record fields are used.
fn line_template(fmt: &str) -> FormatResult<Template> {
    let template = Template::parse(&format!("{{color}}{fmt}"))?;
    for key in template.fields() {
        match key {
            FieldKey::Name(name) if RECORD_FIELDS.contains(&name.as_str()) => {}
            FieldKey::Name(name) => {
                return Err(FormatError::mismatch(fmt, format!("unknown record field '{name}'")))
            }
            FieldKey::Index(i) => {
                return Err(FormatError::mismatch(
                    fmt,
                    format!("positional field {i} in a line format"),
                ))
            }
        }
    }
    Ok(template)
}

/// Seconds and nanoseconds. The fraction is rounded to whole microseconds
/// first, so `1.001` keeps its millisecond instead of becoming `1.000999..`.
fn split_timestamp(created: f64) -> (i64, u32) {
    let secs = created.floor();
    let micros = ((created - secs) * 1e6).round() as u32;
    if micros >= 1_000_000 {
        return (secs as i64 + 1, 0);
    }
    (secs as i64, micros * 1_000)
}

fn validate_time_format(fmt: &str) -> FormatResult<()> {
    if StrftimeItems::new(fmt).any(|item| matches!(item, Item::Error)) {
        return Err(FormatError::InvalidTimeFormat(fmt.to_string()));
    }
    Ok(())
}

fn strftime<Tz: TimeZone>(dt: &DateTime<Tz>, fmt: &str) -> String
where
    Tz::Offset: fmt::Display,
{
    dt.format(fmt).to_string()
}
