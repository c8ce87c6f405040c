//! Logging layer: severity-colored log line formatting
//!
//! The formatter is a pure transformation from [`LogRecord`] to a display
//! string. [`ColorEventFormat`] installs it on a `tracing-subscriber` pipeline.

pub mod error;
pub mod formatter;
pub mod layer;
pub mod level;
pub mod palette;
pub mod record;
pub mod template;

pub use error::{FormatError, FormatResult};
pub use formatter::{
    ColorLogFormatter, TimeZoneMode, DEFAULT_FORMAT, DEFAULT_MSEC_FORMAT, DEFAULT_TIME_FORMAT,
};
pub use layer::ColorEventFormat;
pub use level::{Level, Severity};
pub use palette::{Palette, PaletteColor};
pub use record::{ExceptionInfo, Frame, LogRecord};
