//! Bridge from `tracing` events to [`ColorLogFormatter`].

use std::fmt::{self, Write as _};

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use crate::logging::formatter::ColorLogFormatter;
use crate::logging::level::{Level, Severity};
use crate::logging::palette::Palette;
use crate::logging::record::LogRecord;

/// Value used for the custom `TRACE` level.
pub const TRACE_LEVEL_VALUE: u32 = 5;

/// Event format for `tracing_subscriber::fmt::layer().event_format(..)`.
///
/// Writers without ANSI support get the same layout with a plain palette.
#[derive(Debug, Clone)]
pub struct ColorEventFormat {
    colored: ColorLogFormatter,
    plain: ColorLogFormatter,
}

impl ColorEventFormat {
    pub fn new(formatter: ColorLogFormatter) -> Self {
        let plain = formatter.clone().with_palette(Palette::plain());
        Self {
            colored: formatter,
            plain,
        }
    }
}

impl Default for ColorEventFormat {
    fn default() -> Self {
        Self::new(ColorLogFormatter::default())
    }
}

impl<S, N> FormatEvent<S, N> for ColorEventFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let formatter = if writer.has_ansi_escapes() {
            &self.colored
        } else {
            &self.plain
        };
        let record = record_from_event(event);
        match formatter.format(&record) {
            Ok(line) => writeln!(writer, "{line}"),
            // the record is dropped, the pipeline keeps running
            Err(e) => writeln!(writer, "log formatting failed for {}: {e}", record.name),
        }
    }
}

/// Map a tracing level onto a severity; TRACE has no standard counterpart.
pub fn severity_of(level: &tracing::Level) -> Severity {
    match *level {
        tracing::Level::ERROR => Level::Error.into(),
        tracing::Level::WARN => Level::Warning.into(),
        tracing::Level::INFO => Level::Info.into(),
        tracing::Level::DEBUG => Level::Debug.into(),
        tracing::Level::TRACE => Severity::Custom {
            name: "TRACE".to_string(),
            value: TRACE_LEVEL_VALUE,
        },
    }
}

/// The event message is taken verbatim; other fields follow as ` key=value`.
pub fn record_from_event(event: &Event<'_>) -> LogRecord {
    let metadata = event.metadata();
    let mut visitor = MessageVisitor::default();
    event.record(&mut visitor);

    let mut msg = visitor.message;
    for (key, value) in visitor.fields {
        let _ = write!(msg, " {key}={value}");
    }
    LogRecord::new(metadata.target(), severity_of(metadata.level()), msg)
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: Vec<(&'static str, String)>,
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            self.fields.push((field.name(), value.to_string()));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            self.fields.push((field.name(), format!("{value:?}")));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;
    use tracing_subscriber::prelude::*;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn capture(ansi: bool, emit: impl FnOnce()) -> String {
        let sink = Captured::default();
        let formatter = ColorLogFormatter::new()
            .with_format("{levelname} {name} {message}")
            .unwrap();
        let subscriber = tracing_subscriber::registry().with(
            tracing_subscriber::fmt::layer()
                .with_ansi(ansi)
                .with_writer(sink.clone())
                .event_format(ColorEventFormat::new(formatter)),
        );
        tracing::subscriber::with_default(subscriber, emit);
        let bytes = sink.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn given_warn_event_when_formatting_then_line_is_yellow() {
        let out = capture(true, || tracing::warn!(target: "scan", "disk at {}%", 91));
        assert_eq!(out, "\x1b[93mWARNING scan disk at 91%\x1b[0m\n");
    }

    #[test]
    fn given_fields_when_formatting_then_appends_key_values() {
        let out = capture(false, || tracing::info!(target: "scan", count = 3, "walked"));
        assert_eq!(out, "INFO scan walked count=3\n");
    }

    #[test]
    fn given_trace_event_when_formatting_then_uses_fallback_template() {
        let out = capture(true, || tracing::trace!(target: "scan", "deep"));
        assert_eq!(out, "\x1b[94mTRACE scan deep\x1b[0m\n");
    }
}
