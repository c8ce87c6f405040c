use autodoc::logging::{
    ColorLogFormatter, ExceptionInfo, FormatError, Level, LogRecord, Palette, PaletteColor,
    Severity, TimeZoneMode,
};
use rstest::{fixture, rstest};

const RESET: &str = "\x1b[0m";

#[fixture]
fn formatter() -> ColorLogFormatter {
    ColorLogFormatter::new().with_time_zone(TimeZoneMode::Utc)
}

#[rstest]
#[case(Level::Debug, "\x1b[94m")]
#[case(Level::Info, "\x1b[92m")]
#[case(Level::Warning, "\x1b[93m")]
#[case(Level::Error, "\x1b[91m")]
#[case(Level::Critical, "\x1b[95m")]
fn given_each_level_when_formatting_then_starts_with_color_and_ends_with_reset(
    formatter: ColorLogFormatter,
    #[case] level: Level,
    #[case] escape: &str,
) {
    let line = formatter
        .format(&LogRecord::new("docs.build", level, "rendered").at(0.0))
        .unwrap();
    assert_eq!(
        line,
        format!(
            "{escape}1970-01-01 00:00:00,000 - docs.build - {} - rendered{RESET}",
            level.name()
        )
    );
}

#[rstest]
fn given_keyword_argument_when_formatting_then_message_is_interpolated(
    formatter: ColorLogFormatter,
) {
    let record = LogRecord::new("docs.build", Level::Warning, "disk at {pct}%")
        .with_kwarg("pct", 91)
        .at(0.0);
    let line = formatter.format(&record).unwrap();
    assert!(line.starts_with("\x1b[93m"));
    assert!(line.contains(" - WARNING - disk at 91%"));
    assert!(line.ends_with(RESET));
}

#[rstest]
fn given_positional_arguments_when_formatting_then_fills_in_order(formatter: ColorLogFormatter) {
    let record = LogRecord::new("docs.build", Level::Info, "{} of {} pages")
        .with_arg(3)
        .with_arg("12")
        .at(0.0);
    assert!(formatter.format(&record).unwrap().contains(" - 3 of 12 pages"));
}

#[rstest]
fn given_braces_without_arguments_when_formatting_then_message_is_verbatim(
    formatter: ColorLogFormatter,
) {
    let record = LogRecord::new("docs.build", Level::Info, "map {a: 1}").at(0.0);
    assert!(formatter.format(&record).unwrap().contains(" - map {a: 1}"));
}

#[rstest]
#[case(LogRecord::new("x", Level::Info, "{} and {}").with_arg(1))]
#[case(LogRecord::new("x", Level::Info, "{missing}").with_kwarg("other", 1))]
#[case(LogRecord::new("x", Level::Info, "{0} {}").with_arg(1).with_arg(2))]
fn given_arguments_not_matching_message_when_formatting_then_errors(
    formatter: ColorLogFormatter,
    #[case] record: LogRecord,
) {
    assert!(matches!(
        formatter.format(&record),
        Err(FormatError::FormatMismatch { .. })
    ));
}

#[rstest]
fn given_epoch_when_formatting_time_then_renders_default_layout(formatter: ColorLogFormatter) {
    let record = LogRecord::new("docs.build", Level::Info, "x").at(0.0);
    assert_eq!(
        formatter.format_time(&record, None).unwrap(),
        "1970-01-01 00:00:00,000"
    );
}

#[rstest]
fn given_configured_date_format_when_formatting_then_asctime_uses_it() {
    let formatter = ColorLogFormatter::new()
        .with_time_zone(TimeZoneMode::Utc)
        .with_date_format(Some("%H:%M:%S"))
        .unwrap()
        .with_palette(Palette::plain());
    let record = LogRecord::new("docs.build", Level::Info, "x").at(3_723.25);
    assert_eq!(
        formatter.format(&record).unwrap(),
        "01:02:03 - docs.build - INFO - x"
    );
}

#[rstest]
fn given_exception_when_formatting_then_trace_follows_message(formatter: ColorLogFormatter) {
    let err = std::io::Error::new(std::io::ErrorKind::NotFound, "conf.py missing");
    let record = LogRecord::new("docs.build", Level::Error, "build failed")
        .at(0.0)
        .with_exception(ExceptionInfo::from_error(&err));
    let line = formatter.format(&record).unwrap();
    let body = line.strip_suffix(RESET).unwrap();
    let (first, trace) = body.split_once('\n').unwrap();
    assert!(first.ends_with("build failed"));
    assert_eq!(trace, "Error: conf.py missing");
}

#[rstest]
fn given_exception_info_when_formatting_then_renders_frames_and_causes(
    formatter: ColorLogFormatter,
) {
    let mut exc = ExceptionInfo::new("ParseError", "bad token")
        .with_frame("parse", "parser.rs", 10)
        .with_frame("load", "loader.rs", 3);
    exc.causes.push("unexpected '}'".to_string());
    assert_eq!(
        formatter.format_exception(&exc),
        "ParseError: bad token\n  at parse (parser.rs:10)\n  at load (loader.rs:3)\n\
         caused by: unexpected '}'"
    );
}

#[rstest]
fn given_stack_info_when_formatting_stack_then_returns_it_unchanged(formatter: ColorLogFormatter) {
    assert_eq!(formatter.format_stack("a\nb"), "a\nb");
}

#[rstest]
fn given_custom_level_when_formatting_then_keeps_its_name_with_fallback_color(
    formatter: ColorLogFormatter,
) {
    let record = LogRecord::new("docs.build", Severity::from_name("NOTICE", 25), "hi").at(0.0);
    let line = formatter.format(&record).unwrap();
    assert!(line.starts_with(formatter.palette().escape(PaletteColor::Blue)));
    assert!(line.contains(" - NOTICE - hi"));
}

#[rstest]
#[case("{asctime} {message}", true)]
#[case("{levelname} {message}", false)]
#[case("{{asctime}} {message}", false)]
fn given_format_when_asking_uses_time_then_reports_asctime_reference(
    #[case] fmt: &str,
    #[case] expected: bool,
) {
    let formatter = ColorLogFormatter::new().with_format(fmt).unwrap();
    assert_eq!(formatter.uses_time(), expected);
}

#[rstest]
#[case(1.001, "1970-01-01 00:00:01,001")]
#[case(1.9999, "1970-01-01 00:00:01,999")]
#[case(1_700_000_000.123, "2023-11-14 22:13:20,123")]
#[case(59.9999999, "1970-01-01 00:01:00,000")]
fn given_fractional_timestamp_when_formatting_time_then_keeps_exact_millis(
    formatter: ColorLogFormatter,
    #[case] created: f64,
    #[case] expected: &str,
) {
    let record = LogRecord::new("docs.build", Level::Info, "x").at(created);
    assert_eq!(formatter.format_time(&record, None).unwrap(), expected);
}

#[rstest]
fn given_timestamp_out_of_range_when_formatting_then_renders_it_raw(
    formatter: ColorLogFormatter,
) {
    let record = LogRecord::new("docs.build", Level::Info, "far future").at(1e300);
    let line = formatter.format(&record).unwrap();
    assert!(line.starts_with(&format!("\x1b[92m{}", 1e300_f64)));
    assert!(line.ends_with(&format!(" - INFO - far future{RESET}")));
}
