use std::process;

use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use autodoc::cli::commands::execute_command;
use autodoc::cli::{output, Cli};
use autodoc::config::{LogSettings, Settings};
use autodoc::exitcode;
use autodoc::infrastructure::InfraResult;
use autodoc::logging::ColorEventFormat;

fn main() {
    let cli = Cli::parse();

    let settings = match Settings::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            output::error(&e);
            process::exit(exitcode::CONFIG);
        }
    };

    if let Err(e) = setup_logging(cli.verbose, &settings.log) {
        output::error(&e);
        process::exit(exitcode::CONFIG);
    }

    if let Err(e) = execute_command(&cli, &settings) {
        output::error(&e);
        process::exit(e.exit_code());
    }
}

fn setup_logging(verbosity: u8, log: &LogSettings) -> InfraResult<()> {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    // RUST_LOG wins over -v when set
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));

    let ansi = log.color && colored::control::SHOULD_COLORIZE.should_colorize();

    // Colored lines directed to stderr, stdout carries the documents
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(ansi)
        .event_format(ColorEventFormat::new(log.formatter()?))
        .with_filter(filter);

    tracing_subscriber::registry().with(fmt_layer).init();

    tracing::debug!("Log level: {}", level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    // https://docs.rs/clap/latest/clap/_derive/_tutorial/index.html#testing
    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn given_repeated_verbose_flag_then_counts_occurrences() {
        let cli = Cli::parse_from(["autodoc", "-vv", "tree", "."]);
        assert_eq!(cli.verbose, 2);
    }
}
