//! Command dispatch

use std::fs;
use std::io;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands, ScanArgs};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::domain::EntityNode;
use crate::infrastructure::scanner::{scan_directory, ScanOptions};
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli, settings: &Settings) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Tree { scan }) => cmd_tree(scan, settings),
        Some(Commands::Json { scan, compact }) => cmd_json(scan, *compact, settings),
        Some(Commands::Classes { file }) => cmd_classes(file),
        Some(Commands::Config { command }) => cmd_config(command, settings),
        Some(Commands::Completion { shell }) => cmd_completion(*shell),
        None => Err(CliError::Usage(
            "no command given, see `autodoc --help`".to_string(),
        )),
    }
}

/// Configured scan options with the command line applied on top.
///
/// Extensions given on the command line replace the configured ones,
/// exclusions are added to them.
pub fn scan_options(scan: &ScanArgs, settings: &Settings) -> ScanOptions {
    let mut options = settings.scan.clone();
    if !scan.extensions.is_empty() {
        options.extensions = scan.extensions.clone();
    }
    options.exclude_dirs.extend(scan.exclude_dirs.iter().cloned());
    options.exclude_files.extend(scan.exclude_files.iter().cloned());
    options
}

fn scan_project(scan: &ScanArgs, settings: &Settings) -> CliResult<EntityNode> {
    let options = scan_options(scan, settings);
    debug!("scan options: {:?}", options);
    let tree = scan_directory(&scan.project, &options)?;
    if tree.is_leaf() {
        output::warning(&format!(
            "no {} files found below {}",
            options.extensions.join("/"),
            scan.project.display()
        ));
    }
    Ok(tree)
}

#[instrument(skip(settings))]
fn cmd_tree(args: &ScanArgs, settings: &Settings) -> CliResult<()> {
    let tree = scan_project(args, settings)?;
    output::info(&tree);
    Ok(())
}

#[instrument(skip(settings))]
fn cmd_json(args: &ScanArgs, compact: bool, settings: &Settings) -> CliResult<()> {
    let value = scan_project(args, settings)?.json();
    let text = if compact {
        serde_json::to_string(&value)
    } else {
        serde_json::to_string_pretty(&value)
    }
    .map_err(InfraError::from)?;
    output::info(&text);
    Ok(())
}

#[instrument]
fn cmd_classes(file: &std::path::Path) -> CliResult<()> {
    let content = fs::read_to_string(file)
        .map_err(|e| InfraError::io(format!("read {}", file.display()), e))?;
    let value: Value = serde_json::from_str(&content).map_err(InfraError::from)?;
    let tree = EntityNode::from_json(&value).map_err(InfraError::from)?;
    for class in tree.classes() {
        output::info(&class);
    }
    Ok(())
}

fn cmd_config(command: &ConfigCommands, settings: &Settings) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let text = toml::to_string_pretty(settings).map_err(|e| InfraError::Config {
                message: format!("serialize settings: {e}"),
            })?;
            output::info(&text);
        }
        ConfigCommands::Path => match global_config_path() {
            Some(path) => {
                output::header("Global config");
                output::info(&path.display());
            }
            None => output::warning("no config directory available on this platform"),
        },
    }
    Ok(())
}

fn cmd_completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
