//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

/// Build entity trees of a project for documentation templates
#[derive(Parser, Debug)]
#[command(name = "autodoc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Settings file (default: ./autodoc.toml if present)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the entity tree of a project
    Tree {
        #[command(flatten)]
        scan: ScanArgs,
    },

    /// Print the entity tree as nested JSON for template rendering
    Json {
        #[command(flatten)]
        scan: ScanArgs,

        /// Single line output
        #[arg(long)]
        compact: bool,
    },

    /// List the class entities of a JSON tree document
    Classes {
        /// JSON document written by `autodoc json`
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Project scan arguments
#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    /// Root directory of the project
    #[arg(value_hint = ValueHint::DirPath)]
    pub project: PathBuf,

    /// Directory names to exclude from the search
    #[arg(short = 'd', long = "exclude-dir", value_name = "NAME")]
    pub exclude_dirs: Vec<String>,

    /// File names to exclude from the search
    #[arg(short = 'f', long = "exclude-file", value_name = "NAME")]
    pub exclude_files: Vec<String>,

    /// Known file extensions to include (replaces configured ones)
    #[arg(short = 'e', long = "extension", value_name = "EXT")]
    pub extensions: Vec<String>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,

    /// Show global config file location
    Path,
}
