//! doc-lint CLI tool.
//!
//! Usage:
//! ```bash
//! doc-lint check [OPTIONS] [PATHS]...
//! doc-lint list-validators
//! doc-lint init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Documentation linter for Ruby projects
#[derive(Parser)]
#[command(name = "doc-lint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "DOC_LINT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run documentation checks
    Check {
        /// Files or directories to check (default: current directory)
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,

        /// Code object registry dumped by the documentation extractor (JSON)
        #[arg(short, long)]
        registry: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Only run specific validators (comma-separated)
        #[arg(long)]
        validators: Option<String>,

        /// Validator preset
        #[arg(long, default_value = "default")]
        preset: PresetArg,

        /// Exclude patterns (can be specified multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,
    },

    /// List available validators
    ListValidators,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for check results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-offense compact format.
    Compact,
}

/// Validator preset selection.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum PresetArg {
    /// Every built-in validator.
    #[default]
    Default,
    /// In-process validators only (no yard needed).
    Offline,
}

impl From<PresetArg> for doc_lint_validators::Preset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Default => Self::Default,
            PresetArg::Offline => Self::Offline,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check {
            paths,
            registry,
            format,
            validators,
            preset,
            exclude,
        } => {
            let project_dir = commands::check::project_dir(&paths);
            let source = config_resolver::resolve(&project_dir, cli.config.as_deref());
            commands::check::run(&commands::check::CheckArgs {
                paths,
                registry,
                format,
                validators_filter: validators,
                preset: preset.into(),
                exclude,
                source,
            })
        }
        Commands::ListValidators => {
            commands::list_validators::run();
            Ok(())
        }
        Commands::Init { force } => commands::init::run(force),
    }
}
