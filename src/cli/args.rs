//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `extract`: resolve the declarations of one source into `declarations-resolved.json`
//! - `extract-extensions`: merge the configured sources into `declarations-extensions-resolved.json`
//! - `init`: write a default `.telexrc.json`

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }
}

/// Arguments shared by both extraction commands.
#[derive(Debug, Clone, Args)]
pub struct OutputArgs {
    /// Directory the output file is written to (overrides config file)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Suppress progress messages
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Args)]
pub struct ExtractCommand {
    /// Source directory to scan; repeatable (overrides config file)
    #[arg(long = "source-dir")]
    pub source_dirs: Vec<PathBuf>,

    /// Directory or glob pattern to skip; repeatable (overrides config file)
    #[arg(long = "exclude")]
    pub excluded_dirs: Vec<String>,

    /// Keep `isMeasurement` on property definitions
    #[arg(long)]
    pub include_is_measurement: bool,

    /// Default `endPoint` to "none" on property definitions
    #[arg(long)]
    pub apply_endpoints: bool,

    /// Inject the events listed in `websiteEventsFile`
    #[arg(long)]
    pub add_website_events_workaround: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args)]
pub struct ExtractExtensionsCommand {
    /// Read sources from this file instead of the discovered .telexrc.json
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract and resolve telemetry declarations of one source
    Extract(ExtractCommand),
    /// Extract, prefix and merge the declarations of every configured source
    ExtractExtensions(ExtractExtensionsCommand),
    /// Initialize a new .telexrc.json configuration file
    Init,
}
