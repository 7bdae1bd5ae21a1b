use anyhow::Result;

use super::{
    args::{Arguments, Command},
    commands::{extract::extract, extract_extensions::extract_extensions, init::init},
    exit_status::ExitStatus,
};

/// Dispatch to the handler of the parsed command.
pub fn run(Arguments { command }: Arguments) -> Result<ExitStatus> {
    match command {
        Some(Command::Extract(cmd)) => extract(cmd),
        Some(Command::ExtractExtensions(cmd)) => extract_extensions(cmd),
        Some(Command::Init) => init(),
        None => anyhow::bail!("No command provided. Use --help to see available commands."),
    }
}
