use std::env;

use anyhow::{Result, bail};

use super::super::args::ExtractExtensionsCommand;
use super::super::exit_status::ExitStatus;
use super::{hooks_for, print_written};
use crate::config::{load_config, load_config_file};
use crate::core::pipeline::save_extension_declarations;
use crate::progress::ConsoleProgress;

pub fn extract_extensions(cmd: ExtractExtensionsCommand) -> Result<ExitStatus> {
    let mut config = match &cmd.config {
        Some(path) => load_config_file(path)?,
        None => load_config(&env::current_dir()?)?.config,
    };
    if config.sources.is_empty() {
        bail!("No sources configured. Add a \"sources\" list to the config file.");
    }
    if let Some(output_dir) = cmd.output.output_dir {
        config.output_dir = output_dir;
    }
    if cmd.output.quiet {
        config.emit_progress_messages = false;
    }

    let debug = config
        .sources
        .iter()
        .any(|spec| spec.parser_options.add_debug_events_workaround);
    let hooks = hooks_for(&config, false, debug)?;
    let progress = ConsoleProgress::new(config.emit_progress_messages);

    let path = save_extension_declarations(&config.sources, &hooks, &config.output_dir, &progress)?;
    print_written(&path, config.emit_progress_messages);

    Ok(ExitStatus::Success)
}
