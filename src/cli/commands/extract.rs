use std::env;

use anyhow::Result;

use super::super::args::ExtractCommand;
use super::super::exit_status::ExitStatus;
use super::{hooks_for, print_written};
use crate::config::{Config, load_config};
use crate::core::pipeline::save_declarations;
use crate::progress::ConsoleProgress;

pub fn extract(cmd: ExtractCommand) -> Result<ExitStatus> {
    let mut config = load_config(&env::current_dir()?)?.config;
    apply_overrides(&mut config, &cmd);

    let options = &config.parser_options;
    let hooks = hooks_for(&config, options.add_website_events_workaround, false)?;
    let progress = ConsoleProgress::new(config.emit_progress_messages);

    let path = save_declarations(
        &config.source_dirs,
        &config.excluded_dirs,
        options,
        &hooks,
        &config.output_dir,
        &progress,
    )?;
    print_written(&path, config.emit_progress_messages);

    Ok(ExitStatus::Success)
}

/// Command-line values take priority over the config file.
fn apply_overrides(config: &mut Config, cmd: &ExtractCommand) {
    if !cmd.source_dirs.is_empty() {
        config.source_dirs = cmd.source_dirs.clone();
    }
    if !cmd.excluded_dirs.is_empty() {
        config.excluded_dirs = cmd.excluded_dirs.clone();
    }
    if let Some(output_dir) = &cmd.output.output_dir {
        config.output_dir = output_dir.clone();
    }
    if cmd.output.quiet {
        config.emit_progress_messages = false;
    }

    let options = &mut config.parser_options;
    options.include_is_measurement |= cmd.include_is_measurement;
    options.apply_endpoints |= cmd.apply_endpoints;
    options.add_website_events_workaround |= cmd.add_website_events_workaround;
}
