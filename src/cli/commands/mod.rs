pub mod extract;
pub mod extract_extensions;
pub mod init;

use std::path::Path;

use anyhow::{Result, bail};
use colored::Colorize;

use crate::config::Config;
use crate::core::patch::Hooks;

pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Build the patch hooks, requiring an events file for each enabled workaround.
pub fn hooks_for(config: &Config, website: bool, debug: bool) -> Result<Hooks> {
    if website && config.website_events_file.is_none() {
        bail!("addWebsiteEventsWorkaround requires websiteEventsFile in the config file");
    }
    if debug && config.debug_events_file.is_none() {
        bail!("addDebugEventsWorkaround requires debugEventsFile in the config file");
    }
    Ok(Hooks::from_files(
        config.website_events_file.as_deref(),
        config.debug_events_file.as_deref(),
    ))
}

/// Success line for a written output file; silenced with progress messages.
pub fn print_written(path: &Path, emit_progress_messages: bool) {
    if !emit_progress_messages {
        return;
    }
    println!(
        "{} {}",
        SUCCESS_MARK.green(),
        format!("Wrote {}", path.display()).green()
    );
}
