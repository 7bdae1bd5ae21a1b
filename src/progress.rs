//! Progress reporting.
//!
//! The pipeline never prints directly. It reports through a [`Progress`]
//! observer supplied by the caller, so library users can silence or redirect
//! output and the CLI can honour `emitProgressMessages`.

use colored::Colorize;

/// Observer for pipeline progress and non-fatal warnings.
pub trait Progress: Sync {
    /// A step of the pipeline started (e.g. `...extracting`).
    fn message(&self, msg: &str);

    /// Something was skipped or overridden but the run continues.
    fn warning(&self, msg: &str);
}

/// Writes progress to stderr.
///
/// Warnings are always shown; step messages only when enabled.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleProgress {
    pub emit_progress_messages: bool,
}

impl ConsoleProgress {
    pub fn new(emit_progress_messages: bool) -> Self {
        Self {
            emit_progress_messages,
        }
    }
}

impl Progress for ConsoleProgress {
    fn message(&self, msg: &str) {
        if self.emit_progress_messages {
            eprintln!("{}", msg);
        }
    }

    fn warning(&self, msg: &str) {
        eprintln!("{} {}", "warning:".bold().yellow(), msg);
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentProgress;

impl Progress for SilentProgress {
    fn message(&self, _msg: &str) {}

    fn warning(&self, _msg: &str) {}
}
