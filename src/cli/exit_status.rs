use std::process::ExitCode;

/// Exit status for CLI commands.
///
/// - `Success` (0): the output file was written
/// - `Error` (2): the run failed and nothing was written
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
