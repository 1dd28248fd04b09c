use std::fmt;
use std::panic::Location;

use nethid_peer::SessionEnd;
use tracing::info;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const USAGE: i32 = 64;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// A runtime failure of `operation`, tagged with the caller's location:
    /// `failed <operation>() in <file>:<line> with: <err>`.
    #[track_caller]
    pub fn failed(operation: &str, err: impl fmt::Display) -> Self {
        let location = Location::caller();
        Self::new(
            FAILURE,
            format!(
                "failed {operation}() in {}:{} with: {err}",
                location.file(),
                location.line()
            ),
        )
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Exit code for a session that ended without failing.
pub fn session_end(end: SessionEnd) -> i32 {
    info!(%end, "exiting normally");
    SUCCESS
}
