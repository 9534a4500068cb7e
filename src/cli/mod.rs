//! Command-line interface.

pub mod commands;
pub mod output;
pub mod types;

pub use types::{Cli, Commands};

use crate::domain::errors::{CredentialError, ErrorKind};
use crate::infrastructure::logging::SecretScrubber;

/// Exit status for errors that are not credential errors.
pub const EXIT_FAILURE: i32 = 1;

/// Process exit status for each credential error kind.
pub const fn exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::ValidationError => 2,
        ErrorKind::NotFound => 3,
        ErrorKind::ActiveCredential => 4,
        ErrorKind::CacheUnavailable => 5,
        ErrorKind::StorageError => 6,
    }
}

/// What the user sees for a failed command.
#[derive(Debug, serde::Serialize)]
pub struct ErrorReport {
    pub error: &'static str,
    pub message: String,
    #[serde(skip)]
    pub exit_code: i32,
}

impl ErrorReport {
    pub fn from_error(err: &anyhow::Error) -> Self {
        let scrubber = SecretScrubber::new();
        let credential_error = err.chain().find_map(|e| e.downcast_ref::<CredentialError>());

        let (error, exit_code) = match credential_error {
            Some(e) => (e.kind().as_str(), exit_code(e.kind())),
            None => ("error", EXIT_FAILURE),
        };

        let mut message = scrubber.scrub_message(&format!("{err:#}"));
        if credential_error.is_some_and(CredentialError::is_transient) {
            message.push_str(" (the operation can be retried)");
        }

        Self {
            error,
            message,
            exit_code,
        }
    }
}

/// Print `err` and exit with a status that identifies its kind.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    let report = ErrorReport::from_error(&err);
    tracing::debug!(kind = report.error, "command failed");

    if json_mode {
        eprintln!(
            "{}",
            serde_json::to_string_pretty(&report).unwrap_or_else(|_| report.message.clone())
        );
    } else {
        eprintln!("Error: {}", report.message);
    }
    std::process::exit(report.exit_code)
}
