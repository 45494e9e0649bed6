//! Error types for the mlrelease CLI.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for mlrelease operations.
///
/// Soft data problems (missing files, empty YAML) never reach this type; they
/// are logged and skipped where they occur. Everything here stops the CI step.
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// User provided invalid arguments or configuration.
    #[error("{0}")]
    UserError(String),

    /// A merge gate (approvals, required checks) is not satisfied.
    #[error("Gate not satisfied: {0}")]
    GateFailed(String),

    /// The review system answered with a non-success status.
    #[error("{context}: HTTP {status}: {body}")]
    Api {
        context: String,
        status: u16,
        body: String,
    },

    /// The review system could not be reached or answered garbage.
    #[error("{context}: {source}")]
    Http {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    /// Deploying an environment or component failed.
    #[error("Deployment failed: {0}")]
    Deploy(String),

    /// Filesystem operation failed.
    #[error("{0}")]
    Io(String),
}

impl ReleaseError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ReleaseError::UserError(_)
            | ReleaseError::GateFailed(_)
            | ReleaseError::Api { .. }
            | ReleaseError::Http { .. }
            | ReleaseError::Deploy(_)
            | ReleaseError::Io(_) => exit_codes::FAILURE,
        }
    }

    pub(crate) fn http(context: impl Into<String>, source: reqwest::Error) -> Self {
        ReleaseError::Http {
            context: context.into(),
            source,
        }
    }
}

/// Result type alias for mlrelease operations.
pub type Result<T> = std::result::Result<T, ReleaseError>;
