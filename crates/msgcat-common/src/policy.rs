//! Error reporting strategy applied at public boundaries.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Exit status used when [`ErrorPolicy::Terminate`] ends the process.
pub const FATAL_EXIT_CODE: i32 = 1;

/// Decides what happens to an error once it reaches a public boundary.
///
/// The same error conditions fire under both policies; only the reaction
/// differs. `Propagate` hands the typed error back to the caller, while
/// `Terminate` logs it and exits the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Return the error to the caller
    #[default]
    Propagate,
    /// Log the error and exit the process
    Terminate,
}

impl ErrorPolicy {
    /// Apply the policy to `result`.
    ///
    /// Under [`ErrorPolicy::Terminate`] an `Err` never returns: it is logged at
    /// error level and the process exits with [`FATAL_EXIT_CODE`].
    pub fn enforce<T, E: Display>(self, result: Result<T, E>) -> Result<T, E> {
        match (self, result) {
            (Self::Terminate, Err(err)) => {
                tracing::error!(error = %err, "fatal error, terminating");
                std::process::exit(FATAL_EXIT_CODE)
            }
            (_, result) => result,
        }
    }

    /// Whether errors are handed back to the caller.
    pub const fn propagates(self) -> bool {
        matches!(self, Self::Propagate)
    }
}

impl std::str::FromStr for ErrorPolicy {
    type Err = crate::MsgcatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "propagate" => Ok(Self::Propagate),
            "terminate" | "fatal" => Ok(Self::Terminate),
            other => Err(crate::MsgcatError::config(format!(
                "unknown error policy '{other}', expected propagate or terminate"
            ))),
        }
    }
}

impl Display for ErrorPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Propagate => f.write_str("propagate"),
            Self::Terminate => f.write_str("terminate"),
        }
    }
}
