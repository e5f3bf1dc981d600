//! Error types for the Bronze core.
//!
//! Execution-level errors (hook and action failures) are defined in
//! `bronze-runtime`.

use thiserror::Error;

/// Boxed error returned by hooks and actions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result returned by every lifecycle callback.
pub type HookResult = Result<(), BoxError>;

/// Errors raised while reading resolved arguments.
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    /// No argument with this name was resolved for the route.
    #[error("missing argument '{0}'")]
    MissingArgument(String),

    /// The argument exists but could not be converted to the requested type.
    #[error("invalid argument '{name}': {reason}")]
    InvalidArgument {
        /// Parameter name.
        name: String,
        /// Conversion failure message.
        reason: String,
    },
}

impl CoreError {
    /// Creates an invalid argument error.
    pub fn invalid_argument(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
