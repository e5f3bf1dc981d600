//! Runtime error types.

use thiserror::Error;

use bronze_core::BoxError;

use crate::config::ConfigError;
use crate::execute::Phase;

/// Errors raised while setting up the application core.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// A mode name that is not one of production, development or stage.
    #[error("Unknown mode: {0}")]
    UnknownMode(String),

    /// Configuration loading failed.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for runtime setup operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Failures raised by callbacks during [`App::execute`](crate::App::execute).
///
/// Validation failures are not errors; they are reported through
/// [`Outcome::Rejected`](crate::Outcome::Rejected).
#[derive(Error, Debug)]
pub enum ExecuteError {
    /// A lifecycle hook returned an error.
    #[error("{phase} hook #{index} failed: {source}")]
    Hook {
        /// Phase the hook belongs to.
        phase: Phase,
        /// Registration index of the failing hook.
        index: usize,
        /// The error returned by the hook.
        #[source]
        source: BoxError,
    },

    /// The route action returned an error.
    #[error("action failed: {source}")]
    Action {
        /// The error returned by the action.
        #[source]
        source: BoxError,
    },

    /// Parameters resolved but the route has no action.
    #[error("route {method} {path} has no action")]
    MissingAction {
        /// Route method.
        method: String,
        /// Route path.
        path: String,
    },
}

impl ExecuteError {
    /// Returns the phase in which the failure happened.
    pub fn phase(&self) -> Phase {
        match self {
            Self::Hook { phase, .. } => *phase,
            Self::Action { .. } | Self::MissingAction { .. } => Phase::Executing,
        }
    }
}

/// Result type for route execution.
pub type ExecuteResult<T> = Result<T, ExecuteError>;
