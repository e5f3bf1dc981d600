//! Lifecycle hook storage.
//!
//! An [`App`](crate::App) keeps three independent, append-only hook lists.
//! Hooks run in registration order every time a route is executed:
//!
//! ```text
//! init* → (action | error*) → shutdown*
//! ```

use std::fmt;
use std::sync::Arc;

use bronze_core::{HookResult, Reply, Response};

use crate::execute::ValidationFailure;

/// A type-erased init or shutdown hook.
pub type Hook = Arc<dyn Fn(&mut Response) -> HookResult + Send + Sync>;

/// A type-erased error hook. Receives the validation failure that diverted
/// execution away from the action.
pub type ErrorHook = Arc<dyn Fn(&ValidationFailure, &mut Response) -> HookResult + Send + Sync>;

/// Converts a closure into a [`Hook`].
pub fn into_hook<F, R>(f: F) -> Hook
where
    F: Fn(&mut Response) -> R + Send + Sync + 'static,
    R: Reply,
{
    Arc::new(move |res: &mut Response| f(res).reply(res))
}

/// Converts a closure into an [`ErrorHook`].
pub fn into_error_hook<F, R>(f: F) -> ErrorHook
where
    F: Fn(&ValidationFailure, &mut Response) -> R + Send + Sync + 'static,
    R: Reply,
{
    Arc::new(move |failure: &ValidationFailure, res: &mut Response| f(failure, res).reply(res))
}

/// The three lifecycle points a hook can be registered against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    /// Before parameter resolution.
    Init,
    /// After the action or error path, always.
    Shutdown,
    /// Instead of the action when a required parameter is invalid.
    Error,
}

/// The hook lists of an application.
#[derive(Default, Clone)]
pub(crate) struct Hooks {
    pub(crate) init: Vec<Hook>,
    pub(crate) shutdown: Vec<Hook>,
    pub(crate) error: Vec<ErrorHook>,
}

impl Hooks {
    pub(crate) fn count(&self, kind: HookKind) -> usize {
        match kind {
            HookKind::Init => self.init.len(),
            HookKind::Shutdown => self.shutdown.len(),
            HookKind::Error => self.error.len(),
        }
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("init", &self.init.len())
            .field("shutdown", &self.shutdown.len())
            .field("error", &self.error.len())
            .finish()
    }
}
