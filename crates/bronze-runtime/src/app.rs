//! The application core.
//!
//! [`App`] owns the process-wide state every route execution shares: the
//! lifecycle hook lists, the environment mode, the timezone and the
//! environment source.
//!
//! # Setup and execution
//!
//! Registration methods take `&mut self` and are meant to run once, during a
//! single-threaded startup phase. [`App::execute`] takes `&self`, so a fully
//! configured app can be wrapped in an `Arc` and shared by every worker that
//! handles requests.
//!
//! ```rust,ignore
//! use bronze_runtime::{App, Mode};
//! use bronze_core::{Inputs, Route, validator::Text};
//!
//! let mut app = App::new(Mode::Production);
//! app.init(|res| { res.write("init-"); });
//! app.error(|failure, res| { res.set_status(400).write(&failure.to_string()); });
//! app.shutdown(|res| { res.write("-shutdown"); });
//!
//! let route = Route::new("GET", "/path")
//!     .param("x", "x-def", Text::new(200), "x param", false)
//!     .action(|args, res| { res.write(args.str("x").unwrap_or_default()); });
//!
//! let execution = app.execute(&route, &Inputs::new())?;
//! assert_eq!(execution.body(), "init-x-def-shutdown");
//! ```

use std::fmt;
use std::sync::Arc;

use tracing::{Level, debug, error, span, trace};

use bronze_core::{Args, HookResult, Inputs, Reply, Response, Route};

use crate::config::{AppConfig, DEFAULT_TIMEZONE};
use crate::env::{EnvSource, ProcessEnv};
use crate::error::{ExecuteError, ExecuteResult};
use crate::execute::{Execution, Outcome, Phase, ValidationFailure, resolve};
use crate::hooks::{Hook, HookKind, Hooks, into_error_hook, into_hook};
use crate::mode::Mode;

/// The route execution engine.
///
/// # Thread Safety
///
/// `App` is `Send + Sync`. Hooks are stored as `Fn + Send + Sync` closures and
/// are only read during execution.
pub struct App {
    mode: Mode,
    timezone: String,
    env: Arc<dyn EnvSource>,
    hooks: Hooks,
}

impl Default for App {
    fn default() -> Self {
        Self::new(Mode::default())
    }
}

impl App {
    /// Creates an app in the given mode that reads the process environment.
    pub fn new(mode: Mode) -> Self {
        Self::with_env(mode, ProcessEnv)
    }

    /// Creates an app with a custom environment source.
    pub fn with_env(mode: Mode, env: impl EnvSource + 'static) -> Self {
        Self {
            mode,
            timezone: DEFAULT_TIMEZONE.to_string(),
            env: Arc::new(env),
            hooks: Hooks::default(),
        }
    }

    /// Creates an app from loaded configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        debug!(
            mode = %config.mode,
            timezone = %config.timezone,
            "Creating app from configuration"
        );
        Self::new(config.mode).with_timezone(config.timezone.as_str())
    }

    /// Sets the IANA timezone name (builder pattern). Defaults to `UTC`.
    ///
    /// The name is carried for hooks and actions to read; it does not
    /// change the process timezone.
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    /// Returns the timezone name.
    pub fn timezone(&self) -> &str {
        &self.timezone
    }

    // ========================================================================
    // Mode
    // ========================================================================

    /// Sets the environment mode.
    pub fn set_mode(&mut self, mode: Mode) {
        debug!(from = %self.mode, to = %mode, "Switching mode");
        self.mode = mode;
    }

    /// Returns the current mode.
    pub fn get_mode(&self) -> Mode {
        self.mode
    }

    /// Returns `true` in production mode.
    pub fn is_production(&self) -> bool {
        self.mode == Mode::Production
    }

    /// Returns `true` in development mode.
    pub fn is_development(&self) -> bool {
        self.mode == Mode::Development
    }

    /// Returns `true` in stage mode.
    pub fn is_stage(&self) -> bool {
        self.mode == Mode::Stage
    }

    // ========================================================================
    // Environment
    // ========================================================================

    /// Looks up `key` in the environment source, falling back to `default`.
    pub fn get_env(&self, key: &str, default: &str) -> String {
        self.env.get(key).unwrap_or_else(|| default.to_string())
    }

    /// Looks up `key`, falling back to an empty string.
    pub fn get_env_or_empty(&self, key: &str) -> String {
        self.get_env(key, "")
    }

    // ========================================================================
    // Hooks
    // ========================================================================

    /// Registers a hook that runs before parameters are resolved.
    pub fn init<F, R>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&mut Response) -> R + Send + Sync + 'static,
        R: Reply,
    {
        self.hooks.init.push(into_hook(f));
        self
    }

    /// Registers a hook that runs last in every execution.
    pub fn shutdown<F, R>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&mut Response) -> R + Send + Sync + 'static,
        R: Reply,
    {
        self.hooks.shutdown.push(into_hook(f));
        self
    }

    /// Registers a hook that runs instead of the action when a required
    /// parameter is invalid.
    pub fn error<F, R>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&ValidationFailure, &mut Response) -> R + Send + Sync + 'static,
        R: Reply,
    {
        self.hooks.error.push(into_error_hook(f));
        self
    }

    /// Returns the number of hooks registered for `kind`.
    pub fn hook_count(&self, kind: HookKind) -> usize {
        self.hooks.count(kind)
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Executes `route` with the given raw inputs.
    ///
    /// 1. Runs every init hook in registration order
    /// 2. Resolves parameters in declaration order, stopping at the first
    ///    required parameter whose value is rejected
    /// 3. Runs the action on success, or every error hook on rejection
    /// 4. Runs every shutdown hook, whatever happened before
    ///
    /// A failing init hook skips steps 2 and 3; a failing action or error hook
    /// stops its own phase. Shutdown hooks all run even if one fails. The
    /// first failure observed is returned after shutdown completes.
    ///
    /// Validation failures are not errors: they yield
    /// `Ok(Execution { outcome: Outcome::Rejected(..), .. })`.
    ///
    /// On `Err` the response written so far is dropped. Use
    /// [`execute_into`](Self::execute_into) to keep it.
    pub fn execute(&self, route: &Route, inputs: &Inputs) -> ExecuteResult<Execution> {
        let mut response = Response::new();
        let outcome = self.execute_into(route, inputs, &mut response)?;
        Ok(Execution { outcome, response })
    }

    /// Executes `route` like [`execute`](Self::execute), writing into a
    /// caller-owned response.
    ///
    /// Everything hooks and the action wrote stays in `res` whether or not
    /// the execution fails, including the output of shutdown hooks.
    pub fn execute_into(
        &self,
        route: &Route,
        inputs: &Inputs,
        res: &mut Response,
    ) -> ExecuteResult<Outcome> {
        let span = span!(
            Level::DEBUG,
            "execute",
            method = %route.method(),
            path = %route.path()
        );
        let _enter = span.enter();

        let mut outcome = Outcome::Completed;

        let mut failure = self.run_hooks(Phase::Initializing, &self.hooks.init, res);

        if failure.is_none() {
            trace!(
                phase = %Phase::Resolving,
                params = route.params().len(),
                "Resolving parameters"
            );
            match resolve(route, inputs) {
                Ok(args) => {
                    failure = self.run_action(route, &args, res).err();
                }
                Err(rejected) => {
                    debug!(
                        param = %rejected.param,
                        validator = %rejected.validator,
                        "Parameter rejected, running error hooks"
                    );
                    failure = self.run_error_hooks(&rejected, res);
                    outcome = Outcome::Rejected(rejected);
                }
            }
        }

        let shutdown_failure = self.run_shutdown_hooks(res);

        match failure.or(shutdown_failure) {
            Some(err) => Err(err),
            None => Ok(outcome),
        }
    }

    /// Runs `hooks` in order, stopping at the first failure.
    fn run_hooks(&self, phase: Phase, hooks: &[Hook], res: &mut Response) -> Option<ExecuteError> {
        trace!(phase = %phase, count = hooks.len(), "Running hooks");
        for (index, hook) in hooks.iter().enumerate() {
            if let Err(source) = hook(res) {
                return Some(hook_failed(phase, index, source));
            }
        }
        None
    }

    fn run_action(&self, route: &Route, args: &Args, res: &mut Response) -> ExecuteResult<()> {
        let Some(action) = route.get_action() else {
            error!(method = route.method(), path = route.path(), "Route has no action");
            return Err(ExecuteError::MissingAction {
                method: route.method().to_string(),
                path: route.path().to_string(),
            });
        };

        trace!(phase = %Phase::Executing, args = args.len(), "Running action");
        action(args, res).map_err(|source| {
            error!(error = %source, "Action failed");
            ExecuteError::Action { source }
        })
    }

    fn run_error_hooks(
        &self,
        rejected: &ValidationFailure,
        res: &mut Response,
    ) -> Option<ExecuteError> {
        trace!(phase = %Phase::Failing, count = self.hooks.error.len(), "Running hooks");
        for (index, hook) in self.hooks.error.iter().enumerate() {
            if let Err(source) = hook(rejected, res) {
                return Some(hook_failed(Phase::Failing, index, source));
            }
        }
        None
    }

    /// Runs every shutdown hook, returning the first failure.
    fn run_shutdown_hooks(&self, res: &mut Response) -> Option<ExecuteError> {
        trace!(
            phase = %Phase::Finalizing,
            count = self.hooks.shutdown.len(),
            "Running hooks"
        );
        let mut first = None;
        for (index, hook) in self.hooks.shutdown.iter().enumerate() {
            let result: HookResult = hook(res);
            if let Err(source) = result {
                let err = hook_failed(Phase::Finalizing, index, source);
                first.get_or_insert(err);
            }
        }
        first
    }
}

fn hook_failed(phase: Phase, index: usize, source: bronze_core::BoxError) -> ExecuteError {
    error!(phase = %phase, index, error = %source, "Hook failed");
    ExecuteError::Hook {
        phase,
        index,
        source,
    }
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("mode", &self.mode)
            .field("timezone", &self.timezone)
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}
