//! Bronze Runtime - the application core of the Bronze route execution engine.
//!
//! This crate provides:
//! - The [`App`] that owns lifecycle hooks, the environment mode and the
//!   environment source, and executes routes
//! - Execution phases and outcomes ([`Phase`], [`Outcome`], [`Execution`])
//! - Configuration loading (`ConfigLoader`, figment based)
//! - Logging configuration (`LoggingBuilder`)
//!
//! # Example
//!
//! ```rust,ignore
//! use bronze_core::{Inputs, Route, validator::Text};
//! use bronze_runtime::{App, config::load_config, logging};
//!
//! let config = load_config()?;
//! logging::init_from_config(&config.logging);
//!
//! let mut app = App::from_config(&config);
//! app.error(|failure, res| {
//!     res.set_status(400).write(&failure.to_string());
//! });
//!
//! let route = Route::new("GET", "/hello")
//!     .param("name", "world", Text::new(32), "Who to greet", false)
//!     .action(|args, _| format!("hello {}", args.str("name").unwrap_or_default()));
//!
//! let execution = app.execute(&route, &Inputs::new())?;
//! println!("{}", execution.body());
//! ```

pub mod app;
pub mod config;
pub mod env;
pub mod error;
pub mod execute;
pub mod hooks;
pub mod logging;
pub mod mode;

// Re-exports
pub use app::App;
pub use config::{AppConfig, ConfigError, ConfigLoader, ConfigResult, LoggingConfig};
pub use env::{EnvSource, MapEnv, ProcessEnv};
pub use error::{ExecuteError, ExecuteResult, RuntimeError, RuntimeResult};
pub use execute::{Execution, Outcome, Phase, ValidationFailure, resolve};
pub use hooks::{ErrorHook, Hook, HookKind};
pub use logging::{LoggingBuilder, init_from_config};
pub use mode::Mode;

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};
}
