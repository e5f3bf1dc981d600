//! # Bronze
//!
//! A small, type-safe route execution engine with lifecycle hooks.
//!
//! ## Overview
//!
//! Bronze takes an already selected [`Route`](core::Route) and a map of raw
//! input values, resolves and validates the route's parameters, and runs
//! either the route action or the application's error hooks, wrapped by init
//! and shutdown hooks:
//!
//! ```text
//! init* ──► resolve params ──► action ──┐
//!                 │                     ├──► shutdown*
//!                 └──────────► error* ──┘
//! ```
//!
//! Route matching, transports and request parsing live outside Bronze.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bronze::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut app = App::new(Mode::Development);
//!     app.init(|res| { res.write("init-"); });
//!     app.error(|failure, res| { res.set_status(400).write(&failure.to_string()); });
//!     app.shutdown(|res| { res.write("-shutdown"); });
//!
//!     let route = Route::new("GET", "/path")
//!         .param("x", "x-def", Text::new(200), "x param", false)
//!         .param("y", "y-def", Text::new(200), "y param", false)
//!         .action(|args, _| format!("{}-{}", args.str("x").unwrap(), args.str("y").unwrap()));
//!
//!     let execution = app.execute(&route, &Inputs::new())?;
//!     assert_eq!(execution.body(), "init-x-def-y-def-shutdown");
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `toml-config` *(default)*: TOML configuration files
//! - `yaml-config`: YAML configuration files
//! - `json-log`: JSON log output

pub use bronze_core as core;
pub use bronze_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use bronze::prelude::*;
/// ```
pub mod prelude {
    // Application core
    pub use bronze_runtime::{App, Execution, ExecuteError, HookKind, Mode, Outcome, ValidationFailure};

    // Configuration and logging
    pub use bronze_runtime::config::{ConfigLoader, load_config};
    pub use bronze_runtime::logging::{LoggingBuilder, init_from_config};

    // Route definitions
    pub use bronze_core::validator::{Range, Text, Validator, WhiteList, Wildcard};
    pub use bronze_core::{Args, Inputs, Response, Route, Value};
}
