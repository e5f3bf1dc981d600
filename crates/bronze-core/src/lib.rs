//! # Bronze Core
//!
//! Leaf data model for the Bronze route execution engine.
//!
//! This crate provides:
//! - [`Validator`] – the capability a parameter uses to accept or reject a raw value
//! - [`Param`] – the descriptor of one named route input
//! - [`Route`] – an ordered set of parameters plus one action, built fluently
//! - [`Args`] – the resolved parameter values handed to an action
//! - [`Response`] – the output buffer shared by hooks and actions
//!
//! Nothing here executes a route. The application core that owns lifecycle
//! hooks and drives execution lives in `bronze-runtime`.
//!
//! ```rust,ignore
//! use bronze_core::{Route, validator::Text};
//!
//! let route = Route::new("GET", "/greet")
//!     .param("name", "world", Text::new(32), "Who to greet", false)
//!     .action(|args, res| {
//!         res.write(&format!("hello {}", args.str("name").unwrap_or_default()));
//!     });
//! ```

pub mod args;
pub mod error;
pub mod param;
pub mod reply;
pub mod response;
pub mod route;
pub mod validator;

pub use args::{Args, Inputs};
pub use error::{BoxError, CoreError, CoreResult, HookResult};
pub use param::Param;
pub use reply::Reply;
pub use response::Response;
pub use route::{Action, Route, into_action};
pub use validator::Validator;

/// Raw input and default values.
pub use serde_json::Value;
