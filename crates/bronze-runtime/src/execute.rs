//! Execution phases, outcomes and parameter resolution.
//!
//! One call to [`App::execute`](crate::App::execute) walks through the
//! following phases and never goes back:
//!
//! ```text
//! Initializing ──► Resolving ──► Executing ──┐
//!                      │                     ├──► Finalizing
//!                      └──────► Failing ─────┘
//! ```
//!
//! `Resolving → Failing` happens on the first required parameter that fails
//! its validator; `Finalizing` is reached from every path.

use std::fmt;

use serde_json::Value;
use thiserror::Error;
use tracing::trace;

use bronze_core::{Args, Inputs, Response, Route};

/// The phase of a route execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Running init hooks.
    Initializing,
    /// Resolving and validating parameters.
    Resolving,
    /// Running the route action.
    Executing,
    /// Running error hooks after a validation failure.
    Failing,
    /// Running shutdown hooks.
    Finalizing,
}

impl Phase {
    /// Returns the lowercase phase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initializing => "init",
            Self::Resolving => "resolve",
            Self::Executing => "action",
            Self::Failing => "error",
            Self::Finalizing => "shutdown",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A required parameter whose resolved value was rejected by its validator.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Invalid '{param}' param: {validator}")]
pub struct ValidationFailure {
    /// Name of the rejected parameter.
    pub param: String,
    /// The rejected value (input or default).
    pub value: Value,
    /// Description of the validator that rejected it.
    pub validator: String,
}

/// How a completed execution ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// All required parameters were valid and the action ran.
    Completed,
    /// A required parameter was invalid; the error hooks ran instead.
    Rejected(ValidationFailure),
}

impl Outcome {
    /// Returns `true` if the action ran.
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Returns the validation failure, if execution was rejected.
    pub fn failure(&self) -> Option<&ValidationFailure> {
        match self {
            Self::Completed => None,
            Self::Rejected(failure) => Some(failure),
        }
    }
}

/// The result of one successful execution: how it ended and what the hooks
/// and action wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct Execution {
    /// Whether the action or the error path ran.
    pub outcome: Outcome,
    /// The response written during the execution.
    pub response: Response,
}

impl Execution {
    /// Returns the response body.
    pub fn body(&self) -> &str {
        self.response.body()
    }
}

/// Resolves every parameter of `route` against `inputs`.
///
/// Parameters are visited in declaration order. A parameter takes its input
/// value when present and its default otherwise. Required parameters are
/// validated exactly once; the first rejection stops resolution and no later
/// parameter is looked at. Optional parameters are never validated.
pub fn resolve(route: &Route, inputs: &Inputs) -> Result<Args, ValidationFailure> {
    let mut args = Args::new();

    for param in route.params() {
        let value = inputs
            .get(param.name())
            .unwrap_or_else(|| param.default_value());

        if !param.is_optional() && !param.validator().is_valid(value) {
            return Err(ValidationFailure {
                param: param.name().to_string(),
                value: value.clone(),
                validator: param.validator().description(),
            });
        }

        trace!(
            param = param.name(),
            supplied = inputs.contains_key(param.name()),
            "Resolved parameter"
        );
        args.insert(param.name(), value.clone());
    }

    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bronze_core::Validator;
    use bronze_core::validator::{Text, from_fn};
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn inputs(pairs: &[(&str, Value)]) -> Inputs {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_defaults_fill_missing_inputs() {
        let route = Route::new("GET", "/path")
            .param("x", "x-def", Text::new(200), "x param", false)
            .param("y", "y-def", Text::new(200), "y param", false);

        let args = resolve(&route, &inputs(&[("y", json!("param-y"))])).unwrap();
        assert_eq!(args.str("x"), Some("x-def"));
        assert_eq!(args.str("y"), Some("param-y"));
    }

    #[test]
    fn test_unknown_inputs_are_ignored() {
        let route = Route::new("GET", "/path").param("x", "x-def", Text::new(200), "x", false);

        let args = resolve(&route, &inputs(&[("z", json!("extra"))])).unwrap();
        assert_eq!(args.len(), 1);
        assert!(args.get("z").is_none());
    }

    #[test]
    fn test_first_failure_stops_resolution() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&calls);
        let counting = from_fn("anything", move |_| {
            counted.fetch_add(1, Ordering::SeqCst);
            true
        });

        let route = Route::new("GET", "/path")
            .param("x", "x-def", Text::new(1), "x param", false)
            .param("y", "y-def", counting, "y param", false);

        let failure = resolve(&route, &inputs(&[("x", json!("param-x"))])).unwrap_err();
        assert_eq!(failure.param, "x");
        assert_eq!(failure.value, json!("param-x"));
        assert_eq!(failure.validator, Text::new(1).description());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_invalid_default_fails_required_param() {
        let route = Route::new("GET", "/path").param("x", 42, Text::new(10), "x param", false);

        let failure = resolve(&route, &Inputs::new()).unwrap_err();
        assert_eq!(failure.value, json!(42));
    }

    #[test]
    fn test_optional_params_skip_validation() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&calls);
        let rejecting = from_fn("nothing", move |_| {
            counted.fetch_add(1, Ordering::SeqCst);
            false
        });

        let route = Route::new("GET", "/path").param("x", "x-def", rejecting, "x param", true);

        let args = resolve(&route, &inputs(&[("x", json!("anything"))])).unwrap();
        assert_eq!(args.str("x"), Some("anything"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_required_validator_called_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&calls);
        let counting = from_fn("anything", move |_| {
            counted.fetch_add(1, Ordering::SeqCst);
            true
        });

        let route = Route::new("GET", "/path").param("x", "x-def", counting, "x param", false);

        resolve(&route, &Inputs::new()).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failure_message() {
        let failure = ValidationFailure {
            param: "x".to_string(),
            value: json!("param-x"),
            validator: "Value must be a valid string".to_string(),
        };
        assert_eq!(
            failure.to_string(),
            "Invalid 'x' param: Value must be a valid string"
        );
        assert_eq!(Phase::Finalizing.to_string(), "shutdown");
    }
}
