//! Parameter descriptors.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::validator::Validator;

/// Describes one named input of a [`Route`](crate::Route).
///
/// A `Param` is pure data: it never validates anything itself, it only
/// carries the validator the runtime will consult. Descriptors are created by
/// [`Route::param`](crate::Route::param) and are immutable afterwards.
#[derive(Clone)]
pub struct Param {
    name: String,
    default: Value,
    validator: Arc<dyn Validator>,
    description: String,
    optional: bool,
}

impl Param {
    /// Creates a new parameter descriptor.
    pub fn new(
        name: impl Into<String>,
        default: impl Into<Value>,
        validator: Arc<dyn Validator>,
        description: impl Into<String>,
        optional: bool,
    ) -> Self {
        Self {
            name: name.into(),
            default: default.into(),
            validator,
            description: description.into(),
            optional,
        }
    }

    /// Returns the parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the value used when no input is supplied.
    pub fn default_value(&self) -> &Value {
        &self.default
    }

    /// Returns the validator for this parameter.
    pub fn validator(&self) -> &Arc<dyn Validator> {
        &self.validator
    }

    /// Returns the human-readable label.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns `true` if a missing or invalid value must not abort execution.
    pub fn is_optional(&self) -> bool {
        self.optional
    }
}

impl fmt::Debug for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Param")
            .field("name", &self.name)
            .field("default", &self.default)
            .field("validator", &self.validator.description())
            .field("description", &self.description)
            .field("optional", &self.optional)
            .finish()
    }
}
