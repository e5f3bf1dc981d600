//! Raw inputs and resolved arguments.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{CoreError, CoreResult};

/// Raw input values keyed by parameter name.
///
/// Absent keys are legal; the parameter's default is used instead.
pub type Inputs = HashMap<String, Value>;

/// The resolved parameter values of one execution.
///
/// Values are kept in the route's declaration order. Actions read them by
/// name, so the order only matters for introspection.
///
/// # Example
///
/// ```rust,ignore
/// route.action(|args, res| -> Result<(), CoreError> {
///     let page: u32 = args.extract("page")?;
///     res.write(&format!("page {page}"));
///     Ok(())
/// });
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    values: Vec<(String, Value)>,
}

impl Args {
    /// Creates an empty argument set.
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Appends a resolved value. A repeated name replaces the earlier value.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        match self.values.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.values.push((name, value)),
        }
    }

    /// Returns the raw value bound to `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Returns the value bound to `name` if it is a string.
    pub fn str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Deserializes the value bound to `name` into `T`.
    pub fn extract<T: DeserializeOwned>(&self, name: &str) -> CoreResult<T> {
        let value = self
            .get(name)
            .ok_or_else(|| CoreError::MissingArgument(name.to_string()))?;
        T::deserialize(value).map_err(|e| CoreError::invalid_argument(name, e.to_string()))
    }

    /// Returns the number of resolved values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if nothing was resolved.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over `(name, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(n, v)| (n.as_str(), v))
    }
}
