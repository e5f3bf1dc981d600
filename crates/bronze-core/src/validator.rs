//! Validator capability and a few built-in validators.
//!
//! A [`Validator`] only answers one question: is this raw value acceptable?
//! Route parameters hold their validator behind an `Arc<dyn Validator>`, so
//! any type implementing the trait can be plugged in.
//!
//! # Example
//!
//! ```rust,ignore
//! use bronze_core::validator::{self, Range, Text, Validator};
//! use serde_json::json;
//!
//! assert!(Text::new(5).is_valid(&json!("hello")));
//! assert!(!Range::new(1.0, 10.0).is_valid(&json!(11)));
//!
//! let even = validator::from_fn("an even integer", |v| {
//!     v.as_i64().is_some_and(|n| n % 2 == 0)
//! });
//! assert!(even.is_valid(&json!(4)));
//! ```

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// The capability a parameter uses to accept or reject a raw value.
pub trait Validator: Send + Sync {
    /// Returns `true` if `value` is acceptable.
    fn is_valid(&self, value: &Value) -> bool;

    /// Human-readable description of what the validator accepts.
    fn description(&self) -> String;
}

impl<V: Validator + ?Sized> Validator for Arc<V> {
    fn is_valid(&self, value: &Value) -> bool {
        (**self).is_valid(value)
    }

    fn description(&self) -> String {
        (**self).description()
    }
}

impl<V: Validator + ?Sized> Validator for Box<V> {
    fn is_valid(&self, value: &Value) -> bool {
        (**self).is_valid(value)
    }

    fn description(&self) -> String {
        (**self).description()
    }
}

// ============================================================================
// Text
// ============================================================================

/// Accepts strings of at most `max_len` characters.
///
/// A `max_len` of `0` accepts strings of any length. Non-string values are
/// always rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Text {
    max_len: usize,
}

impl Text {
    /// Creates a text validator with the given maximum length in characters.
    pub fn new(max_len: usize) -> Self {
        Self { max_len }
    }

    /// Returns the configured maximum length.
    pub fn max_len(&self) -> usize {
        self.max_len
    }
}

impl Validator for Text {
    fn is_valid(&self, value: &Value) -> bool {
        match value {
            Value::String(s) => self.max_len == 0 || s.chars().count() <= self.max_len,
            _ => false,
        }
    }

    fn description(&self) -> String {
        if self.max_len == 0 {
            "Value must be a valid string".to_string()
        } else {
            format!(
                "Value must be a valid string and no longer than {} chars",
                self.max_len
            )
        }
    }
}

// ============================================================================
// Range
// ============================================================================

/// Accepts numbers within the inclusive range `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    min: f64,
    max: f64,
}

impl Range {
    /// Creates a range validator.
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

impl Validator for Range {
    fn is_valid(&self, value: &Value) -> bool {
        value
            .as_f64()
            .is_some_and(|n| n >= self.min && n <= self.max)
    }

    fn description(&self) -> String {
        format!("Value must be a number between {} and {}", self.min, self.max)
    }
}

// ============================================================================
// WhiteList
// ============================================================================

/// Accepts only values equal to one of a fixed list.
///
/// Strings are compared case-sensitively.
#[derive(Debug, Clone, PartialEq)]
pub struct WhiteList {
    allowed: Vec<Value>,
}

impl WhiteList {
    /// Creates a whitelist from any iterable of values.
    pub fn new<I, V>(allowed: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the allowed values.
    pub fn allowed(&self) -> &[Value] {
        &self.allowed
    }
}

impl Validator for WhiteList {
    fn is_valid(&self, value: &Value) -> bool {
        self.allowed.contains(value)
    }

    fn description(&self) -> String {
        let list: Vec<String> = self.allowed.iter().map(Value::to_string).collect();
        format!("Value must be one of ({})", list.join(", "))
    }
}

// ============================================================================
// Wildcard
// ============================================================================

/// Accepts every value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Wildcard;

impl Validator for Wildcard {
    fn is_valid(&self, _value: &Value) -> bool {
        true
    }

    fn description(&self) -> String {
        "Every input is valid".to_string()
    }
}

// ============================================================================
// Predicate
// ============================================================================

type PredicateFn = Box<dyn Fn(&Value) -> bool + Send + Sync>;

/// A validator backed by a closure.
///
/// Usually created with [`from_fn`].
pub struct Predicate {
    description: String,
    check: PredicateFn,
}

impl Validator for Predicate {
    fn is_valid(&self, value: &Value) -> bool {
        (self.check)(value)
    }

    fn description(&self) -> String {
        self.description.clone()
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Wraps a closure as a [`Validator`].
pub fn from_fn<F>(description: impl Into<String>, check: F) -> Predicate
where
    F: Fn(&Value) -> bool + Send + Sync + 'static,
{
    Predicate {
        description: description.into(),
        check: Box::new(check),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_length_limit() {
        let text = Text::new(1);
        assert!(text.is_valid(&json!("x")));
        assert!(!text.is_valid(&json!("param-x")));
        assert!(!text.is_valid(&json!(1)));
    }

    #[test]
    fn test_text_counts_chars_not_bytes() {
        assert!(Text::new(2).is_valid(&json!("éé")));
    }

    #[test]
    fn test_text_zero_is_unlimited() {
        assert!(Text::new(0).is_valid(&json!("a".repeat(10_000))));
        assert_eq!(Text::new(0).description(), "Value must be a valid string");
    }

    #[test]
    fn test_range_inclusive() {
        let range = Range::new(1.0, 3.0);
        assert!(range.is_valid(&json!(1)));
        assert!(range.is_valid(&json!(3.0)));
        assert!(!range.is_valid(&json!(3.5)));
        assert!(!range.is_valid(&json!("2")));
    }

    #[test]
    fn test_whitelist() {
        let list = WhiteList::new(["get", "post"]);
        assert!(list.is_valid(&json!("get")));
        assert!(!list.is_valid(&json!("GET")));
        assert_eq!(list.description(), r#"Value must be one of ("get", "post")"#);
    }

    #[test]
    fn test_predicate_and_shared_validators() {
        let even: Arc<dyn Validator> = Arc::new(from_fn("an even integer", |v| {
            v.as_i64().is_some_and(|n| n % 2 == 0)
        }));
        assert!(even.is_valid(&json!(4)));
        assert!(!even.is_valid(&json!(5)));
        assert_eq!(even.description(), "an even integer");
        assert!(Wildcard.is_valid(&Value::Null));
    }
}
