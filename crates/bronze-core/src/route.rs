//! Route definitions.
//!
//! A [`Route`] bundles identifying metadata (method and path), an ordered set
//! of [`Param`] descriptors and a single action. Routes are built fluently and
//! never change once handed to the runtime.
//!
//! # Example
//!
//! ```rust,ignore
//! use bronze_core::{Route, validator::Text};
//!
//! let route = Route::new("GET", "/path")
//!     .param("x", "x-def", Text::new(200), "x param", false)
//!     .param("y", "y-def", Text::new(200), "y param", false)
//!     .action(|args, res| {
//!         res.write(&format!("{}-{}", args.str("x").unwrap(), args.str("y").unwrap()));
//!     });
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::trace;

use crate::args::Args;
use crate::error::HookResult;
use crate::param::Param;
use crate::reply::Reply;
use crate::response::Response;
use crate::validator::Validator;

/// A type-erased route action.
pub type Action = Arc<dyn Fn(&Args, &mut Response) -> HookResult + Send + Sync>;

/// Converts a closure into an [`Action`].
pub fn into_action<F, R>(f: F) -> Action
where
    F: Fn(&Args, &mut Response) -> R + Send + Sync + 'static,
    R: Reply,
{
    Arc::new(move |args: &Args, res: &mut Response| f(args, res).reply(res))
}

/// A declarative bundle of named parameters and one action.
///
/// Cloning is cheap: validators and the action are shared.
#[derive(Clone, Default)]
pub struct Route {
    method: String,
    path: String,
    desc: String,
    groups: Vec<String>,
    labels: HashMap<String, Value>,
    params: Vec<Param>,
    action: Option<Action>,
}

impl Route {
    /// Creates a route with no parameters and no action.
    ///
    /// The method is stored upper-cased.
    pub fn new(method: impl AsRef<str>, path: impl Into<String>) -> Self {
        Self {
            method: method.as_ref().to_ascii_uppercase(),
            path: path.into(),
            ..Default::default()
        }
    }

    /// Declares a parameter.
    ///
    /// Declaring the same name twice replaces the earlier descriptor but keeps
    /// its position in the declaration order.
    pub fn param<V>(
        mut self,
        name: impl Into<String>,
        default: impl Into<Value>,
        validator: V,
        description: impl Into<String>,
        optional: bool,
    ) -> Self
    where
        V: Validator + 'static,
    {
        let param = Param::new(name, default, Arc::new(validator), description, optional);
        match self.params.iter_mut().find(|p| p.name() == param.name()) {
            Some(existing) => {
                trace!(route = %self.path, param = param.name(), "Redeclaring parameter");
                *existing = param;
            }
            None => self.params.push(param),
        }
        self
    }

    /// Sets the action, replacing any previous one.
    pub fn action<F, R>(mut self, f: F) -> Self
    where
        F: Fn(&Args, &mut Response) -> R + Send + Sync + 'static,
        R: Reply,
    {
        self.action = Some(into_action(f));
        self
    }

    /// Sets a pre-built action.
    pub fn action_boxed(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    /// Sets the human-readable description of the route.
    pub fn desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = desc.into();
        self
    }

    /// Attaches a label. The last value set for a key wins.
    pub fn label(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Adds the route to a named group.
    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.groups.push(group.into());
        self
    }

    /// Returns the upper-cased method.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Returns the path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the description.
    pub fn get_desc(&self) -> &str {
        &self.desc
    }

    /// Returns the label stored under `key`, if any.
    pub fn get_label(&self, key: &str) -> Option<&Value> {
        self.labels.get(key)
    }

    /// Returns the groups this route belongs to.
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    /// Returns the parameters in declaration order.
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Looks up a parameter by name.
    pub fn param_named(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|p| p.name() == name)
    }

    /// Returns the action, if one was set.
    pub fn get_action(&self) -> Option<&Action> {
        self.action.as_ref()
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("params", &self.params)
            .field("has_action", &self.action.is_some())
            .finish_non_exhaustive()
    }
}
