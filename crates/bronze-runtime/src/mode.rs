//! Application environment mode.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RuntimeError;

/// The declared runtime environment of an application.
///
/// Exactly one mode is active at a time; the `App::is_*` predicates are
/// plain equality checks against it.
///
/// Deserialization goes through [`FromStr`], so configuration files and
/// `BRONZE_MODE` accept the same spellings as the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Mode {
    /// Production (default).
    #[default]
    Production,
    /// Development.
    Development,
    /// Staging.
    Stage,
}

impl Mode {
    /// Every mode, in declaration order.
    pub const ALL: [Mode; 3] = [Mode::Production, Mode::Development, Mode::Stage];

    /// Returns the canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Development => "development",
            Self::Stage => "stage",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = RuntimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "development" | "dev" => Ok(Self::Development),
            "stage" | "staging" => Ok(Self::Stage),
            _ => Err(RuntimeError::UnknownMode(s.to_string())),
        }
    }
}

impl TryFrom<String> for Mode {
    type Error = RuntimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
