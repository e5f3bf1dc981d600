//! Configuration module for the Bronze runtime.
//!
//! This module provides figment-based configuration loading for the
//! application mode and logging options.

pub mod error;
pub mod loader;
pub mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, load_config, load_config_from_file};
pub use schema::{
    AppConfig, DEFAULT_TIMEZONE, LogFormat, LogLevel, LogOutput, LoggingConfig, SpanEventConfig,
};
