//! Configuration errors.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// An explicitly requested file does not exist.
    #[error("config file {} does not exist", .0.display())]
    FileNotFound(PathBuf),

    /// The file extension names a format that is unknown or not compiled in.
    #[error("unsupported config format `.{0}` (check the toml-config / yaml-config features)")]
    UnsupportedFormat(String),

    /// The layered sources could not be extracted into `AppConfig`.
    #[error("invalid configuration: {0}")]
    ParseError(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
