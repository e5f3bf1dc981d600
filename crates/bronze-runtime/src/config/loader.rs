//! Figment-based configuration loading.
//!
//! Sources are layered, later ones winning:
//!
//! | Layer | Source |
//! |-------|--------|
//! | 1 | `AppConfig::default()` |
//! | 2 | configs passed to [`ConfigLoader::merge`], as a programmatic base |
//! | 3 | one config file: the explicit [`ConfigLoader::file`], or the first `bronze.toml` / `bronze.yaml` found in the search directories |
//! | 4 | `BRONZE_*` environment variables, `__` separating nested keys |
//! | 5 | single keys passed to [`ConfigLoader::set`] |
//!
//! So `BRONZE_MODE=dev` selects development mode,
//! `BRONZE_TIMEZONE=Asia/Tel_Aviv` sets the timezone and
//! `BRONZE_LOGGING__LEVEL=debug` sets `logging.level`.
//!
//! TOML files need the `toml-config` feature (on by default); YAML files
//! need `yaml-config`.
//!
//! ```rust,ignore
//! let config = ConfigLoader::new()
//!     .file("./deploy/bronze.toml")
//!     .load()?;
//! let app = App::from_config(&config);
//! ```

use std::path::{Path, PathBuf};

use figment::Figment;
#[cfg(any(feature = "yaml-config", feature = "toml-config"))]
use figment::providers::Format;
#[cfg(feature = "toml-config")]
use figment::providers::Toml;
#[cfg(feature = "yaml-config")]
use figment::providers::Yaml;
use figment::providers::{Env, Serialized};
use serde_json::Value;
use tracing::{debug, info, trace, warn};

use super::error::{ConfigError, ConfigResult};
use super::schema::AppConfig;

/// Prefix of environment variables read by the loader.
pub const ENV_PREFIX: &str = "BRONZE_";

/// Base name of searched configuration files.
const FILE_STEM: &str = "bronze";

/// Layers defaults, a config file, the environment and overrides into an
/// [`AppConfig`].
#[derive(Debug, Default)]
pub struct ConfigLoader {
    explicit_file: Option<PathBuf>,
    search_dirs: Vec<PathBuf>,
    skip_env: bool,
    base: Vec<AppConfig>,
    overrides: Vec<(String, Value)>,
}

impl ConfigLoader {
    /// Creates a loader that searches the default locations and reads the
    /// environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads exactly this file instead of searching. A missing file is an
    /// error.
    pub fn file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.explicit_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Adds a directory to search for `bronze.*` files.
    ///
    /// When none is added, the working directory and `<config_dir>/bronze`
    /// are searched.
    pub fn search_path<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.search_dirs.push(dir.as_ref().to_path_buf());
        self
    }

    /// Adds `<config_dir>/bronze` (e.g. `~/.config/bronze`) to the search.
    pub fn with_user_config_dir(self) -> Self {
        match dirs::config_dir() {
            Some(dir) => self.search_path(dir.join(FILE_STEM)),
            None => self,
        }
    }

    /// Reads `BRONZE_*` variables. This is the default.
    pub fn with_env(mut self) -> Self {
        self.skip_env = false;
        self
    }

    /// Ignores the environment.
    pub fn without_env(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Layers a whole `config` just above the built-in defaults.
    ///
    /// Every field of `config` counts as set, so the file and the
    /// environment still override it. Later merges win over earlier ones.
    pub fn merge(mut self, config: AppConfig) -> Self {
        self.base.push(config);
        self
    }

    /// Overrides one key over every other source.
    ///
    /// Nested keys are dotted, e.g. `set("logging.level", "debug")`.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.overrides.push((key.into(), value.into()));
        self
    }

    /// Layers every source and extracts the result.
    pub fn load(self) -> ConfigResult<AppConfig> {
        let config: AppConfig = self
            .figment()?
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        debug!(
            mode = %config.mode,
            timezone = %config.timezone,
            log_level = %config.logging.level,
            "Loaded configuration"
        );
        Ok(config)
    }

    fn figment(self) -> ConfigResult<Figment> {
        let defaults = self.base.iter().fold(
            Figment::from(Serialized::defaults(AppConfig::default())),
            |f, config| f.merge(Serialized::defaults(config)),
        );

        let mut figment = match &self.explicit_file {
            Some(path) if !path.exists() => return Err(ConfigError::FileNotFound(path.clone())),
            Some(path) => {
                info!(path = %path.display(), "Using configuration file");
                with_file(defaults, path)?
            }
            None => self.with_searched_file(defaults),
        };

        if !self.skip_env {
            trace!(prefix = ENV_PREFIX, "Reading environment");
            figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        }

        Ok(self
            .overrides
            .into_iter()
            .fold(figment, |f, (key, value)| {
                f.merge(Serialized::default(&key, value))
            }))
    }

    fn with_searched_file(&self, figment: Figment) -> Figment {
        let candidates: Vec<PathBuf> = if self.search_dirs.is_empty() {
            std::env::current_dir()
                .ok()
                .into_iter()
                .chain(dirs::config_dir().map(|d| d.join(FILE_STEM)))
                .collect()
        } else {
            self.search_dirs.clone()
        };

        let found = candidates.iter().find_map(|dir| {
            supported_extensions()
                .iter()
                .map(|ext| dir.join(format!("{FILE_STEM}.{ext}")))
                .find(|path| path.is_file())
        });

        let Some(path) = found else {
            debug!(searched = candidates.len(), "No configuration file found, using defaults");
            return figment;
        };

        info!(path = %path.display(), "Using configuration file");
        match with_file(figment.clone(), &path) {
            Ok(merged) => merged,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring configuration file");
                figment
            }
        }
    }
}

/// Extensions of the file formats enabled at compile time, in search order.
fn supported_extensions() -> &'static [&'static str] {
    &[
        #[cfg(feature = "toml-config")]
        "toml",
        #[cfg(feature = "yaml-config")]
        "yaml",
        #[cfg(feature = "yaml-config")]
        "yml",
    ]
}

fn with_file(figment: Figment, path: &Path) -> ConfigResult<Figment> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    match ext {
        #[cfg(feature = "toml-config")]
        "toml" => Ok(figment.merge(Toml::file(path))),
        #[cfg(feature = "yaml-config")]
        "yaml" | "yml" => Ok(figment.merge(Yaml::file(path))),
        _ => Err(ConfigError::UnsupportedFormat(ext.to_string())),
    }
}

/// Loads configuration from the default locations and the environment.
pub fn load_config() -> ConfigResult<AppConfig> {
    ConfigLoader::new().load()
}

/// Loads configuration from `path` and the environment.
pub fn load_config_from_file<P: AsRef<Path>>(path: P) -> ConfigResult<AppConfig> {
    ConfigLoader::new().file(path).load()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LogLevel, LogOutput};
    use crate::mode::Mode;
    use figment::Jail;

    #[test]
    fn test_default_config() {
        Jail::expect_with(|jail| {
            let config = ConfigLoader::new()
                .search_path(jail.directory())
                .without_env()
                .load()
                .map_err(|e| e.to_string())?;

            assert_eq!(config, AppConfig::default());
            assert_eq!(config.mode, Mode::Production);
            assert_eq!(config.logging.level.as_str(), "info");
            assert_eq!(config.timezone, crate::config::DEFAULT_TIMEZONE);
            Ok(())
        });
    }

    #[test]
    fn test_toml_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "bronze.toml",
                r#"
                mode = "stage"

                [logging]
                level = "debug"
                output = "stderr"
                "#,
            )?;

            let config = ConfigLoader::new()
                .search_path(jail.directory())
                .without_env()
                .load()
                .map_err(|e| e.to_string())?;

            assert_eq!(config.mode, Mode::Stage);
            assert_eq!(config.logging.level, LogLevel::Debug);
            assert_eq!(config.logging.output, LogOutput::Stderr);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("bronze.toml", r#"mode = "stage""#)?;
            jail.set_env("BRONZE_MODE", "dev");
            jail.set_env("BRONZE_LOGGING__LEVEL", "warn");

            let config = ConfigLoader::new()
                .search_path(jail.directory())
                .load()
                .map_err(|e| e.to_string())?;

            assert_eq!(config.mode, Mode::Development);
            assert_eq!(config.logging.level, LogLevel::Warn);
            Ok(())
        });
    }

    #[test]
    fn test_merge_keeps_file_values() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "bronze.toml",
                r#"
                [logging]
                level = "debug"
                "#,
            )?;

            let config = ConfigLoader::new()
                .search_path(jail.directory())
                .without_env()
                .merge(AppConfig {
                    mode: Mode::Stage,
                    ..Default::default()
                })
                .load()
                .map_err(|e| e.to_string())?;

            assert_eq!(config.mode, Mode::Stage);
            assert_eq!(config.logging.level, LogLevel::Debug);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_merge() {
        Jail::expect_with(|jail| {
            jail.set_env("BRONZE_MODE", "development");

            let config = ConfigLoader::new()
                .search_path(jail.directory())
                .merge(AppConfig {
                    mode: Mode::Stage,
                    timezone: "Asia/Tel_Aviv".to_string(),
                    ..Default::default()
                })
                .load()
                .map_err(|e| e.to_string())?;

            assert_eq!(config.mode, Mode::Development);
            assert_eq!(config.timezone, "Asia/Tel_Aviv");
            Ok(())
        });
    }

    #[test]
    fn test_set_overrides_every_source() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "bronze.toml",
                r#"
                mode = "production"

                [logging]
                level = "warn"
                output = "stderr"
                "#,
            )?;
            jail.set_env("BRONZE_MODE", "development");

            let config = ConfigLoader::new()
                .search_path(jail.directory())
                .set("mode", "stage")
                .set("logging.level", "trace")
                .load()
                .map_err(|e| e.to_string())?;

            assert_eq!(config.mode, Mode::Stage);
            assert_eq!(config.logging.level, LogLevel::Trace);
            assert_eq!(config.logging.output, LogOutput::Stderr);
            Ok(())
        });
    }

    #[test]
    fn test_env_mode_is_case_insensitive() {
        Jail::expect_with(|jail| {
            jail.set_env("BRONZE_MODE", "Development");

            let config = ConfigLoader::new()
                .search_path(jail.directory())
                .load()
                .map_err(|e| e.to_string())?;

            assert_eq!(config.mode, Mode::Development);
            Ok(())
        });
    }

    #[test]
    fn test_timezone_from_file_and_env() {
        Jail::expect_with(|jail| {
            jail.create_file("bronze.toml", r#"timezone = "Europe/Paris""#)?;

            let from_file = ConfigLoader::new()
                .search_path(jail.directory())
                .without_env()
                .load()
                .map_err(|e| e.to_string())?;
            assert_eq!(from_file.timezone, "Europe/Paris");

            jail.set_env("BRONZE_TIMEZONE", "Asia/Tel_Aviv");
            let from_env = ConfigLoader::new()
                .search_path(jail.directory())
                .load()
                .map_err(|e| e.to_string())?;
            assert_eq!(from_env.timezone, "Asia/Tel_Aviv");
            Ok(())
        });
    }

    #[test]
    fn test_invalid_mode_is_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("bronze.toml", r#"mode = "testing""#)?;

            let result = ConfigLoader::new()
                .search_path(jail.directory())
                .without_env()
                .load();

            assert!(matches!(result, Err(ConfigError::ParseError(_))));
            Ok(())
        });
    }

    #[test]
    fn test_missing_explicit_file() {
        let result = ConfigLoader::new()
            .file("/nonexistent/bronze.toml")
            .without_env()
            .load();
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_unsupported_extension() {
        Jail::expect_with(|jail| {
            jail.create_file("bronze.ini", "mode = stage")?;

            let result = ConfigLoader::new().file("bronze.ini").without_env().load();
            assert!(matches!(
                result,
                Err(ConfigError::UnsupportedFormat(ref ext)) if ext == "ini"
            ));
            Ok(())
        });
    }
}
