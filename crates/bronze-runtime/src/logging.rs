//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! Every call to [`App::execute`](crate::App::execute) opens an `execute`
//! span at debug level. Turning on span events (`trace_executions`) logs the
//! start and end of each execution with its duration.
//!
//! ```rust,ignore
//! use bronze_runtime::config::{LogLevel, load_config};
//! use bronze_runtime::logging;
//!
//! // From configuration
//! let config = load_config()?;
//! logging::init_from_config(&config.logging);
//!
//! // Or by hand
//! logging::LoggingBuilder::new()
//!     .level(LogLevel::Debug)
//!     .filter("bronze_runtime", LogLevel::Trace)
//!     .trace_executions(true)
//!     .init();
//! ```

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::warn;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

use crate::config::{LogFormat, LogLevel, LogOutput, LoggingConfig, SpanEventConfig};

/// File name used when a configured log path has none.
const DEFAULT_LOG_FILE: &str = "bronze.log";

/// Installs the global subscriber described by `config`.
///
/// Does nothing if a global subscriber is already installed.
pub fn init_from_config(config: &LoggingConfig) {
    LoggingBuilder::from_config(config).init();
}

fn fmt_span(config: &SpanEventConfig) -> FmtSpan {
    [
        (config.new, FmtSpan::NEW),
        (config.enter, FmtSpan::ENTER),
        (config.exit, FmtSpan::EXIT),
        (config.close, FmtSpan::CLOSE),
    ]
    .into_iter()
    .filter(|(enabled, _)| *enabled)
    .fold(FmtSpan::NONE, |acc, (_, flag)| acc | flag)
}

/// Builds and installs the global `tracing` subscriber.
#[derive(Debug)]
pub struct LoggingBuilder {
    level: LogLevel,
    directives: Vec<String>,
    format: LogFormat,
    output: LogOutput,
    file_path: Option<PathBuf>,
    spans: FmtSpan,
    show_target: bool,
    show_thread_ids: bool,
    show_location: bool,
}

impl Default for LoggingBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggingBuilder {
    /// Info-level compact logging to stdout, with targets.
    pub fn new() -> Self {
        Self {
            level: LogLevel::default(),
            directives: Vec::new(),
            format: LogFormat::default(),
            output: LogOutput::default(),
            file_path: None,
            spans: FmtSpan::NONE,
            show_target: true,
            show_thread_ids: false,
            show_location: false,
        }
    }

    /// Creates a builder from a `LoggingConfig`.
    pub fn from_config(config: &LoggingConfig) -> Self {
        let mut filters: Vec<_> = config.filters.iter().collect();
        filters.sort_by(|a, b| a.0.cmp(b.0));

        let builder = Self {
            level: config.level,
            format: config.format,
            output: config.output,
            file_path: config.file_path.clone(),
            spans: fmt_span(&config.span_events),
            show_thread_ids: config.thread_ids,
            show_location: config.file_location,
            ..Self::new()
        };
        filters
            .into_iter()
            .fold(builder, |b, (target, level)| b.filter(target, *level))
    }

    /// Sets the base level. `RUST_LOG`, when set, replaces it.
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Overrides the level of one target, e.g. `bronze_runtime`.
    pub fn filter(self, target: &str, level: LogLevel) -> Self {
        self.directive(&format!("{target}={level}"))
    }

    /// Adds a raw `EnvFilter` directive. Invalid directives are skipped with
    /// a warning when the subscriber is built.
    pub fn directive(mut self, directive: &str) -> Self {
        self.directives.push(directive.to_string());
        self
    }

    /// Sets the line format.
    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets the destination. `File` also needs a path, see [`file`](Self::file).
    pub fn output(mut self, output: LogOutput) -> Self {
        self.output = output;
        self
    }

    /// Writes logs to `path`, which is created if missing and never rotated.
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = LogOutput::File;
        self.file_path = Some(path.into());
        self
    }

    /// Sets which span events are logged.
    pub fn span_events(mut self, spans: FmtSpan) -> Self {
        self.spans = spans;
        self
    }

    /// Logs the opening and closing of every `execute` span.
    pub fn trace_executions(self, enabled: bool) -> Self {
        let spans = if enabled {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };
        self.span_events(spans)
    }

    /// Includes the event target (module path).
    pub fn show_target(mut self, enabled: bool) -> Self {
        self.show_target = enabled;
        self
    }

    /// Includes thread IDs.
    pub fn show_thread_ids(mut self, enabled: bool) -> Self {
        self.show_thread_ids = enabled;
        self
    }

    /// Includes source file and line number.
    pub fn show_location(mut self, enabled: bool) -> Self {
        self.show_location = enabled;
        self
    }

    fn env_filter(&self) -> EnvFilter {
        let mut filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level.as_str()));

        for raw in &self.directives {
            match raw.parse::<Directive>() {
                Ok(directive) => filter = filter.add_directive(directive),
                Err(e) => warn!(
                    directive = %raw,
                    error = %e,
                    "Skipping invalid log directive"
                ),
            }
        }
        filter
    }

    fn make_writer(&self) -> BoxMakeWriter {
        match (self.output, &self.file_path) {
            (LogOutput::Stdout, _) => BoxMakeWriter::new(std::io::stdout),
            (LogOutput::Stderr, _) => BoxMakeWriter::new(std::io::stderr),
            (LogOutput::File, Some(path)) => {
                let dir = path
                    .parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .unwrap_or_else(|| Path::new("."));
                let name = path
                    .file_name()
                    .unwrap_or_else(|| OsStr::new(DEFAULT_LOG_FILE));
                BoxMakeWriter::new(tracing_appender::rolling::never(dir, name))
            }
            (LogOutput::File, None) => {
                warn!("Log output is `file` but no file_path is set, using stdout");
                BoxMakeWriter::new(std::io::stdout)
            }
        }
    }

    fn fmt_layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let layer = fmt::layer()
            .with_writer(self.make_writer())
            .with_span_events(self.spans.clone())
            .with_target(self.show_target)
            .with_thread_ids(self.show_thread_ids)
            .with_file(self.show_location)
            .with_line_number(self.show_location);

        match self.format {
            LogFormat::Compact => layer.compact().boxed(),
            LogFormat::Full => layer.boxed(),
            LogFormat::Pretty => layer.pretty().boxed(),
            #[cfg(feature = "json-log")]
            LogFormat::Json => layer.json().boxed(),
        }
    }

    /// Installs the subscriber, ignoring an already installed one.
    pub fn init(self) {
        let _ = self.try_init();
    }

    /// Installs the subscriber.
    pub fn try_init(self) -> Result<(), TryInitError> {
        tracing_subscriber::registry()
            .with(self.fmt_layer())
            .with(self.env_filter())
            .try_init()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config() {
        let mut config = LoggingConfig {
            level: LogLevel::Debug,
            output: LogOutput::Stderr,
            file_location: true,
            ..Default::default()
        };
        config
            .filters
            .insert("figment".to_string(), LogLevel::Warn);
        config
            .filters
            .insert("bronze_runtime".to_string(), LogLevel::Trace);
        config.span_events.close = true;

        let builder = LoggingBuilder::from_config(&config);
        assert_eq!(builder.level, LogLevel::Debug);
        assert_eq!(builder.output, LogOutput::Stderr);
        assert!(builder.show_location);
        assert!(builder.show_target);
        assert_eq!(builder.directives, ["bronze_runtime=trace", "figment=warn"]);
        assert_eq!(builder.spans, FmtSpan::CLOSE);
    }

    #[test]
    fn test_span_config_flags() {
        let config = SpanEventConfig {
            new: true,
            close: true,
            ..Default::default()
        };
        assert_eq!(fmt_span(&config), FmtSpan::NEW | FmtSpan::CLOSE);
        assert_eq!(fmt_span(&SpanEventConfig::default()), FmtSpan::NONE);

        let builder = LoggingBuilder::new().trace_executions(true);
        assert_eq!(builder.spans, fmt_span(&config));
    }

    #[test]
    fn test_file_sets_output() {
        let builder = LoggingBuilder::new().file("logs/bronze.log");
        assert_eq!(builder.output, LogOutput::File);
        assert_eq!(builder.file_path, Some(PathBuf::from("logs/bronze.log")));
    }
}
