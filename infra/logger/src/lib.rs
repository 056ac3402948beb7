//! # Logger
//!
//! Installs the process-wide `tracing` subscriber for Cirrus binaries:
//! a compact console layer, an optional rolling file layer (plain or JSON)
//! written through a non-blocking worker, and an env filter that honours
//! `RUST_LOG` on top of the configured defaults.
//!
//! Library crates only emit events through `tracing`; binaries call this once.
//!
//! ## Example
//!
//! ```rust
//! # use cirrus_logger::{Logger, LevelFilter};
//! let _logger = Logger::builder()
//!     .name("cirrus")
//!     .console(true)
//!     .level(LevelFilter::DEBUG)
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const DEFAULT_MAX_FILES: usize = 10;
const LOG_FILE_SUFFIX: &str = "log";

/// Serializable logging section of a configuration file.
///
/// ```toml
/// [log]
/// level = "debug"
/// filter = "cirrus_kernel=trace"
/// directory = "logs"
/// rotation = "hourly"
/// json = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub level: String,
    pub filter: Option<String>,
    pub console: bool,
    pub directory: Option<PathBuf>,
    pub rotation: RotationKind,
    pub max_files: usize,
    pub json: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            filter: None,
            console: true,
            directory: None,
            rotation: RotationKind::Daily,
            max_files: DEFAULT_MAX_FILES,
            json: false,
        }
    }
}

/// File rotation period, as written in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationKind {
    Minutely,
    Hourly,
    Daily,
    Never,
}

impl From<RotationKind> for Rotation {
    fn from(kind: RotationKind) -> Self {
        match kind {
            RotationKind::Minutely => Self::MINUTELY,
            RotationKind::Hourly => Self::HOURLY,
            RotationKind::Daily => Self::DAILY,
            RotationKind::Never => Self::NEVER,
        }
    }
}

#[derive(Debug)]
struct LoggerConfig {
    console: bool,
    path: Option<PathBuf>,
    level: LevelFilter,
    rotation: Rotation,
    max_files: usize,
    json: bool,
    env_filter: Option<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            console: true,
            path: None,
            level: LevelFilter::INFO,
            rotation: Rotation::DAILY,
            max_files: DEFAULT_MAX_FILES,
            json: false,
            env_filter: None,
        }
    }
}

#[derive(Debug)]
pub struct NoName;
#[derive(Debug)]
pub struct WithName(String);

mod private {
    pub trait Sealed {}
}
impl private::Sealed for NoName {}
impl private::Sealed for WithName {}

/// A builder for configuring and initializing the global tracing subscriber.
///
/// The logger name is required before [`LoggerBuilder::init`] becomes available;
/// it prefixes rolling file names (e.g. `cirrus.2026-10-18.log`).
#[derive(Debug)]
pub struct LoggerBuilder<N: private::Sealed = NoName> {
    config: LoggerConfig,
    name: N,
}

impl LoggerBuilder<NoName> {
    /// Sets the name of the logger.
    pub fn name(self, name: impl Into<String>) -> LoggerBuilder<WithName> {
        LoggerBuilder { config: self.config, name: WithName(name.into()) }
    }
}

impl<N: private::Sealed> LoggerBuilder<N> {
    /// Configures the minimum log level to be emitted.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.config.level = level;
        self
    }

    /// Adds an explicit env filter (e.g., `cirrus_kernel=debug`).
    ///
    /// `RUST_LOG` is not consulted when an explicit filter is set.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn env_filter(mut self, filter: impl Into<String>) -> Self {
        self.config.env_filter = Some(filter.into());
        self
    }

    /// Enables console logging (stderr, keeping stdout for command output).
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn console(mut self, enabled: bool) -> Self {
        self.config.console = enabled;
        self
    }

    /// Writes rolling log files into `path`.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.path = Some(path.into());
        self
    }

    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn max_files(mut self, max: usize) -> Self {
        self.config.max_files = max;
        self
    }

    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn rotation(mut self, rotation: Rotation) -> Self {
        self.config.rotation = rotation;
        self
    }

    /// Formats file output as JSON lines. Console output stays compact.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn json(mut self, enabled: bool) -> Self {
        self.config.json = enabled;
        self
    }

    /// Applies a deserialized [`LogSettings`] section.
    ///
    /// # Errors
    /// Returns [`LoggerError::InvalidConfiguration`] if `level` is not a known level.
    pub fn settings(mut self, settings: &LogSettings) -> Result<Self, LoggerError> {
        self.config.level = LevelFilter::from_str(&settings.level).map_err(|e| {
            LoggerError::InvalidConfiguration {
                message: format!("Unknown log level '{}': {e}", settings.level).into(),
                context: None,
            }
        })?;
        self.config.env_filter.clone_from(&settings.filter);
        self.config.console = settings.console;
        self.config.path.clone_from(&settings.directory);
        self.config.rotation = settings.rotation.into();
        self.config.max_files = settings.max_files;
        self.config.json = settings.json;
        Ok(self)
    }
}

impl LoggerBuilder<WithName> {
    /// Consumes the builder and initializes the global tracing subscriber.
    ///
    /// # Returns
    /// A [`Logger`] handle. **Note:** it owns the [`WorkerGuard`] of the file
    /// writer; keep it alive until shutdown so buffered lines are flushed.
    ///
    /// # Errors
    /// Returns [`LoggerError::Subscriber`] if a global subscriber has already been set.
    /// Returns [`LoggerError::InvalidConfiguration`] for invalid builder settings.
    pub fn init(self) -> Result<Logger, LoggerError> {
        let name = self.name.0;
        let config = self.config;
        validate_config(&config, &name)?;

        let env_filter = build_env_filter(&config)?;
        let mut layers = Vec::new();

        if config.console {
            layers.push(layer().compact().with_writer(std::io::stderr).with_ansi(true).boxed());
        }

        let guard = match config.path {
            Some(path) => {
                fs::create_dir_all(&path).context(format!(
                    "Failed to create log directory {}",
                    path.display()
                ))?;

                let appender = RollingFileAppender::builder()
                    .rotation(config.rotation)
                    .filename_prefix(&name)
                    .filename_suffix(LOG_FILE_SUFFIX)
                    .max_log_files(config.max_files)
                    .build(path)?;

                let (writer, guard) = tracing_appender::non_blocking(appender);
                let file_layer = layer().with_writer(writer).with_ansi(false);
                layers.push(if config.json { file_layer.json().boxed() } else { file_layer.boxed() });
                Some(guard)
            },
            None => None,
        };

        if layers.is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "No logging layers enabled. Enable console or file output.".into(),
                context: None,
            });
        }

        tracing_subscriber::registry().with(env_filter).with(layers).try_init()?;
        tracing::debug!(logger = %name, "Logging initialized");

        Ok(Logger { guard })
    }
}

/// A handle to the initialized logging system.
///
/// Holds the background worker guard; drop it only when the application exits.
#[must_use = "Dropping this handle will stop background logging threads."]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    /// Returns a new [`LoggerBuilder`] to configure the global tracing subscriber.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder { config: LoggerConfig::default(), name: NoName }
    }

    /// Returns a reference to the underlying worker guard, if present.
    #[must_use]
    pub const fn guard(&self) -> Option<&WorkerGuard> {
        self.guard.as_ref()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::info!("Logging system shutting down, flushing buffers...");
        }
    }
}

/// Lets `fs` errors flow through `.context(...)` into [`LoggerError::Internal`].
impl<T> LoggerErrorExt<T> for Result<T, std::io::Error> {
    fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> Result<T, LoggerError> {
        self.map_err(|e| LoggerError::Internal {
            message: e.to_string().into(),
            context: Some(context.into()),
        })
    }
}

fn validate_config(config: &LoggerConfig, name: &str) -> Result<(), LoggerError> {
    if name.trim().is_empty() {
        return Err(LoggerError::InvalidConfiguration {
            message: "Logger name cannot be empty".into(),
            context: None,
        });
    }

    if config.max_files == 0 {
        return Err(LoggerError::InvalidConfiguration {
            message: "max_files must be greater than zero".into(),
            context: None,
        });
    }

    Ok(())
}

fn build_env_filter(config: &LoggerConfig) -> Result<EnvFilter, LoggerError> {
    let builder = EnvFilter::builder().with_default_directive(config.level.into());
    config.env_filter.as_ref().map_or_else(
        || Ok(builder.from_env_lossy()),
        |filter| {
            builder.parse(filter).map_err(|e| LoggerError::InvalidConfiguration {
                message: format!("Invalid env filter '{filter}': {e}").into(),
                context: None,
            })
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_initial_state() {
        let builder = Logger::builder().name("cirrus-test").env_filter("cirrus=debug");
        assert!(builder.config.console);
        assert_eq!(builder.config.level, LevelFilter::INFO);
        assert_eq!(builder.config.env_filter.as_deref(), Some("cirrus=debug"));
        assert!(builder.config.path.is_none());
    }

    #[test]
    fn settings_override_builder_defaults() -> Result<(), LoggerError> {
        let settings = LogSettings {
            level: "debug".to_owned(),
            filter: Some("cirrus_kernel=trace".to_owned()),
            console: false,
            directory: Some(PathBuf::from("logs")),
            rotation: RotationKind::Hourly,
            max_files: 3,
            json: true,
        };
        let builder = Logger::builder().name("cirrus-test").settings(&settings)?;

        assert!(!builder.config.console);
        assert_eq!(builder.config.level, LevelFilter::DEBUG);
        assert_eq!(builder.config.max_files, 3);
        assert!(builder.config.json);
        assert_eq!(builder.config.path.as_deref(), Some(std::path::Path::new("logs")));
        Ok(())
    }

    #[test]
    fn unknown_level_is_rejected() {
        let settings = LogSettings { level: "loud".to_owned(), ..LogSettings::default() };
        let err = Logger::builder().settings(&settings).expect_err("level must be validated");
        assert_eq!(err.kind(), "InvalidConfiguration");
    }

    #[test]
    fn settings_deserialize_with_defaults() {
        let settings: LogSettings =
            serde_json::from_str(r#"{ "level": "warn", "rotation": "never" }"#)
                .expect("settings deserialize");
        assert_eq!(settings.level, "warn");
        assert_eq!(settings.rotation, RotationKind::Never);
        assert!(settings.console);
        assert_eq!(settings.max_files, DEFAULT_MAX_FILES);
    }

    #[test]
    fn empty_name_and_zero_files_are_invalid() {
        let config = LoggerConfig::default();
        assert!(validate_config(&config, "  ").is_err());

        let config = LoggerConfig { max_files: 0, ..LoggerConfig::default() };
        assert!(validate_config(&config, "cirrus").is_err());
    }

    #[test]
    fn no_layers_is_rejected_before_installing() {
        let err = Logger::builder()
            .name("cirrus-test")
            .console(false)
            .init()
            .expect_err("nothing to log to");
        assert_eq!(err.kind(), "InvalidConfiguration");
    }
}
