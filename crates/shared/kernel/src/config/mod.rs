use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::Path;
use tracing::info;

/// Prefix for environment overrides, e.g. `CIRRUS__WIRE__PRETTY=true`.
pub const ENV_PREFIX: &str = "CIRRUS";

/// File stem probed in the working directory when no path is given.
pub const DEFAULT_CONFIG_STEM: &str = "cirrus";

/// Custom error type for config loading.
#[cirrus_derive::cirrus_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// A reusable configuration loader that combines file-based settings with environment overrides.
///
/// This function implements a layered configuration strategy:
/// 1. **Base File**: Loads settings from `path` (any format the `config` crate understands,
///    picked by extension). An explicit path must exist. Without one, `cirrus.*` in the
///    current working directory is used when present.
/// 2. **Environment Overrides**: Overlays values from environment variables prefixed with
///    `CIRRUS__`. Nested structures are accessed using double underscores
///    (e.g., `CIRRUS__LOG__LEVEL` maps to `log.level`).
///
/// # Errors
/// This function will return an error if:
/// * An explicit configuration file cannot be found or parsed.
/// * The merged values do not match the structure of type `T`.
///
/// # Example
/// ```rust
/// use cirrus_kernel::config::load_config;
/// use std::path::Path;
///
/// #[derive(Default, serde::Deserialize)]
/// #[serde(default)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig = load_config(None::<&Path>).unwrap_or_default();
/// # let _ = cfg.port;
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let file = match &path {
        Some(path) => {
            info!("Loading config from {}", path.as_ref().display());
            File::from(path.as_ref()).required(true)
        },
        None => File::with_name(DEFAULT_CONFIG_STEM).required(false),
    };

    let config = Config::builder()
        .add_source(file)
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
