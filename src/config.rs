//! Runtime settings.
//!
//! Settings are layered, lowest precedence first: built-in defaults, an
//! optional TOML file, `NETWATCH_*` environment variables, then command-line
//! overrides.
//!
//! ```toml
//! probe_url = "https://connectivitycheck.gstatic.com/generate_204"
//! poll_interval = "10s"
//! probe_timeout = "5s"
//! signal_interval = "1s"
//! log_filter = "netwatch=info"
//! ```

use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use thiserror::Error;

use crate::data::duration::serde_str;
use crate::probe::DEFAULT_PROBE_URL;

/// Errors raised while loading settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or a value had the wrong type.
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// Values were readable but do not make sense together.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Fully resolved settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// URL probed on every tick.
    pub probe_url: String,
    /// Time between polling ticks.
    #[serde(deserialize_with = "serde_str::deserialize")]
    pub poll_interval: Duration,
    /// Deadline for a single probe; must be shorter than `poll_interval`.
    #[serde(deserialize_with = "serde_str::deserialize")]
    pub probe_timeout: Duration,
    /// How often the OS route table is re-checked.
    #[serde(deserialize_with = "serde_str::deserialize")]
    pub signal_interval: Duration,
    /// `tracing` filter directive used when `RUST_LOG` is not set.
    pub log_filter: String,
}

/// Values supplied on the command line. `None` leaves the lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub probe_url: Option<String>,
    pub poll_interval: Option<String>,
    pub probe_timeout: Option<String>,
    pub log_filter: Option<String>,
}

impl Settings {
    /// Load settings from defaults, `path` (if any), the environment and `overrides`.
    pub fn load(path: Option<&Path>, overrides: &SettingsOverrides) -> Result<Self, ConfigError> {
        Self::load_with_env(path, overrides, None)
    }

    /// Like [`load`](Self::load) but reads environment variables from `env`
    /// instead of the process environment when given.
    fn load_with_env(
        path: Option<&Path>,
        overrides: &SettingsOverrides,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("probe_url", DEFAULT_PROBE_URL)?
            .set_default("poll_interval", "10s")?
            .set_default("probe_timeout", "5s")?
            .set_default("signal_interval", "1s")?
            .set_default("log_filter", "info")?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }

        let settings: Settings = builder
            .add_source(Environment::with_prefix("NETWATCH").source(env))
            .set_override_option("probe_url", overrides.probe_url.clone())?
            .set_override_option("poll_interval", overrides.poll_interval.clone())?
            .set_override_option("probe_timeout", overrides.probe_timeout.clone())?
            .set_override_option("log_filter", overrides.log_filter.clone())?
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = reqwest::Url::parse(&self.probe_url)
            .map_err(|e| ConfigError::Invalid(format!("probe_url {:?}: {}", self.probe_url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(format!(
                "probe_url must be http or https, got {}",
                url.scheme()
            )));
        }

        for (name, value) in [
            ("poll_interval", self.poll_interval),
            ("probe_timeout", self.probe_timeout),
            ("signal_interval", self.signal_interval),
        ] {
            if value.is_zero() {
                return Err(ConfigError::Invalid(format!("{} must be greater than zero", name)));
            }
        }

        // At most one probe may be in flight at a time
        if self.probe_timeout >= self.poll_interval {
            return Err(ConfigError::Invalid(format!(
                "probe_timeout ({:?}) must be shorter than poll_interval ({:?})",
                self.probe_timeout, self.poll_interval
            )));
        }

        Ok(())
    }
}
