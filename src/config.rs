use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::common::ApplicationResult;

/// Config file picked up from the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "fcd-stream.toml";
/// Prefix for environment overrides, e.g. `FCD_STREAM__DELAY_MS=100`.
pub const ENV_PREFIX: &str = "FCD";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub discovery: DiscoveryConfig,
    pub stream: StreamConfig,
    pub input: InputConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    pub endpoint: String,
    pub node_name: String,
    pub registration_timeout_ms: u64,
    pub message_timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Pause after every timestep, in milliseconds.
    pub delay_ms: u64,
    pub channel: String,
    pub include_persons: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Config {
    /// Layer defaults, an optional TOML file and `FCD_*` environment variables.
    ///
    /// An explicit `path` must exist; without one, [`DEFAULT_CONFIG_FILE`] is
    /// read if present.
    pub fn load(path: Option<&Path>) -> ApplicationResult<Self> {
        let file = match path {
            Some(p) => config::File::from(p.to_path_buf()).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let layered = config::Config::builder()
            .add_source(config::Config::try_from(&Config::default())?)
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(layered.try_deserialize()?)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.stream.delay_ms)
    }

    pub fn to_toml(&self) -> ApplicationResult<String> {
        Ok(toml::to_string(self)?)
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            endpoint: "127.0.0.1:9990".to_string(),
            node_name: "SumoFCD".to_string(),
            registration_timeout_ms: 5000,
            message_timeout_ms: 5000,
        }
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            delay_ms: 50,
            channel: "Agents".to_string(),
            include_persons: false,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("output.xml"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}
