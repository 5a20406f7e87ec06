//! Runtime configuration.
//!
//! Layered with figment: built-in defaults, then an optional YAML file, then
//! `FOUNDATION_*` environment variables (e.g. `FOUNDATION_DATA_DIR`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::DEFAULT_ITERATIONS;
use crate::domain::DEFAULT_EXPORT_VERSION;

pub const ENV_PREFIX: &str = "FOUNDATION_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Figment(#[from] Box<figment::Error>),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Figment(Box::new(err))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Prefix for every store key.
    pub namespace: String,
    /// Directory for the file store. `None` keeps everything in memory.
    pub data_dir: Option<PathBuf>,
    pub export_version: String,
    pub default_per_page: usize,
    /// Cosmetic delay before each façade request.
    pub latency_ms: u64,
    /// Load sample projects, events and posts into empty collections on open.
    pub seed_sample_data: bool,
    pub password_iterations: u32,
    pub bind_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            namespace: "jivanjyoti_".to_string(),
            data_dir: None,
            export_version: DEFAULT_EXPORT_VERSION.to_string(),
            default_per_page: 10,
            latency_ms: 0,
            seed_sample_data: false,
            password_iterations: DEFAULT_ITERATIONS,
            bind_addr: "127.0.0.1:3000".to_string(),
        }
    }
}

impl Config {
    /// Defaults overlaid with `FOUNDATION_*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment())
    }

    /// Defaults, then the YAML file at `path` if it exists, then the environment.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX));
        Self::from_figment(figment)
    }

    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default())).merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.namespace.is_empty() {
            return Err(ConfigError::Invalid("namespace must not be empty".into()));
        }
        if self.default_per_page == 0 {
            return Err(ConfigError::Invalid("default_per_page must be at least 1".into()));
        }
        if self.password_iterations == 0 {
            return Err(ConfigError::Invalid("password_iterations must be at least 1".into()));
        }
        Ok(())
    }

    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}
