//! Configuration loading
//!
//! Sources, lowest precedence first:
//! 1. Built-in defaults
//! 2. `config/beatmapset-search.toml` (optional, path overridable with
//!    `BEATMAPSET_SEARCH_CONFIG`)
//! 3. Environment variables, e.g. `BEATMAPSET_SEARCH__SEARCH__MAX_LIMIT=100`
//!
//! A `.env` file is read first so its variables participate in step 3.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

const DEFAULT_CONFIG_PATH: &str = "config/beatmapset-search.toml";
const ENV_PREFIX: &str = "BEATMAPSET_SEARCH";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub search: SearchConfig,
    pub database: DatabaseConfig,
    pub engine: EngineConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Largest page size a caller may request; also the default page size
    pub max_limit: usize,
    /// Index holding beatmapset documents
    pub index: String,
    /// Engine limit on `from + size`
    pub max_result_window: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_limit: 50,
            index: "beatmaps".to_string(),
            max_result_window: 10_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_max_size: u32,
    pub acquire_timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "mysql://osuweb@localhost:3306/osu".to_string(),
            pool_max_size: 10,
            acquire_timeout_seconds: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub url: String,
    pub timeout_seconds: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:9200".to_string(),
            timeout_seconds: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level for this crate's targets when `RUST_LOG` is unset
    pub level: String,
    pub json: bool,
    pub file_enabled: bool,
    pub file_directory: String,
    pub file_prefix: String,
    /// daily, hourly, minutely or never
    pub file_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file_enabled: false,
            file_directory: "logs".to_string(),
            file_prefix: "beatmapset-search".to_string(),
            file_rotation: "daily".to_string(),
        }
    }
}

const FILE_ROTATIONS: [&str; 4] = ["daily", "hourly", "minutely", "never"];

impl Config {
    /// Load configuration from defaults, the optional config file and the
    /// environment.
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let path = std::env::var(format!("{ENV_PREFIX}_CONFIG"))
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Config::default())?)
            .add_source(config::File::with_name(&path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.search.max_limit == 0 {
            return Err(Error::Config("search.max_limit must be positive".into()));
        }
        if self.search.index.trim().is_empty() {
            return Err(Error::Config("search.index must not be empty".into()));
        }
        if self.search.max_result_window < self.search.max_limit {
            return Err(Error::Config(format!(
                "search.max_result_window ({}) must be at least search.max_limit ({})",
                self.search.max_result_window, self.search.max_limit
            )));
        }
        if self.database.url.trim().is_empty() {
            return Err(Error::Config("database.url must not be empty".into()));
        }
        if self.database.pool_max_size == 0 {
            return Err(Error::Config("database.pool_max_size must be positive".into()));
        }
        if self.engine.url.trim().is_empty() {
            return Err(Error::Config("engine.url must not be empty".into()));
        }
        if !FILE_ROTATIONS.contains(&self.logging.file_rotation.as_str()) {
            return Err(Error::Config(format!(
                "logging.file_rotation must be one of {}",
                FILE_ROTATIONS.join(", ")
            )));
        }
        Ok(())
    }
}
