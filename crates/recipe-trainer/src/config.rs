//! Configuration management for recipe-trainer.
//!
//! Configuration is layered with figment: built-in defaults, then an optional
//! TOML file, then environment variables.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "recipe-trainer";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "recipes.db";

/// Key the recipe collection is stored under.
pub const DEFAULT_STORAGE_KEY: &str = "recipe-memory-trainer-recipes";

/// Upper bound for either matching-drill delay.
const MAX_DELAY_MS: u64 = 60_000;

/// Application configuration.
///
/// Loaded from (highest precedence first):
/// 1. Environment variables prefixed with `RECIPE_TRAINER_`, sections split
///    by a double underscore (`RECIPE_TRAINER_DRILL__MATCH_DELAY_MS=250`)
/// 2. TOML config file at `~/.config/recipe-trainer/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Study drill configuration.
    pub drill: DrillConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/recipe-trainer/recipes.db`
    pub database_path: Option<PathBuf>,
    /// Key the whole recipe collection is written under.
    pub storage_key: String,
}

/// Drill-related configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrillConfig {
    /// How long a correct pair stays face-up before it is marked matched.
    pub match_delay_ms: u64,
    /// How long a wrong pair stays face-up before it is turned back over.
    pub mismatch_delay_ms: u64,
    /// Fixed seed for the card shuffle. Random when unset.
    pub shuffle_seed: Option<u64>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None, // Resolved at runtime
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl Default for DrillConfig {
    fn default() -> Self {
        Self {
            match_delay_ms: 500,
            mismatch_delay_ms: 1000,
            shuffle_seed: None,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("RECIPE_TRAINER_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.storage.storage_key.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "storage_key must not be empty".to_string(),
            });
        }

        for (name, value) in [
            ("match_delay_ms", self.drill.match_delay_ms),
            ("mismatch_delay_ms", self.drill.mismatch_delay_ms),
        ] {
            if value > MAX_DELAY_MS {
                return Err(Error::ConfigValidation {
                    message: format!("{name} ({value}) cannot exceed {MAX_DELAY_MS}"),
                });
            }
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the match delay as a Duration.
    #[must_use]
    pub fn match_delay(&self) -> Duration {
        Duration::from_millis(self.drill.match_delay_ms)
    }

    /// Get the mismatch delay as a Duration.
    #[must_use]
    pub fn mismatch_delay(&self) -> Duration {
        Duration::from_millis(self.drill.mismatch_delay_ms)
    }
}
