//! Configuration management for antiform.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

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
const DATA_DIR_NAME: &str = "antiform";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "storage.db";

/// Durable key the error log is stored under.
pub const DEFAULT_LOG_KEY: &str = "browserErrors";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `ANTIFORM_`)
/// 2. TOML config file at `~/.config/antiform/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Gameplay configuration.
    pub game: GameConfig,
    /// Cosmetic feedback configuration.
    pub feedback: FeedbackConfig,
    /// Screenshot export configuration.
    pub screenshot: ScreenshotConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the durable storage database.
    /// Defaults to `~/.local/share/antiform/storage.db`
    pub database_path: Option<PathBuf>,
    /// Key the error log is stored under.
    pub log_key: String,
}

/// Gameplay configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of counted interactions after which a page unlocks.
    pub unlock_threshold: u32,
    /// RGB distance under which a color guess counts as close enough.
    pub color_tolerance: f64,
    /// Fixed RNG seed for reproducible runs.
    pub seed: Option<u64>,
    /// Delay before the password page moves on by itself.
    pub password_delay_ms: u64,
    /// Length of the fireworks before the CAPTCHA page returns home.
    pub captcha_delay_ms: u64,
    /// Delay before every other page navigates onward.
    pub redirect_delay_ms: u64,
}

/// Cosmetic feedback configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct FeedbackConfig {
    /// Ring the terminal bell for tones.
    pub sound: bool,
    /// Play shake, recolor and fireworks frames.
    pub animations: bool,
    /// Run the background chaos timers.
    pub chaos: bool,
    /// Use ANSI colors.
    pub color: bool,
}

/// Screenshot export configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenshotConfig {
    /// Directory snapshots are written to. Defaults to the working directory.
    pub output_dir: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            log_key: DEFAULT_LOG_KEY.to_string(),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            unlock_threshold: 5,
            color_tolerance: 15.0,
            seed: None,
            password_delay_ms: 500,
            captcha_delay_ms: 5_000,
            redirect_delay_ms: 100,
        }
    }
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            sound: true,
            animations: true,
            chaos: true,
            color: true,
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
            .merge(Toml::file(&config_file).nested())
            .merge(Env::prefixed("ANTIFORM_").split("__"));

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
        if self.game.unlock_threshold == 0 {
            return Err(Error::ConfigValidation {
                message: "unlock_threshold must be greater than 0".to_string(),
            });
        }

        if !self.game.color_tolerance.is_finite() || self.game.color_tolerance < 0.0 {
            return Err(Error::ConfigValidation {
                message: format!(
                    "color_tolerance must be a non-negative number, got {}",
                    self.game.color_tolerance
                ),
            });
        }

        if self.storage.log_key.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "log_key cannot be empty".to_string(),
            });
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

    /// Get the screenshot directory, resolving defaults if not set.
    #[must_use]
    pub fn screenshot_dir(&self) -> PathBuf {
        self.screenshot
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Get the password auto-advance delay as a Duration.
    #[must_use]
    pub fn password_delay(&self) -> Duration {
        Duration::from_millis(self.game.password_delay_ms)
    }

    /// Get the CAPTCHA celebration delay as a Duration.
    #[must_use]
    pub fn captcha_delay(&self) -> Duration {
        Duration::from_millis(self.game.captcha_delay_ms)
    }

    /// Get the regular redirect delay as a Duration.
    #[must_use]
    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.game.redirect_delay_ms)
    }
}
