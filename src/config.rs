//! # Simulation Configuration
//!
//! Runtime settings for the simulated board: window geometry, scheduler
//! cadence and termination policy, asset directory, RNG seed and log level.
//!
//! ## Example: TOML Configuration
//!
//! ```toml
//! [window]
//! title = "catch the ball"
//! width = 800
//! height = 600
//!
//! [scheduler]
//! tick_ms = 16
//! termination = "halt"
//! max_ticks = 600
//!
//! [assets]
//! dir = "assets"
//!
//! [random]
//! seed = 42
//! ```
//!
//! Every section is optional; missing fields fall back to defaults.

// src/config.rs - Single configuration file
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration struct for the simulated board.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub random: RandomConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Host window configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WindowConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            width: default_width(),
            height: default_height(),
        }
    }
}

/// What happens when the host asks the simulation to quit.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TerminationPolicy {
    /// Tear down the platform and end the process immediately.
    #[default]
    Exit,
    /// Mark the simulation terminated and return from `run` after the current step.
    Halt,
}

/// Main loop cadence and run limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    #[serde(default)]
    pub termination: TerminationPolicy,
    /// Stop after this many main-loop ticks (0 = unlimited)
    #[serde(default)]
    pub max_ticks: u64,
    /// Stop once this much simulated time has elapsed (0 = unlimited)
    #[serde(default)]
    pub max_runtime_ms: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            termination: TerminationPolicy::default(),
            max_ticks: 0,
            max_runtime_ms: 0,
        }
    }
}

/// Bitmap sheet location. Without a directory, built-in sheet geometry is used.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AssetsConfig {
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RandomConfig {
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl LoggingConfig {
    /// Parse the configured level into a tracing level
    pub fn max_level(&self) -> Result<tracing::Level, ConfigError> {
        self.level
            .parse::<tracing::Level>()
            .map_err(|_| ConfigError::Invalid(format!("unknown log level '{}'", self.level)))
    }
}

impl Config {
    /// Validate value ranges that serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scheduler.tick_ms == 0 {
            return Err(ConfigError::Invalid("scheduler.tick_ms must be > 0".to_string()));
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }
        self.logging.max_level()?;
        Ok(())
    }
}

// Default value functions
fn default_title() -> String { "sketchboard".to_string() }
fn default_width() -> u32 { 800 }
fn default_height() -> u32 { 600 }
fn default_tick_ms() -> u64 { 16 }
fn default_log_level() -> String { "info".to_string() }

/// Load configuration from a TOML file at the given path.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|e| {
        tracing::error!("Failed to read config file '{}': {}", path.display(), e);
        ConfigError::Io(e)
    })?;
    let config: Config = toml::from_str(&contents).map_err(|e| {
        tracing::error!("Failed to parse config TOML: {}", e);
        ConfigError::Toml(e)
    })?;
    config.validate()?;
    Ok(config)
}
