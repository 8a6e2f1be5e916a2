//! # Configuration Management

//! This module handles the configuration loading for the garage door accessory.
//! It leverages the `config` crate to layer settings from several sources, including:

//! * YAML configuration files (default.yaml plus an optional file named after the run mode)
//! * Environment variables

//! The core of this module is the `Settings` struct; the door timing options live in `AccessorySettings`.

use serde::Deserialize;
use config::{Config, Environment, File};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use crate::errors::GarageDoorError;
use crate::models::{DoorTargetState, HexCommand, LockTargetState};

/// Seconds a door takes to open or close when no duration is configured.
pub const DEFAULT_OPEN_CLOSE_SECS: f64 = 8.0;

/// Represents the complete set of configuration settings for the accessory process.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// Settings describing the door itself
    pub accessory: AccessorySettings,
    /// Settings for application logging
    #[serde(default)]
    pub logging: LoggingSettings,
    /// Where the door/lock record is kept between restarts
    #[serde(default)]
    pub persistence: PersistenceSettings,
}

/// # Accessory Settings
///
/// Timing options are in seconds. A zero or missing duration falls through to the next
/// option in the chain; a zero or missing `auto_close_delay` disables auto-close.
#[derive(Debug, Deserialize, Clone)]
pub struct AccessorySettings {
    /// Display name used as the log prefix
    pub name: String,
    /// Seconds the door takes to open
    #[serde(default)]
    pub open_duration: Option<f64>,
    /// Seconds the door takes to close
    #[serde(default)]
    pub close_duration: Option<f64>,
    /// Fallback for both directions
    #[serde(default)]
    pub open_close_duration: Option<f64>,
    /// Seconds the door stays open before closing itself
    #[serde(default)]
    pub auto_close_delay: Option<f64>,
    /// Simulated acknowledgement latency of the dry-run transport, in milliseconds
    #[serde(default)]
    pub send_latency_ms: u64,
    /// The hex payloads sent for each command
    pub data: CommandCodes,
}

/// The hex payloads the transport sends for each command.
#[derive(Debug, Deserialize, Clone)]
pub struct CommandCodes {
    pub open: HexCommand,
    pub close: HexCommand,
    #[serde(default)]
    pub lock: Option<HexCommand>,
    #[serde(default)]
    pub unlock: Option<HexCommand>,
}

impl CommandCodes {
    pub fn for_door(&self, target: DoorTargetState) -> &HexCommand {
        match target {
            DoorTargetState::Open => &self.open,
            DoorTargetState::Closed => &self.close,
        }
    }

    pub fn for_lock(&self, target: LockTargetState) -> Option<&HexCommand> {
        match target {
            LockTargetState::Secured => self.lock.as_ref(),
            LockTargetState::Unsecured => self.unlock.as_ref(),
        }
    }
}

/// Holds the configuration settings for application logging
#[derive(Debug, Deserialize, Clone, Default)]
pub struct LoggingSettings {
    /// The logging level used when `RUST_LOG` is not set (e.g., "info", "debug")
    #[serde(default)]
    pub level: Option<String>,
    /// The directory path where log files will be stored (optional)
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Holds the location of the persisted door/lock record
#[derive(Debug, Deserialize, Clone, Default)]
pub struct PersistenceSettings {
    /// JSON file the state is loaded from and saved to; nothing is persisted when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Treats zero as "unset", the way the duration chain expects.
fn positive(secs: Option<f64>) -> Option<f64> {
    secs.filter(|s| *s > 0.0)
}

/// Converts seconds to a `Duration`, saturating values `validate` would have rejected.
fn seconds(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}

impl AccessorySettings {
    /// How long the door takes to open: `open_duration`, then `open_close_duration`, then 8 seconds.
    pub fn open_duration(&self) -> Duration {
        let secs = positive(self.open_duration)
            .or_else(|| positive(self.open_close_duration))
            .unwrap_or(DEFAULT_OPEN_CLOSE_SECS);
        seconds(secs)
    }

    /// How long the door takes to close: `close_duration`, then `open_close_duration`, then 8 seconds.
    pub fn close_duration(&self) -> Duration {
        let secs = positive(self.close_duration)
            .or_else(|| positive(self.open_close_duration))
            .unwrap_or(DEFAULT_OPEN_CLOSE_SECS);
        seconds(secs)
    }

    /// The auto-close delay, or `None` when auto-close is disabled.
    pub fn auto_close_delay(&self) -> Option<Duration> {
        positive(self.auto_close_delay).map(seconds)
    }

    pub fn send_latency(&self) -> Duration {
        Duration::from_millis(self.send_latency_ms)
    }

    /// Rejects durations that are negative, NaN, infinite or too large for a `Duration`.
    pub fn validate(&self) -> Result<(), GarageDoorError> {
        let options = [
            ("open_duration", self.open_duration),
            ("close_duration", self.close_duration),
            ("open_close_duration", self.open_close_duration),
            ("auto_close_delay", self.auto_close_delay),
        ];
        for (key, value) in options {
            if let Some(secs) = value {
                if let Err(e) = Duration::try_from_secs_f64(secs) {
                    return Err(GarageDoorError::ConfigError(format!(
                        "{} must be a finite, non-negative number of seconds (got {}): {}",
                        key, secs, e
                    )));
                }
            }
        }
        Ok(())
    }
}

/// # Settings Initialization
impl Settings {
    /// Loads and constructs the application settings.
    ///
    /// Sources, in order of precedence (later wins):
    ///
    /// 1. `default.yaml` in the config directory
    /// 2. `<RUN_MODE>.yaml` in the config directory, if present
    /// 3. Environment variables prefixed with `APP` (e.g., `APP__ACCESSORY__AUTO_CLOSE_DELAY`)
    ///
    /// `CONFIG_DIR` selects the config directory (defaults to "src/config") and `RUN_MODE`
    /// the environment file (defaults to "development").
    pub fn new() -> Result<Self, GarageDoorError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        let config_dir = env::var("CONFIG_DIR").unwrap_or_else(|_| "src/config".into());
        Self::load(Path::new(&config_dir), &run_mode)
    }

    /// Loads settings from an explicit directory and run mode.
    pub fn load(config_dir: &Path, run_mode: &str) -> Result<Self, GarageDoorError> {
        debug!("Run Mode: {:?}, Config Dir: {:?}", run_mode, config_dir);

        let s = Config::builder()
            .add_source(File::with_name(&format!("{}/default", config_dir.display())))
            .add_source(File::with_name(&format!("{}/{}", config_dir.display(), run_mode)).required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;

        let mut s: Self = s.try_deserialize::<Settings>()
            .map_err(GarageDoorError::from)?;

        s.accessory.validate()?;

        if let Some(ref mut path) = s.logging.path {
            if path.is_relative() {
                *path = env::current_dir()?.join(path.clone());
            }
        }

        Ok(s)
    }
}
