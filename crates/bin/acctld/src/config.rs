//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `acctl.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use acctl_app::services::actuator::RetryPolicy;
use acctl_app::services::driver::PulseSettings;
use acctl_app::services::sensor::SensorSettings;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Which lines drive and sense the unit.
    pub hardware: HardwareConfig,
    /// Press timing and retry budget.
    pub actuator: ActuatorConfig,
    /// Indicator line debouncing.
    pub sensor: SensorConfig,
    pub schedule: ScheduleConfig,
    pub journal: JournalConfig,
    /// Local time derivation.
    pub clock: ClockConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
    /// How long a write waits on a locked database.
    pub busy_timeout_ms: u64,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HardwareBackend {
    /// In-process simulated unit, no board needed.
    Simulated,
    /// Linux sysfs GPIO.
    Sysfs,
}

impl std::str::FromStr for HardwareBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simulated" => Ok(Self::Simulated),
            "sysfs" => Ok(Self::Sysfs),
            other => Err(ConfigError::Validation(format!(
                "unknown hardware backend {other:?}"
            ))),
        }
    }
}

/// Hardware line configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HardwareConfig {
    pub backend: HardwareBackend,
    /// GPIO wired across the unit's button.
    pub button_gpio: u32,
    /// GPIO reading the unit's power indicator.
    pub sense_gpio: u32,
    /// Whether a high level on the sense line means "on".
    pub sense_active_high: bool,
    pub sysfs_root: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ActuatorConfig {
    pub press_ms: u64,
    pub release_settle_ms: u64,
    pub verify_delay_ms: u64,
    pub retry_backoff_ms: u64,
    pub max_attempts: u32,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    pub samples: u32,
    pub sample_interval_ms: u64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// How often the schedule engine looks at the clock.
    pub tick_interval_ms: u64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct JournalConfig {
    pub capacity: usize,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Fixed offset from UTC of the local time used by schedules.
    pub utc_offset_minutes: i32,
    /// The clock is considered unset while the year is below this.
    pub min_valid_year: i32,
}

impl Config {
    /// Load configuration from `acctl.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("acctl.toml")?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(val) = std::env::var("ACCTL_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("ACCTL_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("ACCTL_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Ok(val) = std::env::var("ACCTL_DATABASE_URL") {
            self.database.url = val;
        }
        if let Ok(val) = std::env::var("ACCTL_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("ACCTL_HARDWARE") {
            self.hardware.backend = val.parse()?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.actuator.max_attempts == 0 {
            return Err(ConfigError::Validation(
                "actuator.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.sensor.samples == 0 {
            return Err(ConfigError::Validation(
                "sensor.samples must be at least 1".to_string(),
            ));
        }
        if self.journal.capacity == 0 {
            return Err(ConfigError::Validation(
                "journal.capacity must be at least 1".to_string(),
            ));
        }
        if self.clock.utc_offset_minutes.abs() >= 24 * 60 {
            return Err(ConfigError::Validation(
                "clock.utc_offset_minutes must be within one day".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Return the database URL in `sqlx`-compatible format.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database.url
    }

    #[must_use]
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.database.busy_timeout_ms)
    }

    #[must_use]
    pub fn pulse_settings(&self) -> PulseSettings {
        PulseSettings {
            press: Duration::from_millis(self.actuator.press_ms),
            release_settle: Duration::from_millis(self.actuator.release_settle_ms),
        }
    }

    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.actuator.max_attempts,
            verify_delay: Duration::from_millis(self.actuator.verify_delay_ms),
            backoff: Duration::from_millis(self.actuator.retry_backoff_ms),
        }
    }

    #[must_use]
    pub fn sensor_settings(&self) -> SensorSettings {
        SensorSettings {
            samples: self.sensor.samples,
            sample_interval: Duration::from_millis(self.sensor.sample_interval_ms),
        }
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.schedule.tick_interval_ms)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 80,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:acctl.db?mode=rwc".to_string(),
            busy_timeout_ms: 5000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "acctld=info,acctl=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for HardwareConfig {
    fn default() -> Self {
        Self {
            backend: HardwareBackend::Simulated,
            button_gpio: 25,
            sense_gpio: 32,
            sense_active_high: true,
            sysfs_root: PathBuf::from(acctl_adapter_gpio_sysfs::pin::SYSFS_GPIO_ROOT),
        }
    }
}

impl Default for ActuatorConfig {
    fn default() -> Self {
        Self {
            press_ms: 300,
            release_settle_ms: 100,
            verify_delay_ms: 500,
            retry_backoff_ms: 1500,
            max_attempts: 5,
        }
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            samples: 8,
            sample_interval_ms: 5,
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
        }
    }
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            capacity: acctl_domain::journal::DEFAULT_JOURNAL_CAPACITY,
        }
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 0,
            min_valid_year: 2020,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
