use anyhow::Result;
use config::Config;
use serde::Deserialize;

use crate::constants::{
    DEFAULT_MAX_OCCURRENCES, DEFAULT_MAX_PHOTO_REQUESTS, DEFAULT_PASS_MINUTES,
    MAX_DURATION_MINUTES, MIN_DURATION_MINUTES,
};
use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub schedule: ScheduleConfig,
    pub attendance: AttendanceConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    pub min_duration_minutes: u32,
    pub max_duration_minutes: u32,
    pub max_occurrences: usize,
    /// Reject a repeating series whose own occurrences overlap each other.
    pub reject_self_overlap: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            min_duration_minutes: MIN_DURATION_MINUTES,
            max_duration_minutes: MAX_DURATION_MINUTES,
            max_occurrences: DEFAULT_MAX_OCCURRENCES,
            reject_self_overlap: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AttendanceConfig {
    pub pass_minutes: u32,
    pub max_photo_requests: u32,
}

impl Default for AttendanceConfig {
    fn default() -> Self {
        Self {
            pass_minutes: DEFAULT_PASS_MINUTES,
            max_photo_requests: DEFAULT_MAX_PHOTO_REQUESTS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from environment variables and an optional `config.toml`
    /// into a `Settings`.
    ///
    /// ## Errors
    /// Returns an error if building the configuration, deserializing it, or
    /// validating the resulting values fails.
    pub fn load() -> Result<Self> {
        let settings = Config::builder()
            .set_default(
                "schedule.min_duration_minutes",
                i64::from(MIN_DURATION_MINUTES),
            )?
            .set_default(
                "schedule.max_duration_minutes",
                i64::from(MAX_DURATION_MINUTES),
            )?
            .set_default(
                "schedule.max_occurrences",
                i64::try_from(DEFAULT_MAX_OCCURRENCES)?,
            )?
            .set_default("schedule.reject_self_overlap", false)?
            .set_default("attendance.pass_minutes", i64::from(DEFAULT_PASS_MINUTES))?
            .set_default(
                "attendance.max_photo_requests",
                i64::from(DEFAULT_MAX_PHOTO_REQUESTS),
            )?
            .set_default("logging.level", "info")?
            // Env file
            .add_source(
                config::Environment::with_prefix("ROLLCALL")
                    .prefix_separator("_")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            // TOML file
            .add_source(config::File::with_name("config.toml").required(false))
            .build()?
            .try_deserialize::<Settings>()?;

        settings.validate()?;
        tracing::debug!(settings = ?settings, "Settings loaded");
        Ok(settings)
    }

    /// ## Summary
    /// Checks cross-field constraints the deserializer cannot express.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidConfiguration` if duration bounds are inverted or
    /// any limit is zero.
    pub fn validate(&self) -> CoreResult<()> {
        let schedule = &self.schedule;
        if schedule.min_duration_minutes == 0 {
            return Err(CoreError::InvalidConfiguration(
                "schedule.min_duration_minutes must be positive".to_string(),
            ));
        }
        if schedule.min_duration_minutes > schedule.max_duration_minutes {
            return Err(CoreError::InvalidConfiguration(format!(
                "schedule.min_duration_minutes ({}) exceeds schedule.max_duration_minutes ({})",
                schedule.min_duration_minutes, schedule.max_duration_minutes
            )));
        }
        if schedule.max_occurrences == 0 {
            return Err(CoreError::InvalidConfiguration(
                "schedule.max_occurrences must be positive".to_string(),
            ));
        }
        if self.attendance.pass_minutes == 0 {
            return Err(CoreError::InvalidConfiguration(
                "attendance.pass_minutes must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}
