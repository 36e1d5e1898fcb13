//! Recurrence rules as entered on the scheduling form.

use std::num::NonZeroU32;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Deserializer, Serialize};

use rollcall_core::config::ScheduleConfig;
use rollcall_core::constants::{
    DEFAULT_MAX_OCCURRENCES, MAX_DURATION_MINUTES, MIN_DURATION_MINUTES, MONTHLY_STEP_DAYS,
};
use rollcall_core::types::LessonColor;

use crate::error::{ScheduleError, ScheduleResult};

/// How often a repeating lesson comes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    #[default]
    Weekly,
    /// Fixed 30-day steps, not calendar months.
    Monthly,
}

impl Frequency {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    const fn unit(self) -> &'static str {
        match self {
            Self::Daily => "day",
            Self::Weekly => "week",
            Self::Monthly => "month",
        }
    }

    /// ## Summary
    /// Distance between two consecutive occurrences for the given interval.
    ///
    /// Returns `None` if the step does not fit in a `TimeDelta`.
    #[must_use]
    pub fn step(self, interval: NonZeroU32) -> Option<TimeDelta> {
        let interval = i64::from(interval.get());
        match self {
            Self::Daily => TimeDelta::try_days(interval),
            Self::Weekly => TimeDelta::try_weeks(interval),
            Self::Monthly => TimeDelta::try_days(interval * MONTHLY_STEP_DAYS),
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const fn default_interval() -> NonZeroU32 {
    NonZeroU32::MIN
}

/// An end date as written on the form: either an exact instant or a calendar day.
#[derive(Deserialize)]
#[serde(untagged)]
enum EndDate {
    Instant(NaiveDateTime),
    Day(NaiveDate),
}

fn deserialize_end_date<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<EndDate>::deserialize(deserializer)?.map(|end| match end {
            EndDate::Instant(instant) => instant,
            EndDate::Day(day) => day.and_time(NaiveTime::MIN),
        }),
    )
}

/// A single schedule rule: one lesson, optionally repeating until an end date.
///
/// When `is_repeating` is false, `frequency`, `interval` and `end_date` are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub title: String,
    pub anchor_start: NaiveDateTime,
    pub duration_minutes: u32,
    #[serde(default)]
    pub is_repeating: bool,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default = "default_interval")]
    pub interval: NonZeroU32,
    /// Last instant a repeated occurrence may start at. A bare date means its midnight.
    #[serde(default, deserialize_with = "deserialize_end_date")]
    pub end_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub color: LessonColor,
}

impl RecurrenceRule {
    /// Creates a non-repeating rule.
    #[must_use]
    pub fn once(title: impl Into<String>, anchor_start: NaiveDateTime, duration_minutes: u32) -> Self {
        Self {
            title: title.into(),
            anchor_start,
            duration_minutes,
            is_repeating: false,
            frequency: Frequency::default(),
            interval: default_interval(),
            end_date: None,
            color: LessonColor::default(),
        }
    }

    /// Makes the rule repeat every `interval` steps of `frequency` up to `end_date`.
    #[must_use]
    pub fn repeating(
        mut self,
        frequency: Frequency,
        interval: NonZeroU32,
        end_date: NaiveDateTime,
    ) -> Self {
        self.is_repeating = true;
        self.frequency = frequency;
        self.interval = interval;
        self.end_date = Some(end_date);
        self
    }

    /// Same as [`Self::repeating`] with the end given as a calendar date.
    #[must_use]
    pub fn repeating_until(self, frequency: Frequency, interval: NonZeroU32, end: NaiveDate) -> Self {
        self.repeating(frequency, interval, end.and_time(NaiveTime::MIN))
    }

    #[must_use]
    pub fn with_color(mut self, color: LessonColor) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        TimeDelta::minutes(i64::from(self.duration_minutes))
    }

    /// End of an occurrence of this rule starting at `start`.
    #[must_use]
    pub fn end_for(&self, start: NaiveDateTime) -> Option<NaiveDateTime> {
        start.checked_add_signed(self.duration())
    }

    /// Repetition metadata stored with the first occurrence for display.
    #[must_use]
    pub fn repetition(&self) -> Option<RepetitionInfo> {
        if !self.is_repeating {
            return None;
        }
        let end_date = self.end_date?;
        Some(RepetitionInfo {
            frequency: self.frequency,
            interval: self.interval,
            end_date,
        })
    }

    /// ## Summary
    /// Checks the rule the way the scheduling form does before expanding it.
    ///
    /// ## Errors
    /// Returns `ScheduleError::Validation` if the title is blank, the duration is
    /// outside the configured bounds, or a repeating rule has no end date or ends
    /// before it starts.
    pub fn validate(&self, limits: &ScheduleLimits) -> ScheduleResult<()> {
        if self.title.trim().is_empty() {
            return Err(ScheduleError::Validation("title is required".to_string()));
        }
        if self.duration_minutes < limits.min_duration_minutes {
            return Err(ScheduleError::Validation(format!(
                "duration must be at least {} minutes",
                limits.min_duration_minutes
            )));
        }
        if self.duration_minutes > limits.max_duration_minutes {
            return Err(ScheduleError::Validation(format!(
                "duration must be at most {} minutes",
                limits.max_duration_minutes
            )));
        }
        if self.is_repeating {
            let Some(end_date) = self.end_date else {
                return Err(ScheduleError::Validation(
                    "a repeating lesson needs an end date".to_string(),
                ));
            };
            if end_date < self.anchor_start {
                return Err(ScheduleError::Validation(format!(
                    "end date {end_date} is before start {}",
                    self.anchor_start
                )));
            }
        }
        Ok(())
    }
}

/// Frequency, interval and end date kept alongside a stored series.
///
/// Display only; occurrences are never re-expanded from this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepetitionInfo {
    pub frequency: Frequency,
    pub interval: NonZeroU32,
    pub end_date: NaiveDateTime,
}

impl RepetitionInfo {
    /// Human-readable summary, e.g. `weekly, every 2 weeks until 2024-01-22`.
    #[must_use]
    pub fn describe(&self) -> String {
        let until = if self.end_date.time() == NaiveTime::MIN {
            self.end_date.format("%Y-%m-%d").to_string()
        } else {
            self.end_date.format("%Y-%m-%d %H:%M").to_string()
        };

        match self.interval.get() {
            1 => format!("{} until {until}", self.frequency),
            n => format!(
                "{}, every {n} {}s until {until}",
                self.frequency,
                self.frequency.unit()
            ),
        }
    }
}

impl std::fmt::Display for RepetitionInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Bounds applied when validating and expanding rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleLimits {
    pub min_duration_minutes: u32,
    pub max_duration_minutes: u32,
    pub max_occurrences: usize,
    pub reject_self_overlap: bool,
}

impl Default for ScheduleLimits {
    fn default() -> Self {
        Self {
            min_duration_minutes: MIN_DURATION_MINUTES,
            max_duration_minutes: MAX_DURATION_MINUTES,
            max_occurrences: DEFAULT_MAX_OCCURRENCES,
            reject_self_overlap: false,
        }
    }
}

impl From<&ScheduleConfig> for ScheduleLimits {
    fn from(config: &ScheduleConfig) -> Self {
        Self {
            min_duration_minutes: config.min_duration_minutes,
            max_duration_minutes: config.max_duration_minutes,
            max_occurrences: config.max_occurrences,
            reject_self_overlap: config.reject_self_overlap,
        }
    }
}
