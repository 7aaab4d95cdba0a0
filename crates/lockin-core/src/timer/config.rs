//! Validated timer configuration.

use serde::{Deserialize, Serialize};

use super::phase::Phase;
use crate::clock::minutes_to_ms;
use crate::error::ConfigError;

/// What happens to time spent while the host app is in the background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundPolicy {
    /// Backgrounded time is charged to the countdown on the next tick.
    #[default]
    Charge,
    /// Every foreground/background change re-anchors the clock, so time
    /// spent in the background is not charged.
    Exclude,
}

/// Longest accepted phase: one week.
pub const MAX_PHASE_MS: u64 = 7 * 24 * 60 * 60 * 1000;

fn check_duration(key: &str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::invalid(key, "duration must be greater than zero"));
    }
    if value > MAX_PHASE_MS {
        return Err(ConfigError::invalid(
            key,
            format!("duration must not exceed {MAX_PHASE_MS} ms (one week)"),
        ));
    }
    Ok(())
}

/// Immutable timer settings. Construct through [`TimerConfig::new`] or
/// [`TimerConfig::from_minutes`]; both reject zero or over-long durations
/// and a zero long-break interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    work_ms: u64,
    break_ms: u64,
    long_break_ms: u64,
    cycles_until_long_break: u32,
    auto_start_next: bool,
    #[serde(default)]
    background_policy: BackgroundPolicy,
}

impl TimerConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if any duration is zero or
    /// longer than [`MAX_PHASE_MS`], or `cycles_until_long_break` is zero.
    pub fn new(
        work_ms: u64,
        break_ms: u64,
        long_break_ms: u64,
        cycles_until_long_break: u32,
    ) -> Result<Self, ConfigError> {
        let cfg = Self {
            work_ms,
            break_ms,
            long_break_ms,
            cycles_until_long_break,
            auto_start_next: true,
            background_policy: BackgroundPolicy::default(),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Same as [`TimerConfig::new`] with whole minutes.
    pub fn from_minutes(
        work_min: u64,
        break_min: u64,
        long_break_min: u64,
        cycles_until_long_break: u32,
    ) -> Result<Self, ConfigError> {
        Self::new(
            minutes_to_ms(work_min),
            minutes_to_ms(break_min),
            minutes_to_ms(long_break_min),
            cycles_until_long_break,
        )
    }

    pub fn with_auto_start_next(mut self, auto_start_next: bool) -> Self {
        self.auto_start_next = auto_start_next;
        self
    }

    pub fn with_background_policy(mut self, policy: BackgroundPolicy) -> Self {
        self.background_policy = policy;
        self
    }

    /// Check every invariant. Used after deserialization, where the
    /// constructors are bypassed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("work_ms", self.work_ms),
            ("break_ms", self.break_ms),
            ("long_break_ms", self.long_break_ms),
        ] {
            check_duration(key, value)?;
        }
        if self.cycles_until_long_break == 0 {
            return Err(ConfigError::invalid(
                "cycles_until_long_break",
                "must be at least 1",
            ));
        }
        Ok(())
    }

    pub fn work_ms(&self) -> u64 {
        self.work_ms
    }

    pub fn break_ms(&self) -> u64 {
        self.break_ms
    }

    pub fn long_break_ms(&self) -> u64 {
        self.long_break_ms
    }

    pub fn cycles_until_long_break(&self) -> u32 {
        self.cycles_until_long_break
    }

    pub fn auto_start_next(&self) -> bool {
        self.auto_start_next
    }

    pub fn background_policy(&self) -> BackgroundPolicy {
        self.background_policy
    }

    /// Full length of `phase` in milliseconds.
    pub fn duration_ms(&self, phase: Phase) -> u64 {
        match phase {
            Phase::Work => self.work_ms,
            Phase::Break => self.break_ms,
            Phase::LongBreak => self.long_break_ms,
        }
    }

    pub(crate) fn set_work_ms(&mut self, work_ms: u64) -> Result<(), ConfigError> {
        check_duration("work_ms", work_ms)?;
        self.work_ms = work_ms;
        Ok(())
    }
}

impl Default for TimerConfig {
    /// 25/5/15 with a long break after every fourth session.
    fn default() -> Self {
        Self {
            work_ms: minutes_to_ms(25),
            break_ms: minutes_to_ms(5),
            long_break_ms: minutes_to_ms(15),
            cycles_until_long_break: 4,
            auto_start_next: true,
            background_policy: BackgroundPolicy::Charge,
        }
    }
}
