//! Presentation helpers shared by the front ends: countdown text and the
//! battery-style progress indicator.

use serde::{Deserialize, Serialize};

use crate::clock::MINUTE_MS;

const SECOND_MS: u64 = 1_000;
const HOUR_MS: u64 = 60 * MINUTE_MS;
const DAY_MS: u64 = 24 * HOUR_MS;

/// Format a remaining duration using its two most significant units:
/// `"2d 3h"`, `"1h 5m"`, `"24m 59s"`, `"7s"`.
pub fn format_countdown(remaining_ms: u64) -> String {
    let days = remaining_ms / DAY_MS;
    let hours = (remaining_ms % DAY_MS) / HOUR_MS;
    let minutes = (remaining_ms % HOUR_MS) / MINUTE_MS;
    let seconds = (remaining_ms % MINUTE_MS) / SECOND_MS;

    if days > 0 {
        format!("{days}d {hours}h")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}

/// `MM:SS` clock face, rounding partial seconds up so a countdown never
/// shows `00:00` while time remains.
pub fn format_clock(remaining_ms: u64) -> String {
    let total_secs = remaining_ms.div_ceil(SECOND_MS);
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

/// Fill colour band of the battery indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressBand {
    Low,
    Mid,
    High,
}

impl ProgressBand {
    pub fn from_progress(progress: f64) -> Self {
        if progress < 0.3 {
            ProgressBand::Low
        } else if progress < 0.7 {
            ProgressBand::Mid
        } else {
            ProgressBand::High
        }
    }
}

/// Text battery: `[#####-----]`. Progress outside [0, 1] is clamped.
pub fn progress_bar(progress: f64, width: usize) -> String {
    let p = if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 1.0) };
    let filled = ((width as f64) * p).round() as usize;
    let filled = filled.min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_picks_two_largest_units() {
        assert_eq!(format_countdown(2 * DAY_MS + 3 * HOUR_MS + 5 * MINUTE_MS), "2d 3h");
        assert_eq!(format_countdown(HOUR_MS + 5 * MINUTE_MS + 9 * SECOND_MS), "1h 5m");
        assert_eq!(format_countdown(24 * MINUTE_MS + 59 * SECOND_MS + 999), "24m 59s");
        assert_eq!(format_countdown(7 * SECOND_MS), "7s");
        assert_eq!(format_countdown(0), "0s");
    }

    #[test]
    fn clock_rounds_up_partial_seconds() {
        assert_eq!(format_clock(25 * MINUTE_MS), "25:00");
        assert_eq!(format_clock(1), "00:01");
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(61_500), "01:02");
    }

    #[test]
    fn band_thresholds() {
        assert_eq!(ProgressBand::from_progress(0.0), ProgressBand::Low);
        assert_eq!(ProgressBand::from_progress(0.29), ProgressBand::Low);
        assert_eq!(ProgressBand::from_progress(0.3), ProgressBand::Mid);
        assert_eq!(ProgressBand::from_progress(0.69), ProgressBand::Mid);
        assert_eq!(ProgressBand::from_progress(0.7), ProgressBand::High);
        assert_eq!(ProgressBand::from_progress(1.0), ProgressBand::High);
    }

    #[test]
    fn bar_fills_proportionally() {
        assert_eq!(progress_bar(0.0, 4), "[----]");
        assert_eq!(progress_bar(0.5, 4), "[##--]");
        assert_eq!(progress_bar(1.0, 4), "[####]");
        assert_eq!(progress_bar(7.0, 4), "[####]");
        assert_eq!(progress_bar(f64::NAN, 2), "[--]");
    }
}
