//! Wall-clock helpers.
//!
//! The timer never reads the clock itself; callers pass timestamps in
//! milliseconds since the Unix epoch. These helpers produce and convert them.

use chrono::{DateTime, Utc};

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Convert an epoch-milliseconds timestamp to a UTC datetime.
///
/// Values outside chrono's range map to the Unix epoch.
pub fn to_datetime(epoch_ms: u64) -> DateTime<Utc> {
    i64::try_from(epoch_ms)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .unwrap_or_default()
}

pub const MINUTE_MS: u64 = 60 * 1000;

/// Minutes to milliseconds, saturating on overflow.
pub fn minutes_to_ms(minutes: u64) -> u64 {
    minutes.saturating_mul(MINUTE_MS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_epoch_millis() {
        let dt = to_datetime(1_700_000_000_123);
        assert_eq!(dt.timestamp_millis(), 1_700_000_000_123);
    }

    #[test]
    fn out_of_range_maps_to_epoch() {
        assert_eq!(to_datetime(u64::MAX).timestamp_millis(), 0);
    }

    #[test]
    fn minutes_saturate() {
        assert_eq!(minutes_to_ms(25), 1_500_000);
        assert_eq!(minutes_to_ms(u64::MAX), u64::MAX);
    }
}
