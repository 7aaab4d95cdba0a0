use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::Phase;

/// Every state change of the timer produces an Event.
/// The UI polls `tick()` for them; observers receive the same values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        phase: Phase,
        cycle: u32,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    /// A phase ran out and the timer moved to `phase`.
    PhaseChanged {
        phase: Phase,
        cycle: u32,
        duration_ms: u64,
        at: DateTime<Utc>,
    },
    /// A Work phase finished. `cycle` is the number of the session that just ended.
    CycleCompleted {
        cycle: u32,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: Phase,
        cycle: u32,
        running: bool,
        remaining_ms: u64,
        total_ms: u64,
        progress: f64,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Whether this event marks a phase boundary (the moments the UI vibrates).
    pub fn is_transition(&self) -> bool {
        matches!(self, Event::PhaseChanged { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_snake_case_tag() {
        let event = Event::CycleCompleted {
            cycle: 3,
            at: DateTime::<Utc>::default(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "cycle_completed");
        assert_eq!(json["cycle"], 3);
    }

    #[test]
    fn phase_changed_carries_phase_name() {
        let event = Event::PhaseChanged {
            phase: Phase::LongBreak,
            cycle: 5,
            duration_ms: 900_000,
            at: DateTime::<Utc>::default(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["phase"], "long_break");
        assert!(event.is_transition());
    }
}
