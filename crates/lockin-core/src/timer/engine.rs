//! Phase timer implementation.
//!
//! The timer is a wall-clock-based state machine. It does not use internal
//! threads or read the clock - the caller passes a timestamp (epoch
//! milliseconds) to every command and calls `tick()` periodically.
//!
//! ## Phase Transitions
//!
//! ```text
//! Work(n) -> Break      (n % cycles_until_long_break != 0)
//! Work(n) -> LongBreak  (n % cycles_until_long_break == 0)
//! Break | LongBreak -> Work
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = PhaseTimer::new(TimerConfig::default())?;
//! timer.start(now_ms());
//! // Every ~250ms:
//! for event in timer.tick(now_ms()) { /* render, vibrate */ }
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::config::{BackgroundPolicy, TimerConfig};
use super::observer::TimerObserver;
use super::phase::Phase;
use crate::clock::to_datetime;
use crate::error::ConfigError;
use crate::events::Event;

/// Foreground state of the host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppState {
    #[default]
    Active,
    Background,
}

/// Core phase timer.
///
/// Operates on wall-clock deltas -- no internal thread.
/// Not internally synchronized: callers serialize all mutating calls.
pub struct PhaseTimer {
    config: TimerConfig,
    phase: Phase,
    /// Number of the current or most recent Work session, starting at 1.
    cycle: u32,
    running: bool,
    /// Remaining time in milliseconds for the current phase.
    remaining_ms: u64,
    /// Drift-correction anchor: timestamp of the last tick or start.
    last_tick_ms: u64,
    app_state: AppState,
    observer: Option<Box<dyn TimerObserver>>,
}

impl PhaseTimer {
    /// Create a timer paused at the start of the first Work session.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the configuration has a zero
    /// duration or a zero long-break interval.
    pub fn new(config: TimerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let remaining_ms = config.work_ms();
        Ok(Self {
            config,
            phase: Phase::Work,
            cycle: 1,
            running: false,
            remaining_ms,
            last_tick_ms: 0,
            app_state: AppState::Active,
            observer: None,
        })
    }

    pub fn with_observer(mut self, observer: impl TimerObserver + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn cycle_number(&self) -> u32 {
        self.cycle
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn last_tick_ms(&self) -> u64 {
        self.last_tick_ms
    }

    pub fn app_state(&self) -> AppState {
        self.app_state
    }

    /// Full length of the current phase.
    pub fn total_ms(&self) -> u64 {
        self.config.duration_ms(self.phase)
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn progress(&self) -> f64 {
        let total = self.total_ms();
        if total == 0 {
            return 0.0;
        }
        (1.0 - self.remaining_ms as f64 / total as f64).clamp(0.0, 1.0)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self, now_ms: u64) -> Event {
        Event::StateSnapshot {
            phase: self.phase,
            cycle: self.cycle,
            running: self.running,
            remaining_ms: self.remaining_ms,
            total_ms: self.total_ms(),
            progress: self.progress(),
            at: to_datetime(now_ms),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start or resume counting down. Returns `None` if already running.
    pub fn start(&mut self, now_ms: u64) -> Option<Event> {
        if self.running {
            return None;
        }
        self.running = true;
        self.last_tick_ms = now_ms;
        debug!(phase = %self.phase, cycle = self.cycle, remaining_ms = self.remaining_ms, "timer started");
        Some(Event::TimerStarted {
            phase: self.phase,
            cycle: self.cycle,
            remaining_ms: self.remaining_ms,
            at: to_datetime(now_ms),
        })
    }

    /// Stop counting down. Returns `None` if already paused.
    pub fn pause(&mut self, now_ms: u64) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.running = false;
        debug!(phase = %self.phase, remaining_ms = self.remaining_ms, "timer paused");
        Some(Event::TimerPaused {
            remaining_ms: self.remaining_ms,
            at: to_datetime(now_ms),
        })
    }

    /// Back to a paused first Work session. Observers are not notified.
    pub fn reset(&mut self, now_ms: u64) -> Event {
        self.running = false;
        self.phase = Phase::Work;
        self.cycle = 1;
        self.remaining_ms = self.config.work_ms();
        debug!("timer reset");
        Event::TimerReset {
            at: to_datetime(now_ms),
        }
    }

    /// Call periodically while running. Charges the real time elapsed since
    /// the previous tick and returns the events of at most one phase
    /// completion. Does nothing while paused.
    pub fn tick(&mut self, now_ms: u64) -> Vec<Event> {
        if !self.running {
            return Vec::new();
        }
        self.flush_elapsed(now_ms);
        if self.remaining_ms > 0 {
            return Vec::new();
        }
        self.complete_phase(now_ms)
    }

    /// Record a foreground/background change of the host application.
    pub fn app_state_changed(&mut self, state: AppState, now_ms: u64) {
        if self.app_state == state {
            return;
        }
        self.app_state = state;
        if self.config.background_policy() == BackgroundPolicy::Exclude {
            self.last_tick_ms = self.last_tick_ms.max(now_ms);
        }
        debug!(?state, policy = ?self.config.background_policy(), "app state changed");
    }

    /// Replace the Work duration. When a Work phase is in progress its
    /// countdown restarts from the new duration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if `work_ms` is zero.
    pub fn set_work_duration(&mut self, work_ms: u64) -> Result<(), ConfigError> {
        self.config.set_work_ms(work_ms)?;
        if self.phase == Phase::Work {
            self.remaining_ms = work_ms;
        }
        Ok(())
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn flush_elapsed(&mut self, now_ms: u64) {
        let elapsed = now_ms.saturating_sub(self.last_tick_ms);
        self.last_tick_ms = self.last_tick_ms.max(now_ms);
        self.remaining_ms = self.remaining_ms.saturating_sub(elapsed);
    }

    fn complete_phase(&mut self, now_ms: u64) -> Vec<Event> {
        let finished = self.phase;
        let finished_cycle = self.cycle;

        let next = match finished {
            Phase::Work => {
                let long = self.cycle % self.config.cycles_until_long_break() == 0;
                self.cycle = self.cycle.saturating_add(1);
                if long {
                    Phase::LongBreak
                } else {
                    Phase::Break
                }
            }
            Phase::Break | Phase::LongBreak => Phase::Work,
        };
        self.phase = next;
        self.remaining_ms = self.config.duration_ms(next);
        if !self.config.auto_start_next() {
            self.running = false;
        }

        info!(from = %finished, to = %next, cycle = self.cycle, running = self.running, "phase complete");

        let at = to_datetime(now_ms);
        let mut events = vec![Event::PhaseChanged {
            phase: next,
            cycle: self.cycle,
            duration_ms: self.remaining_ms,
            at,
        }];
        if finished == Phase::Work {
            events.push(Event::CycleCompleted {
                cycle: finished_cycle,
                at,
            });
        }

        if let Some(observer) = self.observer.as_mut() {
            for event in &events {
                match event {
                    Event::PhaseChanged { .. } => observer.on_phase_change(event),
                    Event::CycleCompleted { .. } => observer.on_cycle_complete(event),
                    _ => {}
                }
            }
        }
        events
    }
}

impl std::fmt::Debug for PhaseTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhaseTimer")
            .field("config", &self.config)
            .field("phase", &self.phase)
            .field("cycle", &self.cycle)
            .field("running", &self.running)
            .field("remaining_ms", &self.remaining_ms)
            .field("last_tick_ms", &self.last_tick_ms)
            .field("app_state", &self.app_state)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}
