mod config;
mod engine;
mod observer;
mod phase;

pub use config::{BackgroundPolicy, TimerConfig, MAX_PHASE_MS};
pub use engine::{AppState, PhaseTimer};
pub use observer::{EventLog, TimerObserver};
pub use phase::Phase;
