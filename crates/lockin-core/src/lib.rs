//! # LockIn Core Library
//!
//! Core business logic for the LockIn focus timer. The mobile and CLI front
//! ends are thin layers over this crate.
//!
//! ## Architecture
//!
//! - **Phase Timer**: A wall-clock-based Work/Break/LongBreak state machine.
//!   The caller supplies timestamps and periodically invokes `tick()`.
//! - **Events**: Every phase transition produces [`Event`]s, returned from
//!   `tick()` and optionally pushed to a [`TimerObserver`].
//! - **Storage**: TOML-based configuration.
//! - **Coach**: Local session summaries and catch-up suggestions.
//!
//! ## Key Components
//!
//! - [`PhaseTimer`]: Core timer state machine
//! - [`TimerConfig`]: Validated timer configuration
//! - [`Config`]: Application configuration management
//! - [`Coach`]: Trait for session coaching backends

pub mod clock;
pub mod coach;
pub mod display;
pub mod error;
pub mod events;
pub mod storage;
pub mod timer;

pub use coach::{CatchUpInput, Coach, LocalCoach, SessionInput, SessionSummary};
pub use display::{format_countdown, progress_bar, ProgressBand};
pub use error::{ConfigError, CoreError};
pub use events::Event;
pub use storage::Config;
pub use timer::{
    AppState, BackgroundPolicy, Phase, PhaseTimer, TimerConfig, TimerObserver,
};
