//! Callback-style notification sink.

use crate::events::Event;

/// Receives timer notifications synchronously, in emission order.
///
/// Both methods default to no-ops so a sink only implements what it needs.
pub trait TimerObserver: Send {
    /// Invoked on every phase transition with the new phase's event.
    fn on_phase_change(&mut self, _event: &Event) {}

    /// Invoked once per completed Work phase.
    fn on_cycle_complete(&mut self, _event: &Event) {}
}

/// Observer that records every notification it receives.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    pub events: Vec<Event>,
}

impl TimerObserver for EventLog {
    fn on_phase_change(&mut self, event: &Event) {
        self.events.push(event.clone());
    }

    fn on_cycle_complete(&mut self, event: &Event) {
        self.events.push(event.clone());
    }
}

/// Lets a caller keep a handle on an observer after handing it to the timer.
impl<T: TimerObserver> TimerObserver for std::sync::Arc<std::sync::Mutex<T>> {
    fn on_phase_change(&mut self, event: &Event) {
        if let Ok(mut inner) = self.lock() {
            inner.on_phase_change(event);
        }
    }

    fn on_cycle_complete(&mut self, event: &Event) {
        if let Ok(mut inner) = self.lock() {
            inner.on_cycle_complete(event);
        }
    }
}
