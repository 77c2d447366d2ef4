//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing every flow event through the `log`
//! facade.  A UI layer would implement the same trait.

use log::info;

use crate::app::events::Event;
use crate::app::ports::EventSink;

/// Adapter that logs every [`Event`] and counts them.
#[derive(Debug, Default)]
pub struct LogEventSink {
    emitted: usize,
}

impl LogEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events logged so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: Event) {
        self.emitted += 1;
        if event.is_terminal() {
            info!("EVENT | {:?} (interaction finished)", event);
        } else {
            info!("EVENT | {:?}", event);
        }
    }
}
