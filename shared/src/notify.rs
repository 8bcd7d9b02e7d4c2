#[cfg(any(test, feature = "test-util"))]
use std::sync::Mutex;

/// Event emitted after every completed toggle; payload is the new mode.
pub const MODE_CHANGED_EVENT: &str = "modeChanged";

/// Outbound, fire-and-forget channel to the rest of the application.
///
/// Implemented by the application shell. Nothing is ever read back.
pub trait NotificationSink: Send + Sync {
    fn emit(&self, name: &str, payload: bool);
}

/// Sink that keeps every event in memory.
#[cfg(any(test, feature = "test-util"))]
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<(String, bool)>>,
}

#[cfg(any(test, feature = "test-util"))]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<(String, bool)> {
        self.events.lock().expect("lock poisoned").clone()
    }

    /// Payloads of `modeChanged` events, in emission order.
    pub fn mode_changes(&self) -> Vec<bool> {
        self.events
            .lock()
            .expect("lock poisoned")
            .iter()
            .filter(|(name, _)| name == MODE_CHANGED_EVENT)
            .map(|(_, payload)| *payload)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(any(test, feature = "test-util"))]
impl NotificationSink for RecordingSink {
    fn emit(&self, name: &str, payload: bool) {
        self.events
            .lock()
            .expect("lock poisoned")
            .push((name.to_owned(), payload));
    }
}
