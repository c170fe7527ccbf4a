use std::sync::Mutex;

use event_emitter_rs::EventEmitter;
use tracing::warn;

/// Local change notifications fired after a write commits.
///
/// Listeners run on the emitter's own threads and receive the affected key.
///
/// # Example
///
/// ```ignore
/// use datastatis_ledger::{Engine, MemoryLedger, RecordChange};
///
/// let engine = Engine::new(MemoryLedger::new());
/// engine.on(RecordChange::Saved, |key| {
///     println!("saved {}", key);
/// });
/// ```
pub struct RecordEvents {
    emitter: Mutex<EventEmitter>,
}

impl Default for RecordEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordEvents {
    pub fn new() -> Self {
        Self {
            emitter: Mutex::new(EventEmitter::new()),
        }
    }

    /// Register a listener for an event name.
    pub fn on<F>(&self, event: &str, listener: F)
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        match self.emitter.lock() {
            Ok(mut emitter) => {
                emitter.on(event, listener);
            }
            Err(_) => warn!(event, "event emitter poisoned; listener dropped"),
        }
    }

    /// Emit `event` with `key` as payload.
    pub fn emit(&self, event: &str, key: &str) {
        match self.emitter.lock() {
            Ok(mut emitter) => {
                emitter.emit(event, key.to_string());
            }
            Err(_) => warn!(event, key, "event emitter poisoned; event dropped"),
        }
    }
}
