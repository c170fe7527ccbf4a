//! Record engine - lifecycle writes and read projections over a `LedgerStore`.
//!
//! The engine holds no locks. `create` and `update` read the key, check the
//! precondition, then write; two callers racing on the same key are only
//! separated if the host ledger rejects the conflicting commit.

mod lifecycle;
mod projector;

use crate::config::Config;
use crate::error::ChaincodeError;
use crate::key::KeyDeriver;
use crate::store::LedgerStore;

#[cfg(feature = "emitter")]
use crate::emitter::RecordEvents;

pub use projector::render_timestamp;

/// Kind of write that just committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordChange {
    Saved,
    Updated,
    Deleted,
}

impl RecordChange {
    /// Event name published for this change.
    pub fn event_name(&self) -> &'static str {
        match self {
            RecordChange::Saved => "DataStatisSaved",
            RecordChange::Updated => "DataStatisUpdated",
            RecordChange::Deleted => "DataStatisDeleted",
        }
    }
}

pub struct Engine<S> {
    store: S,
    config: Config,
    keys: KeyDeriver,
    #[cfg(feature = "emitter")]
    events: RecordEvents,
}

impl<S: LedgerStore> Engine<S> {
    pub fn new(store: S) -> Self {
        Self::build(store, Config::default())
    }

    /// Create an engine with a custom config. The config is validated first.
    pub fn with_config(store: S, config: Config) -> Result<Self, ChaincodeError> {
        config.validate()?;
        Ok(Self::build(store, config))
    }

    fn build(store: S, config: Config) -> Self {
        Self {
            keys: KeyDeriver::new(config.key_separator),
            store,
            config,
            #[cfg(feature = "emitter")]
            events: RecordEvents::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn keys(&self) -> &KeyDeriver {
        &self.keys
    }

    /// Register a listener for a change event. The listener receives the key.
    #[cfg(feature = "emitter")]
    pub fn on<F>(&self, change: RecordChange, listener: F)
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        self.events.on(change.event_name(), listener);
    }

    #[cfg(feature = "emitter")]
    fn notify(&self, change: RecordChange, key: &str) {
        self.events.emit(change.event_name(), key);
    }

    #[cfg(not(feature = "emitter"))]
    fn notify(&self, _change: RecordChange, _key: &str) {}
}
