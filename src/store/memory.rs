//! MemoryLedger - in-memory `LedgerStore` for tests and embedding.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use chrono::Utc;
use serde_json::{Map, Value};

use super::{KeyModification, KeyValue, LedgerStore, ResultsIterator, Timestamp};
use crate::error::StoreError;

type Clock = Arc<dyn Fn() -> Timestamp + Send + Sync>;

/// A committed version of one key. `None` is a tombstone.
struct Version {
    tx_id: String,
    value: Option<Vec<u8>>,
    timestamp: Timestamp,
}

#[derive(Default)]
struct LedgerState {
    live: BTreeMap<String, Vec<u8>>,
    history: HashMap<String, Vec<Version>>,
    next_tx: u64,
}

impl LedgerState {
    fn commit(&mut self, key: &str, value: Option<Vec<u8>>, timestamp: Timestamp) {
        self.next_tx += 1;
        let tx_id = format!("tx-{:06}", self.next_tx);
        match &value {
            Some(bytes) => {
                self.live.insert(key.to_string(), bytes.clone());
            }
            None => {
                self.live.remove(key);
            }
        }
        self.history.entry(key.to_string()).or_default().push(Version {
            tx_id,
            value,
            timestamp,
        });
    }
}

/// Versioned key-value ledger held in memory.
///
/// Each `put_state` and `del_state` commits as its own transaction. History is
/// kept per key and returned newest first. Rich queries accept a JSON
/// `{"selector": {...}}` document whose entries are equality matches on
/// dotted field paths. Clone-friendly via Arc.
#[derive(Clone)]
pub struct MemoryLedger {
    state: Arc<RwLock<LedgerState>>,
    open_iterators: Arc<AtomicUsize>,
    clock: Clock,
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MemoryLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryLedger")
            .field("open_iterators", &self.open_iterators())
            .finish_non_exhaustive()
    }
}

impl MemoryLedger {
    /// Create an empty ledger stamping transactions with the wall clock.
    pub fn new() -> Self {
        Self::with_clock(|| {
            let now = Utc::now();
            Timestamp {
                seconds: now.timestamp(),
                nanos: now.timestamp_subsec_nanos() as i32,
            }
        })
    }

    /// Create an empty ledger stamping transactions with `clock`.
    pub fn with_clock<F>(clock: F) -> Self
    where
        F: Fn() -> Timestamp + Send + Sync + 'static,
    {
        Self {
            state: Arc::new(RwLock::new(LedgerState::default())),
            open_iterators: Arc::new(AtomicUsize::new(0)),
            clock: Arc::new(clock),
        }
    }

    /// Iterators handed out and not yet closed.
    pub fn open_iterators(&self) -> usize {
        self.open_iterators.load(Ordering::SeqCst)
    }

    /// Number of live keys.
    pub fn len(&self) -> Result<usize, StoreError> {
        let state = self
            .state
            .read()
            .map_err(|_| StoreError::LockPoisoned("len"))?;
        Ok(state.live.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

impl LedgerStore for MemoryLedger {
    type QueryResults = MemoryResults<KeyValue>;
    type HistoryResults = MemoryResults<KeyModification>;

    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let state = self
            .state
            .read()
            .map_err(|_| StoreError::LockPoisoned("get_state"))?;
        Ok(state.live.get(key).cloned())
    }

    fn put_state(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        if key.is_empty() {
            return Err(StoreError::Backend("key must not be empty".into()));
        }
        let timestamp = (self.clock)();
        let mut state = self
            .state
            .write()
            .map_err(|_| StoreError::LockPoisoned("put_state"))?;
        state.commit(key, Some(value), timestamp);
        Ok(())
    }

    fn del_state(&self, key: &str) -> Result<(), StoreError> {
        let timestamp = (self.clock)();
        let mut state = self
            .state
            .write()
            .map_err(|_| StoreError::LockPoisoned("del_state"))?;
        if state.live.contains_key(key) {
            state.commit(key, None, timestamp);
        }
        Ok(())
    }

    fn get_query_result(&self, query: &str) -> Result<Self::QueryResults, StoreError> {
        let selector = parse_selector(query)?;
        let state = self
            .state
            .read()
            .map_err(|_| StoreError::LockPoisoned("get_query_result"))?;

        let rows = match selector {
            None => VecDeque::new(),
            Some(selector) => state
                .live
                .iter()
                .filter(|(_, bytes)| {
                    serde_json::from_slice::<Value>(bytes)
                        .map(|doc| matches_selector(&doc, &selector))
                        .unwrap_or(false)
                })
                .map(|(key, bytes)| KeyValue {
                    key: key.clone(),
                    value: bytes.clone(),
                })
                .collect(),
        };

        Ok(MemoryResults::new(rows, &self.open_iterators))
    }

    fn get_history_for_key(&self, key: &str) -> Result<Self::HistoryResults, StoreError> {
        let state = self
            .state
            .read()
            .map_err(|_| StoreError::LockPoisoned("get_history_for_key"))?;

        let entries: VecDeque<KeyModification> = state
            .history
            .get(key)
            .map(|versions| {
                versions
                    .iter()
                    .rev()
                    .map(|version| KeyModification {
                        tx_id: version.tx_id.clone(),
                        value: version.value.clone().unwrap_or_default(),
                        is_delete: version.value.is_none(),
                        timestamp: version.timestamp,
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(MemoryResults::new(entries, &self.open_iterators))
    }
}

/// Snapshot iterator returned by [`MemoryLedger`].
pub struct MemoryResults<T> {
    items: VecDeque<T>,
    open_iterators: Arc<AtomicUsize>,
    closed: bool,
}

impl<T> MemoryResults<T> {
    fn new(items: VecDeque<T>, open_iterators: &Arc<AtomicUsize>) -> Self {
        open_iterators.fetch_add(1, Ordering::SeqCst);
        Self {
            items,
            open_iterators: Arc::clone(open_iterators),
            closed: false,
        }
    }
}

impl<T> ResultsIterator for MemoryResults<T> {
    type Item = T;

    fn has_next(&self) -> bool {
        !self.closed && !self.items.is_empty()
    }

    fn next_result(&mut self) -> Result<T, StoreError> {
        if self.closed {
            return Err(StoreError::IteratorClosed);
        }
        self.items
            .pop_front()
            .ok_or_else(|| StoreError::Backend("results iterator exhausted".into()))
    }

    fn close(&mut self) -> Result<(), StoreError> {
        if !self.closed {
            self.closed = true;
            self.items.clear();
            self.open_iterators.fetch_sub(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

/// `None` for a blank expression, which matches nothing.
fn parse_selector(query: &str) -> Result<Option<Map<String, Value>>, StoreError> {
    if query.trim().is_empty() {
        return Ok(None);
    }

    let mut doc: Value =
        serde_json::from_str(query).map_err(|e| StoreError::Query(e.to_string()))?;
    match doc.get_mut("selector").map(Value::take) {
        Some(Value::Object(selector)) => Ok(Some(selector)),
        Some(_) => Err(StoreError::Query("selector must be an object".into())),
        None => Err(StoreError::Query("missing selector".into())),
    }
}

fn matches_selector(doc: &Value, selector: &Map<String, Value>) -> bool {
    selector
        .iter()
        .all(|(path, expected)| lookup(doc, path) == Some(expected))
}

fn lookup<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(doc, |value, segment| value.get(segment))
}
