//! A `LedgerStore` wrapper that fails chosen primitives and counts closes.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use datastatis_ledger::{
    KeyModification, KeyValue, LedgerStore, MemoryLedger, MemoryResults, ResultsIterator,
    StoreError,
};

/// Payload a misbehaving ledger attaches to delete entries.
pub const TOMBSTONE_PAYLOAD: &[u8] = br#"{"leaked":true}"#;

/// A query row value that is not JSON.
pub const CORRUPT_VALUE: &[u8] = b"{\"docType\":";

#[derive(Clone, Debug, Default)]
pub struct Faults {
    pub fail_get: bool,
    pub fail_put: bool,
    pub fail_del: bool,
    pub fail_query: bool,
    /// Fail the n-th (0-based) `next_result` of every iterator.
    pub fail_next_at: Option<usize>,
    /// Attach `TOMBSTONE_PAYLOAD` to delete entries in history.
    pub tombstone_payload: bool,
    /// Replace every query row value with `CORRUPT_VALUE`.
    pub corrupt_query_values: bool,
    /// Make every iterator `close` report a failure after releasing.
    pub fail_close: bool,
}

#[derive(Clone)]
pub struct FaultyLedger {
    pub inner: MemoryLedger,
    faults: Faults,
    closes: Arc<AtomicUsize>,
    puts: Arc<AtomicUsize>,
}

impl FaultyLedger {
    pub fn new(faults: Faults) -> Self {
        Self::wrap(MemoryLedger::new(), faults)
    }

    pub fn wrap(inner: MemoryLedger, faults: Faults) -> Self {
        Self {
            inner,
            faults,
            closes: Arc::new(AtomicUsize::new(0)),
            puts: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    /// Successful `put_state` calls made through this wrapper.
    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    fn injected(op: &str) -> StoreError {
        StoreError::Backend(format!("injected {} failure", op))
    }
}

impl LedgerStore for FaultyLedger {
    type QueryResults = FaultyResults<KeyValue>;
    type HistoryResults = FaultyResults<KeyModification>;

    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        if self.faults.fail_get {
            return Err(Self::injected("get"));
        }
        self.inner.get_state(key)
    }

    fn put_state(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        if self.faults.fail_put {
            return Err(Self::injected("put"));
        }
        self.inner.put_state(key, value)?;
        self.puts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn del_state(&self, key: &str) -> Result<(), StoreError> {
        if self.faults.fail_del {
            return Err(Self::injected("del"));
        }
        self.inner.del_state(key)
    }

    fn get_query_result(&self, query: &str) -> Result<Self::QueryResults, StoreError> {
        if self.faults.fail_query {
            return Err(Self::injected("query"));
        }
        let tamper: Option<fn(KeyValue) -> KeyValue> = if self.faults.corrupt_query_values {
            Some(corrupt_value)
        } else {
            None
        };
        Ok(FaultyResults {
            inner: self.inner.get_query_result(query)?,
            fail_at: self.faults.fail_next_at,
            fail_close: self.faults.fail_close,
            read: 0,
            closes: Arc::clone(&self.closes),
            tamper,
        })
    }

    fn get_history_for_key(&self, key: &str) -> Result<Self::HistoryResults, StoreError> {
        if self.faults.fail_query {
            return Err(Self::injected("history"));
        }
        let tamper: Option<fn(KeyModification) -> KeyModification> =
            if self.faults.tombstone_payload {
                Some(attach_payload)
            } else {
                None
            };
        Ok(FaultyResults {
            inner: self.inner.get_history_for_key(key)?,
            fail_at: self.faults.fail_next_at,
            fail_close: self.faults.fail_close,
            read: 0,
            closes: Arc::clone(&self.closes),
            tamper,
        })
    }
}

fn corrupt_value(mut row: KeyValue) -> KeyValue {
    row.value = CORRUPT_VALUE.to_vec();
    row
}

fn attach_payload(mut modification: KeyModification) -> KeyModification {
    if modification.is_delete {
        modification.value = TOMBSTONE_PAYLOAD.to_vec();
    }
    modification
}

pub struct FaultyResults<T> {
    inner: MemoryResults<T>,
    fail_at: Option<usize>,
    fail_close: bool,
    read: usize,
    closes: Arc<AtomicUsize>,
    tamper: Option<fn(T) -> T>,
}

impl<T> ResultsIterator for FaultyResults<T> {
    type Item = T;

    fn has_next(&self) -> bool {
        self.inner.has_next()
    }

    fn next_result(&mut self) -> Result<T, StoreError> {
        if self.fail_at == Some(self.read) {
            return Err(StoreError::Backend("injected iterator failure".into()));
        }
        self.read += 1;
        let item = self.inner.next_result()?;
        Ok(match self.tamper {
            Some(tamper) => tamper(item),
            None => item,
        })
    }

    fn close(&mut self) -> Result<(), StoreError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        self.inner.close()?;
        if self.fail_close {
            return Err(StoreError::Backend("injected close failure".into()));
        }
        Ok(())
    }
}
