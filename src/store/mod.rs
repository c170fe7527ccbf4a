//! Ledger store contract.
//!
//! `LedgerStore` is the only boundary between the chaincode and the ledger:
//! point reads and writes, deletes that leave a tombstone in history, an
//! opaque rich query, and per-key history. Both sequence primitives hand back
//! a [`ResultsIterator`] that must be closed; [`ScopedResults`] owns that
//! obligation so callers cannot leak an iterator on an early return.

mod memory;

use tracing::warn;

use crate::error::StoreError;

pub use memory::{MemoryLedger, MemoryResults};

/// Seconds and nanoseconds since the Unix epoch, as recorded by the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Timestamp {
    pub seconds: i64,
    pub nanos: i32,
}

/// One row of a rich query result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: Vec<u8>,
}

/// One version of a key. Delete entries have `is_delete` set and their
/// `value` carries no meaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyModification {
    pub tx_id: String,
    pub value: Vec<u8>,
    pub is_delete: bool,
    pub timestamp: Timestamp,
}

/// A lazy, finite, single-pass sequence produced by the ledger.
pub trait ResultsIterator {
    type Item;

    fn has_next(&self) -> bool;

    fn next_result(&mut self) -> Result<Self::Item, StoreError>;

    /// Release the underlying ledger resource.
    fn close(&mut self) -> Result<(), StoreError>;
}

impl<I: ResultsIterator + ?Sized> ResultsIterator for Box<I> {
    type Item = I::Item;

    fn has_next(&self) -> bool {
        (**self).has_next()
    }

    fn next_result(&mut self) -> Result<Self::Item, StoreError> {
        (**self).next_result()
    }

    fn close(&mut self) -> Result<(), StoreError> {
        (**self).close()
    }
}

/// Versioned key-value ledger primitives.
pub trait LedgerStore: Send + Sync {
    type QueryResults: ResultsIterator<Item = KeyValue>;
    type HistoryResults: ResultsIterator<Item = KeyModification>;

    /// Current value under `key`, or `None` if absent or deleted.
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    fn put_state(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError>;

    fn del_state(&self, key: &str) -> Result<(), StoreError>;

    /// Run an opaque, store-defined query expression.
    fn get_query_result(&self, query: &str) -> Result<Self::QueryResults, StoreError>;

    /// Every version ever written under `key`, tombstones included.
    fn get_history_for_key(&self, key: &str) -> Result<Self::HistoryResults, StoreError>;
}

/// Owns a [`ResultsIterator`] and closes it exactly once.
///
/// Closing happens on [`release`](ScopedResults::release) or, failing that,
/// on drop. A close error seen during drop is logged.
pub struct ScopedResults<I: ResultsIterator> {
    inner: I,
    released: bool,
}

impl<I: ResultsIterator> ScopedResults<I> {
    pub fn new(inner: I) -> Self {
        Self {
            inner,
            released: false,
        }
    }

    /// Close now and report the close result.
    pub fn release(mut self) -> Result<(), StoreError> {
        self.close_once()
    }

    fn close_once(&mut self) -> Result<(), StoreError> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        self.inner.close()
    }
}

impl<I: ResultsIterator> Iterator for ScopedResults<I> {
    type Item = Result<I::Item, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.released || !self.inner.has_next() {
            return None;
        }
        Some(self.inner.next_result())
    }
}

impl<I: ResultsIterator> Drop for ScopedResults<I> {
    fn drop(&mut self) {
        if let Err(e) = self.close_once() {
            warn!(error = %e, "failed to close results iterator");
        }
    }
}
