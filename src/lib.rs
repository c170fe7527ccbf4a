//! Versioned data-statistics records on an append-only key-value ledger.
//!
//! Records are stored under a composite key derived from merchant, UTC day,
//! period and data packet. `save` requires the key to be free, `update`
//! requires it to be taken, and `delete` leaves a tombstone in the ledger's
//! history. Reads project rich-query rows or a key's full history into JSON
//! arrays.
//!
//! ## Example
//!
//! ```ignore
//! use datastatis_ledger::{Chaincode, MemoryLedger};
//!
//! let chaincode = Chaincode::new(MemoryLedger::new());
//! chaincode.invoke("save", &args);
//! let history = chaincode.invoke("getHistoryByKey", &["1_20231114_M_9".to_string()]);
//! ```

mod config;
mod dispatch;
#[cfg(feature = "emitter")]
mod emitter;
mod engine;
mod error;
mod key;
mod record;
mod store;

pub use config::{Config, DEFAULT_DOC_TYPE, DEFAULT_KEY_SEPARATOR};
pub use dispatch::{Chaincode, Function, Response};
#[cfg(feature = "emitter")]
pub use emitter::RecordEvents;
pub use engine::{render_timestamp, Engine, RecordChange};
pub use error::{ChaincodeError, StoreError};
pub use key::{parse_epoch_millis, utc_date, KeyDeriver};
pub use record::{DataPacket, Dimension, Indicator, Merchant, Record, RECORD_ARITY};
pub use store::{
    KeyModification, KeyValue, LedgerStore, MemoryLedger, MemoryResults, ResultsIterator,
    ScopedResults, Timestamp,
};
