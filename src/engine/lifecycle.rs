use tracing::{debug, info, warn};

use super::{Engine, RecordChange};
use crate::error::ChaincodeError;
use crate::record::Record;
use crate::store::LedgerStore;

/// Existence required at the derived key before writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Precondition {
    Absent,
    Present,
}

impl<S: LedgerStore> Engine<S> {
    /// Parse 20 positional arguments into a record tagged with this engine's docType.
    pub fn parse_record(&self, args: &[String]) -> Result<Record, ChaincodeError> {
        Record::from_args(args, &self.config.doc_type)
    }

    /// Store `record` under its derived key. The key must not hold a live record.
    ///
    /// Returns the key.
    pub fn create(&self, record: &Record) -> Result<String, ChaincodeError> {
        debug!("start save datastatis");
        let key = self.write(record, Precondition::Absent)?;
        info!(key = %key, "saved datastatis");
        self.notify(RecordChange::Saved, &key);
        Ok(key)
    }

    /// Replace the live record under `record`'s derived key. No field merge.
    ///
    /// Returns the key.
    pub fn update(&self, record: &Record) -> Result<String, ChaincodeError> {
        debug!("start update datastatis");
        let key = self.write(record, Precondition::Present)?;
        info!(key = %key, "updated datastatis");
        self.notify(RecordChange::Updated, &key);
        Ok(key)
    }

    /// Remove the live record under a caller-supplied key.
    pub fn delete(&self, key: &str) -> Result<(), ChaincodeError> {
        debug!(key = %key, "start delete datastatis");
        if self.store.get_state(key)?.is_none() {
            warn!(key = %key, "delete of missing datastatis");
            return Err(ChaincodeError::NotFound(key.to_string()));
        }

        self.store.del_state(key)?;
        info!(key = %key, "deleted datastatis");
        self.notify(RecordChange::Deleted, key);
        Ok(())
    }

    /// Decoded record currently stored under `key`.
    pub fn get(&self, key: &str) -> Result<Option<Record>, ChaincodeError> {
        match self.store.get_state(key)? {
            Some(bytes) => Ok(Some(Record::from_json(&bytes)?)),
            None => Ok(None),
        }
    }

    fn write(&self, record: &Record, precondition: Precondition) -> Result<String, ChaincodeError> {
        let key = self.keys.derive_for(record)?;

        let exists = self.store.get_state(&key)?.is_some();
        match (precondition, exists) {
            (Precondition::Absent, true) => {
                warn!(key = %key, "datastatis already exists");
                return Err(ChaincodeError::AlreadyExists(key));
            }
            (Precondition::Present, false) => {
                warn!(key = %key, "datastatis does not exist");
                return Err(ChaincodeError::NotFound(key));
            }
            _ => {}
        }

        let bytes = record.to_json()?;
        self.store.put_state(&key, bytes)?;
        Ok(key)
    }
}
