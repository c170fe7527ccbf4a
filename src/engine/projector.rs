//! Read projections: rich query rows and key history as JSON arrays.
//!
//! Both projections stream store entries straight into a JSON array buffer.
//! The iterator is wrapped in `ScopedResults` before the first read, so it is
//! closed on exhaustion and on every error path. A failed projection returns
//! the error and drops the partial buffer.

use chrono::{DateTime, Utc};
use serde::ser::{SerializeSeq, Serializer as _};
use serde::Serialize;
use serde_json::value::RawValue;
use tracing::debug;

use super::Engine;
use crate::error::ChaincodeError;
use crate::store::{
    KeyModification, KeyValue, LedgerStore, ResultsIterator, ScopedResults, Timestamp,
};

#[derive(Serialize)]
struct QueryRow {
    #[serde(rename = "Key")]
    key: String,
    #[serde(rename = "Record")]
    record: Box<RawValue>,
}

#[derive(Serialize)]
struct HistoryRow {
    #[serde(rename = "TxId")]
    tx_id: String,
    #[serde(rename = "Value")]
    value: Option<Box<RawValue>>,
    #[serde(rename = "Timestamp")]
    timestamp: String,
    #[serde(rename = "IsDelete")]
    is_delete: &'static str,
}

impl<S: LedgerStore> Engine<S> {
    /// Run an opaque query and project the rows as
    /// `[{"Key": .., "Record": ..}, ..]` in store order.
    pub fn query(&self, query: &str) -> Result<Vec<u8>, ChaincodeError> {
        debug!(query = %query, "start query");
        let results = self.store.get_query_result(query)?;
        let (buffer, rows) = project(results, query_row)?;
        debug!(rows, "query complete");
        Ok(buffer)
    }

    /// Project every version of `key` as
    /// `[{"TxId": .., "Value": .., "Timestamp": .., "IsDelete": ..}, ..]`.
    ///
    /// Delete entries always project `"Value": null`. `IsDelete` is the string
    /// `"true"` or `"false"`.
    pub fn history(&self, key: &str) -> Result<Vec<u8>, ChaincodeError> {
        debug!(key = %key, "start history");
        let results = self.store.get_history_for_key(key)?;
        let (buffer, entries) = project(results, history_row)?;
        debug!(key = %key, entries, "history complete");
        Ok(buffer)
    }
}

fn query_row(kv: KeyValue) -> Result<QueryRow, ChaincodeError> {
    Ok(QueryRow {
        record: raw_json(kv.value)?,
        key: kv.key,
    })
}

fn history_row(modification: KeyModification) -> Result<HistoryRow, ChaincodeError> {
    let value = if modification.is_delete {
        None
    } else {
        Some(raw_json(modification.value)?)
    };

    Ok(HistoryRow {
        tx_id: modification.tx_id,
        value,
        timestamp: render_timestamp(modification.timestamp)?,
        is_delete: if modification.is_delete { "true" } else { "false" },
    })
}

fn raw_json(bytes: Vec<u8>) -> Result<Box<RawValue>, ChaincodeError> {
    let text = String::from_utf8(bytes)
        .map_err(|e| ChaincodeError::Serialization(format!("stored value is not UTF-8: {}", e)))?;
    Ok(RawValue::from_string(text)?)
}

/// Drain `results` into a JSON array, returning the buffer and element count.
fn project<I, T, F>(results: I, mut row: F) -> Result<(Vec<u8>, usize), ChaincodeError>
where
    I: ResultsIterator,
    T: Serialize,
    F: FnMut(I::Item) -> Result<T, ChaincodeError>,
{
    let mut results = ScopedResults::new(results);
    let mut buffer = Vec::new();
    let mut count = 0;
    {
        let mut serializer = serde_json::Serializer::new(&mut buffer);
        let mut seq = serializer.serialize_seq(None)?;
        for item in results.by_ref() {
            seq.serialize_element(&row(item?)?)?;
            count += 1;
        }
        seq.end()?;
    }
    results.release()?;
    Ok((buffer, count))
}

/// Render a ledger timestamp as `YYYY-MM-DD HH:MM:SS[.fraction] +0000 UTC`.
///
/// The fraction drops trailing zeros and is omitted for whole seconds.
pub fn render_timestamp(timestamp: Timestamp) -> Result<String, ChaincodeError> {
    let invalid = || {
        ChaincodeError::Serialization(format!(
            "timestamp {}s {}ns is out of range",
            timestamp.seconds, timestamp.nanos
        ))
    };
    let nanos = u32::try_from(timestamp.nanos).map_err(|_| invalid())?;
    let instant = DateTime::<Utc>::from_timestamp(timestamp.seconds, nanos).ok_or_else(invalid)?;

    let mut rendered = instant.format("%Y-%m-%d %H:%M:%S").to_string();
    let subsec = instant.timestamp_subsec_nanos();
    if subsec != 0 {
        let digits = format!("{:09}", subsec);
        rendered.push('.');
        rendered.push_str(digits.trim_end_matches('0'));
    }
    rendered.push_str(" +0000 UTC");
    Ok(rendered)
}
