//! Record model - the JSON document stored under each composite key.
//!
//! Sub-records are embedded by value as nested objects. Field names follow
//! the established wire format, including the `demension` and `datapacket`
//! spellings already present in stored ledger data.

mod args;

use serde::{Deserialize, Serialize};

pub use args::RECORD_ARITY;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Merchant {
    pub id: i64,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Indicator {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub level: i64,
    /// 0 (or absent in stored JSON) marks a root indicator.
    #[serde(default)]
    pub parent_id: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    pub id: i64,
    pub code: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPacket {
    pub id: i64,
    pub file_path: String,
    pub up2_chain: String,
}

/// A data-statistics record.
///
/// `begin_date` holds the caller's raw string verbatim. The same string is
/// parsed as epoch milliseconds when deriving the record's key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub doc_type: String,
    pub id: i64,
    pub create_time: String,
    pub begin_date: String,
    pub end_date: String,
    pub period: String,
    pub value: String,
    pub merchant: Merchant,
    pub indicator: Indicator,
    #[serde(rename = "demension")]
    pub dimension: Dimension,
    #[serde(rename = "datapacket")]
    pub data_packet: DataPacket,
    pub indicator_id_and_begin_date: String,
}

impl Record {
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

#[cfg(test)]
pub(crate) fn sample_record() -> Record {
    Record {
        doc_type: "datastatis".into(),
        id: 42,
        create_time: "2023-11-14 22:13:20".into(),
        begin_date: "1700000000000".into(),
        end_date: "1700086400000".into(),
        period: "M".into(),
        value: "12.5".into(),
        merchant: Merchant {
            id: 1,
            name: "Acme".into(),
        },
        indicator: Indicator {
            id: 3,
            code: "GMV".into(),
            name: "Gross volume".into(),
            level: 1,
            parent_id: 0,
        },
        dimension: Dimension {
            id: 5,
            code: "REGION".into(),
            name: "Region".into(),
        },
        data_packet: DataPacket {
            id: 9,
            file_path: "/packets/9.csv".into(),
            up2_chain: "Y".into(),
        },
        indicator_id_and_begin_date: "3_1700000000000".into(),
    }
}
