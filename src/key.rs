//! Composite key derivation.
//!
//! A record lives under `{merchant}{sep}{YYYYMMDD}{sep}{period}{sep}{packet}`,
//! where the date is the UTC calendar day of the record's `beginDate`
//! (epoch milliseconds). Components are not escaped: the period is rejected
//! if it contains the separator, which keeps the mapping injective.

use chrono::{DateTime, Utc};

use crate::config::DEFAULT_KEY_SEPARATOR;
use crate::error::ChaincodeError;
use crate::record::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyDeriver {
    separator: char,
}

impl Default for KeyDeriver {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_SEPARATOR)
    }
}

impl KeyDeriver {
    pub fn new(separator: char) -> Self {
        Self { separator }
    }

    pub fn derive(
        &self,
        merchant_id: i64,
        epoch_millis: i64,
        period: &str,
        data_packet_id: i64,
    ) -> Result<String, ChaincodeError> {
        if period.contains(self.separator) {
            return Err(ChaincodeError::InvalidArgument(format!(
                "period {:?} must not contain the key separator {:?}",
                period, self.separator
            )));
        }

        let date = utc_date(epoch_millis)?;
        let sep = self.separator;
        Ok(format!(
            "{merchant_id}{sep}{date}{sep}{period}{sep}{data_packet_id}"
        ))
    }

    /// Derive the key of `record`, reading its `beginDate` as epoch millis.
    pub fn derive_for(&self, record: &Record) -> Result<String, ChaincodeError> {
        let epoch_millis = parse_epoch_millis(&record.begin_date)?;
        self.derive(
            record.merchant.id,
            epoch_millis,
            &record.period,
            record.data_packet.id,
        )
    }
}

pub fn parse_epoch_millis(raw: &str) -> Result<i64, ChaincodeError> {
    raw.parse::<i64>().map_err(|_| {
        ChaincodeError::InvalidArgument(format!(
            "beginDate {:?} must be epoch milliseconds",
            raw
        ))
    })
}

/// `YYYYMMDD` of the UTC day containing `epoch_millis`.
pub fn utc_date(epoch_millis: i64) -> Result<String, ChaincodeError> {
    let instant = DateTime::<Utc>::from_timestamp_millis(epoch_millis).ok_or_else(|| {
        ChaincodeError::InvalidArgument(format!(
            "epoch millis {} is out of range",
            epoch_millis
        ))
    })?;
    Ok(instant.format("%Y%m%d").to_string())
}
