//! Positional argument parsing for `save` and `update`.

use crate::error::ChaincodeError;

use super::{DataPacket, Dimension, Indicator, Merchant, Record};

/// Number of positional arguments `save` and `update` accept.
pub const RECORD_ARITY: usize = 20;

const FIELDS: [&str; RECORD_ARITY] = [
    "id",
    "createTime",
    "beginDate",
    "endDate",
    "period",
    "value",
    "indicatorIdAndBeginDate",
    "merchant.id",
    "merchant.name",
    "indicator.id",
    "indicator.code",
    "indicator.name",
    "indicator.level",
    "indicator.parentId",
    "demension.id",
    "demension.code",
    "demension.name",
    "datapacket.id",
    "datapacket.filePath",
    "datapacket.up2Chain",
];

impl Record {
    /// Parse exactly [`RECORD_ARITY`] strings into a record tagged with `doc_type`.
    ///
    /// Numeric fields are checked in positional order. The key source is not
    /// looked at here; `beginDate` is kept verbatim.
    pub fn from_args(args: &[String], doc_type: &str) -> Result<Record, ChaincodeError> {
        if args.len() != RECORD_ARITY {
            return Err(ChaincodeError::Arity {
                expected: RECORD_ARITY,
                actual: args.len(),
            });
        }

        let id = numeric(args, 0)?;
        let merchant_id = numeric(args, 7)?;
        let indicator_id = numeric(args, 9)?;
        let indicator_level = numeric(args, 12)?;
        let indicator_parent_id = numeric(args, 13)?;
        let dimension_id = numeric(args, 14)?;
        let data_packet_id = numeric(args, 17)?;

        Ok(Record {
            doc_type: doc_type.to_string(),
            id,
            create_time: args[1].clone(),
            begin_date: args[2].clone(),
            end_date: args[3].clone(),
            period: args[4].clone(),
            value: args[5].clone(),
            indicator_id_and_begin_date: args[6].clone(),
            merchant: Merchant {
                id: merchant_id,
                name: args[8].clone(),
            },
            indicator: Indicator {
                id: indicator_id,
                code: args[10].clone(),
                name: args[11].clone(),
                level: indicator_level,
                parent_id: indicator_parent_id,
            },
            dimension: Dimension {
                id: dimension_id,
                code: args[15].clone(),
                name: args[16].clone(),
            },
            data_packet: DataPacket {
                id: data_packet_id,
                file_path: args[18].clone(),
                up2_chain: args[19].clone(),
            },
        })
    }
}

fn numeric(args: &[String], index: usize) -> Result<i64, ChaincodeError> {
    args[index]
        .parse::<i64>()
        .map_err(|_| ChaincodeError::Type {
            position: index + 1,
            field: FIELDS[index],
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> Vec<String> {
        [
            "42",
            "2023-11-14 22:13:20",
            "1700000000000",
            "1700086400000",
            "M",
            "12.5",
            "3_1700000000000",
            "1",
            "Acme",
            "3",
            "GMV",
            "Gross volume",
            "1",
            "0",
            "5",
            "REGION",
            "Region",
            "9",
            "/packets/9.csv",
            "Y",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    #[test]
    fn parses_positional_fields() {
        let record = Record::from_args(&args(), "datastatis").unwrap();
        assert_eq!(record, crate::record::sample_record());
    }

    #[test]
    fn wrong_count_is_arity_error() {
        let mut short = args();
        short.pop();
        assert_eq!(
            Record::from_args(&short, "datastatis").unwrap_err(),
            ChaincodeError::Arity {
                expected: 20,
                actual: 19
            }
        );

        let mut long = args();
        long.push("extra".into());
        assert!(matches!(
            Record::from_args(&long, "datastatis").unwrap_err(),
            ChaincodeError::Arity { actual: 21, .. }
        ));
    }

    #[test]
    fn non_numeric_field_names_its_position() {
        let mut bad = args();
        bad[7] = "one".into();
        assert_eq!(
            Record::from_args(&bad, "datastatis").unwrap_err(),
            ChaincodeError::Type {
                position: 8,
                field: "merchant.id"
            }
        );

        let mut bad = args();
        bad[13] = "".into();
        assert_eq!(
            Record::from_args(&bad, "datastatis").unwrap_err(),
            ChaincodeError::Type {
                position: 14,
                field: "indicator.parentId"
            }
        );
    }

    #[test]
    fn first_bad_field_wins() {
        let mut bad = args();
        bad[0] = "x".into();
        bad[17] = "y".into();
        assert!(matches!(
            Record::from_args(&bad, "datastatis").unwrap_err(),
            ChaincodeError::Type { position: 1, .. }
        ));
    }

    #[test]
    fn negative_integers_parse() {
        let mut neg = args();
        neg[12] = "-2".into();
        let record = Record::from_args(&neg, "datastatis").unwrap();
        assert_eq!(record.indicator.level, -2);
    }
}
