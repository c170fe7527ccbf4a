#![allow(dead_code)]

pub mod faulty_ledger;

/// Build the 20 positional `save`/`update` arguments around the key fields.
pub fn record_args(
    merchant_id: &str,
    begin_date: &str,
    period: &str,
    data_packet_id: &str,
    value: &str,
) -> Vec<String> {
    [
        "42",
        "2023-11-14 22:13:20",
        begin_date,
        "1700086400000",
        period,
        value,
        "3_1700000000000",
        merchant_id,
        "Acme",
        "3",
        "GMV",
        "Gross volume",
        "1",
        "0",
        "5",
        "REGION",
        "Region",
        data_packet_id,
        "/packets/9.csv",
        "Y",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Arguments whose derived key is `1_20231114_M_9`.
pub fn default_args(value: &str) -> Vec<String> {
    record_args("1", "1700000000000", "M", "9", value)
}

pub fn key_arg(key: &str) -> Vec<String> {
    vec![key.to_string()]
}
