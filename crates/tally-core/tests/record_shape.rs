//! Counter document decoding tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use tally_core::{CounterRecord, Lookup};

#[test]
fn store_metadata_is_ignored() {
    let s = r#"{
        "id": "visitor-count",
        "count": 41,
        "_rid": "Zm9vAA==",
        "_self": "dbs/Zm9v/colls/YmFy/docs/Zm9vAA==/",
        "_etag": "\"0000d986-0000-0700-0000-65e0a1b20000\"",
        "_attachments": "attachments/",
        "_ts": 1709220274
    }"#;
    let rec: CounterRecord = serde_json::from_str(s).unwrap();
    assert_eq!(rec, CounterRecord::new("visitor-count", 41));

    let back = serde_json::to_value(&rec).unwrap();
    assert_eq!(back, serde_json::json!({ "id": "visitor-count", "count": 41 }));
}

#[test]
fn negative_count_is_rejected() {
    let err = serde_json::from_str::<CounterRecord>(r#"{"id":"x","count":-3}"#);
    assert!(err.is_err());
}

#[test]
fn fractional_count_is_rejected() {
    let err = serde_json::from_str::<CounterRecord>(r#"{"id":"x","count":2.5}"#);
    assert!(err.is_err());
}

#[test]
fn missing_count_reads_as_zero() {
    let rec: CounterRecord = serde_json::from_str(r#"{"id":"seeded"}"#).unwrap();
    assert_eq!(rec.count, 0);
}

#[test]
fn increment_saturates() {
    let mut rec = CounterRecord::new("k", u64::MAX);
    assert_eq!(rec.increment(), u64::MAX);

    let mut rec = CounterRecord::first("k");
    assert_eq!(rec.increment(), 2);
}

#[test]
fn lookup_zero_for_missing_key() {
    assert_eq!(Lookup::NotFound.count_or_zero(), 0);
    assert_eq!(Lookup::Found(CounterRecord::new("k", 7)).count_or_zero(), 7);
}
