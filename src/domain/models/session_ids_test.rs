use anyhow::Result;
use chrono::NaiveDate;
use test_utils::log_fixture;

use super::SessionIdSet;
use crate::domain::models::LogRecord;
use crate::domain::models::LogSnapshot;

#[test]
fn it_keeps_only_distinct_add_chunk_sessions() {
    let records = vec![
        LogRecord::new("ADD_CHUNK", "s1"),
        LogRecord::new("ADD_CHUNK", "s1"),
        LogRecord::new("REMOVE", "s2"),
    ];
    let ids = SessionIdSet::from_records(&records);

    assert_eq!(ids.len(), 1);
    assert!(ids.contains("s1"));
    assert!(!ids.contains("s2"));
}

#[test]
fn it_is_empty_for_an_empty_log() -> Result<()> {
    let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
    let snapshot = LogSnapshot::parse(date, "[]")?;
    let ids = SessionIdSet::from_snapshot(&snapshot);

    assert!(ids.is_empty());
    assert_eq!(ids, SessionIdSet::default());

    return Ok(());
}

#[test]
fn it_keeps_first_occurrence_order() -> Result<()> {
    let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
    let snapshot = LogSnapshot::parse(date, log_fixture())?;
    let ids = SessionIdSet::from_snapshot(&snapshot);

    assert_eq!(ids.ids, vec!["s1".to_string(), "s3".to_string()]);

    return Ok(());
}

#[test]
fn it_is_idempotent() -> Result<()> {
    let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
    let snapshot = LogSnapshot::parse(date, log_fixture())?;

    assert_eq!(
        SessionIdSet::from_snapshot(&snapshot),
        SessionIdSet::from_snapshot(&snapshot)
    );

    return Ok(());
}

#[test]
fn it_formats_as_a_sessions_line() {
    let records = vec![
        LogRecord::new("ADD_CHUNK", "s1"),
        LogRecord::new("ADD_CHUNK", "s2"),
    ];

    insta::assert_snapshot!(SessionIdSet::from_records(&records).to_string(), @"Sessions: s1, s2");
    assert_eq!(SessionIdSet::default().to_string(), "Sessions: ");
}
