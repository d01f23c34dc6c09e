/// A day of log events as served by `/api/logs`. Sessions `s1` and `s3`
/// received chunks, `s2` only shows up in other operations.
pub fn log_fixture() -> &'static str {
    return r#"
[
  {"operation": "ADD_CHUNK", "session_id": "s1", "instrument_id": 3},
  {"operation": "REFRESH_SESSION", "session_id": "s2", "instrument_id": 5},
  {"operation": "ADD_CHUNK", "session_id": "s1", "instrument_id": 3},
  {"operation": "REMOVE", "session_id": "s2", "instrument_id": 5},
  {"operation": "ADD_CHUNK", "session_id": "s3", "instrument_id": 8}
]
"#
    .trim();
}

/// Body of `/api/online_instruments`. The dashboard treats it as opaque text.
pub fn instruments_fixture() -> &'static str {
    return "[3, 5, 8]";
}
