#[cfg(test)]
#[path = "session_ids_test.rs"]
mod tests;

use std::fmt;

use super::LogRecord;
use super::LogSnapshot;

/// Distinct session ids that received an `ADD_CHUNK`, in order of first
/// appearance in the log.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct SessionIdSet {
    ids: Vec<String>,
}

impl SessionIdSet {
    pub fn from_records(records: &[LogRecord]) -> SessionIdSet {
        let mut set = SessionIdSet::default();
        for record in records.iter().filter(|record| return record.is_add_chunk()) {
            if !set.contains(&record.session_id) {
                set.ids.push(record.session_id.to_string());
            }
        }

        return set;
    }

    pub fn from_snapshot(snapshot: &LogSnapshot) -> SessionIdSet {
        return SessionIdSet::from_records(&snapshot.records);
    }

    pub fn contains(&self, session_id: &str) -> bool {
        return self.ids.iter().any(|id| return id == session_id);
    }

    pub fn is_empty(&self) -> bool {
        return self.ids.is_empty();
    }

    pub fn len(&self) -> usize {
        return self.ids.len();
    }
}

impl fmt::Display for SessionIdSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return write!(f, "Sessions: {}", self.ids.join(", "));
    }
}
