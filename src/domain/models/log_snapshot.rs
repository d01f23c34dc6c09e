#[cfg(test)]
#[path = "log_snapshot_test.rs"]
mod tests;

use std::mem;

use chrono::NaiveDate;
use serde::Deserialize;

use super::FetchError;

/// Operation name marking a chunk of music being appended to a session.
pub const ADD_CHUNK: &str = "ADD_CHUNK";

/// A single event from the server's log. Only the fields the dashboard reads
/// are declared; anything else in the payload is ignored.
#[derive(Default, Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogRecord {
    pub operation: String,
    pub session_id: String,
}

impl LogRecord {
    pub fn new(operation: &str, session_id: &str) -> LogRecord {
        return LogRecord {
            operation: operation.to_string(),
            session_id: session_id.to_string(),
        };
    }

    pub fn is_add_chunk(&self) -> bool {
        return self.operation == ADD_CHUNK;
    }
}

/// The parsed log for one date, alongside the body it was parsed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSnapshot {
    pub date: NaiveDate,
    pub body: String,
    pub records: Vec<LogRecord>,
}

impl LogSnapshot {
    pub fn parse(date: NaiveDate, body: &str) -> Result<LogSnapshot, FetchError> {
        let records: Vec<LogRecord> = serde_json::from_str(body)?;

        return Ok(LogSnapshot {
            date,
            body: body.to_string(),
            records,
        });
    }

    pub fn is_empty(&self) -> bool {
        return self.records.is_empty();
    }

    /// Splits the raw body into display lines no wider than `line_max_width`
    /// characters, breaking on spaces where possible. Words longer than a line
    /// are split.
    pub fn as_string_lines(&self, line_max_width: usize) -> Vec<String> {
        let line_max_width = line_max_width.max(1);
        let mut lines: Vec<String> = Vec::new();

        for full_line in self.body.lines() {
            let mut current_line = String::new();
            let mut char_count = 0;

            for word in full_line.split_inclusive(' ') {
                let word_length = word.trim_end_matches(' ').chars().count();
                if char_count > 0 && char_count + word_length > line_max_width {
                    lines.push(mem::take(&mut current_line));
                    char_count = 0;
                }

                for ch in word.chars() {
                    if char_count == line_max_width {
                        // Spaces at a break are dropped.
                        if ch == ' ' {
                            continue;
                        }
                        lines.push(mem::take(&mut current_line));
                        char_count = 0;
                    }
                    current_line.push(ch);
                    char_count += 1;
                }
            }

            lines.push(current_line);
        }

        return lines;
    }
}
