#[cfg(test)]
#[path = "log_request_test.rs"]
mod tests;

use chrono::NaiveDate;

/// Tags a log query with the date it was issued for and its position in the
/// sequence of queries, so late responses can be told apart from current ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogRequest {
    pub seq: u64,
    pub date: NaiveDate,
}

impl LogRequest {
    pub fn new(seq: u64, date: NaiveDate) -> LogRequest {
        return LogRequest { seq, date };
    }

    pub fn query_date(&self) -> String {
        return format_query_date(self.date);
    }
}

/// ISO `YYYY-MM-DD`, zero padded and independent of the user's locale.
pub fn format_query_date(date: NaiveDate) -> String {
    return date.format("%Y-%m-%d").to_string();
}
