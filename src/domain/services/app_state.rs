#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

use chrono::DateTime;
use chrono::Days;
use chrono::Local;
use chrono::NaiveDate;
use ratatui::prelude::Rect;

use super::Scroll;
use crate::domain::models::FetchError;
use crate::domain::models::LogRequest;
use crate::domain::models::LogSnapshot;
use crate::domain::models::SessionIdSet;

/// Everything the dashboard displays. Only the UI loop mutates it, either in
/// response to a completed fetch or to a key press.
pub struct AppState {
    pub instruments: Option<String>,
    pub instruments_error: Option<FetchError>,
    pub instruments_updated_at: Option<DateTime<Local>>,
    pub selected_date: NaiveDate,
    pub log: Option<LogSnapshot>,
    pub log_error: Option<FetchError>,
    pub log_lines: Vec<String>,
    pub session_ids: SessionIdSet,
    pub waiting_for_log: bool,
    pub scroll: Scroll,
    pub last_known_height: u16,
    pub last_known_width: u16,
    latest_request: Option<LogRequest>,
}

impl AppState {
    pub fn new(today: NaiveDate) -> AppState {
        return AppState {
            instruments: None,
            instruments_error: None,
            instruments_updated_at: None,
            selected_date: today,
            log: None,
            log_error: None,
            log_lines: vec![],
            session_ids: SessionIdSet::default(),
            waiting_for_log: false,
            scroll: Scroll::default(),
            last_known_height: 0,
            last_known_width: 0,
            latest_request: None,
        };
    }

    /// Selects a date and returns the log query to issue for it. Any query
    /// issued before this one is superseded.
    pub fn select_date(&mut self, date: NaiveDate) -> LogRequest {
        let seq = self
            .latest_request
            .map(|request| return request.seq + 1)
            .unwrap_or(1);
        let request = LogRequest::new(seq, date);

        self.selected_date = date;
        self.latest_request = Some(request);
        self.waiting_for_log = true;

        return request;
    }

    pub fn shift_date(&mut self, days: i64) -> Option<LogRequest> {
        let date = if days >= 0 {
            self.selected_date.checked_add_days(Days::new(days.unsigned_abs()))
        } else {
            self.selected_date.checked_sub_days(Days::new(days.unsigned_abs()))
        }?;

        return Some(self.select_date(date));
    }

    pub fn refresh_log(&mut self) -> LogRequest {
        return self.select_date(self.selected_date);
    }

    pub fn is_current(&self, request: &LogRequest) -> bool {
        return self.latest_request.as_ref() == Some(request);
    }

    pub fn handle_instruments_response(&mut self, res: Result<String, FetchError>) {
        match res {
            Ok(text) => {
                self.instruments = Some(text);
                self.instruments_error = None;
                self.instruments_updated_at = Some(Local::now());
            }
            Err(err) => {
                tracing::warn!(error = %err, "Keeping previous online instruments");
                self.instruments_error = Some(err);
            }
        }
    }

    /// Applies a log response if it answers the most recent query. Returns
    /// whether the response was applied.
    pub fn handle_log_response(
        &mut self,
        request: LogRequest,
        res: Result<String, FetchError>,
    ) -> bool {
        if !self.is_current(&request) {
            tracing::debug!(
                seq = request.seq,
                date = %request.query_date(),
                "Discarding superseded log response"
            );
            return false;
        }

        self.waiting_for_log = false;
        match res.and_then(|body| return LogSnapshot::parse(request.date, &body)) {
            Ok(snapshot) => {
                self.session_ids = SessionIdSet::from_snapshot(&snapshot);
                self.log = Some(snapshot);
                self.log_error = None;
                self.scroll.top();
                self.sync_dependants();
            }
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    date = %request.query_date(),
                    "Keeping previous log"
                );
                self.log_error = Some(err);
            }
        }

        return true;
    }

    /// True when the log on screen was fetched for another date than the one
    /// selected, or the last attempt for it failed.
    pub fn is_log_stale(&self) -> bool {
        if self.log_error.is_some() {
            return true;
        }

        return match &self.log {
            Some(log) => log.date != self.selected_date && !self.waiting_for_log,
            None => false,
        };
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.last_known_width = rect.width;
        self.last_known_height = rect.height;
        self.sync_dependants();
    }

    /// Re-wraps the log body to the last known width and resizes the scroll
    /// to match. The dashboard renders `log_lines` as is.
    fn sync_dependants(&mut self) {
        self.log_lines = match &self.log {
            Some(log) => log.as_string_lines(self.last_known_width as usize),
            None => vec![],
        };

        self.scroll.set_state(
            u16::try_from(self.log_lines.len()).unwrap_or(u16::MAX),
            self.last_known_height,
        );
    }
}
