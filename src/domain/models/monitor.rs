use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use super::FetchError;

#[async_trait]
pub trait Monitor {
    /// Returns the raw body of the online instruments endpoint. The text is
    /// opaque to the dashboard and displayed as is.
    async fn fetch_instruments(&self) -> Result<String, FetchError>;

    /// Returns the raw body of the log endpoint for a single day. Parsing is
    /// left to the caller so a bad payload can be reported without losing the
    /// previously displayed log.
    async fn fetch_log(&self, date: NaiveDate) -> Result<String, FetchError>;
}

pub type MonitorRef = Arc<dyn Monitor + Send + Sync>;
