#[cfg(test)]
#[path = "http_test.rs"]
mod tests;

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::models::format_query_date;
use crate::domain::models::FetchError;
use crate::domain::models::Monitor;

/// Talks to the Octavio server over plain HTTP GETs.
pub struct HttpMonitor {
    url: String,
    client: reqwest::Client,
}

impl HttpMonitor {
    pub fn new(url: &str, timeout: Duration) -> Result<HttpMonitor> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        return Ok(HttpMonitor {
            url: url.trim_end_matches('/').to_string(),
            client,
        });
    }

    async fn get_text(&self, req: reqwest::RequestBuilder) -> Result<String, FetchError> {
        let res = req.send().await.map_err(|err| {
            tracing::error!(error = ?err, "Request to Octavio server failed");
            return FetchError::Network(err.to_string());
        })?;

        if !res.status().is_success() {
            tracing::error!(
                status = res.status().as_u16(),
                url = res.url().as_str(),
                "Octavio server returned an error status"
            );
            return Err(FetchError::Http {
                status: res.status().as_u16(),
            });
        }

        let body = res.text().await?;
        return Ok(body);
    }
}

#[async_trait]
impl Monitor for HttpMonitor {
    #[allow(clippy::implicit_return)]
    async fn fetch_instruments(&self) -> Result<String, FetchError> {
        let req = self
            .client
            .get(format!("{url}/api/online_instruments", url = self.url));

        let body = self.get_text(req).await?;
        tracing::debug!(body = %body, "Online instruments response");

        return Ok(body);
    }

    #[allow(clippy::implicit_return)]
    async fn fetch_log(&self, date: NaiveDate) -> Result<String, FetchError> {
        let query_date = format_query_date(date);
        let req = self
            .client
            .get(format!("{url}/api/logs", url = self.url))
            .query(&[("date", &query_date)]);

        let body = self.get_text(req).await?;
        tracing::debug!(date = %query_date, bytes = body.len(), "Log response");

        return Ok(body);
    }
}
