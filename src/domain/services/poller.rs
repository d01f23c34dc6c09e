#[cfg(test)]
#[path = "poller_test.rs"]
mod tests;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::sync::Notify;
use tokio::time;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::domain::models::Event;
use crate::domain::models::MonitorRef;

/// Fetches the online instruments immediately, then once every period until
/// cancelled. Failed polls are published like successful ones and never end
/// the loop. Manual refreshes run on the same task, so responses are always
/// published in the order they were requested.
pub struct InstrumentPoller {
    monitor: MonitorRef,
    period: Duration,
    refresh: Arc<Notify>,
}

impl InstrumentPoller {
    pub fn new(monitor: MonitorRef, period: Duration) -> InstrumentPoller {
        return InstrumentPoller {
            monitor,
            period,
            refresh: Arc::new(Notify::new()),
        };
    }

    /// Notifying the handle triggers one extra poll without moving the
    /// periodic schedule. Requests made during a poll are merged into one.
    pub fn refresh_handle(&self) -> Arc<Notify> {
        return self.refresh.clone();
    }

    pub async fn start(
        self,
        tx: mpsc::UnboundedSender<Event>,
        cancel: CancellationToken,
    ) -> Result<()> {
        let mut ticker = time::interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::debug!(period_secs = self.period.as_secs(), "Instrument poller started");

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
                _ = self.refresh.notified() => {
                    tracing::debug!("Manual online instruments refresh");
                }
            }

            let res = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                res = self.monitor.fetch_instruments() => res,
            };

            if let Err(err) = &res {
                tracing::warn!(error = %err, "Online instruments poll failed");
            }

            if tx.send(Event::InstrumentsResponse(res)).is_err() {
                break;
            }
        }

        tracing::debug!("Instrument poller stopped");
        return Ok(());
    }
}
