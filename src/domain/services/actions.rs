#[cfg(test)]
#[path = "actions_test.rs"]
mod tests;

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::models::MonitorRef;

pub fn help_text() -> String {
    let text = r#"
HOTKEYS:
- Left arrow, h - Show the previous day's log
- Right arrow, l - Show the next day's log
- t - Jump back to today
- r, CTRL+R - Refresh online instruments and the log now
- Up arrow, Down arrow - Scroll the log
- CTRL+U, PAGE UP - Page up through the log
- CTRL+D, PAGE DOWN - Page down through the log
- q, CTRL+C - Exit the dashboard
        "#;

    return text.trim().to_string();
}

/// Runs log fetches requested by the UI in the background and reports the
/// results back as events. Instrument refreshes are handed to the poller.
pub struct ActionsService {}

impl ActionsService {
    pub async fn start(
        monitor: MonitorRef,
        instruments_refresh: Arc<Notify>,
        tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        // Lazy default.
        let mut log_worker: JoinHandle<Result<()>> = tokio::spawn(async {
            return Ok(());
        });

        while let Some(action) = rx.recv().await {
            match action {
                Action::FetchLog(request) => {
                    let worker_tx = tx.clone();
                    let worker_monitor = monitor.clone();

                    // Superseded requests are also discarded by the app state,
                    // aborting only saves the round trip.
                    log_worker.abort();
                    log_worker = tokio::spawn(async move {
                        let res = worker_monitor.fetch_log(request.date).await;
                        worker_tx.send(Event::LogResponse(request, res))?;

                        return Ok(());
                    });
                }
                Action::RefreshInstruments() => {
                    instruments_refresh.notify_one();
                }
            }
        }

        return Ok(());
    }
}
