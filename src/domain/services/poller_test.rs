use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::mpsc;
use tokio::time;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::InstrumentPoller;
use crate::domain::models::Event;
use crate::domain::models::FetchError;
use crate::domain::models::Monitor;

/// Records when each poll happened. Polls listed in `failures` return a
/// network error instead of text.
#[derive(Default)]
struct RecordingMonitor {
    calls: Mutex<Vec<Instant>>,
    failures: Vec<usize>,
}

impl RecordingMonitor {
    fn failing_on(failures: Vec<usize>) -> RecordingMonitor {
        return RecordingMonitor {
            calls: Mutex::new(vec![]),
            failures,
        };
    }

    fn calls(&self) -> Vec<Instant> {
        return self.calls.lock().unwrap().clone();
    }
}

#[async_trait]
impl Monitor for RecordingMonitor {
    #[allow(clippy::implicit_return)]
    async fn fetch_instruments(&self) -> Result<String, FetchError> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(Instant::now());
        let idx = calls.len() - 1;

        if self.failures.contains(&idx) {
            return Err(FetchError::Network("connection refused".to_string()));
        }

        return Ok(format!("poll {idx}"));
    }

    #[allow(clippy::implicit_return)]
    async fn fetch_log(&self, _date: NaiveDate) -> Result<String, FetchError> {
        return Ok("[]".to_string());
    }
}

fn to_res(event: Option<Event>) -> Result<Result<String, FetchError>> {
    let res = match event {
        Some(Event::InstrumentsResponse(res)) => res,
        _ => bail!("Wrong type from recv"),
    };

    return Ok(res);
}

#[tokio::test(start_paused = true)]
async fn it_polls_at_mount_and_every_thirty_seconds() -> Result<()> {
    let monitor = Arc::new(RecordingMonitor::default());
    let (tx, mut rx) = mpsc::unbounded_channel::<Event>();
    let cancel = CancellationToken::new();
    let start = Instant::now();

    let poller = InstrumentPoller::new(monitor.clone(), Duration::from_secs(30));
    let handle = tokio::spawn(poller.start(tx, cancel.clone()));

    assert_eq!(to_res(rx.recv().await)?, Ok("poll 0".to_string()));
    assert_eq!(to_res(rx.recv().await)?, Ok("poll 1".to_string()));
    assert_eq!(to_res(rx.recv().await)?, Ok("poll 2".to_string()));

    let offsets = monitor
        .calls()
        .iter()
        .map(|instant| return instant.duration_since(start).as_secs())
        .collect::<Vec<u64>>();
    assert_eq!(offsets, vec![0, 30, 60]);

    cancel.cancel();
    handle.await??;

    return Ok(());
}

#[tokio::test(start_paused = true)]
async fn it_stops_polling_once_disposed() -> Result<()> {
    let monitor = Arc::new(RecordingMonitor::default());
    let (tx, mut rx) = mpsc::unbounded_channel::<Event>();
    let cancel = CancellationToken::new();
    let start = Instant::now();

    let poller = InstrumentPoller::new(monitor.clone(), Duration::from_secs(30));
    let handle = tokio::spawn(poller.start(tx, cancel.clone()));

    to_res(rx.recv().await)?;
    to_res(rx.recv().await)?;

    time::sleep_until(start + Duration::from_secs(45)).await;
    cancel.cancel();
    handle.await??;

    time::sleep(Duration::from_secs(60)).await;

    assert_eq!(monitor.calls().len(), 2);
    assert!(rx.recv().await.is_none());

    return Ok(());
}

#[tokio::test(start_paused = true)]
async fn it_keeps_polling_after_a_failure() -> Result<()> {
    let monitor = Arc::new(RecordingMonitor::failing_on(vec![0]));
    let (tx, mut rx) = mpsc::unbounded_channel::<Event>();
    let cancel = CancellationToken::new();

    let poller = InstrumentPoller::new(monitor.clone(), Duration::from_secs(30));
    let handle = tokio::spawn(poller.start(tx, cancel.clone()));

    assert_eq!(
        to_res(rx.recv().await)?,
        Err(FetchError::Network("connection refused".to_string()))
    );
    assert_eq!(to_res(rx.recv().await)?, Ok("poll 1".to_string()));

    cancel.cancel();
    handle.await??;

    return Ok(());
}

#[tokio::test(start_paused = true)]
async fn it_stops_when_the_view_is_gone() -> Result<()> {
    let monitor = Arc::new(RecordingMonitor::default());
    let (tx, rx) = mpsc::unbounded_channel::<Event>();
    drop(rx);

    let poller = InstrumentPoller::new(monitor.clone(), Duration::from_secs(30));
    poller.start(tx, CancellationToken::new()).await?;

    assert_eq!(monitor.calls().len(), 1);

    return Ok(());
}

#[tokio::test(start_paused = true)]
async fn it_polls_on_demand_without_moving_the_schedule() -> Result<()> {
    let monitor = Arc::new(RecordingMonitor::default());
    let (tx, mut rx) = mpsc::unbounded_channel::<Event>();
    let cancel = CancellationToken::new();
    let start = Instant::now();

    let poller = InstrumentPoller::new(monitor.clone(), Duration::from_secs(30));
    let refresh = poller.refresh_handle();
    let handle = tokio::spawn(poller.start(tx, cancel.clone()));

    assert_eq!(to_res(rx.recv().await)?, Ok("poll 0".to_string()));

    time::sleep_until(start + Duration::from_secs(10)).await;
    refresh.notify_one();
    assert_eq!(to_res(rx.recv().await)?, Ok("poll 1".to_string()));
    assert_eq!(to_res(rx.recv().await)?, Ok("poll 2".to_string()));

    let offsets = monitor
        .calls()
        .iter()
        .map(|instant| return instant.duration_since(start).as_secs())
        .collect::<Vec<u64>>();
    assert_eq!(offsets, vec![0, 10, 30]);

    cancel.cancel();
    handle.await??;

    return Ok(());
}

#[tokio::test(start_paused = true)]
async fn it_ignores_refreshes_once_disposed() -> Result<()> {
    let monitor = Arc::new(RecordingMonitor::default());
    let (tx, mut rx) = mpsc::unbounded_channel::<Event>();
    let cancel = CancellationToken::new();

    let poller = InstrumentPoller::new(monitor.clone(), Duration::from_secs(30));
    let refresh = poller.refresh_handle();
    let handle = tokio::spawn(poller.start(tx, cancel.clone()));

    to_res(rx.recv().await)?;
    cancel.cancel();
    handle.await??;

    refresh.notify_one();
    time::sleep(Duration::from_secs(60)).await;

    assert_eq!(monitor.calls().len(), 1);
    assert!(rx.recv().await.is_none());

    return Ok(());
}
