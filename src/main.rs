#![deny(clippy::implicit_return)]
#![allow(clippy::needless_return)]

mod application;
mod configuration;
mod domain;
mod infrastructure;

use std::env;
use std::process;
use std::time::Duration;

use anyhow::Error;
use anyhow::Result;
use domain::models::Action;
use domain::models::Event;
use infrastructure::monitors::MonitorManager;
use tokio::sync::mpsc;
use tokio::task;
use tokio_util::sync::CancellationToken;
use yansi::Paint;

use crate::application::cli;
use crate::application::ui;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::services::actions::ActionsService;
use crate::domain::services::InstrumentPoller;

fn handle_error(err: Error) {
    eprintln!(
        "{}",
        Paint::red(format!(
            "Oh no! octavio-dash has failed with the following app version and error.\n\nVersion: {}\nBuilt: {}\nError: {}",
            env!("CARGO_PKG_VERSION"),
            env!("VERGEN_BUILD_DATE"),
            err
        ))
    );

    let backtrace = err.backtrace();
    if backtrace.to_string() == "disabled backtrace" {
        let args = env::args().collect::<Vec<String>>().join(" ");
        eprintln!("\nRunning the following can help explain further what the issue is:");
        eprintln!("\nRUST_BACKTRACE=1 {args}");
    } else {
        eprintln!("\n{}", backtrace);
    }

    process::exit(1);
}

async fn run() -> Result<()> {
    let monitor = MonitorManager::get()?;
    let poll_interval = Duration::from_secs(Config::get_u64(ConfigKey::PollInterval)?);

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();
    let cancel = CancellationToken::new();

    let poller = InstrumentPoller::new(monitor.clone(), poll_interval);
    let instruments_refresh = poller.refresh_handle();

    let mut background_futures = task::JoinSet::new();
    let actions_tx = event_tx.clone();
    background_futures.spawn(async move {
        return ActionsService::start(monitor, instruments_refresh, actions_tx, &mut action_rx)
            .await;
    });
    background_futures.spawn(poller.start(event_tx, cancel.clone()));

    let ui_future = ui::start(action_tx, event_rx, cancel.clone());

    let res = tokio::select!(
        res = background_futures.join_next() => match res {
            Some(Ok(res)) => res,
            Some(Err(err)) => Err(err.into()),
            None => Ok(()),
        },
        res = ui_future => res,
    );

    cancel.cancel();
    background_futures.shutdown().await;

    return res;
}

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        ui::destruct_terminal_for_panic();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));

    let debug_log_dir = env::var("OCTAVIO_LOG_DIR").unwrap_or_else(|_| {
        return cli::log_path()
            .parent()
            .map(|dir| return dir.to_string_lossy().to_string())
            .unwrap_or_else(|| return ".".to_string());
    });

    let file_appender = tracing_appender::rolling::never(debug_log_dir, "debug.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);
    if env::var("RUST_LOG")
        .unwrap_or_else(|_| return "".to_string())
        .contains("octavio_dash")
    {
        tracing_subscriber::fmt()
            .json()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(writer)
            .init();
    }

    match cli::parse().await {
        Ok(true) => (),
        Ok(false) => process::exit(0),
        Err(err) => {
            handle_error(err);
            return;
        }
    }

    if let Err(err) = run().await {
        ui::destruct_terminal_for_panic();
        handle_error(err);
    }

    process::exit(0);
}
