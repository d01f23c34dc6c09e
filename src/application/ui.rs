#[cfg(test)]
#[path = "ui_test.rs"]
mod tests;

use std::io;

use anyhow::Result;
use chrono::Local;
use chrono::NaiveDate;
use crossterm::cursor;
use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableMouseCapture;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::*;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::services::dashboard;
use crate::domain::services::events::EventsService;
use crate::domain::services::AppState;

/// Selects today and queues its log. Sent once when the dashboard opens.
pub fn handle_mount(
    app_state: &mut AppState,
    tx: &mpsc::UnboundedSender<Action>,
    today: NaiveDate,
) -> Result<()> {
    tx.send(Action::FetchLog(app_state.select_date(today)))?;

    return Ok(());
}

/// Applies one event to the state and queues the fetches it calls for.
/// Returns true when the dashboard should close.
pub fn handle_event(
    app_state: &mut AppState,
    event: Event,
    tx: &mpsc::UnboundedSender<Action>,
    today: NaiveDate,
) -> Result<bool> {
    match event {
        Event::InstrumentsResponse(res) => {
            app_state.handle_instruments_response(res);
        }
        Event::LogResponse(request, res) => {
            app_state.handle_log_response(request, res);
        }
        Event::KeyboardCTRLC() => {
            return Ok(true);
        }
        Event::KeyboardCTRLR() => {
            tx.send(Action::RefreshInstruments())?;
            tx.send(Action::FetchLog(app_state.refresh_log()))?;
        }
        Event::UIDateNext() => {
            if let Some(request) = app_state.shift_date(1) {
                tx.send(Action::FetchLog(request))?;
            }
        }
        Event::UIDatePrevious() => {
            if let Some(request) = app_state.shift_date(-1) {
                tx.send(Action::FetchLog(request))?;
            }
        }
        Event::UIDateToday() => {
            if today != app_state.selected_date {
                tx.send(Action::FetchLog(app_state.select_date(today)))?;
            }
        }
        Event::UIScrollDown() => {
            app_state.scroll.down();
        }
        Event::UIScrollUp() => {
            app_state.scroll.up();
        }
        Event::UIScrollPageDown() => {
            app_state.scroll.down_page();
        }
        Event::UIScrollPageUp() => {
            app_state.scroll.up_page();
        }
        Event::UIResize() | Event::UITick() => (),
    }

    return Ok(false);
}

async fn start_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app_state: &mut AppState,
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let mut events = EventsService::new(rx);
    handle_mount(app_state, &tx, Local::now().date_naive())?;

    loop {
        terminal.draw(|frame| dashboard::render(frame, app_state))?;

        let event = events.next().await?;
        if handle_event(app_state, event, &tx, Local::now().date_naive())? {
            break;
        }
    }

    return Ok(());
}

pub fn destruct_terminal_for_panic() {
    let _ = disable_raw_mode();
    let _ = crossterm::execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
    let _ = crossterm::execute!(io::stdout(), cursor::Show);
}

/// Runs the dashboard until the user quits. The poller is cancelled on the
/// way out, whatever the outcome of the loop.
pub async fn start(
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
    cancel: CancellationToken,
) -> Result<()> {
    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    enable_raw_mode()?;
    crossterm::execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;
    let mut app_state = AppState::new(Local::now().date_naive());

    let res = start_loop(&mut terminal, &mut app_state, tx, rx).await;
    cancel.cancel();
    tracing::debug!("Dashboard closed");

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    return res;
}
