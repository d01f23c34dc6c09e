use anyhow::Result;
use chrono::NaiveDate;
use tokio::sync::mpsc;

use super::handle_event;
use super::handle_mount;
use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::models::FetchError;
use crate::domain::models::LogRequest;
use crate::domain::services::AppState;

fn day(day: u32) -> NaiveDate {
    return NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
}

fn body_for(session_id: &str) -> String {
    return format!(r#"[{{"operation":"ADD_CHUNK","session_id":"{session_id}"}}]"#);
}

fn sent(rx: &mut mpsc::UnboundedReceiver<Action>) -> Vec<Action> {
    let mut actions = vec![];
    while let Ok(action) = rx.try_recv() {
        actions.push(action);
    }

    return actions;
}

fn mounted() -> Result<(AppState, mpsc::UnboundedSender<Action>, mpsc::UnboundedReceiver<Action>)> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
    let mut app_state = AppState::new(day(5));
    handle_mount(&mut app_state, &tx, day(5))?;
    sent(&mut rx);

    return Ok((app_state, tx, rx));
}

#[test]
fn it_fetches_todays_log_once_on_mount() -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
    let mut app_state = AppState::new(day(5));
    handle_mount(&mut app_state, &tx, day(5))?;

    assert_eq!(
        sent(&mut rx),
        vec![Action::FetchLog(LogRequest::new(1, day(5)))]
    );
    assert_eq!(app_state.selected_date, day(5));

    return Ok(());
}

#[test]
fn it_fetches_one_log_per_date_change() -> Result<()> {
    let (mut app_state, tx, mut rx) = mounted()?;

    assert!(!handle_event(&mut app_state, Event::UIDateNext(), &tx, day(5))?);
    assert_eq!(
        sent(&mut rx),
        vec![Action::FetchLog(LogRequest::new(2, day(6)))]
    );

    assert!(!handle_event(&mut app_state, Event::UIDatePrevious(), &tx, day(5))?);
    assert!(!handle_event(&mut app_state, Event::UIDatePrevious(), &tx, day(5))?);
    assert_eq!(
        sent(&mut rx),
        vec![
            Action::FetchLog(LogRequest::new(3, day(5))),
            Action::FetchLog(LogRequest::new(4, day(4))),
        ]
    );
    assert_eq!(app_state.selected_date, day(4));

    return Ok(());
}

#[test]
fn it_skips_today_when_already_selected() -> Result<()> {
    let (mut app_state, tx, mut rx) = mounted()?;

    handle_event(&mut app_state, Event::UIDateToday(), &tx, day(5))?;
    assert!(sent(&mut rx).is_empty());

    handle_event(&mut app_state, Event::UIDatePrevious(), &tx, day(5))?;
    sent(&mut rx);
    handle_event(&mut app_state, Event::UIDateToday(), &tx, day(5))?;
    assert_eq!(
        sent(&mut rx),
        vec![Action::FetchLog(LogRequest::new(3, day(5)))]
    );

    return Ok(());
}

#[test]
fn it_refreshes_both_panels() -> Result<()> {
    let (mut app_state, tx, mut rx) = mounted()?;

    handle_event(&mut app_state, Event::KeyboardCTRLR(), &tx, day(5))?;

    assert_eq!(
        sent(&mut rx),
        vec![
            Action::RefreshInstruments(),
            Action::FetchLog(LogRequest::new(2, day(5))),
        ]
    );

    return Ok(());
}

#[test]
fn it_closes_on_quit_without_fetching() -> Result<()> {
    let (mut app_state, tx, mut rx) = mounted()?;

    assert!(handle_event(&mut app_state, Event::KeyboardCTRLC(), &tx, day(5))?);
    assert!(sent(&mut rx).is_empty());

    return Ok(());
}

#[test]
fn it_shows_the_latest_date_when_responses_arrive_out_of_order() -> Result<()> {
    let (mut app_state, tx, mut rx) = mounted()?;

    handle_event(&mut app_state, Event::UIDateNext(), &tx, day(5))?;
    let queries = sent(&mut rx);
    assert_eq!(queries, vec![Action::FetchLog(LogRequest::new(2, day(6)))]);

    handle_event(
        &mut app_state,
        Event::LogResponse(LogRequest::new(2, day(6)), Ok(body_for("from-d2"))),
        &tx,
        day(5),
    )?;
    handle_event(
        &mut app_state,
        Event::LogResponse(LogRequest::new(1, day(5)), Ok(body_for("from-d1"))),
        &tx,
        day(5),
    )?;

    assert_eq!(app_state.log.as_ref().map(|log| return log.date), Some(day(6)));
    assert!(app_state.session_ids.contains("from-d2"));
    assert!(!app_state.session_ids.contains("from-d1"));
    assert!(sent(&mut rx).is_empty());

    return Ok(());
}

#[test]
fn it_applies_instrument_responses() -> Result<()> {
    let (mut app_state, tx, mut rx) = mounted()?;

    handle_event(
        &mut app_state,
        Event::InstrumentsResponse(Ok("[3, 5]".to_string())),
        &tx,
        day(5),
    )?;
    handle_event(
        &mut app_state,
        Event::InstrumentsResponse(Err(FetchError::Http { status: 502 })),
        &tx,
        day(5),
    )?;

    assert_eq!(app_state.instruments, Some("[3, 5]".to_string()));
    assert_eq!(
        app_state.instruments_error,
        Some(FetchError::Http { status: 502 })
    );
    assert!(sent(&mut rx).is_empty());

    return Ok(());
}
