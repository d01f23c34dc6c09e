#[cfg(test)]
#[path = "events_test.rs"]
mod tests;

use anyhow::Result;
use crossterm::event::Event as CrosstermEvent;
use crossterm::event::EventStream;
use crossterm::event::MouseEventKind;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time;
use tui_textarea::Input;
use tui_textarea::Key;

use crate::domain::models::Event;

/// Maps terminal input to dashboard events. Keys without a binding are
/// dropped.
pub fn handle_crossterm(event: CrosstermEvent) -> Option<Event> {
    match event {
        CrosstermEvent::Resize(_, _) => {
            return Some(Event::UIResize());
        }
        CrosstermEvent::Mouse(mouseevent) => match mouseevent.kind {
            MouseEventKind::ScrollUp => {
                return Some(Event::UIScrollUp());
            }
            MouseEventKind::ScrollDown => {
                return Some(Event::UIScrollDown());
            }
            _ => {
                return None;
            }
        },
        CrosstermEvent::Key(keyevent) => match keyevent.into() {
            Input {
                key: Key::Char('c'),
                ctrl: true,
                ..
            }
            | Input {
                key: Key::Char('q'),
                ctrl: false,
                ..
            }
            | Input { key: Key::Esc, .. } => {
                return Some(Event::KeyboardCTRLC());
            }
            Input {
                key: Key::Char('r'),
                ..
            } => {
                return Some(Event::KeyboardCTRLR());
            }
            Input {
                key: Key::Char('d'),
                ctrl: true,
                ..
            }
            | Input {
                key: Key::PageDown, ..
            } => {
                return Some(Event::UIScrollPageDown());
            }
            Input {
                key: Key::Char('u'),
                ctrl: true,
                ..
            }
            | Input { key: Key::PageUp, .. } => {
                return Some(Event::UIScrollPageUp());
            }
            Input { key: Key::Down, .. } => {
                return Some(Event::UIScrollDown());
            }
            Input { key: Key::Up, .. } => {
                return Some(Event::UIScrollUp());
            }
            Input { key: Key::Left, .. }
            | Input {
                key: Key::Char('h'),
                ctrl: false,
                ..
            } => {
                return Some(Event::UIDatePrevious());
            }
            Input {
                key: Key::Right, ..
            }
            | Input {
                key: Key::Char('l'),
                ctrl: false,
                ..
            } => {
                return Some(Event::UIDateNext());
            }
            Input {
                key: Key::Char('t'),
                ctrl: false,
                ..
            } => {
                return Some(Event::UIDateToday());
            }
            _ => {
                return None;
            }
        },
        _ => return None,
    }
}

pub struct EventsService {
    crossterm_events: EventStream,
    events: mpsc::UnboundedReceiver<Event>,
}

impl EventsService {
    pub fn new(events: mpsc::UnboundedReceiver<Event>) -> EventsService {
        return EventsService {
            crossterm_events: EventStream::new(),
            events,
        };
    }

    pub async fn next(&mut self) -> Result<Event> {
        loop {
            let evt = tokio::select! {
                event = self.events.recv() => event,
                event = self.crossterm_events.next() => match event {
                    Some(Ok(input)) => handle_crossterm(input),
                    Some(Err(_)) => None,
                    None => None
                },
                _ = time::sleep(time::Duration::from_millis(500)) => Some(Event::UITick())
            };

            if let Some(event) = evt {
                return Ok(event);
            }
        }
    }
}
