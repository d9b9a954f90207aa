use std::time::Duration;

use anyhow::Result;
use crossterm::event::Event as CrosstermEvent;
use crossterm::event::EventStream;
use crossterm::event::KeyEventKind;
use crossterm::event::MouseEventKind;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time;
use tokio::time::MissedTickBehavior;
use tui_textarea::Input;
use tui_textarea::Key;

use crate::domain::models::Event;

const TICK_RATE: Duration = Duration::from_millis(250);

/// Translates a terminal event. Returns `None` for anything the interface
/// doesn't react to.
fn from_crossterm(event: CrosstermEvent) -> Option<Event> {
    match event {
        CrosstermEvent::Paste(text) => return Some(Event::KeyboardPaste(text)),
        CrosstermEvent::Mouse(mouseevent) => match mouseevent.kind {
            MouseEventKind::ScrollUp => return Some(Event::UIScrollUp()),
            MouseEventKind::ScrollDown => return Some(Event::UIScrollDown()),
            _ => return None,
        },
        CrosstermEvent::Key(keyevent) => {
            // Windows reports both press and release.
            if keyevent.kind == KeyEventKind::Release {
                return None;
            }

            let event = match keyevent.into() {
                Input { key: Key::Down, .. } => Event::UIScrollDown(),
                Input { key: Key::Up, .. } => Event::UIScrollUp(),
                Input {
                    key: Key::PageDown, ..
                }
                | Input {
                    key: Key::Char('d'),
                    ctrl: true,
                    ..
                } => Event::UIScrollPageDown(),
                Input {
                    key: Key::PageUp, ..
                }
                | Input {
                    key: Key::Char('u'),
                    ctrl: true,
                    ..
                } => Event::UIScrollPageUp(),
                Input {
                    key: Key::Char('c'),
                    ctrl: true,
                    ..
                } => Event::KeyboardCTRLC(),
                Input {
                    key: Key::Enter, ..
                } => Event::KeyboardEnter(),
                Input { key: Key::Esc, .. } => Event::KeyboardEscape(),
                input => Event::KeyboardCharInput(input),
            };

            return Some(event);
        }
        _ => return None,
    }
}

/// Single stream the interface waits on: backend events from the actions
/// worker and the poller, terminal input, and a steady tick that animates
/// the pending indicator.
pub struct EventsService {
    crossterm_events: EventStream,
    events: mpsc::UnboundedReceiver<Event>,
    ticker: time::Interval,
}

impl EventsService {
    pub fn new(events: mpsc::UnboundedReceiver<Event>) -> EventsService {
        let mut ticker = time::interval(TICK_RATE);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        return EventsService {
            crossterm_events: EventStream::new(),
            events,
            ticker,
        };
    }

    pub async fn next(&mut self) -> Result<Event> {
        loop {
            let evt = tokio::select! {
                event = self.events.recv() => event,
                event = self.crossterm_events.next() => match event {
                    Some(Ok(input)) => from_crossterm(input),
                    Some(Err(err)) => {
                        tracing::warn!(error = ?err, "Failed to read terminal event");
                        None
                    }
                    None => None,
                },
                _ = self.ticker.tick() => Some(Event::UITick()),
            };

            if let Some(event) = evt {
                return Ok(event);
            }
        }
    }
}
