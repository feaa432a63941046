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

#[cfg(test)]
#[path = "events_test.rs"]
mod tests;

const TICK_INTERVAL: time::Duration = time::Duration::from_millis(500);

/// Merges terminal input, turn events from the actions service and a UI tick
/// into one stream for the render loop.
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

    fn handle_key(input: Input) -> Event {
        match (input.key.clone(), input.ctrl) {
            (Key::Down, _) | (Key::MouseScrollDown, _) => return Event::UIScrollDown(),
            (Key::Up, _) | (Key::MouseScrollUp, _) => return Event::UIScrollUp(),
            (Key::PageDown, _) | (Key::Char('d'), true) => return Event::UIScrollPageDown(),
            (Key::PageUp, _) | (Key::Char('u'), true) => return Event::UIScrollPageUp(),
            (Key::Char('c'), true) => return Event::KeyboardCTRLC(),
            (Key::Char('n'), true) => return Event::KeyboardCTRLN(),
            (Key::Enter, _) => return Event::KeyboardEnter(),
            _ => return Event::KeyboardCharInput(input),
        }
    }

    fn handle_crossterm(event: CrosstermEvent) -> Option<Event> {
        match event {
            CrosstermEvent::Key(keyevent) => return Some(EventsService::handle_key(keyevent.into())),
            CrosstermEvent::Paste(text) => return Some(Event::KeyboardPaste(text)),
            CrosstermEvent::Mouse(mouseevent) => match mouseevent.kind {
                MouseEventKind::ScrollUp => return Some(Event::UIScrollUp()),
                MouseEventKind::ScrollDown => return Some(Event::UIScrollDown()),
                _ => return None,
            },
            _ => return None,
        }
    }

    pub async fn next(&mut self) -> Result<Event> {
        loop {
            let evt = tokio::select! {
                event = self.events.recv() => event,
                event = self.crossterm_events.next() => match event {
                    Some(Ok(input)) => EventsService::handle_crossterm(input),
                    Some(Err(err)) => {
                        tracing::warn!(error = ?err, "Failed to read terminal event");
                        None
                    }
                    None => None
                },
                _ = time::sleep(TICK_INTERVAL) => Some(Event::UITick())
            };

            if let Some(event) = evt {
                return Ok(event);
            }
        }
    }
}
