#[cfg(test)]
#[path = "actions_test.rs"]
mod tests;

use anyhow::Result;
use futures::StreamExt;
use tokio::sync::mpsc;

use super::StreamRelay;
use crate::domain::models::Action;
use crate::domain::models::BackendBox;
use crate::domain::models::Event;
use crate::domain::models::StreamError;
use crate::domain::models::TurnEvent;

pub fn help_text() -> String {
    let text = r#"
COMMANDS:
- /new /reset (/n) - Start a new conversation. The assistant forgets everything said so far.
- /quit /exit (/q) - Exit AOK.
- /help (/h) - Provides this help menu.

HOTKEYS:
- Enter - Send your message. Only one message can be in flight at a time.
- Up arrow - Scroll up
- Down arrow - Scroll down
- CTRL+U - Page up
- CTRL+D - Page down
- CTRL+N - Start a new conversation.
- CTRL+C - Exit AOK.
        "#;

    return text.trim().to_string();
}

fn send_turn_event(tx: &mpsc::UnboundedSender<Event>, event: TurnEvent) -> Result<()> {
    tx.send(Event::BackendTurn(event))?;
    return Ok(());
}

fn turn_failed(err: StreamError, tx: &mpsc::UnboundedSender<Event>) -> Result<()> {
    tracing::error!(error = ?err, "Chat turn failed");
    return send_turn_event(tx, TurnEvent::Failed(err.to_string()));
}

/// Drives one turn to completion, publishing its lifecycle to `tx`. Exactly one
/// terminal event is sent whatever the outcome; the only error returned is a
/// closed channel.
pub async fn run_turn(
    relay: &mut StreamRelay,
    text: &str,
    tx: &mpsc::UnboundedSender<Event>,
) -> Result<()> {
    let mut stream = match relay.send(text).await {
        Ok(stream) => stream,
        Err(err) => return turn_failed(err, tx),
    };

    send_turn_event(tx, TurnEvent::Streaming())?;

    let mut fragments = 0;
    while let Some(item) = stream.next().await {
        match item {
            Ok(fragment) => {
                fragments += 1;
                send_turn_event(tx, TurnEvent::Fragment(fragment))?;
            }
            Err(err) => {
                return turn_failed(err, tx);
            }
        }
    }

    tracing::debug!(fragments = fragments, "Chat turn finished");
    return send_turn_event(tx, TurnEvent::Finished());
}

pub struct ActionsService {}

impl ActionsService {
    pub async fn start(
        backend: BackendBox,
        tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        let mut relay = StreamRelay::new(backend);

        // Turns run inline, so the next action is only read once the current
        // turn has reached a terminal state.
        while let Some(action) = rx.recv().await {
            match action {
                Action::Submit(text) => {
                    run_turn(&mut relay, &text, &tx).await?;
                }
                Action::ResetSession() => {
                    relay.reset();
                }
            }
        }

        return Ok(());
    }
}
