#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

use anyhow::Result;
use ratatui::prelude::Rect;
use tokio::sync::mpsc;

use super::actions::help_text;
use super::BubbleList;
use super::Conversation;
use super::Scroll;
use crate::domain::models::Action;
use crate::domain::models::Message;
use crate::domain::models::MessageId;
use crate::domain::models::MessageType;
use crate::domain::models::Role;
use crate::domain::models::SlashCommand;
use crate::domain::models::TurnEvent;
use crate::domain::models::FALLBACK_ERROR_TEXT;
use crate::domain::models::INITIAL_GREETING;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TurnPhase {
    Idle,
    /// Submitted, waiting for the relay to open a stream.
    Sending,
    /// Fragments are being appended to the given message.
    Streaming(MessageId),
}

pub struct AppState {
    pub bubble_list: BubbleList,
    pub conversation: Conversation,
    pub last_known_height: u16,
    pub last_known_width: u16,
    pub phase: TurnPhase,
    pub scroll: Scroll,
}

fn greeting() -> Message {
    return Message::new(Role::Assistant, INITIAL_GREETING);
}

impl Default for AppState {
    fn default() -> AppState {
        return AppState {
            bubble_list: BubbleList::default(),
            conversation: Conversation::new(greeting()),
            last_known_height: 0,
            last_known_width: 0,
            phase: TurnPhase::Idle,
            scroll: Scroll::default(),
        };
    }
}

impl AppState {
    pub fn is_pending(&self) -> bool {
        return self.phase != TurnPhase::Idle;
    }

    /// Records a user utterance and opens a turn. Returns the text to send to
    /// the relay, or `None` when the input is blank or a turn is in flight, in
    /// which case nothing changes.
    pub fn submit(&mut self, input: &str) -> Option<String> {
        let text = input.trim();
        if text.is_empty() || self.is_pending() {
            return None;
        }

        self.phase = TurnPhase::Sending;
        self.add_message(Message::new(Role::User, text));

        return Some(text.to_string());
    }

    pub fn handle_turn_event(&mut self, event: TurnEvent) {
        match (event, self.phase) {
            (TurnEvent::Streaming(), TurnPhase::Sending) => {
                let placeholder = Message::new_streaming();
                self.phase = TurnPhase::Streaming(placeholder.id());
                self.add_message(placeholder);
            }
            (TurnEvent::Fragment(fragment), TurnPhase::Streaming(id)) => {
                if fragment.is_empty() {
                    return;
                }
                self.conversation.update_by_id(id, |message| {
                    message.append(&fragment);
                });
                self.sync_dependants();
            }
            (TurnEvent::Finished(), phase) => {
                self.finalize_stream(phase);
                self.phase = TurnPhase::Idle;
                self.sync_dependants();
            }
            (TurnEvent::Failed(reason), phase) => {
                tracing::error!(reason = %reason, "Turn failed, showing fallback message");
                self.finalize_stream(phase);
                self.phase = TurnPhase::Idle;
                self.add_message(Message::new_with_type(
                    Role::Assistant,
                    MessageType::Error,
                    FALLBACK_ERROR_TEXT,
                ));
            }
            (event, phase) => {
                tracing::warn!(event = ?event, phase = ?phase, "Ignoring out of order turn event");
            }
        }
    }

    /// Clears the conversation back to the greeting. Refused while a turn is in
    /// flight.
    pub fn reset_conversation(&mut self) -> bool {
        if self.is_pending() {
            return false;
        }

        self.conversation.reset(greeting());
        self.sync_dependants();
        self.scroll.last();

        return true;
    }

    /// Returns `(should_break, should_continue)` for the UI loop.
    pub fn handle_slash_commands(
        &mut self,
        input_str: &str,
        tx: &mpsc::UnboundedSender<Action>,
    ) -> Result<(bool, bool)> {
        let command = match SlashCommand::parse(input_str) {
            Some(command) => command,
            None => return Ok((false, false)),
        };

        if command.is_quit() {
            return Ok((true, false));
        }

        if self.is_pending() {
            return Ok((false, true));
        }

        if command.is_reset() {
            if self.reset_conversation() {
                tx.send(Action::ResetSession())?;
            }
            return Ok((false, true));
        }

        if command.is_help() {
            self.add_message(Message::new(Role::Assistant, &help_text()));
            return Ok((false, true));
        }

        return Ok((false, false));
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.last_known_width = rect.width;
        self.last_known_height = rect.height;
        self.sync_dependants();
    }

    pub fn add_message(&mut self, message: Message) {
        self.conversation.append(message);
        self.sync_dependants();
        self.scroll.last();
    }

    fn finalize_stream(&mut self, phase: TurnPhase) {
        if let TurnPhase::Streaming(id) = phase {
            self.conversation.update_by_id(id, |message| {
                message.finalize();
            });
        }
    }

    fn sync_dependants(&mut self) {
        self.bubble_list
            .set_messages(self.conversation.messages(), self.last_known_width);

        let lines_len = u16::try_from(self.bubble_list.len()).unwrap_or(u16::MAX);
        self.scroll.set_state(lines_len, self.last_known_height);
    }
}
