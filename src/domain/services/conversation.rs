#[cfg(test)]
#[path = "conversation_test.rs"]
mod tests;

use crate::domain::models::Message;
use crate::domain::models::MessageId;

/// Ordered message list. Insertion order is display order, and only the
/// message being streamed is ever rewritten in place.
#[derive(Clone, Debug, Default)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new(initial_message: Message) -> Conversation {
        return Conversation {
            messages: vec![initial_message],
        };
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Applies `mutator` to the message with `id`. Every other entry is left
    /// untouched. Returns false when no such message exists.
    pub fn update_by_id<F>(&mut self, id: MessageId, mutator: F) -> bool
    where
        F: FnOnce(&mut Message),
    {
        let message = self.messages.iter_mut().find(|message| {
            return message.id() == id;
        });

        if let Some(message) = message {
            mutator(message);
            return true;
        }

        tracing::warn!(id = %id, "No message found to update");
        return false;
    }

    pub fn reset(&mut self, initial_message: Message) {
        self.messages = vec![initial_message];
    }

    pub fn messages(&self) -> &[Message] {
        return &self.messages;
    }

    pub fn last(&self) -> Option<&Message> {
        return self.messages.last();
    }

    pub fn len(&self) -> usize {
        return self.messages.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.messages.is_empty();
    }

    pub fn streaming_count(&self) -> usize {
        return self
            .messages
            .iter()
            .filter(|message| {
                return message.is_streaming();
            })
            .count();
    }
}
