#[cfg(test)]
#[path = "message_test.rs"]
mod tests;

use std::fmt;

use uuid::Uuid;

use super::Role;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MessageId(Uuid);

impl MessageId {
    pub fn new() -> MessageId {
        return MessageId(Uuid::new_v4());
    }
}

impl Default for MessageId {
    fn default() -> MessageId {
        return MessageId::new();
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        return write!(f, "{}", self.0);
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MessageType {
    Normal,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    id: MessageId,
    pub role: Role,
    text: String,
    streaming: bool,
    mtype: MessageType,
}

impl Message {
    pub fn new(role: Role, text: &str) -> Message {
        return Message::new_with_type(role, MessageType::Normal, text);
    }

    pub fn new_with_type(role: Role, mtype: MessageType, text: &str) -> Message {
        return Message {
            id: MessageId::new(),
            role,
            text: text.to_string(),
            streaming: false,
            mtype,
        };
    }

    /// Empty assistant message that receives fragments until finalized.
    pub fn new_streaming() -> Message {
        return Message {
            id: MessageId::new(),
            role: Role::Assistant,
            text: "".to_string(),
            streaming: true,
            mtype: MessageType::Normal,
        };
    }

    pub fn id(&self) -> MessageId {
        return self.id;
    }

    pub fn text(&self) -> &str {
        return &self.text;
    }

    pub fn message_type(&self) -> MessageType {
        return self.mtype;
    }

    pub fn is_streaming(&self) -> bool {
        return self.streaming;
    }

    /// Extends the text with a streamed fragment. Text is frozen once the
    /// message is finalized, so this returns false and leaves it untouched.
    pub fn append(&mut self, fragment: &str) -> bool {
        if !self.streaming {
            return false;
        }

        self.text.push_str(fragment);
        return true;
    }

    pub fn finalize(&mut self) {
        self.streaming = false;
    }
}
