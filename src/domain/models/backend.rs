#[cfg(test)]
#[path = "backend_test.rs"]
mod tests;

use async_trait::async_trait;
use futures::stream::BoxStream;

use super::SessionInitError;
use super::StreamError;
use super::SYSTEM_INSTRUCTION;

pub const MODEL_NAME: &str = "models/gemini-3-flash-preview";
pub const TEMPERATURE: f64 = 0.7;
pub const MAX_OUTPUT_TOKENS: u32 = 2000;

/// Parameters a session is created with. These are policy, not user
/// configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    pub model: String,
    pub system_instruction: String,
    pub temperature: f64,
    pub max_output_tokens: u32,
}

impl SessionConfig {
    pub fn policy() -> SessionConfig {
        return SessionConfig {
            model: MODEL_NAME.to_string(),
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            temperature: TEMPERATURE,
            max_output_tokens: MAX_OUTPUT_TOKENS,
        };
    }
}

/// Lazy, finite sequence of response fragments for one turn. An `Err` item is
/// always the last item of the stream.
pub type FragmentStream = BoxStream<'static, Result<String, StreamError>>;

#[async_trait]
pub trait ChatSession {
    /// Sends a user message within the session's conversation context. The
    /// request is made before returning, fragments are pulled from the
    /// returned stream as the backend produces them.
    ///
    /// Prior completed turns of the same session are carried as context.
    async fn send_message_stream(&mut self, text: &str) -> Result<FragmentStream, StreamError>;
}

pub type SessionBox = Box<dyn ChatSession + Send + Sync>;

#[async_trait]
pub trait Backend {
    fn name(&self) -> &'static str;

    /// Creates a fresh conversation context. Credentials are resolved at this
    /// point, so a missing key only fails the turn that needed the session.
    async fn create_session(&self, config: SessionConfig) -> Result<SessionBox, SessionInitError>;
}

pub type BackendBox = Box<dyn Backend + Send + Sync>;
