#[cfg(test)]
#[path = "relay_test.rs"]
mod tests;

use crate::domain::models::BackendBox;
use crate::domain::models::FragmentStream;
use crate::domain::models::SessionBox;
use crate::domain::models::SessionConfig;
use crate::domain::models::SessionInitError;
use crate::domain::models::StreamError;

/// Turns a user utterance into a stream of response fragments. Owns the only
/// live session, which is created on first use and dropped on reset.
pub struct StreamRelay {
    backend: BackendBox,
    config: SessionConfig,
    session: Option<SessionBox>,
}

impl StreamRelay {
    pub fn new(backend: BackendBox) -> StreamRelay {
        return StreamRelay {
            backend,
            config: SessionConfig::policy(),
            session: None,
        };
    }

    pub fn has_session(&self) -> bool {
        return self.session.is_some();
    }

    pub async fn ensure_session(&mut self) -> Result<&mut SessionBox, SessionInitError> {
        let session = match self.session.take() {
            Some(session) => session,
            None => {
                let session = self.backend.create_session(self.config.clone()).await?;
                tracing::debug!(
                    backend = self.backend.name(),
                    model = %self.config.model,
                    "Created chat session"
                );
                session
            }
        };

        return Ok(self.session.insert(session));
    }

    pub async fn send(&mut self, text: &str) -> Result<FragmentStream, StreamError> {
        let session = self.ensure_session().await?;
        return session.send_message_stream(text).await;
    }

    pub fn reset(&mut self) {
        if self.session.take().is_some() {
            tracing::debug!(backend = self.backend.name(), "Discarded chat session");
        }
    }
}
