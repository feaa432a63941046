#[cfg(test)]
#[path = "gemini_test.rs"]
mod tests;

use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream;
use futures::stream::TryStreamExt;
use futures::StreamExt;
use serde::Deserialize;
use serde::Serialize;
use tokio::io::AsyncBufRead;
use tokio::io::AsyncBufReadExt;
use tokio::io::Lines;
use tokio::sync::Mutex;
use tokio_util::io::StreamReader;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Backend;
use crate::domain::models::ChatSession;
use crate::domain::models::FragmentStream;
use crate::domain::models::SessionBox;
use crate::domain::models::SessionConfig;
use crate::domain::models::SessionInitError;
use crate::domain::models::StreamError;

fn convert_err(err: reqwest::Error) -> std::io::Error {
    let err_msg = err.without_url().to_string();
    return std::io::Error::new(std::io::ErrorKind::Interrupted, err_msg);
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    role: String,
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    fn text(role: &str, text: &str) -> Content {
        return Content {
            role: role.to_string(),
            parts: vec![Part {
                text: text.to_string(),
            }],
        };
    }
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    max_output_tokens: u32,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompletionRequest {
    contents: Vec<Content>,
    system_instruction: SystemInstruction,
    generation_config: GenerationConfig,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    error: Option<ApiError>,
}

/// Extracts the fragment carried by one line of the SSE body. Lines that are
/// not `data:` events, and events without a candidate, carry nothing.
fn parse_line(line: &str) -> Result<Option<String>, StreamError> {
    let cleaned_line = line.trim();
    let payload = match cleaned_line.strip_prefix("data:") {
        Some(payload) => payload.trim(),
        None => return Ok(None),
    };

    if payload.is_empty() || payload == "[DONE]" {
        return Ok(None);
    }

    let res: GenerateContentResponse = serde_json::from_str(payload).map_err(|err| {
        return StreamError::Decode(err.to_string());
    })?;

    if let Some(err) = res.error {
        return Err(StreamError::Api(err.message));
    }

    let content = match res.candidates.into_iter().next() {
        Some(Candidate {
            content: Some(content),
        }) => content,
        _ => return Ok(None),
    };

    let text = content
        .parts
        .into_iter()
        .map(|part| {
            return part.text;
        })
        .collect::<String>();

    return Ok(Some(text));
}

type BodyLines = Lines<Pin<Box<dyn AsyncBufRead + Send>>>;

struct StreamState {
    finished: bool,
    history: Arc<Mutex<Vec<Content>>>,
    lines: BodyLines,
    reply: String,
    user_content: Content,
}

impl StreamState {
    /// Records the completed exchange so the next turn carries it as context.
    async fn commit(&mut self) {
        if self.reply.is_empty() {
            tracing::warn!("Gemini finished without any text, turn not kept in history");
            return;
        }

        let mut history = self.history.lock().await;
        history.push(self.user_content.clone());
        history.push(Content::text("model", &self.reply));
    }

    async fn next_fragment(&mut self) -> Option<Result<String, StreamError>> {
        if self.finished {
            return None;
        }

        loop {
            let line = match self.lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => {
                    self.finished = true;
                    self.commit().await;
                    return None;
                }
                Err(err) => {
                    self.finished = true;
                    return Some(Err(StreamError::Transport(err.to_string())));
                }
            };

            match parse_line(&line) {
                Ok(Some(fragment)) => {
                    self.reply += &fragment;
                    return Some(Ok(fragment));
                }
                Ok(None) => continue,
                Err(err) => {
                    self.finished = true;
                    return Some(Err(err));
                }
            }
        }
    }
}

pub struct GeminiSession {
    client: reqwest::Client,
    config: SessionConfig,
    history: Arc<Mutex<Vec<Content>>>,
    token: String,
    url: String,
}

impl GeminiSession {
    fn request(&self, contents: Vec<Content>) -> CompletionRequest {
        return CompletionRequest {
            contents,
            system_instruction: SystemInstruction {
                parts: vec![Part {
                    text: self.config.system_instruction.to_string(),
                }],
            },
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_output_tokens,
            },
        };
    }
}

#[async_trait]
impl ChatSession for GeminiSession {
    #[allow(clippy::implicit_return)]
    async fn send_message_stream(&mut self, text: &str) -> Result<FragmentStream, StreamError> {
        let user_content = Content::text("user", text);
        let mut contents = self.history.lock().await.clone();
        contents.push(user_content.clone());

        let res = self
            .client
            .post(format!(
                "{url}/v1beta/{model}:streamGenerateContent?alt=sse",
                url = self.url,
                model = self.config.model,
            ))
            .header("x-goog-api-key", &self.token)
            .json(&self.request(contents))
            .send()
            .await
            .map_err(|err| {
                return StreamError::Transport(err.without_url().to_string());
            })?;

        if !res.status().is_success() {
            tracing::error!(
                status = res.status().as_u16(),
                "Failed to make completion request to Gemini"
            );
            return Err(StreamError::Status(res.status().as_u16()));
        }

        let body = res.bytes_stream().map_err(convert_err);
        let reader: Pin<Box<dyn AsyncBufRead + Send>> = Box::pin(StreamReader::new(body));
        let state = StreamState {
            finished: false,
            history: Arc::clone(&self.history),
            lines: reader.lines(),
            reply: "".to_string(),
            user_content,
        };

        let fragments = stream::unfold(state, |mut state| {
            return async move {
                let item = state.next_fragment().await?;
                return Some((item, state));
            };
        });

        return Ok(fragments.boxed());
    }
}

/// Google Gemini over its REST API. Endpoint and key are resolved from the
/// configuration when a session is created unless set explicitly.
#[derive(Default)]
pub struct Gemini {
    url: Option<String>,
    token: Option<String>,
}

#[async_trait]
impl Backend for Gemini {
    fn name(&self) -> &'static str {
        return "gemini";
    }

    #[allow(clippy::implicit_return)]
    async fn create_session(&self, config: SessionConfig) -> Result<SessionBox, SessionInitError> {
        let url = match &self.url {
            Some(url) => url.to_string(),
            None => Config::get(ConfigKey::GeminiURL),
        };
        let token = match &self.token {
            Some(token) => token.to_string(),
            None => Config::get(ConfigKey::ApiKey),
        };

        if url.is_empty() {
            return Err(SessionInitError::MissingEndpoint);
        }
        if token.is_empty() {
            return Err(SessionInitError::MissingCredential);
        }

        return Ok(Box::new(GeminiSession {
            client: reqwest::Client::new(),
            config,
            history: Arc::new(Mutex::new(vec![])),
            token,
            url: url.trim_end_matches('/').to_string(),
        }));
    }
}
