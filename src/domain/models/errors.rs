use thiserror::Error;

/// Raised while constructing a chat session, before any request is made.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SessionInitError {
    #[error("API key is missing, set it with --api-key or AOK_API_KEY")]
    MissingCredential,
    #[error("Gemini URL is not defined")]
    MissingEndpoint,
}

/// Terminal failure of a single turn. A turn yields at most one of these and
/// then stops producing fragments.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StreamError {
    #[error("failed to initialize chat session: {0}")]
    SessionInit(#[from] SessionInitError),
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("Gemini responded with status {0}")]
    Status(u16),
    #[error("Gemini returned an error: {0}")]
    Api(String),
    #[error("failed to decode stream chunk: {0}")]
    Decode(String),
}
