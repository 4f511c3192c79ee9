use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use super::types::{CURRENT_TRACK_PATH, Command, LibraryQuery, PlaybackState};

/// Errors that can occur talking to the media server.
///
/// Callers treat both variants as a plain failure; the split exists for logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Request could not be sent, or the body was not JSON.
    Network(String),
    /// Server answered with a non-2xx status.
    Server { status: u16, message: String },
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Network(msg) => write!(f, "network error: {msg}"),
            BackendError::Server { status, message } => {
                write!(f, "server error (HTTP {status}): {message}")
            }
        }
    }
}

impl std::error::Error for BackendError {}

/// Request/response collaborator for the media server REST surface.
///
/// Implementors only provide the two raw verbs; the typed calls are built on top.
#[async_trait]
pub trait MediaBackend: Send + Sync {
    /// Human-readable name for logs and the title bar.
    fn name(&self) -> &str;

    /// GET `path` and decode the body as JSON.
    async fn get_json(&self, path: &str) -> Result<Value, BackendError>;

    /// POST to `path` with no body and decode the response as JSON.
    async fn post_json(&self, path: &str) -> Result<Value, BackendError>;

    async fn current_track(&self) -> Result<PlaybackState, BackendError> {
        let payload = self.get_json(CURRENT_TRACK_PATH).await?;
        Ok(PlaybackState::from_response(&payload))
    }

    /// Raw library payload; shape is normalized by the navigator.
    async fn library(&self, query: &LibraryQuery) -> Result<Value, BackendError> {
        self.get_json(&query.path()).await
    }

    /// Fire a control action. The response body is ignored.
    async fn send_command(&self, command: &Command) -> Result<(), BackendError> {
        self.post_json(&command.path()).await.map(|_| ())
    }
}
