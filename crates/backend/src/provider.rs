use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use quiz_core::model::{Question, Response, SubmissionPayload, UserId};
use thiserror::Error;

use crate::http::HttpBackend;
use crate::memory::InMemoryBackend;

/// Errors surfaced by backend adapters.
///
/// "No such question" is not an error; providers return `Ok(None)` for it.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BackendError {
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("backend answered with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("could not decode backend response: {0}")]
    Decode(String),

    #[error("question positions start at 1, got {0}")]
    InvalidPosition(u32),
}

/// Acknowledgement of a final submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionAck {
    pub message: String,
}

/// Supplies question definitions by 1-based position.
#[async_trait]
pub trait QuestionProvider: Send + Sync {
    /// Fetch the question at `position`.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` for transport or server failures. A missing
    /// question is `Ok(None)`.
    async fn fetch_question(
        &self,
        user: &UserId,
        position: u32,
    ) -> Result<Option<Question>, BackendError>;
}

/// Accepts one saved response at a time.
#[async_trait]
pub trait ResponseSink: Send + Sync {
    /// # Errors
    ///
    /// Returns `BackendError` if the backend did not accept the response.
    async fn send_response(&self, user: &UserId, response: &Response) -> Result<(), BackendError>;
}

/// Accepts the final submission payload.
#[async_trait]
pub trait SubmissionEndpoint: Send + Sync {
    /// # Errors
    ///
    /// Returns `BackendError` if the submission was not acknowledged.
    async fn submit(
        &self,
        user: &UserId,
        payload: &SubmissionPayload,
    ) -> Result<SubmissionAck, BackendError>;
}

/// Aggregates the three backend roles behind trait objects for easy swapping.
#[derive(Clone)]
pub struct Backend {
    pub questions: Arc<dyn QuestionProvider>,
    pub responses: Arc<dyn ResponseSink>,
    pub submissions: Arc<dyn SubmissionEndpoint>,
}

impl Backend {
    #[must_use]
    pub fn in_memory(backend: InMemoryBackend) -> Self {
        Self {
            questions: Arc::new(backend.clone()),
            responses: Arc::new(backend.clone()),
            submissions: Arc::new(backend),
        }
    }

    /// Connect to an HTTP quiz backend.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Unavailable` if the HTTP client cannot be built.
    pub fn http(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let backend = Arc::new(HttpBackend::new(base_url, timeout)?);
        Ok(Self {
            questions: backend.clone(),
            responses: backend.clone(),
            submissions: backend,
        })
    }
}
