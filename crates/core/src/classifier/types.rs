use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when classifying text.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Classifier returned HTTP {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Invalid classifier response: {0}")]
    InvalidResponse(String),

    #[error("Classifier response has no category")]
    MissingCategory,

    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for ClassifierError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClassifierError::Timeout
        } else if e.is_connect() {
            ClassifierError::ConnectionFailed(e.to_string())
        } else {
            ClassifierError::Transport(e.to_string())
        }
    }
}

/// Request body sent to the classifier.
#[derive(Debug, Clone, Serialize)]
pub struct ClassifyRequest<'a> {
    pub text: &'a str,
}

/// Result of classifying one incident description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub category: String,
}

/// Trait for classification backends.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Map free text to a category.
    async fn classify(&self, text: &str) -> Result<Classification, ClassifierError>;
}
