//! HTTP/JSON classifier backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ClassifierConfig;

use super::{Classification, ClassifierError, ClassifyRequest, Classifier};

/// Classifier reached over HTTP: `POST {url}` with `{"text": ...}`.
pub struct HttpClassifier {
    client: Client,
    config: ClassifierConfig,
}

impl HttpClassifier {
    pub fn new(config: ClassifierConfig) -> Result<Self, ClassifierError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    fn name(&self) -> &str {
        "http"
    }

    async fn classify(&self, text: &str) -> Result<Classification, ClassifierError> {
        debug!(url = %self.config.url, "Sending text to classifier");

        let response = self
            .client
            .post(&self.config.url)
            .json(&ClassifyRequest { text })
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Classifier request failed");
            return Err(ClassifierError::UnexpectedStatus {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ClassifierError::InvalidResponse(e.to_string()))?;

        debug!(response = %body, "Classifier response");
        parse_classification(&body)
    }
}

/// Pull a usable classification out of the response body.
fn parse_classification(body: &Value) -> Result<Classification, ClassifierError> {
    let category = body
        .get("category")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or(ClassifierError::MissingCategory)?;

    Ok(Classification {
        category: category.to_string(),
    })
}
