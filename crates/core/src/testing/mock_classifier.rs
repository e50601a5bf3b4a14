//! Mock classifier for testing.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::classifier::{Classification, Classifier, ClassifierError};

/// Mock implementation of the Classifier trait.
///
/// Returns a default category unless a per-text override is configured, and
/// records every text it was asked to classify.
#[derive(Debug)]
pub struct MockClassifier {
    default_category: Arc<RwLock<String>>,
    overrides: Arc<RwLock<HashMap<String, String>>>,
    /// Texts for which the classifier answers without a category.
    uncategorized: Arc<RwLock<HashSet<String>>>,
    requests: Arc<RwLock<Vec<String>>>,
    latency: Arc<RwLock<Option<Duration>>>,
}

impl MockClassifier {
    pub fn new(default_category: &str) -> Self {
        Self {
            default_category: Arc::new(RwLock::new(default_category.to_string())),
            overrides: Arc::new(RwLock::new(HashMap::new())),
            uncategorized: Arc::new(RwLock::new(HashSet::new())),
            requests: Arc::new(RwLock::new(Vec::new())),
            latency: Arc::new(RwLock::new(None)),
        }
    }

    /// Classify `text` as `category`.
    pub async fn set_category(&self, text: &str, category: &str) {
        self.overrides
            .write()
            .await
            .insert(text.to_string(), category.to_string());
    }

    /// Answer `text` without a usable category.
    pub async fn fail_on(&self, text: &str) {
        self.uncategorized.write().await.insert(text.to_string());
    }

    /// Delay every answer by `latency`.
    pub async fn set_latency(&self, latency: Duration) {
        *self.latency.write().await = Some(latency);
    }

    pub async fn recorded_requests(&self) -> Vec<String> {
        self.requests.read().await.clone()
    }

    pub async fn request_count(&self) -> usize {
        self.requests.read().await.len()
    }
}

#[async_trait]
impl Classifier for MockClassifier {
    fn name(&self) -> &str {
        "mock"
    }

    async fn classify(&self, text: &str) -> Result<Classification, ClassifierError> {
        self.requests.write().await.push(text.to_string());

        let latency = *self.latency.read().await;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        if self.uncategorized.read().await.contains(text) {
            return Err(ClassifierError::MissingCategory);
        }

        let category = match self.overrides.read().await.get(text) {
            Some(category) => category.clone(),
            None => self.default_category.read().await.clone(),
        };

        Ok(Classification { category })
    }
}
