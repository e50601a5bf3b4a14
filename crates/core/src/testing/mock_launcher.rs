//! Mock automation launcher for testing.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::automation::{AutomationError, AutomationLauncher, JobId, LaunchRequest};

/// A recorded launch for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedLaunch {
    pub request: LaunchRequest,
    /// Job id handed out, `None` if the launch was rejected.
    pub job_id: Option<JobId>,
}

/// Mock implementation of the AutomationLauncher trait.
///
/// Hands out sequential job ids starting at 1 (or the configured value).
#[derive(Debug)]
pub struct MockLauncher {
    next_job_id: AtomicU64,
    launches: Arc<RwLock<Vec<RecordedLaunch>>>,
    /// Ticket numbers whose launch is rejected with HTTP 400.
    rejected_tickets: Arc<RwLock<HashSet<String>>>,
}

impl Default for MockLauncher {
    fn default() -> Self {
        Self::new()
    }
}

impl MockLauncher {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Hand out job ids starting at `first_job_id`.
    pub fn starting_at(first_job_id: u64) -> Self {
        Self {
            next_job_id: AtomicU64::new(first_job_id),
            launches: Arc::new(RwLock::new(Vec::new())),
            rejected_tickets: Arc::new(RwLock::new(HashSet::new())),
        }
    }

    /// Reject launches for this ticket number.
    pub async fn reject_ticket(&self, ticket_number: &str) {
        self.rejected_tickets
            .write()
            .await
            .insert(ticket_number.to_string());
    }

    pub async fn recorded_launches(&self) -> Vec<RecordedLaunch> {
        self.launches.read().await.clone()
    }

    pub async fn launch_count(&self) -> usize {
        self.launches.read().await.len()
    }
}

#[async_trait]
impl AutomationLauncher for MockLauncher {
    fn name(&self) -> &str {
        "mock"
    }

    async fn launch_workflow(&self, request: &LaunchRequest) -> Result<JobId, AutomationError> {
        if self
            .rejected_tickets
            .read()
            .await
            .contains(&request.ticket_number)
        {
            self.launches.write().await.push(RecordedLaunch {
                request: request.clone(),
                job_id: None,
            });
            return Err(AutomationError::UnexpectedStatus {
                status: 400,
                body: "Bad Request".to_string(),
            });
        }

        let job_id = JobId::Numeric(self.next_job_id.fetch_add(1, Ordering::SeqCst));
        self.launches.write().await.push(RecordedLaunch {
            request: request.clone(),
            job_id: Some(job_id.clone()),
        });
        Ok(job_id)
    }
}
