//! Types for the poll loop.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::automation::JobId;

/// Errors that can occur while processing incidents.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Ticketing system error.
    #[error("ticketing error: {0}")]
    Ticketing(#[from] crate::ticketing::TicketingError),

    /// Classifier error.
    #[error("classifier error: {0}")]
    Classifier(#[from] crate::classifier::ClassifierError),

    /// Automation controller error.
    #[error("automation error: {0}")]
    Automation(#[from] crate::automation::AutomationError),
}

impl PipelineError {
    /// Whether the rest of the current pass should be abandoned.
    ///
    /// A failed launch stops the pass; everything else only costs the
    /// incident at hand, which stays new and is picked up again next poll.
    pub fn aborts_pass(&self) -> bool {
        matches!(self, PipelineError::Automation(_))
    }
}

/// How one eligible incident ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncidentOutcome {
    /// Workflow launched and ticket updated.
    Updated { job_id: JobId, category: String },
    /// Workflow launched but the ticket update was rejected.
    UpdateFailed {
        job_id: JobId,
        category: String,
        error: String,
    },
}

/// Summary of one pass.
#[derive(Debug, Clone, Serialize)]
pub struct PassReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Incidents returned by the ticketing system.
    pub listed: usize,
    /// Incidents that were new and unassigned.
    pub eligible: usize,
    /// Workflows launched.
    pub launched: usize,
    /// Tickets successfully updated.
    pub updated: usize,
    pub update_failures: usize,
    /// Incidents skipped because classification failed.
    pub skipped: usize,
    /// Set when listing failed and nothing was processed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_error: Option<String>,
    /// Set when the pass stopped before the last eligible incident.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aborted: Option<String>,
}

impl PassReport {
    pub(crate) fn started(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            finished_at: started_at,
            listed: 0,
            eligible: 0,
            launched: 0,
            updated: 0,
            update_failures: 0,
            skipped: 0,
            list_error: None,
            aborted: None,
        }
    }

    /// True when every eligible incident was launched and updated.
    pub fn is_clean(&self) -> bool {
        self.list_error.is_none()
            && self.aborted.is_none()
            && self.skipped == 0
            && self.update_failures == 0
    }
}
