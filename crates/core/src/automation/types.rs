//! Types for launching automation workflows.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::TicketingConfig;

/// Errors that can occur when launching a workflow.
#[derive(Debug, Error)]
pub enum AutomationError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Workflow launch rejected with HTTP {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Invalid launch response: {0}")]
    InvalidResponse(String),

    #[error("Launch response has no job id")]
    MissingJobId,

    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for AutomationError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AutomationError::Timeout
        } else if e.is_connect() {
            AutomationError::ConnectionFailed(e.to_string())
        } else {
            AutomationError::Transport(e.to_string())
        }
    }
}

/// Identifier of a launched workflow job. The controller sends a number,
/// but nothing here depends on that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JobId {
    Numeric(u64),
    Text(String),
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobId::Numeric(id) => write!(f, "{}", id),
            JobId::Text(id) => write!(f, "{}", id),
        }
    }
}

/// Ticketing credentials handed to the workflow so it can update the
/// incident itself.
#[derive(Clone, PartialEq, Eq)]
pub struct TicketingCallback {
    pub instance: String,
    pub user: String,
    pub password: String,
}

impl fmt::Debug for TicketingCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TicketingCallback")
            .field("instance", &self.instance)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl From<&TicketingConfig> for TicketingCallback {
    fn from(config: &TicketingConfig) -> Self {
        Self {
            instance: config.url.clone(),
            user: config.username.clone(),
            password: config.password.clone(),
        }
    }
}

/// Everything needed to launch the remediation workflow for one incident.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub ticket_number: String,
    pub category: String,
    /// Inventory limit, usually the incident's host.
    pub host: String,
    pub callback: TicketingCallback,
}

/// `extra_vars` as the workflow templates expect them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtraVars {
    pub snow_inc_number: String,
    pub category: String,
    pub snow_instance: String,
    pub snow_user: String,
    pub snow_pass: String,
}

/// Body of `POST .../workflow_job_templates/{id}/launch/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchBody {
    pub extra_vars: ExtraVars,
    pub limit: String,
}

impl From<&LaunchRequest> for LaunchBody {
    fn from(request: &LaunchRequest) -> Self {
        Self {
            extra_vars: ExtraVars {
                snow_inc_number: request.ticket_number.clone(),
                category: request.category.clone(),
                snow_instance: request.callback.instance.clone(),
                snow_user: request.callback.user.clone(),
                snow_pass: request.callback.password.clone(),
            },
            limit: request.host.clone(),
        }
    }
}

/// Trait for workflow launch backends.
#[async_trait]
pub trait AutomationLauncher: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Launch the configured workflow template and return the job id.
    async fn launch_workflow(&self, request: &LaunchRequest) -> Result<JobId, AutomationError>;
}
