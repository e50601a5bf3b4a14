//! Types for ticketing system operations.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Errors that can occur while talking to the ticketing system.
#[derive(Debug, Error)]
pub enum TicketingError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Unexpected HTTP status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for TicketingError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TicketingError::Timeout
        } else if e.is_connect() {
            TicketingError::ConnectionFailed(e.to_string())
        } else if e.is_decode() {
            TicketingError::InvalidResponse(e.to_string())
        } else {
            TicketingError::Transport(e.to_string())
        }
    }
}

/// Incident state as stored by ServiceNow (a small integer code sent as text).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IncidentState {
    New,
    InProgress,
    OnHold,
    Resolved,
    Closed,
    Canceled,
    /// Any code this crate does not know about, kept verbatim.
    Other(String),
}

impl IncidentState {
    /// The wire code for this state.
    pub fn code(&self) -> &str {
        match self {
            IncidentState::New => "1",
            IncidentState::InProgress => "2",
            IncidentState::OnHold => "3",
            IncidentState::Resolved => "6",
            IncidentState::Closed => "7",
            IncidentState::Canceled => "8",
            IncidentState::Other(code) => code,
        }
    }

    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "1" => IncidentState::New,
            "2" => IncidentState::InProgress,
            "3" => IncidentState::OnHold,
            "6" => IncidentState::Resolved,
            "7" => IncidentState::Closed,
            "8" => IncidentState::Canceled,
            other => IncidentState::Other(other.to_string()),
        }
    }
}

impl From<String> for IncidentState {
    fn from(code: String) -> Self {
        IncidentState::from_code(&code)
    }
}

impl From<IncidentState> for String {
    fn from(state: IncidentState) -> Self {
        state.code().to_string()
    }
}

/// An incident record from the `incident` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Incident {
    pub sys_id: String,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub short_description: String,
    pub state: IncidentState,
    /// `None` when unassigned. The table API sends `""` for an empty
    /// reference and `{link, value}` for a populated one.
    #[serde(default, deserialize_with = "deserialize_reference")]
    pub assigned_to: Option<String>,
    /// Affected host, a custom column on the incident table.
    #[serde(default)]
    pub u_host: String,
    #[serde(default)]
    pub work_notes: String,
}

impl Incident {
    /// Only brand new, unassigned incidents are picked up.
    pub fn is_eligible(&self) -> bool {
        self.state == IncidentState::New && self.assigned_to.is_none()
    }
}

fn deserialize_reference<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Reference {
        Plain(String),
        Link {
            #[serde(default)]
            value: String,
        },
    }

    let reference = Option::<Reference>::deserialize(deserializer)?;
    let value = match reference {
        Some(Reference::Plain(s)) => s,
        Some(Reference::Link { value }) => value,
        None => String::new(),
    };

    if value.trim().is_empty() {
        Ok(None)
    } else {
        Ok(Some(value))
    }
}

/// Partial update applied to an incident.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncidentUpdate {
    pub state: IncidentState,
    pub assigned_to: String,
    /// Appended to the incident's work notes journal.
    pub work_notes: String,
}

/// Fields for a new incident.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewIncident {
    pub short_description: String,
    pub u_host: String,
}

impl NewIncident {
    pub fn new(short_description: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            short_description: short_description.into(),
            u_host: host.into(),
        }
    }
}

/// Trait for ticketing system backends.
#[async_trait]
pub trait TicketSource: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// List incidents from the incident table.
    async fn list_incidents(&self) -> Result<Vec<Incident>, TicketingError>;

    /// Patch state, assignee and work notes of one incident.
    async fn update_incident(
        &self,
        sys_id: &str,
        update: &IncidentUpdate,
    ) -> Result<(), TicketingError>;

    /// Create a new incident, returning the stored record.
    async fn create_incident(&self, incident: &NewIncident) -> Result<Incident, TicketingError>;
}
