//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the external service traits,
//! allowing the pipeline to be exercised without ServiceNow, a model server
//! or an automation controller.
//!
//! # Example
//!
//! ```rust,ignore
//! use ticketflow_core::testing::{fixtures, MockClassifier, MockLauncher, MockTicketSource};
//!
//! let tickets = MockTicketSource::with_incidents(vec![
//!     fixtures::incident("s1", "INC001", "disk full", "node3"),
//! ]);
//! let classifier = MockClassifier::new("storage");
//! let launcher = MockLauncher::new();
//!
//! // Build a TriagePipeline from the mocks and run a pass...
//! ```

mod mock_classifier;
mod mock_launcher;
mod mock_ticket_source;

pub use mock_classifier::MockClassifier;
pub use mock_launcher::{MockLauncher, RecordedLaunch};
pub use mock_ticket_source::{MockTicketSource, RecordedUpdate};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::automation::TicketingCallback;
    use crate::poller::{TriageSettings, WORK_NOTES_PREFIX};
    use crate::ticketing::{Incident, IncidentState};

    /// Default assignee used by [`settings`].
    pub const DEFAULT_ASSIGNEE: &str = "6816f79cc0a8016401c5a33be04be441";

    /// A new, unassigned incident.
    pub fn incident(sys_id: &str, number: &str, description: &str, host: &str) -> Incident {
        Incident {
            sys_id: sys_id.to_string(),
            number: number.to_string(),
            short_description: description.to_string(),
            state: IncidentState::New,
            assigned_to: None,
            u_host: host.to_string(),
            work_notes: String::new(),
        }
    }

    /// A new incident that already has an assignee.
    pub fn assigned_incident(sys_id: &str, number: &str, assignee: &str) -> Incident {
        let mut incident = incident(sys_id, number, "already taken", "node1");
        incident.assigned_to = Some(assignee.to_string());
        incident
    }

    /// An unassigned incident in the given state.
    pub fn incident_in_state(sys_id: &str, number: &str, state: IncidentState) -> Incident {
        let mut incident = incident(sys_id, number, "in flight", "node1");
        incident.state = state;
        incident
    }

    /// Pipeline settings with a fixed assignee and test credentials.
    pub fn settings() -> TriageSettings {
        TriageSettings {
            default_assignee: DEFAULT_ASSIGNEE.to_string(),
            work_notes_prefix: WORK_NOTES_PREFIX.to_string(),
            callback: TicketingCallback {
                instance: "https://dev1.service-now.com".to_string(),
                user: "admin".to_string(),
                password: "secret".to_string(),
            },
        }
    }
}
