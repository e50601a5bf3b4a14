//! Mock ticketing system for testing.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::ticketing::{
    Incident, IncidentState, IncidentUpdate, NewIncident, TicketSource, TicketingError,
};

/// A recorded update for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedUpdate {
    pub sys_id: String,
    pub update: IncidentUpdate,
    /// Whether the mock accepted the update.
    pub accepted: bool,
}

/// In-memory implementation of the TicketSource trait.
///
/// Accepted updates are applied to the stored incidents, so a second pass
/// sees the new state just like it would against a real instance.
#[derive(Debug, Default)]
pub struct MockTicketSource {
    incidents: Arc<RwLock<Vec<Incident>>>,
    updates: Arc<RwLock<Vec<RecordedUpdate>>>,
    list_calls: AtomicUsize,
    created: AtomicUsize,
    /// If set, the next list call will fail with this error.
    next_list_error: Arc<RwLock<Option<TicketingError>>>,
    /// Updates for these sys_ids are rejected with HTTP 403.
    rejected_updates: Arc<RwLock<HashSet<String>>>,
}

impl MockTicketSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock preloaded with incidents.
    pub fn with_incidents(incidents: Vec<Incident>) -> Self {
        let source = Self::new();
        *source.incidents.try_write().expect("fresh lock") = incidents;
        source
    }

    pub async fn add_incident(&self, incident: Incident) {
        self.incidents.write().await.push(incident);
    }

    /// Current copy of an incident by sys_id.
    pub async fn incident(&self, sys_id: &str) -> Option<Incident> {
        self.incidents
            .read()
            .await
            .iter()
            .find(|i| i.sys_id == sys_id)
            .cloned()
    }

    pub async fn recorded_updates(&self) -> Vec<RecordedUpdate> {
        self.updates.read().await.clone()
    }

    pub async fn update_count(&self) -> usize {
        self.updates.read().await.len()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Configure the next list call to fail with the given error.
    pub async fn set_next_list_error(&self, error: TicketingError) {
        *self.next_list_error.write().await = Some(error);
    }

    /// Reject every update for this incident.
    pub async fn reject_updates_for(&self, sys_id: &str) {
        self.rejected_updates.write().await.insert(sys_id.to_string());
    }

    pub async fn accept_updates_for(&self, sys_id: &str) {
        self.rejected_updates.write().await.remove(sys_id);
    }
}

#[async_trait]
impl TicketSource for MockTicketSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn list_incidents(&self) -> Result<Vec<Incident>, TicketingError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(err) = self.next_list_error.write().await.take() {
            return Err(err);
        }

        Ok(self.incidents.read().await.clone())
    }

    async fn update_incident(
        &self,
        sys_id: &str,
        update: &IncidentUpdate,
    ) -> Result<(), TicketingError> {
        let rejected = self.rejected_updates.read().await.contains(sys_id);

        self.updates.write().await.push(RecordedUpdate {
            sys_id: sys_id.to_string(),
            update: update.clone(),
            accepted: !rejected,
        });

        if rejected {
            return Err(TicketingError::UnexpectedStatus {
                status: 403,
                body: "ACL rejected update".to_string(),
            });
        }

        let mut incidents = self.incidents.write().await;
        let incident = incidents
            .iter_mut()
            .find(|i| i.sys_id == sys_id)
            .ok_or_else(|| TicketingError::UnexpectedStatus {
                status: 404,
                body: format!("No Record found: {}", sys_id),
            })?;

        incident.state = update.state.clone();
        incident.assigned_to = Some(update.assigned_to.clone());
        if !incident.work_notes.is_empty() {
            incident.work_notes.push('\n');
        }
        incident.work_notes.push_str(&update.work_notes);
        Ok(())
    }

    async fn create_incident(&self, new: &NewIncident) -> Result<Incident, TicketingError> {
        let n = self.created.fetch_add(1, Ordering::SeqCst) + 1;
        let incident = Incident {
            sys_id: format!("mock-sys-{}", n),
            number: format!("INC{:07}", n),
            short_description: new.short_description.clone(),
            state: IncidentState::New,
            assigned_to: None,
            u_host: new.u_host.clone(),
            work_notes: String::new(),
        };

        self.incidents.write().await.push(incident.clone());
        Ok(incident)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[tokio::test]
    async fn test_update_applies_to_store() {
        let source =
            MockTicketSource::with_incidents(vec![fixtures::incident("s1", "INC1", "d", "h")]);

        let update = IncidentUpdate {
            state: IncidentState::InProgress,
            assigned_to: "me".to_string(),
            work_notes: "note".to_string(),
        };
        source.update_incident("s1", &update).await.unwrap();

        let stored = source.incident("s1").await.unwrap();
        assert_eq!(stored.state, IncidentState::InProgress);
        assert_eq!(stored.assigned_to.as_deref(), Some("me"));
        assert_eq!(stored.work_notes, "note");
        assert!(!stored.is_eligible());
    }

    #[tokio::test]
    async fn test_rejected_update_is_recorded() {
        let source =
            MockTicketSource::with_incidents(vec![fixtures::incident("s1", "INC1", "d", "h")]);
        source.reject_updates_for("s1").await;

        let update = IncidentUpdate {
            state: IncidentState::InProgress,
            assigned_to: "me".to_string(),
            work_notes: "note".to_string(),
        };
        let err = source.update_incident("s1", &update).await.unwrap_err();
        assert!(matches!(err, TicketingError::UnexpectedStatus { status: 403, .. }));

        let updates = source.recorded_updates().await;
        assert_eq!(updates.len(), 1);
        assert!(!updates[0].accepted);
        assert!(source.incident("s1").await.unwrap().is_eligible());
    }

    #[tokio::test]
    async fn test_list_error_is_one_shot() {
        let source = MockTicketSource::new();
        source.set_next_list_error(TicketingError::Timeout).await;

        assert!(source.list_incidents().await.is_err());
        assert!(source.list_incidents().await.is_ok());
        assert_eq!(source.list_calls(), 2);
    }
}
