//! Triage pass integration tests.
//!
//! These tests drive `TriagePipeline::run_pass` against the in-memory mocks
//! and check which external calls are (and are not) made for each incident.

use std::sync::Arc;

use ticketflow_core::{
    testing::{fixtures, MockClassifier, MockLauncher, MockTicketSource},
    AutomationLauncher, Classifier, IncidentOutcome, IncidentState, JobId, NewIncident,
    TicketSource, TicketingError, TriagePipeline, WORK_NOTES_PREFIX,
};

/// Test helper holding the mocks behind a pipeline.
struct TestHarness {
    tickets: Arc<MockTicketSource>,
    classifier: Arc<MockClassifier>,
    launcher: Arc<MockLauncher>,
    pipeline: TriagePipeline,
}

impl TestHarness {
    fn new(tickets: MockTicketSource) -> Self {
        Self::with_launcher(tickets, MockLauncher::new())
    }

    fn with_launcher(tickets: MockTicketSource, launcher: MockLauncher) -> Self {
        let tickets = Arc::new(tickets);
        let classifier = Arc::new(MockClassifier::new("general"));
        let launcher = Arc::new(launcher);

        let pipeline = TriagePipeline::new(
            Arc::clone(&tickets) as Arc<dyn TicketSource>,
            Arc::clone(&classifier) as Arc<dyn Classifier>,
            Arc::clone(&launcher) as Arc<dyn AutomationLauncher>,
            fixtures::settings(),
        );

        Self {
            tickets,
            classifier,
            launcher,
            pipeline,
        }
    }
}

#[tokio::test]
async fn test_disk_full_scenario() {
    let harness = TestHarness::with_launcher(
        MockTicketSource::with_incidents(vec![fixtures::incident(
            "sys-1", "INC001", "disk full", "node3",
        )]),
        MockLauncher::starting_at(42),
    );
    harness.classifier.set_category("disk full", "storage").await;

    let report = harness.pipeline.run_pass().await;

    assert!(report.is_clean());
    assert_eq!(report.eligible, 1);
    assert_eq!(report.updated, 1);

    let launches = harness.launcher.recorded_launches().await;
    assert_eq!(launches.len(), 1);
    assert_eq!(launches[0].request.ticket_number, "INC001");
    assert_eq!(launches[0].request.category, "storage");
    assert_eq!(launches[0].request.host, "node3");
    assert_eq!(launches[0].job_id, Some(JobId::Numeric(42)));

    let updates = harness.tickets.recorded_updates().await;
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].sys_id, "sys-1");
    assert_eq!(updates[0].update.state, IncidentState::InProgress);
    assert_eq!(updates[0].update.state.code(), "2");
    assert_eq!(updates[0].update.assigned_to, fixtures::DEFAULT_ASSIGNEE);
    assert_eq!(
        updates[0].update.work_notes,
        format!("{}storage", WORK_NOTES_PREFIX)
    );
    assert!(updates[0].update.work_notes.ends_with("classified the ticket as: storage"));
}

#[tokio::test]
async fn test_ineligible_incidents_are_untouched() {
    let harness = TestHarness::new(MockTicketSource::with_incidents(vec![
        fixtures::assigned_incident("sys-1", "INC001", "someone"),
        fixtures::incident_in_state("sys-2", "INC002", IncidentState::InProgress),
        fixtures::incident_in_state("sys-3", "INC003", IncidentState::Resolved),
        fixtures::incident_in_state("sys-4", "INC004", IncidentState::Other("99".into())),
    ]));

    let report = harness.pipeline.run_pass().await;

    assert_eq!(report.listed, 4);
    assert_eq!(report.eligible, 0);
    assert_eq!(harness.classifier.request_count().await, 0);
    assert_eq!(harness.launcher.launch_count().await, 0);
    assert_eq!(harness.tickets.update_count().await, 0);
}

#[tokio::test]
async fn test_empty_list_makes_no_downstream_calls() {
    let harness = TestHarness::new(MockTicketSource::new());

    let report = harness.pipeline.run_pass().await;

    assert!(report.is_clean());
    assert_eq!(report.listed, 0);
    assert_eq!(harness.tickets.list_calls(), 1);
    assert_eq!(harness.classifier.request_count().await, 0);
    assert_eq!(harness.launcher.launch_count().await, 0);
    assert_eq!(harness.tickets.update_count().await, 0);
}

#[tokio::test]
async fn test_list_failure_yields_empty_pass() {
    let tickets = MockTicketSource::with_incidents(vec![fixtures::incident(
        "sys-1", "INC001", "disk full", "node3",
    )]);
    tickets
        .set_next_list_error(TicketingError::UnexpectedStatus {
            status: 500,
            body: "Internal Server Error".to_string(),
        })
        .await;
    let harness = TestHarness::new(tickets);

    let report = harness.pipeline.run_pass().await;

    assert!(report.list_error.as_deref().unwrap().contains("500"));
    assert_eq!(report.listed, 0);
    assert_eq!(harness.classifier.request_count().await, 0);

    // Next pass works normally
    let report = harness.pipeline.run_pass().await;
    assert!(report.is_clean());
    assert_eq!(report.updated, 1);
}

#[tokio::test]
async fn test_update_failure_does_not_stop_pass() {
    let tickets = MockTicketSource::with_incidents(vec![
        fixtures::incident("sys-1", "INC001", "disk full", "node3"),
        fixtures::incident("sys-2", "INC002", "web slow", "node1"),
    ]);
    tickets.reject_updates_for("sys-1").await;
    let harness = TestHarness::new(tickets);

    let report = harness.pipeline.run_pass().await;

    assert_eq!(report.eligible, 2);
    assert_eq!(report.launched, 2);
    assert_eq!(report.update_failures, 1);
    assert_eq!(report.updated, 1);
    assert!(report.aborted.is_none());

    let updates = harness.tickets.recorded_updates().await;
    assert_eq!(updates.len(), 2);
    assert!(!updates[0].accepted);
    assert!(updates[1].accepted);
}

#[tokio::test]
async fn test_failed_update_is_reprocessed_next_pass() {
    let tickets = MockTicketSource::with_incidents(vec![fixtures::incident(
        "sys-1", "INC001", "disk full", "node3",
    )]);
    tickets.reject_updates_for("sys-1").await;
    let harness = TestHarness::new(tickets);

    harness.pipeline.run_pass().await;
    harness.tickets.accept_updates_for("sys-1").await;
    let report = harness.pipeline.run_pass().await;

    assert_eq!(report.updated, 1);
    assert_eq!(harness.launcher.launch_count().await, 2);

    // Third pass sees the ticket in progress and leaves it alone
    let report = harness.pipeline.run_pass().await;
    assert_eq!(report.eligible, 0);
    assert_eq!(harness.launcher.launch_count().await, 2);
}

#[tokio::test]
async fn test_launch_failure_aborts_pass_before_update() {
    let tickets = MockTicketSource::with_incidents(vec![
        fixtures::incident("sys-1", "INC001", "disk full", "node3"),
        fixtures::incident("sys-2", "INC002", "web slow", "node1"),
    ]);
    let harness = TestHarness::new(tickets);
    harness.launcher.reject_ticket("INC001").await;

    let report = harness.pipeline.run_pass().await;

    assert!(report.aborted.as_deref().unwrap().starts_with("INC001"));
    assert_eq!(report.eligible, 1);
    assert_eq!(report.launched, 0);
    assert_eq!(harness.tickets.update_count().await, 0);
    // INC002 was never reached
    assert_eq!(harness.classifier.recorded_requests().await, vec!["disk full"]);
}

#[tokio::test]
async fn test_missing_category_skips_only_that_incident() {
    let tickets = MockTicketSource::with_incidents(vec![
        fixtures::incident("sys-1", "INC001", "???", "node3"),
        fixtures::incident("sys-2", "INC002", "web slow", "node1"),
    ]);
    let harness = TestHarness::new(tickets);
    harness.classifier.fail_on("???").await;
    harness.classifier.set_category("web slow", "application").await;

    let report = harness.pipeline.run_pass().await;

    assert_eq!(report.skipped, 1);
    assert_eq!(report.updated, 1);
    assert!(report.aborted.is_none());

    let launches = harness.launcher.recorded_launches().await;
    assert_eq!(launches.len(), 1);
    assert_eq!(launches[0].request.ticket_number, "INC002");

    // Skipped incident is still eligible for the next poll
    assert!(harness.tickets.incident("sys-1").await.unwrap().is_eligible());
}

#[tokio::test]
async fn test_process_incident_outcome() {
    let harness = TestHarness::new(MockTicketSource::with_incidents(vec![fixtures::incident(
        "sys-1", "INC001", "disk full", "node3",
    )]));
    let incident = fixtures::incident("sys-1", "INC001", "disk full", "node3");

    let outcome = harness.pipeline.process_incident(&incident).await.unwrap();
    assert_eq!(
        outcome,
        IncidentOutcome::Updated {
            job_id: JobId::Numeric(1),
            category: "general".to_string(),
        }
    );
}

#[tokio::test]
async fn test_launch_forwards_ticketing_credentials() {
    let harness = TestHarness::new(MockTicketSource::with_incidents(vec![fixtures::incident(
        "sys-1", "INC001", "disk full", "node3",
    )]));

    harness.pipeline.run_pass().await;

    let launches = harness.launcher.recorded_launches().await;
    assert_eq!(launches[0].request.callback, fixtures::settings().callback);
}

#[tokio::test]
async fn test_created_incident_is_listed() {
    let tickets = MockTicketSource::new();

    let created = tickets
        .create_incident(&NewIncident::new("Website performance degraded", "node1"))
        .await
        .unwrap();
    assert!(!created.sys_id.is_empty());

    let listed = tickets.list_incidents().await.unwrap();
    let found = listed.iter().find(|i| i.sys_id == created.sys_id).unwrap();
    assert_eq!(found.number, created.number);
    assert_eq!(found.u_host, "node1");
    assert!(found.is_eligible());
}
