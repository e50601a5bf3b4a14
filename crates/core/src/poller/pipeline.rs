//! One poll pass: list → classify → launch → update.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::automation::{AutomationLauncher, LaunchRequest};
use crate::classifier::Classifier;
use crate::ticketing::{Incident, IncidentState, IncidentUpdate, TicketSource};

use super::config::TriageSettings;
use super::types::{IncidentOutcome, PassReport, PipelineError};

/// Wires the three external systems together for a single pass.
pub struct TriagePipeline {
    ticket_source: Arc<dyn TicketSource>,
    classifier: Arc<dyn Classifier>,
    launcher: Arc<dyn AutomationLauncher>,
    settings: TriageSettings,
}

impl TriagePipeline {
    pub fn new(
        ticket_source: Arc<dyn TicketSource>,
        classifier: Arc<dyn Classifier>,
        launcher: Arc<dyn AutomationLauncher>,
        settings: TriageSettings,
    ) -> Self {
        Self {
            ticket_source,
            classifier,
            launcher,
            settings,
        }
    }

    /// Run one pass over the incident table.
    ///
    /// Never fails: listing errors yield an empty pass, per-incident errors are
    /// counted, and a failed launch ends the pass early. Everything is recorded
    /// in the returned report.
    pub async fn run_pass(&self) -> PassReport {
        let mut report = PassReport::started(Utc::now());
        info!(source = self.ticket_source.name(), "Starting poll pass");

        let incidents = match self.ticket_source.list_incidents().await {
            Ok(incidents) => incidents,
            Err(e) => {
                error!(error = %e, "Failed to list incidents");
                report.list_error = Some(e.to_string());
                report.finished_at = Utc::now();
                return report;
            }
        };
        report.listed = incidents.len();

        for incident in incidents.iter().filter(|i| i.is_eligible()) {
            report.eligible += 1;

            match self.process_incident(incident).await {
                Ok(IncidentOutcome::Updated { .. }) => {
                    report.launched += 1;
                    report.updated += 1;
                }
                Ok(IncidentOutcome::UpdateFailed { .. }) => {
                    report.launched += 1;
                    report.update_failures += 1;
                }
                Err(e) if e.aborts_pass() => {
                    error!(
                        ticket = %incident.number,
                        error = %e,
                        "Workflow launch failed, abandoning this pass"
                    );
                    report.aborted = Some(format!("{}: {}", incident.number, e));
                    break;
                }
                Err(e) => {
                    warn!(ticket = %incident.number, error = %e, "Skipping incident");
                    report.skipped += 1;
                }
            }
        }

        report.finished_at = Utc::now();
        info!(
            listed = report.listed,
            eligible = report.eligible,
            launched = report.launched,
            updated = report.updated,
            update_failures = report.update_failures,
            skipped = report.skipped,
            aborted = report.aborted.is_some(),
            "Poll pass complete"
        );
        report
    }

    /// Classify, launch and update a single eligible incident.
    ///
    /// A rejected ticket update is an outcome, not an error: the workflow is
    /// already running by then.
    pub async fn process_incident(
        &self,
        incident: &Incident,
    ) -> Result<IncidentOutcome, PipelineError> {
        info!(
            ticket = %incident.number,
            description = %incident.short_description,
            host = %incident.u_host,
            "Processing incident"
        );

        let classification = self
            .classifier
            .classify(&incident.short_description)
            .await?;
        info!(
            ticket = %incident.number,
            category = %classification.category,
            "The ticket has been classified"
        );

        let request = LaunchRequest {
            ticket_number: incident.number.clone(),
            category: classification.category.clone(),
            host: incident.u_host.clone(),
            callback: self.settings.callback.clone(),
        };
        let job_id = self.launcher.launch_workflow(&request).await?;
        debug!(ticket = %incident.number, job_id = %job_id, "Workflow running");

        let update = IncidentUpdate {
            state: IncidentState::InProgress,
            assigned_to: self.settings.default_assignee.clone(),
            work_notes: self.settings.work_notes_for(&classification.category),
        };

        match self
            .ticket_source
            .update_incident(&incident.sys_id, &update)
            .await
        {
            Ok(()) => {
                info!(ticket = %incident.number, "Update was successful.");
                Ok(IncidentOutcome::Updated {
                    job_id,
                    category: classification.category,
                })
            }
            Err(e) => {
                warn!(ticket = %incident.number, error = %e, "Update failed.");
                Ok(IncidentOutcome::UpdateFailed {
                    job_id,
                    category: classification.category,
                    error: e.to_string(),
                })
            }
        }
    }
}
