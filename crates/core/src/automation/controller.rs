//! Automation controller (AAP / AWX) client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::AutomationConfig;

use super::{AutomationError, AutomationLauncher, JobId, LaunchBody, LaunchRequest};

/// Launches workflow job templates through the controller REST API.
pub struct ControllerClient {
    client: Client,
    config: AutomationConfig,
}

impl ControllerClient {
    pub fn new(config: AutomationConfig) -> Result<Self, AutomationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        Ok(Self { client, config })
    }

    /// `{url}/{base_path}/v2/workflow_job_templates/{id}/launch/` with the
    /// slashes between segments collapsed.
    fn launch_url(&self) -> String {
        let base = self.config.url.trim_end_matches('/');
        let base_path = self.config.base_path.trim_matches('/');
        let template = self.config.workflow_template_id.trim();

        if base_path.is_empty() {
            format!("{}/v2/workflow_job_templates/{}/launch/", base, template)
        } else {
            format!(
                "{}/{}/v2/workflow_job_templates/{}/launch/",
                base, base_path, template
            )
        }
    }
}

#[async_trait]
impl AutomationLauncher for ControllerClient {
    fn name(&self) -> &str {
        "controller"
    }

    async fn launch_workflow(&self, request: &LaunchRequest) -> Result<JobId, AutomationError> {
        let url = self.launch_url();
        debug!(
            url = %url,
            ticket = %request.ticket_number,
            category = %request.category,
            limit = %request.host,
            "Launching workflow job template"
        );

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .json(&LaunchBody::from(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AutomationError::UnexpectedStatus {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AutomationError::InvalidResponse(e.to_string()))?;

        let job_id = match body.get("id") {
            Some(Value::Number(n)) => n
                .as_u64()
                .map(JobId::Numeric)
                .ok_or_else(|| AutomationError::InvalidResponse(format!("job id {}", n)))?,
            Some(Value::String(s)) if !s.is_empty() => JobId::Text(s.clone()),
            _ => return Err(AutomationError::MissingJobId),
        };

        info!(job_id = %job_id, ticket = %request.ticket_number, "Workflow job launched");
        Ok(job_id)
    }
}
