//! ServiceNow table API client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::config::TicketingConfig;

use super::{Incident, IncidentUpdate, NewIncident, TicketSource, TicketingError};

/// Envelope used by every table API response.
#[derive(Debug, Deserialize)]
struct TableResponse<T> {
    result: Option<T>,
}

/// ServiceNow client for the `incident` table.
pub struct ServiceNowClient {
    client: Client,
    config: TicketingConfig,
}

impl ServiceNowClient {
    /// Create a new ServiceNow client.
    pub fn new(config: TicketingConfig) -> Result<Self, TicketingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the base URL without trailing slash.
    fn base_url(&self) -> &str {
        self.config.url.trim_end_matches('/')
    }

    fn table_url(&self) -> String {
        format!("{}/api/now/table/incident", self.base_url())
    }

    fn incident_url(&self, sys_id: &str) -> String {
        format!("{}/{}", self.table_url(), urlencoding::encode(sys_id))
    }

    /// Turn anything but `expected` into an `UnexpectedStatus` error.
    async fn expect_status(
        response: Response,
        expected: StatusCode,
    ) -> Result<Response, TicketingError> {
        let status = response.status();
        if status == expected {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(TicketingError::UnexpectedStatus {
            status: status.as_u16(),
            body: body.chars().take(200).collect(),
        })
    }
}

#[async_trait]
impl TicketSource for ServiceNowClient {
    fn name(&self) -> &str {
        "servicenow"
    }

    async fn list_incidents(&self) -> Result<Vec<Incident>, TicketingError> {
        let url = self.table_url();
        debug!(url = %url, "Listing ServiceNow incidents");

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .header("Accept", "application/json")
            .send()
            .await?;

        let response = Self::expect_status(response, StatusCode::OK).await?;

        let body: TableResponse<Vec<Incident>> = response.json().await.map_err(|e| {
            TicketingError::InvalidResponse(format!("Failed to parse incident list: {}", e))
        })?;

        let incidents = body.result.unwrap_or_default();
        debug!(count = incidents.len(), "ServiceNow incidents listed");
        Ok(incidents)
    }

    async fn update_incident(
        &self,
        sys_id: &str,
        update: &IncidentUpdate,
    ) -> Result<(), TicketingError> {
        let url = self.incident_url(sys_id);
        debug!(sys_id = sys_id, state = update.state.code(), "Updating ServiceNow incident");

        let response = self
            .client
            .patch(&url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .header("Accept", "application/json")
            .json(update)
            .send()
            .await?;

        Self::expect_status(response, StatusCode::OK).await?;
        Ok(())
    }

    async fn create_incident(&self, incident: &NewIncident) -> Result<Incident, TicketingError> {
        let url = self.table_url();
        debug!(host = %incident.u_host, "Creating ServiceNow incident");

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .header("Accept", "application/json")
            .json(incident)
            .send()
            .await?;

        let response = Self::expect_status(response, StatusCode::CREATED).await?;

        let body: TableResponse<Incident> = response.json().await.map_err(|e| {
            TicketingError::InvalidResponse(format!("Failed to parse created incident: {}", e))
        })?;

        body.result.ok_or_else(|| {
            TicketingError::InvalidResponse("create response has no result".to_string())
        })
    }
}
