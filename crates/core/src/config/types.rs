use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::poller::PollerConfig;

/// Root configuration, built once at startup.
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    pub ticketing: TicketingConfig,
    pub classifier: ClassifierConfig,
    pub automation: AutomationConfig,
    pub poller: PollerConfig,
    pub log_format: LogFormat,
}

/// ServiceNow instance configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TicketingConfig {
    /// Instance URL (e.g., "https://dev12345.service-now.com")
    pub url: String,
    pub username: String,
    pub password: String,
    /// sys_id of the user that processed incidents get assigned to
    pub default_assignee: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

/// Classification web service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClassifierConfig {
    /// Full endpoint URL, the description is POSTed here
    pub url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

/// Automation controller (AAP / AWX) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AutomationConfig {
    /// Controller URL (e.g., "https://aap.example.com")
    pub url: String,
    pub username: String,
    pub password: String,
    /// API base path: "/api/controller/" on AAP 2.5, "/api" on AAP 2.4
    pub base_path: String,
    /// Workflow job template to launch
    pub workflow_template_id: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

pub(crate) fn default_timeout() -> u32 {
    30
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}' (expected text or json)", other)),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

/// Sanitized config for logging (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub ticketing: SanitizedTicketingConfig,
    pub classifier: ClassifierConfig,
    pub automation: SanitizedAutomationConfig,
    pub poller: PollerConfig,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedTicketingConfig {
    pub url: String,
    pub username: String,
    pub password_configured: bool,
    pub default_assignee: String,
    pub timeout_secs: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedAutomationConfig {
    pub url: String,
    pub username: String,
    pub password_configured: bool,
    pub base_path: String,
    pub workflow_template_id: String,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            ticketing: SanitizedTicketingConfig {
                url: config.ticketing.url.clone(),
                username: config.ticketing.username.clone(),
                password_configured: !config.ticketing.password.is_empty(),
                default_assignee: config.ticketing.default_assignee.clone(),
                timeout_secs: config.ticketing.timeout_secs,
            },
            classifier: config.classifier.clone(),
            automation: SanitizedAutomationConfig {
                url: config.automation.url.clone(),
                username: config.automation.username.clone(),
                password_configured: !config.automation.password.is_empty(),
                base_path: config.automation.base_path.clone(),
                workflow_template_id: config.automation.workflow_template_id.clone(),
                timeout_secs: config.automation.timeout_secs,
            },
            poller: config.poller.clone(),
            log_format: config.log_format,
        }
    }
}
