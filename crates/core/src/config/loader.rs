use std::collections::BTreeMap;

use figment::{
    providers::{Env, Serialized},
    Figment,
};
use serde::Deserialize;

use super::types::{
    default_timeout, AutomationConfig, ClassifierConfig, Config, LogFormat, TicketingConfig,
};
use super::ConfigError;
use crate::poller::PollerConfig;

/// Environment variables that must be present (and non-empty) at startup.
pub const REQUIRED_ENV_VARS: [&str; 10] = [
    "SNOW_URL",
    "SNOW_USER",
    "SNOW_PASS",
    "SNOW_ASSIGNED_TO",
    "ML_WS_URL",
    "AAP_URL",
    "AAP_USER",
    "AAP_PASS",
    "AAP_BASE_PATH",
    "AAP_WF_ID",
];

const OPTIONAL_ENV_VARS: [&str; 4] = [
    "TICKETFLOW_POLL_INTERVAL_SECS",
    "TICKETFLOW_POLL_JITTER_SECS",
    "TICKETFLOW_HTTP_TIMEOUT_SECS",
    "TICKETFLOW_LOG_FORMAT",
];

/// Raw view of the process environment. Everything is optional here so that
/// all missing variables can be reported at once.
#[derive(Debug, Default, Deserialize)]
struct EnvConfig {
    snow_url: Option<String>,
    snow_user: Option<String>,
    snow_pass: Option<String>,
    snow_assigned_to: Option<String>,
    ml_ws_url: Option<String>,
    aap_url: Option<String>,
    aap_user: Option<String>,
    aap_pass: Option<String>,
    aap_base_path: Option<String>,
    aap_wf_id: Option<String>,
    ticketflow_poll_interval_secs: Option<String>,
    ticketflow_poll_jitter_secs: Option<String>,
    ticketflow_http_timeout_secs: Option<String>,
    ticketflow_log_format: Option<String>,
}

/// Load configuration from the process environment.
pub fn load_config() -> Result<Config, ConfigError> {
    let keys: Vec<&str> = REQUIRED_ENV_VARS
        .iter()
        .chain(OPTIONAL_ENV_VARS.iter())
        .copied()
        .collect();

    load_config_from(Figment::from(Serialized::defaults(raw_env(&keys))))
}

/// Variables as the exact strings found in the environment, keyed by their
/// lowercased name. `Env` as a provider would coerce `007` to `7`.
fn raw_env(keys: &[&str]) -> BTreeMap<String, String> {
    Env::raw()
        .only(keys)
        .iter()
        .map(|(key, value)| (key.as_str().to_ascii_lowercase(), value))
        .collect()
}

/// Build configuration from an arbitrary figment (useful for testing)
pub fn load_config_from(figment: Figment) -> Result<Config, ConfigError> {
    let raw: EnvConfig = figment
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    let mut missing = Vec::new();
    // Blank counts as missing; present values are kept byte for byte.
    let mut required = |name: &str, value: Option<String>| -> String {
        match value {
            Some(v) if !v.trim().is_empty() => v,
            _ => {
                missing.push(name.to_string());
                String::new()
            }
        }
    };

    let snow_url = required("SNOW_URL", raw.snow_url);
    let snow_user = required("SNOW_USER", raw.snow_user);
    let snow_pass = required("SNOW_PASS", raw.snow_pass);
    let snow_assigned_to = required("SNOW_ASSIGNED_TO", raw.snow_assigned_to);
    let ml_ws_url = required("ML_WS_URL", raw.ml_ws_url);
    let aap_url = required("AAP_URL", raw.aap_url);
    let aap_user = required("AAP_USER", raw.aap_user);
    let aap_pass = required("AAP_PASS", raw.aap_pass);
    let aap_base_path = required("AAP_BASE_PATH", raw.aap_base_path);
    let aap_wf_id = required("AAP_WF_ID", raw.aap_wf_id);

    if !missing.is_empty() {
        return Err(ConfigError::MissingVariables(missing));
    }

    let defaults = PollerConfig::default();
    let poller = PollerConfig {
        interval_secs: parse_optional(
            "TICKETFLOW_POLL_INTERVAL_SECS",
            raw.ticketflow_poll_interval_secs,
        )?
        .unwrap_or(defaults.interval_secs),
        jitter_secs: parse_optional(
            "TICKETFLOW_POLL_JITTER_SECS",
            raw.ticketflow_poll_jitter_secs,
        )?
        .unwrap_or(defaults.jitter_secs),
    };

    let timeout_secs = parse_optional(
        "TICKETFLOW_HTTP_TIMEOUT_SECS",
        raw.ticketflow_http_timeout_secs,
    )?
    .unwrap_or_else(default_timeout);

    let log_format = match raw.ticketflow_log_format {
        Some(s) if !s.trim().is_empty() => s.parse::<LogFormat>().map_err(|e| {
            ConfigError::ParseError(format!("TICKETFLOW_LOG_FORMAT: {}", e))
        })?,
        _ => LogFormat::default(),
    };

    Ok(Config {
        ticketing: TicketingConfig {
            url: snow_url,
            username: snow_user,
            password: snow_pass,
            default_assignee: snow_assigned_to,
            timeout_secs,
        },
        classifier: ClassifierConfig {
            url: ml_ws_url,
            timeout_secs,
        },
        automation: AutomationConfig {
            url: aap_url,
            username: aap_user,
            password: aap_pass,
            base_path: aap_base_path,
            workflow_template_id: aap_wf_id,
            timeout_secs,
        },
        poller,
        log_format,
    })
}

fn parse_optional<T: std::str::FromStr>(
    name: &str,
    value: Option<String>,
) -> Result<Option<T>, ConfigError> {
    match value {
        Some(v) if !v.trim().is_empty() => v
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::ParseError(format!("{} is not a valid number: {}", name, v))),
        _ => Ok(None),
    }
}
