use reqwest::Url;

use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Every service URL parses and is http(s)
/// - Workflow template id is numeric
/// - Poll interval and HTTP timeout are not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    check_url("SNOW_URL", &config.ticketing.url)?;
    check_url("ML_WS_URL", &config.classifier.url)?;
    check_url("AAP_URL", &config.automation.url)?;

    if config.automation.workflow_template_id.parse::<u64>().is_err() {
        return Err(ConfigError::ValidationError(format!(
            "AAP_WF_ID must be a numeric template id, got '{}'",
            config.automation.workflow_template_id
        )));
    }

    if config.poller.interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "poll interval cannot be 0".to_string(),
        ));
    }

    if config.ticketing.timeout_secs == 0
        || config.classifier.timeout_secs == 0
        || config.automation.timeout_secs == 0
    {
        return Err(ConfigError::ValidationError(
            "HTTP timeout cannot be 0".to_string(),
        ));
    }

    Ok(())
}

fn check_url(name: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::ValidationError(format!("{} is not a valid URL: {}", name, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::ValidationError(format!(
            "{} must use http or https, got '{}'",
            name, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AutomationConfig, ClassifierConfig, LogFormat, TicketingConfig};
    use crate::poller::PollerConfig;

    fn valid_config() -> Config {
        Config {
            ticketing: TicketingConfig {
                url: "https://dev1.service-now.com".to_string(),
                username: "admin".to_string(),
                password: "secret".to_string(),
                default_assignee: "abc123".to_string(),
                timeout_secs: 30,
            },
            classifier: ClassifierConfig {
                url: "http://classifier:8080/predict".to_string(),
                timeout_secs: 30,
            },
            automation: AutomationConfig {
                url: "https://aap.example.com".to_string(),
                username: "automation".to_string(),
                password: "secret".to_string(),
                base_path: "/api".to_string(),
                workflow_template_id: "9".to_string(),
                timeout_secs: 30,
            },
            poller: PollerConfig::default(),
            log_format: LogFormat::Text,
        }
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_validate_bad_url_fails() {
        let mut config = valid_config();
        config.classifier.url = "classifier:8080".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));

        let mut config = valid_config();
        config.ticketing.url = "not a url".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_non_numeric_template_fails() {
        let mut config = valid_config();
        config.automation.workflow_template_id = "remediate".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("AAP_WF_ID"));
    }

    #[test]
    fn test_validate_zero_interval_fails() {
        let mut config = valid_config();
        config.poller.interval_secs = 0;
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validate_zero_timeout_fails() {
        let mut config = valid_config();
        config.automation.timeout_secs = 0;
        assert!(validate_config(&config).is_err());
    }
}
