//! Creates demo incidents so the poll loop has something to work on.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{error, info};

use ticketflow_agent::logging;
use ticketflow_core::{config::TicketingConfig, NewIncident, ServiceNowClient, TicketSource};

#[derive(Debug, Parser)]
#[command(name = "ticketflow-seed", version, about = "Create demo incidents in ServiceNow")]
struct Cli {
    /// ServiceNow instance URL
    #[arg(long, env = "SNOW_URL")]
    snow_url: String,

    #[arg(long, env = "SNOW_USER")]
    snow_user: String,

    #[arg(long, env = "SNOW_PASS", hide_env_values = true)]
    snow_pass: String,

    /// Incident to create, as "<description>@<host>" (repeatable)
    #[arg(long = "incident", value_name = "DESCRIPTION@HOST", value_parser = parse_incident)]
    incidents: Vec<NewIncident>,

    /// JSON file with an array of {"short_description", "u_host"} objects
    #[arg(long, conflicts_with = "incidents")]
    file: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u32,
}

fn parse_incident(value: &str) -> Result<NewIncident, String> {
    match value.rsplit_once('@') {
        Some((description, host)) if !description.trim().is_empty() && !host.trim().is_empty() => {
            Ok(NewIncident::new(description.trim(), host.trim()))
        }
        _ => Err(format!("expected \"<description>@<host>\", got \"{}\"", value)),
    }
}

fn load_incidents(path: &Path) -> Result<Vec<NewIncident>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {:?}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {:?}", path))
}

fn demo_incidents() -> Vec<NewIncident> {
    vec![
        NewIncident::new(
            "Database performance is degraded in the test environment, maybe it's a network congestion or storage latency, please investigate",
            "node2",
        ),
        NewIncident::new(
            "Virtual machine 'develop15' failing due to insufficient disk space. Please do cleanup or archival actions or evaluate storage expansion options.",
            "node3",
        ),
        NewIncident::new(
            "Website performance is significantly degraded after upgrade, please rollback to the previous version and investigate the issue.",
            "node1",
        ),
    ]
}

#[tokio::main]
async fn main() {
    if let Err(e) = run(Cli::parse()).await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    logging::init(logging::format_from_env());

    let incidents = match (&cli.file, cli.incidents.is_empty()) {
        (Some(path), _) => load_incidents(path)?,
        (None, false) => cli.incidents.clone(),
        (None, true) => demo_incidents(),
    };

    let client = ServiceNowClient::new(TicketingConfig {
        url: cli.snow_url.clone(),
        username: cli.snow_user.clone(),
        password: cli.snow_pass.clone(),
        default_assignee: String::new(),
        timeout_secs: cli.timeout_secs,
    })
    .context("Failed to create ServiceNow client")?;

    let total = incidents.len();
    let mut failed = 0;
    for incident in &incidents {
        match client.create_incident(incident).await {
            Ok(created) => info!(
                sys_id = %created.sys_id,
                number = %created.number,
                host = %created.u_host,
                "Incident created successfully"
            ),
            Err(e) => {
                error!(host = %incident.u_host, error = %e, "Error creating incident");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} incidents could not be created", failed, total);
    }

    info!(count = total, "Seeding complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_incident() {
        let incident = parse_incident("disk full on /var @ node3").unwrap();
        assert_eq!(incident.short_description, "disk full on /var");
        assert_eq!(incident.u_host, "node3");

        // Only the last '@' separates the host
        let incident = parse_incident("mail to ops@example.com bounces@mx1").unwrap();
        assert_eq!(incident.short_description, "mail to ops@example.com bounces");
        assert_eq!(incident.u_host, "mx1");

        assert!(parse_incident("no host here").is_err());
        assert!(parse_incident("@node1").is_err());
        assert!(parse_incident("description@").is_err());
    }

    #[test]
    fn test_cli_collects_repeated_incidents() {
        let cli = Cli::try_parse_from([
            "ticketflow-seed",
            "--snow-url",
            "https://dev1.service-now.com",
            "--snow-user",
            "admin",
            "--snow-pass",
            "secret",
            "--incident",
            "disk full@node3",
            "--incident",
            "web slow@node1",
        ])
        .unwrap();
        assert_eq!(cli.incidents.len(), 2);
        assert_eq!(cli.incidents[1].u_host, "node1");
        assert_eq!(cli.timeout_secs, 30);
    }

    #[test]
    fn test_file_conflicts_with_incident_flags() {
        let result = Cli::try_parse_from([
            "ticketflow-seed",
            "--snow-url",
            "https://dev1.service-now.com",
            "--snow-user",
            "admin",
            "--snow-pass",
            "secret",
            "--incident",
            "disk full@node3",
            "--file",
            "incidents.json",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_incidents_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"[
                {{"short_description": "disk full", "u_host": "node3"}},
                {{"short_description": "web slow", "u_host": "node1"}}
            ]"#
        )
        .unwrap();

        let incidents = load_incidents(file.path()).unwrap();
        assert_eq!(incidents.len(), 2);
        assert_eq!(incidents[0], NewIncident::new("disk full", "node3"));
    }

    #[test]
    fn test_load_incidents_bad_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not json").unwrap();
        assert!(load_incidents(file.path()).is_err());
    }

    #[test]
    fn test_demo_incidents_have_hosts() {
        let demo = demo_incidents();
        assert_eq!(demo.len(), 3);
        assert!(demo.iter().all(|i| !i.u_host.is_empty()));
    }
}
