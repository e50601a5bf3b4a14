use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};

use ticketflow_agent::{logging, signal::shutdown_signal};
use ticketflow_core::{
    load_config, validate_config, AutomationLauncher, Classifier, ControllerClient,
    HttpClassifier, SanitizedConfig, Scheduler, ServiceNowClient, TicketSource, TriagePipeline,
    TriageSettings,
};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    logging::init(logging::format_from_env());
    info!(version = VERSION, "Starting ticketflow");

    let config = load_config().context("Failed to load configuration from environment")?;
    validate_config(&config).context("Configuration validation failed")?;

    let sanitized = SanitizedConfig::from(&config);
    info!(
        config = %serde_json::to_string(&sanitized).unwrap_or_default(),
        "Configuration loaded successfully"
    );

    let ticket_source: Arc<dyn TicketSource> = Arc::new(
        ServiceNowClient::new(config.ticketing.clone())
            .context("Failed to create ServiceNow client")?,
    );
    info!("Ticketing client initialized ({})", config.ticketing.url);

    let classifier: Arc<dyn Classifier> = Arc::new(
        HttpClassifier::new(config.classifier.clone())
            .context("Failed to create classifier client")?,
    );
    info!("Classifier client initialized ({})", config.classifier.url);

    let launcher: Arc<dyn AutomationLauncher> = Arc::new(
        ControllerClient::new(config.automation.clone())
            .context("Failed to create automation controller client")?,
    );
    info!(
        "Automation client initialized ({}, workflow template {})",
        config.automation.url, config.automation.workflow_template_id
    );

    let pipeline = TriagePipeline::new(
        ticket_source,
        classifier,
        launcher,
        TriageSettings::from_config(&config),
    );
    let scheduler = Scheduler::new(Arc::new(pipeline), config.poller.clone());

    let passes = scheduler.run(shutdown_signal()).await;
    info!(passes = passes, "ticketflow stopped");

    Ok(())
}
