pub mod automation;
pub mod classifier;
pub mod config;
pub mod poller;
pub mod testing;
pub mod ticketing;

pub use automation::{
    AutomationError, AutomationLauncher, ControllerClient, JobId, LaunchRequest,
    TicketingCallback,
};
pub use classifier::{Classification, Classifier, ClassifierError, HttpClassifier};
pub use config::{
    load_config, load_config_from, validate_config, Config, ConfigError, LogFormat,
    SanitizedConfig,
};
pub use poller::{
    IncidentOutcome, PassReport, PipelineError, PollerConfig, Scheduler, SchedulerState,
    TriagePipeline, TriageSettings, WORK_NOTES_PREFIX,
};
pub use ticketing::{
    Incident, IncidentState, IncidentUpdate, NewIncident, ServiceNowClient, TicketSource,
    TicketingError,
};
