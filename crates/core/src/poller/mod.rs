//! Poll loop for incident triage.
//!
//! Every pass lists incidents, picks the new and unassigned ones, has each
//! description classified, launches the remediation workflow and writes the
//! result back to the ticket. Passes run sequentially on a fixed interval.

mod config;
mod pipeline;
mod scheduler;
mod types;

pub use config::{PollerConfig, TriageSettings, WORK_NOTES_PREFIX};
pub use pipeline::TriagePipeline;
pub use scheduler::{Scheduler, SchedulerState};
pub use types::{IncidentOutcome, PassReport, PipelineError};
