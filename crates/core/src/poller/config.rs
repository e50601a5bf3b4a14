//! Poller configuration.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::automation::TicketingCallback;
use crate::config::Config;

/// Work notes prefix written to every processed incident; the category is appended.
pub const WORK_NOTES_PREFIX: &str = "Ansible Automation Platform is now working on the ticket resolution. AI/ML model classified the ticket as: ";

/// Configuration for the poll loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollerConfig {
    /// Pause between the end of one pass and the start of the next (seconds).
    #[serde(default = "default_interval")]
    pub interval_secs: u64,

    /// Upper bound of a random delay added to each pause (seconds, 0 = none).
    #[serde(default)]
    pub jitter_secs: u64,
}

fn default_interval() -> u64 {
    60
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval(),
            jitter_secs: 0,
        }
    }
}

impl PollerConfig {
    /// Delay before the next pass, jitter included.
    pub fn next_delay(&self) -> Duration {
        let base = Duration::from_secs(self.interval_secs);
        if self.jitter_secs == 0 {
            return base;
        }

        let jitter_ms = rand::thread_rng().gen_range(0..=self.jitter_secs * 1000);
        base + Duration::from_millis(jitter_ms)
    }
}

/// What the pipeline writes back and forwards, fixed for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriageSettings {
    /// User every processed incident is assigned to.
    pub default_assignee: String,
    pub work_notes_prefix: String,
    pub callback: TicketingCallback,
}

impl TriageSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            default_assignee: config.ticketing.default_assignee.clone(),
            work_notes_prefix: WORK_NOTES_PREFIX.to_string(),
            callback: TicketingCallback::from(&config.ticketing),
        }
    }

    pub fn work_notes_for(&self, category: &str) -> String {
        format!("{}{}", self.work_notes_prefix, category)
    }
}
