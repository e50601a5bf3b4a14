//! Automation platform integration.
//!
//! Launches a workflow job template on the automation controller, passing
//! the incident number, its category and ticketing credentials so the
//! workflow can report back on the ticket.

mod controller;
mod types;

pub use controller::ControllerClient;
pub use types::*;
