//! Ticketing system abstraction.
//!
//! This module provides a `TicketSource` trait for reading and patching
//! incidents, with a ServiceNow table API implementation.

mod servicenow;
mod types;

pub use servicenow::ServiceNowClient;
pub use types::*;
