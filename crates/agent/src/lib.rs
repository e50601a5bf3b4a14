//! Shared pieces of the ticketflow binaries.

pub mod logging;
pub mod signal;
