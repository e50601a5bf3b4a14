//! Text classification client.
//!
//! Incident descriptions are sent to an external model service which answers
//! with a category label. The category later selects what the automation
//! workflow does.

mod http;
mod types;

pub use http::HttpClassifier;
pub use types::*;
