//! Typed error definitions for the classifier.
//!
//! Errors here are the ones that cross the core boundary. Anything that can
//! be degraded into a valid result (unparseable model output, a single
//! failed credential, a product without ingredient text) never shows up as
//! one of these.

mod classify;
mod config;

pub use classify::ClassifyError;
pub use config::ConfigError;
