//! Shared types for the beach review insights workspace.
//!
//! Holds the typed review model, the error taxonomy, timestamp parsing,
//! command-line settings and text formatting helpers.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use error::{InsightsError, Result};
