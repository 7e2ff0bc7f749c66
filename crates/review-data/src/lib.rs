//! Data layer for the beach review dashboard.
//!
//! Reads the annotated review CSV, normalizes it into typed records and
//! derives the per-selection views: vocabulary differencing, sentiment
//! trends, indicator cross-tab and CSV export.

pub mod aggregator;
pub mod analysis;
pub mod crosstab;
pub mod exporter;
pub mod filter;
pub mod normalizer;
pub mod reader;
pub mod vocabulary;

pub use review_core as core;
