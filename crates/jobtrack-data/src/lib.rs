//! Data pipeline for the job-application tracker.
//!
//! Decodes exported sheets into raw tables, normalizes them against the
//! logical schema, aggregates the cleaned rows and runs the top-level
//! analysis.

pub mod aggregator;
pub mod analysis;
pub mod normalizer;
pub mod reader;

pub use analysis::{analyze, analyze_detailed, analyze_with_schema};
pub use jobtrack_core as core;
