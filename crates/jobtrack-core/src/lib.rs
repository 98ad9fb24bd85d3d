//! Domain types and shared services for the job-application tracker.
//!
//! Holds the raw/normalized row model, the summary record, the error type,
//! application-date parsing, CLI settings and report formatting.

pub mod dates;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;

pub use error::{Result, TrackerError};
