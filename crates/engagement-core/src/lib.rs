//! Core types and calculations for the engagement report.
//!
//! Holds the record models, the error type, cell parsing, descriptive
//! statistics, the per-post metric calculator, value formatting and the
//! command-line settings shared by the other crates.

pub mod error;
pub mod formatting;
pub mod metrics;
pub mod models;
pub mod parsing;
pub mod settings;
pub mod stats;

pub use error::{ReportError, Result};
