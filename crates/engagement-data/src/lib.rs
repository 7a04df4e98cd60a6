//! Data ingestion layer for the engagement report.
//!
//! Responsible for reading the account, post and follower CSV tables,
//! joining them, aggregating chart data and running the top-level analysis
//! pipeline.

pub mod aggregator;
pub mod analysis;
pub mod joiner;
pub mod reader;

pub use engagement_core as core;
