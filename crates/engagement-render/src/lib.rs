//! Output layer for the engagement report.
//!
//! Draws the top-commenters and hourly charts with [`plotters`], lays out the
//! narrative and results table on legal-size pages with [`printpdf`], and
//! writes the finished PDF.

pub mod charts;
pub mod document;
pub mod narrative;
pub mod report;
pub mod results_table;
pub mod style;

pub use report::render_report;
