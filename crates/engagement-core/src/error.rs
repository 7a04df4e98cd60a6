use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the engagement report pipeline.
#[derive(Error, Debug)]
pub enum ReportError {
    /// An input file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A tabular source could not be parsed into typed records.
    #[error("Failed to parse {table} data: {source}")]
    DataSource {
        table: String,
        #[source]
        source: csv::Error,
    },

    /// A timestamp string did not match any recognised format.
    #[error("Invalid timestamp format: {0}")]
    TimestampParse(String),

    /// A left-join key had no (or more than one) partner on the right side.
    ///
    /// Never fatal: the joiner logs it and keeps the left row.
    #[error("Join key mismatch in {table}: {key} ({reason})")]
    JoinKey {
        table: String,
        key: String,
        reason: String,
    },

    /// A post's interaction score is undefined because it has zero followers.
    ///
    /// Never fatal: the row carries an explicit sentinel instead of a value.
    #[error("Interaction score undefined for post {post_id}: followers_count is zero")]
    DivisionByZeroMetric { post_id: String },

    /// A chart or document could not be drawn.
    #[error("Render error: {0}")]
    Render(String),

    /// A rendered chart image could not be decoded for embedding.
    #[error("Failed to embed image {path}: {reason}")]
    Image { path: PathBuf, reason: String },

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the engagement crates.
pub type Result<T> = std::result::Result<T, ReportError>;
