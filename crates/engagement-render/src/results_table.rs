//! Results table shown at the end of the report.
//!
//! Turns the metric table into rows of display strings with a fixed column
//! order, one row per post.

use engagement_core::formatting::{
    format_flag, format_interaction, format_metric, format_optional_count, format_optional_text,
};
use engagement_core::models::EnrichedPost;

/// Column headers, in display order.
pub const RESULT_COLUMNS: [&str; 8] = [
    "post_id",
    "username",
    "profile_id",
    "followers_count",
    "comments_count",
    "interaction_score",
    "overperforming",
    "z_score",
];

/// Column widths in points, matching [`RESULT_COLUMNS`].
pub const COLUMN_WIDTHS: [f32; 8] = [40.0, 80.0, 60.0, 60.0, 60.0, 40.0, 40.0, 40.0];

/// The rendered form of the metric table.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Width of each column in points.
    pub column_widths: Vec<f32>,
}

impl ResultsTable {
    /// Build the table from posts already in presentation order.
    pub fn from_posts(posts: &[EnrichedPost]) -> Self {
        Self {
            header: RESULT_COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows: posts.iter().map(row_cells).collect(),
            column_widths: COLUMN_WIDTHS.to_vec(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    /// Total width of all columns in points.
    pub fn total_width(&self) -> f32 {
        self.column_widths.iter().sum()
    }
}

fn row_cells(post: &EnrichedPost) -> Vec<String> {
    vec![
        post.post.id.clone(),
        format_optional_text(post.username.as_deref()),
        post.post.profile_id.clone(),
        format_optional_count(post.followers_count),
        post.post.comments_count.to_string(),
        format_interaction(&post.interaction_score),
        format_flag(post.overperforming),
        format_metric(post.z_score),
    ]
}

// ── Tests ──────────────────────────────────────────────────────────────────────
