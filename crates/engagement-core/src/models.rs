use chrono::{DateTime, FixedOffset, Timelike};
use serde::Deserialize;

use crate::parsing;

/// A social-media account read from the accounts table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Account {
    /// Unique account identifier, referenced by [`Post::profile_id`].
    #[serde(deserialize_with = "parsing::deserialize_id")]
    pub id: String,
    /// Display name. Blank cells are treated as absent.
    #[serde(default, deserialize_with = "parsing::deserialize_optional_text")]
    pub username: Option<String>,
}

/// A single published post read from the posts table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Post {
    /// Unique post identifier.
    #[serde(deserialize_with = "parsing::deserialize_id")]
    pub id: String,
    /// Identifier of the owning [`Account`].
    #[serde(deserialize_with = "parsing::deserialize_id")]
    pub profile_id: String,
    /// Number of comments left on the post.
    #[serde(deserialize_with = "parsing::deserialize_count")]
    pub comments_count: u64,
    /// Publication time, kept in its original UTC offset.
    #[serde(default, deserialize_with = "parsing::deserialize_optional_timestamp")]
    pub created_time: Option<DateTime<FixedOffset>>,
    /// Key shared with the follower table.
    #[serde(
        rename = "_id",
        default,
        deserialize_with = "parsing::deserialize_optional_id"
    )]
    pub source_id: Option<String>,
}

/// Follower statistics keyed by the same `_id` a [`Post`] carries.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FollowerSource {
    /// Join key.
    #[serde(rename = "_id", deserialize_with = "parsing::deserialize_id")]
    pub source_id: String,
    /// Follower count. Blank cells are treated as absent.
    #[serde(default, deserialize_with = "parsing::deserialize_optional_count")]
    pub followers_count: Option<u64>,
}

/// A post after both left-joins. Joined columns are absent when the right
/// side had no matching row.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedPost {
    pub post: Post,
    pub username: Option<String>,
    pub followers_count: Option<u64>,
}

impl JoinedPost {
    /// Hour of day (0-23) of `created_time` in its own offset.
    pub fn hour_of_day(&self) -> Option<u32> {
        self.post.created_time.map(|ts| ts.hour())
    }
}

/// Comment-to-follower ratio for a single post.
///
/// The ratio is undefined when there is no follower figure to divide by, and
/// the two reasons are kept apart so the report can show them differently.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionScore {
    /// `comments_count / followers_count`, rounded to four decimals.
    Value(f64),
    /// No follower row matched, or its count was blank.
    MissingFollowers,
    /// The follower count was zero.
    ZeroFollowers,
}

impl InteractionScore {
    /// The numeric score, if one is defined.
    pub fn value(&self) -> Option<f64> {
        match self {
            InteractionScore::Value(v) => Some(*v),
            _ => None,
        }
    }
}

/// A [`JoinedPost`] augmented with the per-row metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedPost {
    pub post: Post,
    pub username: Option<String>,
    pub followers_count: Option<u64>,
    /// Standardised comment count, rounded to four decimals.
    pub z_score: f64,
    pub interaction_score: InteractionScore,
    /// `z_score > 1.96`.
    pub overperforming: bool,
}

/// Total comments for one username, one bar of the top-commenters chart.
#[derive(Debug, Clone, PartialEq)]
pub struct CommenterTotal {
    pub username: String,
    pub total_comments: u64,
}

/// Mean comments for posts published in one hour of the day.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyEngagement {
    /// Hour of day, 0-23.
    pub hour: u32,
    pub mean_comments: f64,
    /// Number of posts that contributed to the mean.
    pub posts: usize,
}

// ── Tests ──────────────────────────────────────────────────────────────────────
