//! Main analysis pipeline for the engagement report.
//!
//! Joins the loaded tables, derives the per-post metrics and computes the two
//! chart aggregates, returning an [`AnalysisResult`] ready for rendering.

use chrono::Utc;
use engagement_core::metrics::{sort_by_interaction, MetricCalculator};
use engagement_core::models::{CommenterTotal, EnrichedPost, HourlyEngagement, InteractionScore};
use engagement_core::settings::SourcePaths;
use engagement_core::stats::PopulationStats;
use engagement_core::Result;
use tracing::info;

use crate::aggregator::{EngagementAggregator, TOP_COMMENTERS_LIMIT};
use crate::joiner::join_tables;
use crate::reader::{load_sources, SourceTables};

// ── Public types ──────────────────────────────────────────────────────────────

/// Metadata produced alongside the analysis result.
#[derive(Debug, Clone)]
pub struct AnalysisMetadata {
    /// RFC 3339 timestamp when this result was generated.
    pub generated_at: String,
    pub accounts_loaded: usize,
    pub posts_processed: usize,
    pub follower_rows_loaded: usize,
    /// Posts whose `profile_id` matched no account.
    pub unmatched_accounts: usize,
    /// Posts without a follower row.
    pub unmatched_followers: usize,
    /// Repeated keys found on the account or follower tables.
    pub duplicate_keys: usize,
    /// Posts whose interaction score is undefined because of zero followers.
    pub zero_follower_posts: usize,
    pub overperforming_posts: usize,
    /// Comment statistics over the full post table.
    pub comment_stats: PopulationStats,
    /// Wall-clock seconds spent on join, metrics and aggregation.
    pub transform_time_seconds: f64,
}

/// The complete output of [`analyze_tables`].
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    /// Metric table, sorted by interaction score descending.
    pub posts: Vec<EnrichedPost>,
    /// Up to ten usernames with the most comments.
    pub top_commenters: Vec<CommenterTotal>,
    /// Mean comments per hour of day, hours with posts only.
    pub hourly: Vec<HourlyEngagement>,
    pub metadata: AnalysisMetadata,
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Load the three tables from `paths` and run [`analyze_tables`].
pub fn analyze_sources(paths: &SourcePaths) -> Result<AnalysisResult> {
    let tables = load_sources(paths)?;
    Ok(analyze_tables(&tables))
}

/// Run the full analysis pipeline over already-loaded tables.
///
/// 1. Left-join posts onto accounts and follower sources.
/// 2. Aggregate top commenters and hourly means for the charts.
/// 3. Derive z-score, interaction score and outlier flag per post.
/// 4. Sort the metric table by interaction score.
pub fn analyze_tables(tables: &SourceTables) -> AnalysisResult {
    let start = std::time::Instant::now();

    // ── Step 1: Join ──────────────────────────────────────────────────────────
    let join = join_tables(tables);

    // ── Step 2: Chart aggregates ──────────────────────────────────────────────
    let top_commenters = EngagementAggregator::top_commenters(&join.rows, TOP_COMMENTERS_LIMIT);
    let hourly = EngagementAggregator::hourly_engagement(&join.rows);

    // ── Step 3: Metrics ───────────────────────────────────────────────────────
    let calculator = MetricCalculator::from_posts(&tables.posts);
    let mut posts = calculator.enrich(join.rows);

    // ── Step 4: Presentation order ────────────────────────────────────────────
    sort_by_interaction(&mut posts);

    let metadata = AnalysisMetadata {
        generated_at: Utc::now().to_rfc3339(),
        accounts_loaded: tables.accounts.len(),
        posts_processed: posts.len(),
        follower_rows_loaded: tables.followers.len(),
        unmatched_accounts: join.unmatched_accounts,
        unmatched_followers: join.unmatched_followers,
        duplicate_keys: join.duplicate_keys,
        zero_follower_posts: posts
            .iter()
            .filter(|p| p.interaction_score == InteractionScore::ZeroFollowers)
            .count(),
        overperforming_posts: posts.iter().filter(|p| p.overperforming).count(),
        comment_stats: *calculator.stats(),
        transform_time_seconds: start.elapsed().as_secs_f64(),
    };

    info!(
        "Analysed {} posts: {} overperforming, {} top commenters, {} active hours",
        metadata.posts_processed,
        metadata.overperforming_posts,
        top_commenters.len(),
        hourly.len()
    );

    AnalysisResult {
        posts,
        top_commenters,
        hourly,
        metadata,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
