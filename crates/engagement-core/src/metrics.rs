use std::cmp::Ordering;

use tracing::{debug, warn};

use crate::error::ReportError;
use crate::models::{EnrichedPost, InteractionScore, JoinedPost, Post};
use crate::stats::{round_to, PopulationStats};

/// Z-score above which a post counts as overperforming (95% confidence).
pub const Z_THRESHOLD: f64 = 1.96;

/// Decimal places kept for `z_score` and `interaction_score`.
pub const METRIC_DECIMALS: u32 = 4;

/// Whether a stored z-score crosses [`Z_THRESHOLD`]. The comparison is strict.
pub fn is_overperforming(z_score: f64) -> bool {
    z_score > Z_THRESHOLD
}

/// Comments per follower, rounded to [`METRIC_DECIMALS`].
pub fn interaction_score(comments_count: u64, followers_count: Option<u64>) -> InteractionScore {
    match followers_count {
        None => InteractionScore::MissingFollowers,
        Some(0) => InteractionScore::ZeroFollowers,
        Some(followers) => InteractionScore::Value(round_to(
            comments_count as f64 / followers as f64,
            METRIC_DECIMALS,
        )),
    }
}

// ── MetricCalculator ──────────────────────────────────────────────────────────

/// Derives the per-row metrics for joined posts.
///
/// The population statistics come from the post table itself, not from the
/// joined rows, so a join can never skew the mean.
#[derive(Debug, Clone)]
pub struct MetricCalculator {
    stats: PopulationStats,
}

impl MetricCalculator {
    /// Build a calculator over the full post population.
    pub fn from_posts(posts: &[Post]) -> Self {
        let stats = PopulationStats::from_counts(posts.iter().map(|p| p.comments_count));
        debug!(
            "Comment population: n={}, mean={:?}, std={:?}",
            stats.count, stats.mean, stats.std_dev
        );
        if stats.z_score(0.0).is_none() && stats.count > 0 {
            warn!(
                "Standard deviation of comments_count is undefined or zero over {} posts; \
                 all z-scores are 0",
                stats.count
            );
        }
        Self { stats }
    }

    pub fn stats(&self) -> &PopulationStats {
        &self.stats
    }

    /// Rounded z-score of `comments_count`. Falls back to `0.0` when the
    /// population has no spread.
    pub fn z_score(&self, comments_count: u64) -> f64 {
        self.stats
            .z_score(comments_count as f64)
            .map(|z| round_to(z, METRIC_DECIMALS))
            .unwrap_or(0.0)
    }

    /// Augment a single joined row.
    pub fn enrich_row(&self, row: JoinedPost) -> EnrichedPost {
        let z_score = self.z_score(row.post.comments_count);
        let interaction = interaction_score(row.post.comments_count, row.followers_count);
        if interaction == InteractionScore::ZeroFollowers {
            let err = ReportError::DivisionByZeroMetric {
                post_id: row.post.id.clone(),
            };
            warn!("{}", err);
        }

        EnrichedPost {
            post: row.post,
            username: row.username,
            followers_count: row.followers_count,
            z_score,
            interaction_score: interaction,
            overperforming: is_overperforming(z_score),
        }
    }

    /// Augment every joined row, preserving order.
    pub fn enrich(&self, rows: Vec<JoinedPost>) -> Vec<EnrichedPost> {
        rows.into_iter().map(|row| self.enrich_row(row)).collect()
    }
}

// ── Presentation order ────────────────────────────────────────────────────────

/// Sort by `interaction_score` descending. Rows without a numeric score go
/// last; equal scores keep their input order.
pub fn sort_by_interaction(rows: &mut [EnrichedPost]) {
    rows.sort_by(|a, b| {
        match (a.interaction_score.value(), b.interaction_score.value()) {
            (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn make_post(id: &str, comments: u64) -> Post {
        Post {
            id: id.to_string(),
            profile_id: "acc".to_string(),
            comments_count: comments,
            created_time: None,
            source_id: None,
        }
    }

    fn joined(id: &str, comments: u64, followers: Option<u64>) -> JoinedPost {
        JoinedPost {
            post: make_post(id, comments),
            username: Some("user".to_string()),
            followers_count: followers,
        }
    }

    // ── interaction_score ────────────────────────────────────────────────────

    #[test]
    fn test_interaction_score_ten_over_hundred() {
        assert_eq!(interaction_score(10, Some(100)), InteractionScore::Value(0.1));
    }

    #[test]
    fn test_interaction_score_rounded() {
        assert_eq!(interaction_score(1, Some(3)), InteractionScore::Value(0.3333));
    }

    #[test]
    fn test_interaction_score_half_rounds_to_even() {
        // 1/32 = 0.03125 and 3/32 = 0.09375 sit exactly between two 4-place values.
        assert_eq!(interaction_score(1, Some(32)), InteractionScore::Value(0.0312));
        assert_eq!(interaction_score(3, Some(32)), InteractionScore::Value(0.0938));
    }

    #[test]
    fn test_interaction_score_zero_followers() {
        assert_eq!(interaction_score(5, Some(0)), InteractionScore::ZeroFollowers);
    }

    #[test]
    fn test_interaction_score_missing_followers() {
        assert_eq!(interaction_score(5, None), InteractionScore::MissingFollowers);
    }

    // ── is_overperforming ────────────────────────────────────────────────────

    #[test]
    fn test_overperforming_boundary() {
        assert!(!is_overperforming(1.9600));
        assert!(is_overperforming(1.9601));
        assert!(!is_overperforming(-3.0));
    }

    // ── MetricCalculator ─────────────────────────────────────────────────────

    #[test]
    fn test_z_score_matches_formula() {
        let posts: Vec<Post> = [2, 4, 4, 4, 5, 5, 7, 9]
            .iter()
            .enumerate()
            .map(|(i, c)| make_post(&format!("p{i}"), *c))
            .collect();
        let calc = MetricCalculator::from_posts(&posts);

        let mean = 5.0;
        let std = (32.0_f64 / 7.0).sqrt();
        for post in &posts {
            let expected = (post.comments_count as f64 - mean) / std;
            let stored = calc.z_score(post.comments_count);
            assert!((stored - expected).abs() <= 0.5e-4, "{stored} vs {expected}");
        }
    }

    #[test]
    fn test_z_score_uses_post_population_not_joined_rows() {
        let posts = vec![make_post("a", 0), make_post("b", 10), make_post("c", 20)];
        let calc = MetricCalculator::from_posts(&posts);

        // Only one joined row; the mean and spread still come from all posts.
        let rows = calc.enrich(vec![joined("c", 20, Some(100))]);
        assert_eq!(rows[0].z_score, 1.0);
    }

    #[test]
    fn test_z_score_zero_spread_is_zero() {
        let posts = vec![make_post("a", 3), make_post("b", 3)];
        let calc = MetricCalculator::from_posts(&posts);
        assert_eq!(calc.z_score(3), 0.0);
    }

    #[test]
    fn test_z_score_single_post_is_zero() {
        let calc = MetricCalculator::from_posts(&[make_post("a", 9)]);
        assert_eq!(calc.z_score(9), 0.0);
    }

    #[test]
    fn test_enrich_flags_outlier() {
        let mut posts: Vec<Post> = (0..20).map(|i| make_post(&format!("p{i}"), 1)).collect();
        posts.push(make_post("viral", 100));
        let calc = MetricCalculator::from_posts(&posts);

        let rows = calc.enrich(vec![joined("viral", 100, Some(1000)), joined("p0", 1, Some(10))]);
        assert!(rows[0].overperforming);
        assert!(rows[0].z_score > Z_THRESHOLD);
        assert!(!rows[1].overperforming);
        assert_eq!(rows[0].interaction_score, InteractionScore::Value(0.1));
    }

    #[test]
    fn test_enrich_keeps_zero_follower_row() {
        let posts = vec![make_post("a", 1), make_post("b", 2)];
        let calc = MetricCalculator::from_posts(&posts);

        let rows = calc.enrich(vec![joined("a", 1, Some(0)), joined("b", 2, None)]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].interaction_score, InteractionScore::ZeroFollowers);
        assert_eq!(rows[1].interaction_score, InteractionScore::MissingFollowers);
    }

    // ── sort_by_interaction ──────────────────────────────────────────────────

    #[test]
    fn test_sort_by_interaction_descending_with_undefined_last() {
        let posts = vec![make_post("a", 1), make_post("b", 2)];
        let calc = MetricCalculator::from_posts(&posts);
        let mut rows = calc.enrich(vec![
            joined("missing", 1, None),
            joined("low", 1, Some(100)),
            joined("zero", 4, Some(0)),
            joined("high", 5, Some(10)),
            joined("low-too", 1, Some(100)),
        ]);

        sort_by_interaction(&mut rows);

        let ids: Vec<&str> = rows.iter().map(|r| r.post.id.as_str()).collect();
        assert_eq!(ids, vec!["high", "low", "low-too", "missing", "zero"]);
    }
}
