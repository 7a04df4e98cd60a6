//! Grouped summaries that feed the two report charts.

use std::collections::BTreeMap;

use engagement_core::models::{CommenterTotal, HourlyEngagement, JoinedPost};

/// Number of bars in the top-commenters chart.
pub const TOP_COMMENTERS_LIMIT: usize = 10;

// ── HourBucket ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
struct HourBucket {
    total_comments: u64,
    posts: usize,
}

impl HourBucket {
    fn add(&mut self, comments: u64) {
        self.total_comments += comments;
        self.posts += 1;
    }

    fn mean(&self) -> f64 {
        self.total_comments as f64 / self.posts as f64
    }
}

// ── EngagementAggregator ──────────────────────────────────────────────────────

/// Stateless helper that groups joined posts for charting.
pub struct EngagementAggregator;

impl EngagementAggregator {
    /// Sum `comments_count` per username and keep the `limit` largest sums.
    ///
    /// Rows without a username are left out. Groups are first ordered by
    /// username ascending and then stably sorted by sum descending, so equal
    /// sums always come out in username order.
    pub fn top_commenters(rows: &[JoinedPost], limit: usize) -> Vec<CommenterTotal> {
        let mut sums: BTreeMap<&str, u64> = BTreeMap::new();
        for row in rows {
            if let Some(username) = row.username.as_deref() {
                *sums.entry(username).or_default() += row.post.comments_count;
            }
        }

        let mut totals: Vec<CommenterTotal> = sums
            .into_iter()
            .map(|(username, total_comments)| CommenterTotal {
                username: username.to_string(),
                total_comments,
            })
            .collect();

        // `sort_by` is stable: ties stay in username order.
        totals.sort_by(|a, b| b.total_comments.cmp(&a.total_comments));
        totals.truncate(limit);
        totals
    }

    /// Mean `comments_count` per hour of day, ascending by hour.
    ///
    /// Hours without posts are absent, not zero. Posts without a
    /// `created_time` are left out.
    pub fn hourly_engagement(rows: &[JoinedPost]) -> Vec<HourlyEngagement> {
        let mut buckets: BTreeMap<u32, HourBucket> = BTreeMap::new();
        for row in rows {
            if let Some(hour) = row.hour_of_day() {
                buckets.entry(hour).or_default().add(row.post.comments_count);
            }
        }

        buckets
            .into_iter()
            .map(|(hour, bucket)| HourlyEngagement {
                hour,
                mean_comments: bucket.mean(),
                posts: bucket.posts,
            })
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use engagement_core::models::Post;

    fn make_row(username: Option<&str>, comments: u64, ts: Option<&str>) -> JoinedPost {
        JoinedPost {
            post: Post {
                id: format!("{:?}-{}", username, comments),
                profile_id: "1".to_string(),
                comments_count: comments,
                created_time: ts.map(|t| DateTime::parse_from_rfc3339(t).unwrap()),
                source_id: None,
            },
            username: username.map(str::to_string),
            followers_count: None,
        }
    }

    // ── top_commenters ────────────────────────────────────────────────────────

    #[test]
    fn test_top_commenters_sums_per_user() {
        let rows = vec![
            make_row(Some("alice"), 5, None),
            make_row(Some("bob"), 3, None),
            make_row(Some("alice"), 7, None),
        ];
        let top = EngagementAggregator::top_commenters(&rows, TOP_COMMENTERS_LIMIT);

        assert_eq!(top.len(), 2);
        assert_eq!(top[0].username, "alice");
        assert_eq!(top[0].total_comments, 12);
        assert_eq!(top[1].total_comments, 3);
    }

    #[test]
    fn test_top_commenters_ties_in_username_order() {
        // B appears first in the input, but ties are ordered by username.
        let rows = vec![
            make_row(Some("C"), 40, None),
            make_row(Some("B"), 50, None),
            make_row(Some("A"), 50, None),
            make_row(Some("D"), 10, None),
        ];
        let top = EngagementAggregator::top_commenters(&rows, TOP_COMMENTERS_LIMIT);

        let names: Vec<&str> = top.iter().map(|t| t.username.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_top_commenters_keeps_ten() {
        let rows: Vec<JoinedPost> = (0..15)
            .map(|i| make_row(Some(&format!("user{i:02}")), i, None))
            .collect();
        let top = EngagementAggregator::top_commenters(&rows, TOP_COMMENTERS_LIMIT);

        assert_eq!(top.len(), 10);
        assert_eq!(top[0].username, "user14");
        assert_eq!(top[9].username, "user05");
    }

    #[test]
    fn test_top_commenters_tie_at_cutoff_prefers_lower_username() {
        let mut rows: Vec<JoinedPost> = (0..9)
            .map(|i| make_row(Some(&format!("big{i}")), 100 + i, None))
            .collect();
        rows.push(make_row(Some("zed"), 5, None));
        rows.push(make_row(Some("amy"), 5, None));

        let top = EngagementAggregator::top_commenters(&rows, TOP_COMMENTERS_LIMIT);
        assert_eq!(top.len(), 10);
        assert_eq!(top[9].username, "amy");
    }

    #[test]
    fn test_top_commenters_skips_rows_without_username() {
        let rows = vec![make_row(None, 99, None), make_row(Some("bob"), 1, None)];
        let top = EngagementAggregator::top_commenters(&rows, TOP_COMMENTERS_LIMIT);

        assert_eq!(top.len(), 1);
        assert_eq!(top[0].username, "bob");
    }

    #[test]
    fn test_top_commenters_empty() {
        assert!(EngagementAggregator::top_commenters(&[], TOP_COMMENTERS_LIMIT).is_empty());
    }

    // ── hourly_engagement ─────────────────────────────────────────────────────

    #[test]
    fn test_hourly_mean_per_hour() {
        let rows = vec![
            make_row(Some("a"), 4, Some("2024-01-15T10:05:00Z")),
            make_row(Some("b"), 8, Some("2024-01-16T10:55:00Z")),
            make_row(Some("c"), 3, Some("2024-01-15T14:00:00Z")),
        ];
        let hourly = EngagementAggregator::hourly_engagement(&rows);

        assert_eq!(hourly.len(), 2);
        assert_eq!(hourly[0].hour, 10);
        assert_eq!(hourly[0].mean_comments, 6.0);
        assert_eq!(hourly[0].posts, 2);
        assert_eq!(hourly[1].hour, 14);
        assert_eq!(hourly[1].mean_comments, 3.0);
    }

    #[test]
    fn test_hourly_missing_hour_is_absent() {
        let rows = vec![
            make_row(Some("a"), 1, Some("2024-01-15T02:00:00Z")),
            make_row(Some("a"), 1, Some("2024-01-15T04:00:00Z")),
        ];
        let hourly = EngagementAggregator::hourly_engagement(&rows);

        let hours: Vec<u32> = hourly.iter().map(|h| h.hour).collect();
        assert_eq!(hours, vec![2, 4]);
        assert!(hourly.iter().all(|h| h.hour != 3));
    }

    #[test]
    fn test_hourly_sorted_by_hour() {
        let rows = vec![
            make_row(Some("a"), 1, Some("2024-01-15T23:00:00Z")),
            make_row(Some("a"), 1, Some("2024-01-15T00:30:00Z")),
            make_row(Some("a"), 1, Some("2024-01-15T12:00:00Z")),
        ];
        let hours: Vec<u32> = EngagementAggregator::hourly_engagement(&rows)
            .iter()
            .map(|h| h.hour)
            .collect();
        assert_eq!(hours, vec![0, 12, 23]);
    }

    #[test]
    fn test_hourly_skips_posts_without_timestamp() {
        let rows = vec![
            make_row(Some("a"), 50, None),
            make_row(Some("a"), 2, Some("2024-01-15T09:00:00Z")),
        ];
        let hourly = EngagementAggregator::hourly_engagement(&rows);

        assert_eq!(hourly.len(), 1);
        assert_eq!(hourly[0].mean_comments, 2.0);
    }

    #[test]
    fn test_hourly_includes_posts_without_username() {
        let rows = vec![make_row(None, 6, Some("2024-01-15T09:00:00Z"))];
        let hourly = EngagementAggregator::hourly_engagement(&rows);
        assert_eq!(hourly[0].mean_comments, 6.0);
    }
}
