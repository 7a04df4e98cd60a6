//! Left-joins of posts onto accounts and follower sources.

use std::collections::HashMap;

use engagement_core::models::{Account, FollowerSource, JoinedPost, Post};
use engagement_core::ReportError;
use tracing::{debug, warn};

use crate::reader::SourceTables;

/// Result of joining the three tables.
#[derive(Debug, Clone, Default)]
pub struct JoinOutcome {
    /// One row per post, in post order.
    pub rows: Vec<JoinedPost>,
    /// Posts whose `profile_id` matched no account.
    pub unmatched_accounts: usize,
    /// Posts whose `_id` was absent or matched no follower row.
    pub unmatched_followers: usize,
    /// Keys that occurred more than once on a right-hand table.
    pub duplicate_keys: usize,
}

/// Join posts to accounts (`profile_id = id`) and follower sources (`_id`).
///
/// Both joins keep every post exactly once. When a right-hand table repeats
/// a key, its first row is used. Mismatches are logged, never fatal.
pub fn join_tables(tables: &SourceTables) -> JoinOutcome {
    join(&tables.posts, &tables.accounts, &tables.followers)
}

/// Slice-based form of [`join_tables`].
pub fn join(posts: &[Post], accounts: &[Account], followers: &[FollowerSource]) -> JoinOutcome {
    let mut outcome = JoinOutcome::default();

    let account_index = index_first(accounts, |a| a.id.as_str(), "accounts", &mut outcome);
    let follower_index = index_first(
        followers,
        |f| f.source_id.as_str(),
        "followers",
        &mut outcome,
    );

    outcome.rows = posts
        .iter()
        .map(|post| {
            let account = account_index.get(post.profile_id.as_str());
            if account.is_none() {
                outcome.unmatched_accounts += 1;
                log_mismatch("accounts", &post.profile_id);
            }

            let follower = post
                .source_id
                .as_deref()
                .and_then(|key| follower_index.get(key));
            if follower.is_none() {
                outcome.unmatched_followers += 1;
                log_mismatch("followers", post.source_id.as_deref().unwrap_or("<blank>"));
            }

            JoinedPost {
                post: post.clone(),
                username: account.and_then(|a| a.username.clone()),
                followers_count: follower.and_then(|f| f.followers_count),
            }
        })
        .collect();

    debug!(
        "Joined {} posts: {} without account, {} without followers, {} duplicate keys",
        outcome.rows.len(),
        outcome.unmatched_accounts,
        outcome.unmatched_followers,
        outcome.duplicate_keys
    );

    outcome
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Index `rows` by key, keeping the first row for each key.
fn index_first<'a, T>(
    rows: &'a [T],
    key_fn: impl Fn(&'a T) -> &'a str,
    table: &str,
    outcome: &mut JoinOutcome,
) -> HashMap<&'a str, &'a T> {
    let mut index: HashMap<&'a str, &'a T> = HashMap::with_capacity(rows.len());
    for row in rows {
        let key = key_fn(row);
        if index.contains_key(key) {
            outcome.duplicate_keys += 1;
            let err = ReportError::JoinKey {
                table: table.to_string(),
                key: key.to_string(),
                reason: "duplicate key, first row kept".to_string(),
            };
            warn!("{}", err);
            continue;
        }
        index.insert(key, row);
    }
    index
}

fn log_mismatch(table: &str, key: &str) {
    let err = ReportError::JoinKey {
        table: table.to_string(),
        key: key.to_string(),
        reason: "no matching row".to_string(),
    };
    warn!("{}", err);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
