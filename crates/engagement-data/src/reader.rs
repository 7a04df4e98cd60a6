//! CSV loading for the engagement report.
//!
//! Reads the accounts, posts and follower tables into typed records. Every
//! loader has a path-based entry point and a reader-based one so the pipeline
//! can run without touching the filesystem.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use engagement_core::models::{Account, FollowerSource, Post};
use engagement_core::settings::SourcePaths;
use engagement_core::{ReportError, Result};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

/// The three input tables of a single run.
#[derive(Debug, Clone, Default)]
pub struct SourceTables {
    pub accounts: Vec<Account>,
    pub posts: Vec<Post>,
    pub followers: Vec<FollowerSource>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load all three tables from disk.
///
/// Fails on the first table that is missing or cannot be parsed.
pub fn load_sources(paths: &SourcePaths) -> Result<SourceTables> {
    let tables = SourceTables {
        accounts: load_accounts(&paths.accounts)?,
        posts: load_posts(&paths.posts)?,
        followers: load_followers(&paths.followers)?,
    };

    info!(
        "Loaded {} accounts, {} posts, {} follower rows",
        tables.accounts.len(),
        tables.posts.len(),
        tables.followers.len()
    );

    Ok(tables)
}

pub fn load_accounts(path: &Path) -> Result<Vec<Account>> {
    load_table("accounts", path)
}

pub fn load_posts(path: &Path) -> Result<Vec<Post>> {
    load_table("posts", path)
}

pub fn load_followers(path: &Path) -> Result<Vec<FollowerSource>> {
    load_table("followers", path)
}

/// Open `path` and parse it as a headed CSV table of `T`.
pub fn load_table<T: DeserializeOwned>(table: &str, path: &Path) -> Result<Vec<T>> {
    let file = File::open(path).map_err(|source| ReportError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let rows = read_table(table, BufReader::new(file))?;
    debug!("File {}: {} {} rows", path.display(), rows.len(), table);
    Ok(rows)
}

/// Parse a headed CSV table of `T` from any reader.
///
/// Columns the record type does not name are ignored.
pub fn read_table<T: DeserializeOwned, R: Read>(table: &str, reader: R) -> Result<Vec<T>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    csv_reader
        .deserialize::<T>()
        .collect::<std::result::Result<Vec<T>, csv::Error>>()
        .map_err(|source| ReportError::DataSource {
            table: table.to_string(),
            source,
        })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::TempDir;

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn write_csv(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        path
    }

    fn write_fixture(dir: &Path) -> SourcePaths {
        write_csv(dir, "accounts.csv", &["id,username", "1,alice", "2,bob"]);
        write_csv(
            dir,
            "posts.csv",
            &[
                "id,profile_id,comments_count,created_time,_id",
                "p1,1,10,2024-01-15T10:00:00+0000,s1",
                "p2,2,4,2024-01-15T11:30:00+0000,s2",
            ],
        );
        write_csv(
            dir,
            "sources_for_followers.csv",
            &["_id,followers_count", "s1,100", "s2,40"],
        );
        SourcePaths::in_dir(dir)
    }

    // ── load_sources ──────────────────────────────────────────────────────────

    #[test]
    fn test_load_sources_basic() {
        let dir = TempDir::new().unwrap();
        let paths = write_fixture(dir.path());

        let tables = load_sources(&paths).unwrap();
        assert_eq!(tables.accounts.len(), 2);
        assert_eq!(tables.posts.len(), 2);
        assert_eq!(tables.followers.len(), 2);
        assert_eq!(tables.posts[1].comments_count, 4);
        assert_eq!(tables.followers[0].followers_count, Some(100));
    }

    #[test]
    fn test_load_sources_missing_file() {
        let dir = TempDir::new().unwrap();
        let paths = write_fixture(dir.path());
        std::fs::remove_file(&paths.followers).unwrap();

        let err = load_sources(&paths).unwrap_err();
        match err {
            ReportError::FileRead { path, .. } => assert_eq!(path, paths.followers),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_posts_unparsable_count() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "posts.csv",
            &[
                "id,profile_id,comments_count,created_time,_id",
                "p1,1,lots,2024-01-15T10:00:00Z,s1",
            ],
        );

        let err = load_posts(&path).unwrap_err();
        assert!(matches!(err, ReportError::DataSource { ref table, .. } if table == "posts"));
    }

    #[test]
    fn test_load_posts_bad_timestamp() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "posts.csv",
            &[
                "id,profile_id,comments_count,created_time,_id",
                "p1,1,3,not a date,s1",
            ],
        );

        assert!(load_posts(&path).is_err());
    }

    #[test]
    fn test_load_posts_missing_column() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(dir.path(), "posts.csv", &["id,profile_id", "p1,1"]);

        assert!(load_posts(&path).is_err());
    }

    // ── read_table ────────────────────────────────────────────────────────────

    #[test]
    fn test_read_table_ignores_extra_columns() {
        let data = "id,username,bio,verified\n7,carol,hello,true\n";
        let accounts: Vec<Account> = read_table("accounts", data.as_bytes()).unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].id, "7");
        assert_eq!(accounts[0].username.as_deref(), Some("carol"));
    }

    #[test]
    fn test_read_table_trims_header_whitespace() {
        let data = " _id , followers_count \nabc,12\n";
        let rows: Vec<FollowerSource> = read_table("followers", data.as_bytes()).unwrap();
        assert_eq!(rows[0].source_id, "abc");
        assert_eq!(rows[0].followers_count, Some(12));
    }

    #[test]
    fn test_read_table_empty_body() {
        let data = "id,username\n";
        let accounts: Vec<Account> = read_table("accounts", data.as_bytes()).unwrap();
        assert!(accounts.is_empty());
    }

    #[test]
    fn test_read_table_post_without_timestamp_or_key() {
        let data = "id,profile_id,comments_count,created_time,_id\np9,3,0,,\n";
        let posts: Vec<Post> = read_table("posts", data.as_bytes()).unwrap();
        assert_eq!(posts[0].created_time, None);
        assert_eq!(posts[0].source_id, None);
    }
}
