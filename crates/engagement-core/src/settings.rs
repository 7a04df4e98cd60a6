use clap::Parser;
use std::path::{Path, PathBuf};

/// Default accounts table file name.
pub const DEFAULT_ACCOUNTS_FILE: &str = "accounts.csv";
/// Default posts table file name.
pub const DEFAULT_POSTS_FILE: &str = "posts.csv";
/// Default follower table file name.
pub const DEFAULT_FOLLOWERS_FILE: &str = "sources_for_followers.csv";
/// Default report file name.
pub const DEFAULT_REPORT_FILE: &str = "report.pdf";
/// Default top-commenters chart file name.
pub const DEFAULT_TOP_CHART_FILE: &str = "top_commenters.png";
/// Default hourly chart file name.
pub const DEFAULT_HOURLY_CHART_FILE: &str = "time.png";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Build a PDF engagement report from account, post and follower tables
#[derive(Parser, Debug, Clone)]
#[command(
    name = "engagement-report",
    about = "Build a PDF engagement report from account, post and follower tables",
    version
)]
pub struct Settings {
    /// Accounts table (id, username, ...)
    #[arg(long, default_value = DEFAULT_ACCOUNTS_FILE)]
    pub accounts: PathBuf,

    /// Posts table (id, profile_id, comments_count, created_time, _id, ...)
    #[arg(long, default_value = DEFAULT_POSTS_FILE)]
    pub posts: PathBuf,

    /// Follower table (_id, followers_count, ...)
    #[arg(long, default_value = DEFAULT_FOLLOWERS_FILE)]
    pub followers: PathBuf,

    /// Directory that receives the charts and the report
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Report file name
    #[arg(long, default_value = DEFAULT_REPORT_FILE)]
    pub report_name: String,

    /// Top-commenters chart file name
    #[arg(long, default_value = DEFAULT_TOP_CHART_FILE)]
    pub top_chart_name: String,

    /// Hourly engagement chart file name
    #[arg(long, default_value = DEFAULT_HOURLY_CHART_FILE)]
    pub hourly_chart_name: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

// ── Paths ──────────────────────────────────────────────────────────────────────

/// Locations of the three input tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePaths {
    pub accounts: PathBuf,
    pub posts: PathBuf,
    pub followers: PathBuf,
}

impl SourcePaths {
    /// Default file names resolved against `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            accounts: dir.join(DEFAULT_ACCOUNTS_FILE),
            posts: dir.join(DEFAULT_POSTS_FILE),
            followers: dir.join(DEFAULT_FOLLOWERS_FILE),
        }
    }
}

impl Default for SourcePaths {
    fn default() -> Self {
        Self {
            accounts: PathBuf::from(DEFAULT_ACCOUNTS_FILE),
            posts: PathBuf::from(DEFAULT_POSTS_FILE),
            followers: PathBuf::from(DEFAULT_FOLLOWERS_FILE),
        }
    }
}

/// Locations of the generated artefacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub top_chart: PathBuf,
    pub hourly_chart: PathBuf,
    pub report: PathBuf,
}

impl OutputPaths {
    /// Default file names resolved against `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            top_chart: dir.join(DEFAULT_TOP_CHART_FILE),
            hourly_chart: dir.join(DEFAULT_HOURLY_CHART_FILE),
            report: dir.join(DEFAULT_REPORT_FILE),
        }
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse process arguments and apply the `--debug` override.
    pub fn load() -> Self {
        Self::resolve(Settings::parse())
    }

    /// Same as [`Settings::load`] but with an explicit argument list.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::resolve(Settings::parse_from(args))
    }

    fn resolve(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    pub fn source_paths(&self) -> SourcePaths {
        SourcePaths {
            accounts: self.accounts.clone(),
            posts: self.posts.clone(),
            followers: self.followers.clone(),
        }
    }

    pub fn output_paths(&self) -> OutputPaths {
        OutputPaths {
            top_chart: self.output_dir.join(&self.top_chart_name),
            hourly_chart: self.output_dir.join(&self.hourly_chart_name),
            report: self.output_dir.join(&self.report_name),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default_values() {
        let settings = Settings::parse_from(["engagement-report"]);

        assert_eq!(settings.accounts, PathBuf::from("accounts.csv"));
        assert_eq!(settings.posts, PathBuf::from("posts.csv"));
        assert_eq!(settings.followers, PathBuf::from("sources_for_followers.csv"));
        assert_eq!(settings.output_dir, PathBuf::from("."));
        assert_eq!(settings.report_name, "report.pdf");
        assert_eq!(settings.top_chart_name, "top_commenters.png");
        assert_eq!(settings.hourly_chart_name, "time.png");
        assert_eq!(settings.log_level, "INFO");
        assert!(!settings.debug);
    }

    #[test]
    fn test_default_source_paths_match_fixed_names() {
        let settings = Settings::parse_from(["engagement-report"]);
        assert_eq!(settings.source_paths(), SourcePaths::default());
    }

    #[test]
    fn test_output_paths_join_output_dir() {
        let settings = Settings::parse_from(["engagement-report", "--output-dir", "/tmp/out"]);
        assert_eq!(settings.output_paths(), OutputPaths::in_dir(Path::new("/tmp/out")));
    }

    #[test]
    fn test_settings_cli_explicit_inputs() {
        let settings = Settings::parse_from([
            "engagement-report",
            "--posts",
            "data/p.csv",
            "--report-name",
            "weekly.pdf",
        ]);
        assert_eq!(settings.posts, PathBuf::from("data/p.csv"));
        assert_eq!(settings.output_paths().report, PathBuf::from("./weekly.pdf"));
    }

    #[test]
    fn test_debug_overrides_log_level() {
        let settings = Settings::load_from_args(["engagement-report", "--debug"]);
        assert_eq!(settings.log_level, "DEBUG");
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        let result = Settings::try_parse_from(["engagement-report", "--log-level", "LOUD"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_source_paths_in_dir() {
        let paths = SourcePaths::in_dir(Path::new("/data"));
        assert_eq!(paths.posts, PathBuf::from("/data/posts.csv"));
        assert_eq!(paths.followers, PathBuf::from("/data/sources_for_followers.csv"));
    }
}
