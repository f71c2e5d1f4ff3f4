//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.okrsync.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// GitHub account and endpoint settings.
    #[serde(default)]
    pub github: GithubConfig,

    /// Document file locations.
    #[serde(default)]
    pub files: FilesConfig,

    /// Sync limits and metric paths.
    #[serde(default)]
    pub sync: SyncConfig,
}

/// GitHub account and endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    /// GitHub login whose activity is tracked.
    #[serde(default = "default_username")]
    pub username: String,

    /// Calendar year the OKR document covers.
    #[serde(default = "default_year")]
    pub year: i32,

    /// REST API base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// GraphQL endpoint URL.
    #[serde(default = "default_graphql_url")]
    pub graphql_url: String,

    /// Environment variable holding the API token (optional auth).
    #[serde(default = "default_token_env")]
    pub token_env: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            username: default_username(),
            year: default_year(),
            api_url: default_api_url(),
            graphql_url: default_graphql_url(),
            token_env: default_token_env(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_username() -> String {
    "octocat".to_string()
}

fn default_year() -> i32 {
    2026
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_graphql_url() -> String {
    "https://api.github.com/graphql".to_string()
}

fn default_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Document file locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesConfig {
    /// OKR document path. Empty means "okr-{year}.json".
    #[serde(default)]
    pub okr: String,

    /// Project list path.
    #[serde(default = "default_projects_file")]
    pub projects: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            okr: String::new(),
            projects: default_projects_file(),
        }
    }
}

fn default_projects_file() -> String {
    "projects.json".to_string()
}

/// Sync limits and the fixed goal/metric paths the fetchers write to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Maximum PR search results to count.
    #[serde(default = "default_max_prs")]
    pub max_prs: usize,

    /// Maximum repositories to scan.
    #[serde(default = "default_max_repos")]
    pub max_repos: usize,

    /// Commits fetched per repository for the churn scan.
    #[serde(default = "default_commits_per_repo")]
    pub commits_per_repo: usize,

    /// Repos whose name contains this marker are excluded from the
    /// project list (personal site/profile repos).
    #[serde(default = "default_site_marker")]
    pub site_marker: String,

    /// Document path receiving the contribution count.
    #[serde(default = "default_contributions_path")]
    pub contributions_path: [String; 2],

    /// Document path receiving the PR count.
    #[serde(default = "default_pr_path")]
    pub pr_path: [String; 2],

    /// Document path receiving the lines-of-code churn.
    #[serde(default = "default_loc_path")]
    pub loc_path: [String; 2],
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            max_prs: default_max_prs(),
            max_repos: default_max_repos(),
            commits_per_repo: default_commits_per_repo(),
            site_marker: default_site_marker(),
            contributions_path: default_contributions_path(),
            pr_path: default_pr_path(),
            loc_path: default_loc_path(),
        }
    }
}

fn default_max_prs() -> usize {
    1000
}

fn default_max_repos() -> usize {
    500
}

fn default_commits_per_repo() -> usize {
    100
}

fn default_site_marker() -> String {
    ".github.io".to_string()
}

fn default_contributions_path() -> [String; 2] {
    ["openSource".to_string(), "contributions".to_string()]
}

fn default_pr_path() -> [String; 2] {
    ["openSource".to_string(), "pr".to_string()]
}

fn default_loc_path() -> [String; 2] {
    ["engineering".to_string(), "loc".to_string()]
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(".okrsync.toml");

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref username) = args.username {
            self.github.username = username.clone();
        }
        if let Some(year) = args.year {
            self.github.year = year;
        }
        if let Some(ref okr_file) = args.okr_file {
            self.files.okr = okr_file.clone();
        }
    }

    /// Effective OKR document path ("okr-{year}.json" unless configured).
    pub fn okr_file(&self) -> String {
        if self.files.okr.is_empty() {
            format!("okr-{}.json", self.github.year)
        } else {
            self.files.okr.clone()
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.github.year, 2026);
        assert_eq!(config.sync.max_prs, 1000);
        assert_eq!(config.sync.max_repos, 500);
        assert_eq!(config.okr_file(), "okr-2026.json");
        assert_eq!(config.sync.pr_path, ["openSource", "pr"]);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[github]
username = "alice"
year = 2027

[files]
projects = "repos.json"

[sync]
max_repos = 50
site_marker = "-site"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.github.username, "alice");
        assert_eq!(config.github.year, 2027);
        assert_eq!(config.okr_file(), "okr-2027.json");
        assert_eq!(config.files.projects, "repos.json");
        assert_eq!(config.sync.max_repos, 50);
        assert_eq!(config.sync.site_marker, "-site");
        // Unspecified sections keep their defaults.
        assert_eq!(config.sync.commits_per_repo, 100);
        assert_eq!(config.github.api_url, "https://api.github.com");
    }

    #[test]
    fn test_explicit_okr_file_wins() {
        let config: Config = toml::from_str(
            r#"
[files]
okr = "my-goals.json"
"#,
        )
        .unwrap();
        assert_eq!(config.okr_file(), "my-goals.json");
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[github]"));
        assert!(toml_str.contains("[files]"));
        assert!(toml_str.contains("[sync]"));
    }
}
