//! Thin GitHub REST + GraphQL client.
//!
//! One client per run, built from [`GithubConfig`]. Methods map 1:1 to
//! the API capabilities the fetchers need: an arbitrary GraphQL query,
//! PR search, user profile, paginated repo list, commit list, and a
//! single commit's change stats. Errors are returned as-is; converting
//! them to "unavailable" is the fetchers' job.

use crate::config::GithubConfig;
use anyhow::{bail, Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Results per page for paginated REST endpoints (GitHub's maximum).
const PAGE_SIZE: usize = 100;

/// A user's public profile fields.
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    pub public_repos: u64,
    pub followers: u64,
}

/// One repository from the user's repo list.
#[derive(Debug, Clone, Deserialize)]
pub struct Repo {
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub html_url: String,
    pub stargazers_count: u64,
    pub language: Option<String>,
    pub updated_at: String,
}

/// Commit reference from a repository's commit list.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitRef {
    pub sha: String,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    stats: CommitStats,
}

#[derive(Debug, Deserialize)]
struct CommitStats {
    additions: u64,
    deletions: u64,
}

#[derive(Debug, Deserialize)]
struct SearchPage {
    items: Vec<Value>,
}

/// GitHub API client for one account/year.
pub struct GithubClient {
    http: reqwest::Client,
    api_url: String,
    graphql_url: String,
    username: String,
}

impl GithubClient {
    /// Build a client from config. The API token, if present in the
    /// configured environment variable, is attached to every request.
    pub fn new(config: &GithubConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("okrsync/", env!("CARGO_PKG_VERSION"))),
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );

        if let Ok(token) = std::env::var(&config.token_env) {
            if !token.is_empty() {
                let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                    .context("API token contains invalid header characters")?;
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
            }
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            graphql_url: config.graphql_url.clone(),
            username: config.username.clone(),
        })
    }

    /// The tracked GitHub login.
    pub fn username(&self) -> &str {
        &self.username
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> Result<T> {
        debug!("GET {}", url);
        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("Request failed: {}", url))?
            .error_for_status()
            .with_context(|| format!("Request rejected: {}", url))?;

        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to decode response: {}", url))
    }

    /// Execute a GraphQL query and return the `data` payload.
    pub async fn graphql(&self, query: &str) -> Result<Value> {
        debug!("POST {}", self.graphql_url);
        let response = self
            .http
            .post(&self.graphql_url)
            .json(&serde_json::json!({ "query": query }))
            .send()
            .await
            .context("GraphQL request failed")?
            .error_for_status()
            .context("GraphQL request rejected")?;

        let body: Value = response
            .json()
            .await
            .context("Failed to decode GraphQL response")?;

        if let Some(errors) = body.get("errors") {
            bail!("GraphQL query returned errors: {}", errors);
        }

        body.get("data")
            .cloned()
            .context("GraphQL response has no data field")
    }

    /// Fetch the user's public profile.
    pub async fn user_profile(&self) -> Result<UserProfile> {
        let url = format!("{}/users/{}", self.api_url, self.username);
        self.get_json(&url, &[]).await
    }

    /// List the user's repositories, paginated, capped at `max_repos`.
    pub async fn list_repos(&self, max_repos: usize) -> Result<Vec<Repo>> {
        let url = format!("{}/users/{}/repos", self.api_url, self.username);
        let mut repos: Vec<Repo> = Vec::new();

        for page in 1.. {
            let batch: Vec<Repo> = self
                .get_json(
                    &url,
                    &[
                        ("per_page", PAGE_SIZE.to_string()),
                        ("page", page.to_string()),
                    ],
                )
                .await?;
            let last_page = batch.len() < PAGE_SIZE;
            repos.extend(batch);

            if last_page || repos.len() >= max_repos {
                break;
            }
        }

        repos.truncate(max_repos);
        Ok(repos)
    }

    /// Count PRs authored by the user within the year, capped at `max_prs`.
    ///
    /// Counts returned items rather than trusting `total_count`, so the
    /// cap behaves like a bounded result set.
    pub async fn search_pr_count(&self, year: i32, max_prs: usize) -> Result<usize> {
        let url = format!("{}/search/issues", self.api_url);
        let q = format!(
            "author:{} type:pr created:{}-01-01..{}-12-31",
            self.username, year, year
        );
        let mut count = 0;

        for page in 1.. {
            let batch: SearchPage = self
                .get_json(
                    &url,
                    &[
                        ("q", q.clone()),
                        ("per_page", PAGE_SIZE.to_string()),
                        ("page", page.to_string()),
                    ],
                )
                .await?;
            let fetched = batch.items.len();
            count += fetched;

            if fetched < PAGE_SIZE || count >= max_prs {
                break;
            }
        }

        Ok(count.min(max_prs))
    }

    /// List commits authored by the user in a repository within the
    /// year window. A single page; `per_page` is the per-repo cap.
    pub async fn list_commits(
        &self,
        full_name: &str,
        year: i32,
        per_page: usize,
    ) -> Result<Vec<CommitRef>> {
        let url = format!("{}/repos/{}/commits", self.api_url, full_name);
        let (since, until) = year_window(year);
        self.get_json(
            &url,
            &[
                ("author", self.username.clone()),
                ("since", since),
                ("until", until),
                ("per_page", per_page.to_string()),
            ],
        )
        .await
    }

    /// Fetch one commit's change stats: additions + deletions.
    pub async fn commit_churn(&self, full_name: &str, sha: &str) -> Result<u64> {
        let url = format!("{}/repos/{}/commits/{}", self.api_url, full_name, sha);
        let detail: CommitDetail = self.get_json(&url, &[]).await?;
        Ok(detail.stats.additions + detail.stats.deletions)
    }
}

/// The calendar-year window as ISO-8601 UTC instants.
pub fn year_window(year: i32) -> (String, String) {
    (
        format!("{}-01-01T00:00:00Z", year),
        format!("{}-12-31T23:59:59Z", year),
    )
}
