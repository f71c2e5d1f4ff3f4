//! Best-effort metric fetchers.
//!
//! Four independent queries against the GitHub API: yearly
//! contribution total (GraphQL), authored-PR count, lines-of-code
//! churn, and account statistics. Each is wrapped into a
//! [`Fetched`] at the snapshot boundary so one failing fetch never
//! stops the others.

use crate::config::SyncConfig;
use crate::github::client::year_window;
use crate::github::GithubClient;
use crate::models::AccountStats;
use crate::sync::{Fetched, MetricSnapshot};
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use tracing::{debug, info};

/// Runs the metric fetches for one account/year.
pub struct MetricFetcher<'a> {
    client: &'a GithubClient,
    year: i32,
    sync: &'a SyncConfig,
}

impl<'a> MetricFetcher<'a> {
    pub fn new(client: &'a GithubClient, year: i32, sync: &'a SyncConfig) -> Self {
        Self { client, year, sync }
    }

    /// Run all four fetches sequentially and collect the outcomes.
    pub async fn snapshot(&self) -> MetricSnapshot {
        MetricSnapshot {
            contributions: Fetched::from_result("contributions", self.contributions().await),
            pull_requests: Fetched::from_result("pull requests", self.pull_requests().await),
            lines_changed: Fetched::from_result("lines of code", self.lines_changed().await),
            account: Fetched::from_result("account stats", self.account_stats().await),
        }
    }

    /// Total contribution events within the calendar year, via the
    /// GraphQL contributions calendar.
    async fn contributions(&self) -> Result<i64> {
        let (from, to) = year_window(self.year);
        let query = format!(
            r#"query {{ user(login: "{login}") {{ contributionsCollection(from: "{from}", to: "{to}") {{ contributionCalendar {{ totalContributions }} }} }} }}"#,
            login = self.client.username(),
        );

        let data = self.client.graphql(&query).await?;
        let total = data
            .pointer("/user/contributionsCollection/contributionCalendar/totalContributions")
            .and_then(Value::as_i64)
            .context("Contribution total missing from GraphQL response")?;

        info!("Contributions: {}", total);
        Ok(total)
    }

    /// PRs authored within the year, capped at `max_prs`.
    async fn pull_requests(&self) -> Result<i64> {
        let count = self
            .client
            .search_pr_count(self.year, self.sync.max_prs)
            .await?;
        info!("Pull requests: {}", count);
        Ok(count as i64)
    }

    /// Lines-of-code churn: sum of additions + deletions over every
    /// commit the user authored this year, across all their repos.
    ///
    /// Per-repo and per-commit failures are skipped; only a failing
    /// repo list makes the whole metric unavailable. Double-counting
    /// of lines added and later reverted is an accepted approximation.
    async fn lines_changed(&self) -> Result<i64> {
        let repos = self.client.list_repos(self.sync.max_repos).await?;

        let pb = ProgressBar::new(repos.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("#>-"),
        );

        let mut total: u64 = 0;
        for repo in &repos {
            pb.set_message(repo.name.clone());

            let commits = match self
                .client
                .list_commits(&repo.full_name, self.year, self.sync.commits_per_repo)
                .await
            {
                Ok(commits) => commits,
                Err(e) => {
                    debug!("Skipping {}: {:#}", repo.full_name, e);
                    pb.inc(1);
                    continue;
                }
            };

            let mut repo_total: u64 = 0;
            for commit in &commits {
                match self.client.commit_churn(&repo.full_name, &commit.sha).await {
                    Ok(churn) => repo_total += churn,
                    Err(e) => {
                        debug!("Skipping commit {} in {}: {:#}", commit.sha, repo.full_name, e)
                    }
                }
            }

            if repo_total > 0 {
                info!("{}: {} lines changed", repo.full_name, repo_total);
            }
            total += repo_total;
            pb.inc(1);
        }
        pb.finish_and_clear();

        info!("Lines of code: {}", total);
        Ok(total as i64)
    }

    /// Public repo count, follower count, and total stars. The three
    /// fields travel as one unit; any failure makes all unavailable.
    async fn account_stats(&self) -> Result<AccountStats> {
        let profile = self.client.user_profile().await?;
        let repos = self.client.list_repos(self.sync.max_repos).await?;
        let stars = repos.iter().map(|r| r.stargazers_count).sum();

        let stats = AccountStats {
            repos: profile.public_repos,
            followers: profile.followers,
            stars,
        };
        info!(
            "Account stats: {} repos, {} followers, {} stars",
            stats.repos, stats.followers, stats.stars
        );
        Ok(stats)
    }
}
