//! Metric and project synchronization.
//!
//! A sync run fetches GitHub metrics best-effort, sparse-merges them
//! into the OKR document, then rewrites the project list. Fetch
//! failures degrade to "unavailable" and never abort the run; only
//! local-state problems (missing/unparsable documents, configured
//! paths absent from the document) are fatal.

pub mod fetchers;
pub mod merge;
pub mod projects;

pub use fetchers::MetricFetcher;
pub use merge::{apply_snapshot, MetricSnapshot};

use crate::config::Config;
use crate::github::GithubClient;
use crate::models::{OkrDocument, ProjectsDocument};
use crate::store;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Outcome of one best-effort fetch: a value, or unavailable with the
/// reason it failed. Errors never cross the fetcher boundary.
#[derive(Debug, Clone)]
pub enum Fetched<T> {
    Value(T),
    Unavailable(String),
}

impl<T> Fetched<T> {
    /// Convert a fetch result, logging a warning for the operator when
    /// the fetch failed.
    pub fn from_result(label: &str, result: Result<T>) -> Self {
        match result {
            Ok(value) => Fetched::Value(value),
            Err(e) => {
                warn!("Could not fetch {}: {:#}", label, e);
                Fetched::Unavailable(format!("{:#}", e))
            }
        }
    }

    /// The failure reason, if this fetch was unavailable.
    pub fn unavailable_reason(&self) -> Option<&str> {
        match self {
            Fetched::Value(_) => None,
            Fetched::Unavailable(reason) => Some(reason),
        }
    }
}

/// Today's date in the document's `YYYY-MM-DD` format.
pub fn today_stamp() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// Run a full sync: metrics first, then the project list.
pub async fn run(config: &Config) -> Result<()> {
    let okr_path = PathBuf::from(config.okr_file());
    let mut doc: OkrDocument = store::load_document(&okr_path)?;

    let client = GithubClient::new(&config.github)?;
    let fetcher = MetricFetcher::new(&client, config.github.year, &config.sync);

    println!(
        "🔄 Syncing metrics for {} ({})",
        config.github.username, config.github.year
    );
    let snapshot = fetcher.snapshot().await;

    apply_snapshot(&mut doc, &snapshot, &config.sync, &today_stamp())
        .context("OKR document does not contain a configured metric path")?;
    store::save_document(&okr_path, &doc)?;

    let skipped = [
        ("contributions", snapshot.contributions.unavailable_reason()),
        ("pull requests", snapshot.pull_requests.unavailable_reason()),
        ("lines of code", snapshot.lines_changed.unavailable_reason()),
        ("account stats", snapshot.account.unavailable_reason()),
    ];
    for (label, reason) in skipped {
        if let Some(reason) = reason {
            println!("⚠️  {} not updated: {}", label, reason);
        }
    }

    info!("OKR document updated: {}", okr_path.display());
    println!("✅ OKR document updated: {}", okr_path.display());

    sync_projects(config, &client).await?;

    Ok(())
}

/// Rewrite the project list from the user's repositories.
///
/// A repo-list fetch failure follows the fetch-error policy: warn and
/// skip the write (the metric sync above has already been persisted).
async fn sync_projects(config: &Config, client: &GithubClient) -> Result<()> {
    match client.list_repos(config.sync.max_repos).await {
        Ok(repos) => {
            let document = ProjectsDocument {
                last_update: today_stamp(),
                projects: projects::build_project_list(&repos, &config.sync.site_marker),
            };
            store::save_document(Path::new(&config.files.projects), &document)?;
            println!(
                "✅ Project list updated: {} ({} projects)",
                config.files.projects,
                document.projects.len()
            );
        }
        Err(e) => {
            warn!("Could not fetch repository list: {:#}", e);
            println!("⚠️  Project list left unchanged (repository list unavailable)");
        }
    }
    Ok(())
}
