//! Project list construction.
//!
//! Maps the fetched repository list to the persisted project document:
//! personal site/profile repos are dropped, the rest sorted by stars.

use crate::github::Repo;
use crate::models::Project;

/// Build the project list from fetched repositories.
///
/// Repos whose name contains `site_marker` are excluded; the remainder
/// is sorted descending by star count. The sort is stable, so ties
/// keep their fetch order.
pub fn build_project_list(repos: &[Repo], site_marker: &str) -> Vec<Project> {
    let mut projects: Vec<Project> = repos
        .iter()
        .filter(|repo| !repo.name.contains(site_marker))
        .map(|repo| Project {
            name: repo.name.clone(),
            description: repo.description.clone(),
            url: repo.html_url.clone(),
            stars: repo.stargazers_count,
            language: repo
                .language
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
            updated_at: repo.updated_at.clone(),
        })
        .collect();

    projects.sort_by_key(|project| std::cmp::Reverse(project.stars));
    projects
}
