//! GitHub API access.
//!
//! This module provides the thin REST/GraphQL client the metric
//! fetchers are built on.

pub mod client;

pub use client::{GithubClient, Repo, UserProfile};
