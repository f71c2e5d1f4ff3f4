//! Data models for the OKR tracker.
//!
//! This module contains the typed schema of the two persisted documents
//! (the OKR document and the project list) plus the typed lookup error
//! used when a goal/metric path does not exist.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A metric value: either a number or free text (e.g. "ongoing").
///
/// `current` is normally numeric; `target` may be either. Only numeric,
/// positive targets produce a progress percentage in the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(i64),
    Text(String),
}

impl MetricValue {
    /// Parse a CLI-provided value: integer if possible, else kept as text.
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<i64>() {
            Ok(n) => MetricValue::Number(n),
            Err(_) => MetricValue::Text(raw.to_string()),
        }
    }

    /// Returns the numeric value, if this is a number.
    pub fn as_number(&self) -> Option<i64> {
        match self {
            MetricValue::Number(n) => Some(*n),
            MetricValue::Text(_) => None,
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Number(n) => write!(f, "{}", n),
            MetricValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for MetricValue {
    fn from(n: i64) -> Self {
        MetricValue::Number(n)
    }
}

/// One `current / target` leaf of a goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    /// Latest observed value. Absent means "never updated".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<MetricValue>,
    /// Target for the year. Numeric targets enable percentage display.
    pub target: MetricValue,
}

/// A named goal: a title plus its metrics, in stored order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub title: String,
    pub metrics: IndexMap<String, Metric>,
}

/// Account-level statistics fetched as one unit from the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountStats {
    pub repos: u64,
    pub followers: u64,
    pub stars: u64,
}

/// The persisted OKR document.
///
/// Field names and key order mirror the on-disk JSON, which is also
/// edited by hand; maps are `IndexMap` so a load/save cycle never
/// reorders goals or metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OkrDocument {
    #[serde(rename = "lastUpdate")]
    pub last_update: String,
    pub goals: IndexMap<String, Goal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<AccountStats>,
}

/// Error for goal/metric path lookups that miss.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("unknown goal '{0}'")]
    UnknownGoal(String),
    #[error("unknown metric '{metric}' in goal '{goal}'")]
    UnknownMetric { goal: String, metric: String },
}

impl OkrDocument {
    /// Look up a metric by its (goal, metric) path.
    pub fn metric(&self, goal: &str, metric: &str) -> Result<&Metric, DocumentError> {
        let g = self
            .goals
            .get(goal)
            .ok_or_else(|| DocumentError::UnknownGoal(goal.to_string()))?;
        g.metrics
            .get(metric)
            .ok_or_else(|| DocumentError::UnknownMetric {
                goal: goal.to_string(),
                metric: metric.to_string(),
            })
    }

    /// Set `current` at an existing (goal, metric) path.
    ///
    /// Never creates structure: a missing goal or metric is an error and
    /// the document is left unchanged.
    pub fn set_current(
        &mut self,
        goal: &str,
        metric: &str,
        value: MetricValue,
    ) -> Result<(), DocumentError> {
        let g = self
            .goals
            .get_mut(goal)
            .ok_or_else(|| DocumentError::UnknownGoal(goal.to_string()))?;
        let m = g
            .metrics
            .get_mut(metric)
            .ok_or_else(|| DocumentError::UnknownMetric {
                goal: goal.to_string(),
                metric: metric.to_string(),
            })?;
        m.current = Some(value);
        Ok(())
    }
}

/// One entry of the project list document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub description: Option<String>,
    pub url: String,
    pub stars: u64,
    pub language: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

/// The persisted project list. Rewritten wholesale on every sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectsDocument {
    #[serde(rename = "lastUpdate")]
    pub last_update: String,
    pub projects: Vec<Project>,
}
