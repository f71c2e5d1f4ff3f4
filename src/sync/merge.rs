//! Sparse merge of fetched metrics into the OKR document.
//!
//! This is the aggregation core: a snapshot of independently-fetched
//! metrics is reconciled against the persisted document without
//! touching anything the snapshot does not name. Unavailable fetches
//! leave their metric exactly as it was; `lastUpdate` is bumped on
//! every merge as a "last attempted sync" marker.

use crate::config::SyncConfig;
use crate::models::{AccountStats, DocumentError, OkrDocument};
use crate::sync::Fetched;

/// One sync run's worth of fetched metrics.
///
/// Each field is independent: any subset may be unavailable and the
/// merge still applies the rest.
#[derive(Debug, Clone)]
pub struct MetricSnapshot {
    /// Yearly contribution total.
    pub contributions: Fetched<i64>,
    /// Yearly authored-PR count.
    pub pull_requests: Fetched<i64>,
    /// Yearly lines-of-code churn (additions + deletions).
    pub lines_changed: Fetched<i64>,
    /// Account stats, replacing `doc.stats` wholesale when present.
    pub account: Fetched<AccountStats>,
}

impl MetricSnapshot {
    /// A snapshot with nothing fetched. Merging it only bumps
    /// `lastUpdate`.
    #[allow(dead_code)] // Test utility
    pub fn empty() -> Self {
        Self {
            contributions: Fetched::Unavailable("not fetched".to_string()),
            pull_requests: Fetched::Unavailable("not fetched".to_string()),
            lines_changed: Fetched::Unavailable("not fetched".to_string()),
            account: Fetched::Unavailable("not fetched".to_string()),
        }
    }
}

/// Merge a snapshot into the document.
///
/// Only the `current` leaves at the configured paths and `lastUpdate`
/// change; `target` fields and unrelated goals/metrics are untouched.
/// A configured path missing from the document is a [`DocumentError`]:
/// the document no longer matches the configuration, which is fatal for
/// the run.
pub fn apply_snapshot(
    doc: &mut OkrDocument,
    snapshot: &MetricSnapshot,
    sync: &SyncConfig,
    today: &str,
) -> Result<(), DocumentError> {
    if let Fetched::Value(n) = snapshot.contributions {
        let [goal, metric] = &sync.contributions_path;
        doc.set_current(goal, metric, n.into())?;
    }
    if let Fetched::Value(n) = snapshot.pull_requests {
        let [goal, metric] = &sync.pr_path;
        doc.set_current(goal, metric, n.into())?;
    }
    if let Fetched::Value(n) = snapshot.lines_changed {
        let [goal, metric] = &sync.loc_path;
        doc.set_current(goal, metric, n.into())?;
    }
    if let Fetched::Value(stats) = snapshot.account {
        doc.stats = Some(stats);
    }

    doc.last_update = today.to_string();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tests::sample_document;
    use crate::models::MetricValue;

    const TODAY: &str = "2026-05-20";

    #[test]
    fn test_empty_snapshot_only_bumps_last_update() {
        let mut doc = sample_document();
        let before = doc.clone();

        apply_snapshot(&mut doc, &MetricSnapshot::empty(), &SyncConfig::default(), TODAY).unwrap();

        assert_eq!(doc.last_update, TODAY);
        doc.last_update = before.last_update.clone();
        assert_eq!(doc, before);
    }

    #[test]
    fn test_full_snapshot_updates_all_paths() {
        let mut doc = sample_document();
        let snapshot = MetricSnapshot {
            contributions: Fetched::Value(850),
            pull_requests: Fetched::Value(31),
            lines_changed: Fetched::Value(42_000),
            account: Fetched::Value(AccountStats {
                repos: 12,
                followers: 34,
                stars: 56,
            }),
        };

        apply_snapshot(&mut doc, &snapshot, &SyncConfig::default(), TODAY).unwrap();

        assert_eq!(
            doc.metric("openSource", "contributions").unwrap().current,
            Some(MetricValue::Number(850))
        );
        assert_eq!(
            doc.metric("openSource", "pr").unwrap().current,
            Some(MetricValue::Number(31))
        );
        assert_eq!(
            doc.metric("engineering", "loc").unwrap().current,
            Some(MetricValue::Number(42_000))
        );
        assert_eq!(
            doc.stats,
            Some(AccountStats {
                repos: 12,
                followers: 34,
                stars: 56,
            })
        );
        assert_eq!(doc.last_update, TODAY);
    }

    #[test]
    fn test_unavailable_pr_leaves_prior_value() {
        let mut doc = sample_document();
        let snapshot = MetricSnapshot {
            contributions: Fetched::Value(850),
            pull_requests: Fetched::Unavailable("search failed".to_string()),
            lines_changed: Fetched::Unavailable("repo list failed".to_string()),
            account: Fetched::Unavailable("profile failed".to_string()),
        };

        apply_snapshot(&mut doc, &snapshot, &SyncConfig::default(), TODAY).unwrap();

        // The failed fetch leaves pr.current at its prior value while
        // the successful contributions fetch still lands.
        assert_eq!(
            doc.metric("openSource", "pr").unwrap().current,
            Some(MetricValue::Number(4))
        );
        assert_eq!(
            doc.metric("openSource", "contributions").unwrap().current,
            Some(MetricValue::Number(850))
        );
        assert!(doc.stats.is_none());
    }

    #[test]
    fn test_merge_never_touches_targets_or_other_metrics() {
        let mut doc = sample_document();
        let snapshot = MetricSnapshot {
            contributions: Fetched::Value(850),
            ..MetricSnapshot::empty()
        };

        apply_snapshot(&mut doc, &snapshot, &SyncConfig::default(), TODAY).unwrap();

        let reference = sample_document();
        assert_eq!(
            doc.metric("openSource", "contributions").unwrap().target,
            reference
                .metric("openSource", "contributions")
                .unwrap()
                .target
        );
        assert_eq!(
            doc.metric("engineering", "research").unwrap(),
            reference.metric("engineering", "research").unwrap()
        );
    }

    #[test]
    fn test_stats_replaced_wholesale() {
        let mut doc = sample_document();
        doc.stats = Some(AccountStats {
            repos: 1,
            followers: 1,
            stars: 1,
        });

        let snapshot = MetricSnapshot {
            account: Fetched::Value(AccountStats {
                repos: 9,
                followers: 8,
                stars: 7,
            }),
            ..MetricSnapshot::empty()
        };
        apply_snapshot(&mut doc, &snapshot, &SyncConfig::default(), TODAY).unwrap();

        assert_eq!(
            doc.stats,
            Some(AccountStats {
                repos: 9,
                followers: 8,
                stars: 7,
            })
        );
    }

    #[test]
    fn test_missing_configured_path_is_fatal() {
        let mut doc = sample_document();
        doc.goals.shift_remove("engineering");

        let snapshot = MetricSnapshot {
            lines_changed: Fetched::Value(100),
            ..MetricSnapshot::empty()
        };
        let err = apply_snapshot(&mut doc, &snapshot, &SyncConfig::default(), TODAY).unwrap_err();
        assert_eq!(err, DocumentError::UnknownGoal("engineering".to_string()));
    }
}
