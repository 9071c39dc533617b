//! The aggregation engine: classify commits, keep one check-in per
//! `(user, date)`, then derive counts and statistics.

pub mod aggregate;
pub mod classify;
pub mod dedupe;

pub use aggregate::{daily_counts, streaks, user_stats};
pub use classify::{Classifier, IdentityMode};
pub use dedupe::{dedupe, Deduplicated, Prefer};

use crate::error::Result;
use crate::git::CommitSource;
use crate::model::{AttendanceReport, RawCommit};
use crate::util::canonical_zone;
use chrono::FixedOffset;
use tracing::info;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Zone whose calendar decides which day an untrailed commit belongs to.
    pub zone: FixedOffset,
    pub identity: IdentityMode,
    pub prefer: Prefer,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            zone: canonical_zone(),
            identity: IdentityMode::default(),
            prefer: Prefer::default(),
        }
    }
}

/// Pure derivation of a report from an already-read history.
pub fn build_report(commits: &[RawCommit], config: &EngineConfig) -> AttendanceReport {
    let classifier = Classifier::new(config.zone, config.identity);
    let events: Vec<_> = classifier.parse_all(commits).collect();
    let check_ins = events.len();

    let Deduplicated {
        records,
        duplicates,
    } = dedupe(events, config.prefer);

    AttendanceReport {
        commits_scanned: commits.len(),
        check_ins,
        daily_counts: daily_counts(&records),
        user_stats: user_stats(&records),
        records,
        duplicates,
    }
}

/// Read the history once and build the report. A read failure aborts the run.
pub fn run(source: &dyn CommitSource, config: &EngineConfig) -> Result<AttendanceReport> {
    let commits = source.read_commits()?;
    let report = build_report(&commits, config);
    info!(
        commits = report.commits_scanned,
        check_ins = report.check_ins,
        canonical = report.records.len(),
        duplicates = report.duplicates.len(),
        "attendance aggregated"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MemorySource;
    use chrono::{DateTime, NaiveDate};
    use pretty_assertions::assert_eq;

    fn commit(hash: &str, author: &str, ts: &str, message: &str) -> RawCommit {
        RawCommit {
            hash: hash.to_string(),
            author_name: author.to_string(),
            author_email: format!("{author}@example.com"),
            timestamp: DateTime::parse_from_rfc3339(ts).unwrap(),
            message: message.to_string(),
        }
    }

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn history() -> Vec<RawCommit> {
        vec![
            commit("bbb222", "alice", "2025-01-15T10:05:00+09:00", "check-in\n\nCheck-In-Date: 2025-01-15"),
            commit("aaa111", "alice", "2025-01-15T10:00:00+09:00", "check-in\n\nCheck-In-Date: 2025-01-15"),
            commit("ccc333", "bob", "2025-01-14T16:00:00+00:00", "check-in"),
            commit("ddd444", "bob", "2025-01-16T08:00:00+09:00", "update README"),
        ]
    }

    #[test]
    fn duplicate_example_resolves_to_earliest() {
        let report = build_report(&history(), &EngineConfig::default());

        assert_eq!(report.commits_scanned, 4);
        assert_eq!(report.check_ins, 3);
        assert_eq!(report.records.len(), 2);

        let alice = report.records.iter().find(|r| r.event.user == "alice").unwrap();
        assert_eq!(alice.event.date, d("2025-01-15"));
        assert_eq!(alice.event.commit_hash, "aaa111");

        assert_eq!(report.duplicates.len(), 1);
        assert_eq!(report.duplicates[0].rejected_commit_hash, "bbb222");
        assert_eq!(report.duplicates[0].canonical_commit_hash, "aaa111");

        // bob's 16:00 UTC commit is 01:00 on the 15th in Tokyo
        assert_eq!(report.daily_counts[&d("2025-01-15")], 2);
        assert_eq!(report.daily_counts.len(), 1);
    }

    #[test]
    fn non_check_ins_are_excluded_everywhere() {
        let report = build_report(&history(), &EngineConfig::default());
        assert!(report.records.iter().all(|r| r.event.commit_hash != "ddd444"));
        assert!(!report.daily_counts.contains_key(&d("2025-01-16")));
        assert_eq!(report.user_stats["bob"].total_check_ins, 1);
    }

    #[test]
    fn zone_changes_derived_dates_only() {
        let config = EngineConfig {
            zone: FixedOffset::east_opt(0).unwrap(),
            ..EngineConfig::default()
        };
        let report = build_report(&history(), &config);
        let bob = report.records.iter().find(|r| r.event.user == "bob").unwrap();
        assert_eq!(bob.event.date, d("2025-01-14"));
        let alice = report.records.iter().find(|r| r.event.user == "alice").unwrap();
        assert_eq!(alice.event.date, d("2025-01-15"));
    }

    #[test]
    fn run_reads_from_source() {
        let source = MemorySource::new(history());
        let report = run(&source, &EngineConfig::default()).unwrap();
        assert_eq!(report.latest_date(), Some(d("2025-01-15")));
    }

    #[test]
    fn shuffled_history_gives_same_report() {
        let mut shuffled = history();
        shuffled.rotate_left(2);
        let a = build_report(&history(), &EngineConfig::default());
        let b = build_report(&shuffled, &EngineConfig::default());
        assert_eq!(a.records, b.records);
        assert_eq!(a.duplicates, b.duplicates);
        assert_eq!(a.daily_counts, b.daily_counts);
        assert_eq!(a.user_stats, b.user_stats);
    }
}
