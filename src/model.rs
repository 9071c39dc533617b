use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const SCHEMA_VERSION: u32 = 1;

/// One commit as read from history, before any classification.
#[derive(Debug, Clone)]
pub struct RawCommit {
    pub hash: String,
    pub author_name: String,
    pub author_email: String,
    /// Author instant with the offset it was recorded in.
    pub timestamp: DateTime<FixedOffset>,
    /// Full message: subject line plus optional body and trailers.
    pub message: String,
}

impl RawCommit {
    /// First paragraph of the message with its lines joined by spaces,
    /// the way `git log --format=%s` reports it.
    pub fn subject(&self) -> String {
        self.message
            .lines()
            .skip_while(|line| line.trim().is_empty())
            .take_while(|line| !line.trim().is_empty())
            .map(str::trim)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A commit recognised as a check-in, resolved to a user and a calendar date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckInEvent {
    pub user: String,
    pub date: NaiveDate,
    pub commit_hash: String,
    pub commit_instant: DateTime<FixedOffset>,
}

/// The single event kept for a `(user, date)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceRecord {
    pub event: CheckInEvent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateRecord {
    pub date: NaiveDate,
    pub user: String,
    pub rejected_commit_hash: String,
    pub rejected_instant: DateTime<FixedOffset>,
    pub canonical_commit_hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStat {
    pub total_check_ins: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub current_streak_length: usize,
    pub longest_streak_length: usize,
}

/// Distinct users with a canonical record, per date.
pub type DailyCounts = BTreeMap<NaiveDate, usize>;

pub type UserStats = BTreeMap<String, UserStat>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeatmapCell {
    pub date: NaiveDate,
    pub count: usize,
    pub band: u32,
    pub column: u32,
    pub row: u32,
}

/// Everything one run derives from the history.
#[derive(Debug, Clone, Default)]
pub struct AttendanceReport {
    pub commits_scanned: usize,
    pub check_ins: usize,
    pub records: Vec<AttendanceRecord>,
    pub duplicates: Vec<DuplicateRecord>,
    pub daily_counts: DailyCounts,
    pub user_stats: UserStats,
}

impl AttendanceReport {
    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.daily_counts.keys().next_back().copied()
    }
}

/// Contains no run timestamp, so it is identical for an unchanged history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsOutput {
    pub version: u32,
    pub repository_path: String,
    pub commits_scanned: usize,
    pub users: UserStats,
    pub daily_counts: DailyCounts,
    pub duplicates: Vec<DuplicateRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserLine {
    pub user: String,
    #[serde(flatten)]
    pub stat: UserStat,
}
