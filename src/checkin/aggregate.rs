use crate::model::{AttendanceRecord, DailyCounts, UserStat, UserStats};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

/// Number of distinct users with a canonical record on each date.
pub fn daily_counts(records: &[AttendanceRecord]) -> DailyCounts {
    let mut users_by_date: BTreeMap<NaiveDate, BTreeSet<&str>> = BTreeMap::new();
    for record in records {
        users_by_date
            .entry(record.event.date)
            .or_default()
            .insert(record.event.user.as_str());
    }
    users_by_date
        .into_iter()
        .map(|(date, users)| (date, users.len()))
        .collect()
}

pub fn user_stats(records: &[AttendanceRecord]) -> UserStats {
    let mut dates_by_user: BTreeMap<&str, BTreeSet<NaiveDate>> = BTreeMap::new();
    for record in records {
        dates_by_user
            .entry(record.event.user.as_str())
            .or_default()
            .insert(record.event.date);
    }

    dates_by_user
        .into_iter()
        .filter_map(|(user, dates)| {
            let dates: Vec<NaiveDate> = dates.into_iter().collect();
            let stat = user_stat(&dates)?;
            Some((user.to_string(), stat))
        })
        .collect()
}

/// `dates` must be sorted ascending without repeats.
fn user_stat(dates: &[NaiveDate]) -> Option<UserStat> {
    let first_date = *dates.first()?;
    let last_date = *dates.last()?;
    let (current, longest) = streaks(dates);
    Some(UserStat {
        total_check_ins: dates.len(),
        first_date,
        last_date,
        current_streak_length: current,
        longest_streak_length: longest,
    })
}

/// Returns `(run ending at the last date, longest run)` over sorted, unique dates.
/// Runs are relative to the dates themselves, never to the wall clock.
pub fn streaks(dates: &[NaiveDate]) -> (usize, usize) {
    let mut current = 0;
    let mut longest = 0;
    let mut prev: Option<NaiveDate> = None;

    for &date in dates {
        let consecutive = prev.and_then(|p| p.succ_opt()) == Some(date);
        current = if consecutive { current + 1 } else { 1 };
        longest = longest.max(current);
        prev = Some(date);
    }

    (current, longest)
}
