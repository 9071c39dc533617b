use crate::model::{AttendanceRecord, CheckInEvent, DuplicateRecord};
use crate::util::short_hash;
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::warn;

/// Which event of a `(user, date)` group is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Prefer {
    /// Earliest commit instant
    #[default]
    Earliest,
    /// Latest commit instant
    Latest,
}

impl Prefer {
    /// Total order over events; the minimum is canonical.
    /// Equal instants always fall back to the smaller hash.
    fn rank(self, a: &CheckInEvent, b: &CheckInEvent) -> Ordering {
        let by_instant = a.commit_instant.cmp(&b.commit_instant);
        let by_instant = match self {
            Prefer::Earliest => by_instant,
            Prefer::Latest => by_instant.reverse(),
        };
        by_instant.then_with(|| a.commit_hash.cmp(&b.commit_hash))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Deduplicated {
    /// Sorted by date, then user.
    pub records: Vec<AttendanceRecord>,
    /// Sorted by date, user, rejected instant, rejected hash.
    pub duplicates: Vec<DuplicateRecord>,
}

/// Keep exactly one event per `(user, date)`; every other event becomes a
/// [`DuplicateRecord`] and is reported with a warning.
pub fn dedupe<I>(events: I, prefer: Prefer) -> Deduplicated
where
    I: IntoIterator<Item = CheckInEvent>,
{
    let mut groups: BTreeMap<(NaiveDate, String), Vec<CheckInEvent>> = BTreeMap::new();
    for event in events {
        groups
            .entry((event.date, event.user.clone()))
            .or_default()
            .push(event);
    }

    let mut out = Deduplicated::default();
    for ((date, user), mut group) in groups {
        group.sort_by(|a, b| prefer.rank(a, b));
        let mut members = group.into_iter();
        let Some(canonical) = members.next() else {
            continue;
        };

        for dup in members {
            warn!(
                "Duplicate check-in {} {} ({}), keeping {}",
                date,
                user,
                short_hash(&dup.commit_hash),
                short_hash(&canonical.commit_hash)
            );
            out.duplicates.push(DuplicateRecord {
                date,
                user: user.clone(),
                rejected_commit_hash: dup.commit_hash,
                rejected_instant: dup.commit_instant,
                canonical_commit_hash: canonical.commit_hash.clone(),
            });
        }

        out.records.push(AttendanceRecord { event: canonical });
    }

    out.duplicates.sort_by(|a, b| {
        (a.date, &a.user, a.rejected_instant, &a.rejected_commit_hash).cmp(&(
            b.date,
            &b.user,
            b.rejected_instant,
            &b.rejected_commit_hash,
        ))
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    fn event(user: &str, date: &str, hash: &str, instant: &str) -> CheckInEvent {
        CheckInEvent {
            user: user.to_string(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            commit_hash: hash.to_string(),
            commit_instant: DateTime::parse_from_rfc3339(instant).unwrap(),
        }
    }

    #[test]
    fn earliest_commit_is_canonical() {
        let events = vec![
            event("alice", "2025-01-15", "bbb222", "2025-01-15T10:05:00+09:00"),
            event("alice", "2025-01-15", "aaa111", "2025-01-15T10:00:00+09:00"),
        ];
        let out = dedupe(events, Prefer::Earliest);

        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].event.commit_hash, "aaa111");
        assert_eq!(out.duplicates.len(), 1);
        let dup = &out.duplicates[0];
        assert_eq!(dup.date.to_string(), "2025-01-15");
        assert_eq!(dup.user, "alice");
        assert_eq!(dup.rejected_commit_hash, "bbb222");
        assert_eq!(dup.canonical_commit_hash, "aaa111");
    }

    #[test]
    fn instants_compare_across_offsets() {
        // 01:00 UTC is earlier than 10:30 JST (01:30 UTC)
        let events = vec![
            event("bob", "2025-01-15", "aaa111", "2025-01-15T10:30:00+09:00"),
            event("bob", "2025-01-15", "fff999", "2025-01-15T01:00:00+00:00"),
        ];
        let out = dedupe(events, Prefer::Earliest);
        assert_eq!(out.records[0].event.commit_hash, "fff999");
    }

    #[test]
    fn equal_instants_break_ties_by_hash() {
        let events = vec![
            event("alice", "2025-01-15", "ccc333", "2025-01-15T10:00:00+09:00"),
            event("alice", "2025-01-15", "abc000", "2025-01-15T01:00:00+00:00"),
        ];
        assert_eq!(dedupe(events.clone(), Prefer::Earliest).records[0].event.commit_hash, "abc000");
        assert_eq!(dedupe(events, Prefer::Latest).records[0].event.commit_hash, "abc000");
    }

    #[test]
    fn latest_policy_keeps_last_commit() {
        let events = vec![
            event("alice", "2025-01-15", "aaa111", "2025-01-15T10:00:00+09:00"),
            event("alice", "2025-01-15", "bbb222", "2025-01-15T10:05:00+09:00"),
        ];
        let out = dedupe(events, Prefer::Latest);
        assert_eq!(out.records[0].event.commit_hash, "bbb222");
        assert_eq!(out.duplicates[0].rejected_commit_hash, "aaa111");
    }

    #[test]
    fn groups_of_n_leave_n_minus_one_duplicates() {
        let mut events = Vec::new();
        for (i, minute) in [7, 3, 9, 1].iter().enumerate() {
            events.push(event(
                "carol",
                "2025-02-01",
                &format!("h{i}"),
                &format!("2025-02-01T08:{minute:02}:00+09:00"),
            ));
        }
        events.push(event("carol", "2025-02-02", "solo", "2025-02-02T08:00:00+09:00"));
        events.push(event("dave", "2025-02-01", "dave1", "2025-02-01T08:00:00+09:00"));

        let out = dedupe(events, Prefer::Earliest);
        assert_eq!(out.records.len(), 3);
        assert_eq!(out.duplicates.len(), 3);

        let keys: HashSet<_> = out
            .records
            .iter()
            .map(|r| (r.event.user.as_str(), r.event.date))
            .collect();
        assert_eq!(keys.len(), out.records.len());

        let carol = out
            .records
            .iter()
            .find(|r| r.event.user == "carol" && r.event.date.to_string() == "2025-02-01")
            .unwrap();
        assert_eq!(carol.event.commit_hash, "h3");
        assert!(out.duplicates.iter().all(|d| d.canonical_commit_hash == "h3"));

        let rejected: Vec<_> = out.duplicates.iter().map(|d| d.rejected_commit_hash.as_str()).collect();
        assert_eq!(rejected, vec!["h1", "h0", "h2"]);
    }

    #[test]
    fn result_is_independent_of_input_order() {
        let events = vec![
            event("bob", "2025-01-02", "b2", "2025-01-02T09:00:00+09:00"),
            event("alice", "2025-01-01", "a1", "2025-01-01T09:00:00+09:00"),
            event("alice", "2025-01-01", "a0", "2025-01-01T09:00:00+09:00"),
            event("bob", "2025-01-01", "b1", "2025-01-01T09:00:00+09:00"),
        ];
        let mut reversed = events.clone();
        reversed.reverse();

        let a = dedupe(events, Prefer::Earliest);
        let b = dedupe(reversed, Prefer::Earliest);
        assert_eq!(a.records, b.records);
        assert_eq!(a.duplicates, b.duplicates);

        let order: Vec<_> = a
            .records
            .iter()
            .map(|r| (r.event.date.to_string(), r.event.user.clone()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("2025-01-01".to_string(), "alice".to_string()),
                ("2025-01-01".to_string(), "bob".to_string()),
                ("2025-01-02".to_string(), "bob".to_string()),
            ]
        );
    }
}
