use crate::model::{CheckInEvent, RawCommit};
use crate::util::local_date;
use chrono::{FixedOffset, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Subject marking a commit as a check-in.
static SUBJECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^check-in\b").expect("valid regex"));

/// One trailer line carrying an explicit check-in date.
static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Check-In-Date:\s*([0-9]{4}-[0-9]{2}-[0-9]{2})\s*$").expect("valid regex")
});

/// `12345+login@users.noreply.github.com`
static NOREPLY_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]+\+([a-z0-9-]+)@users\.noreply\.github\.com$").expect("valid regex")
});

/// `login@users.noreply.github.com`
static NOREPLY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-z0-9-]+)@users\.noreply\.github\.com$").expect("valid regex")
});

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// How the `user` of a check-in is derived from the commit author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum IdentityMode {
    /// Author name, verbatim
    #[default]
    Name,
    /// Author email, verbatim
    Email,
    /// GitHub login from noreply emails, else the email local part, else a slug of the name
    Login,
}

impl IdentityMode {
    pub fn resolve(self, commit: &RawCommit) -> String {
        match self {
            IdentityMode::Name => commit.author_name.clone(),
            IdentityMode::Email => commit.author_email.clone(),
            IdentityMode::Login => login_identity(&commit.author_name, &commit.author_email),
        }
    }
}

fn login_identity(name: &str, email: &str) -> String {
    let email = email.trim().to_lowercase();
    if !email.is_empty() {
        let login = NOREPLY_ID_RE
            .captures(&email)
            .or_else(|| NOREPLY_RE.captures(&email))
            .and_then(|caps| caps.get(1));
        if let Some(login) = login {
            return login.as_str().to_string();
        }
        if let Some((local, _)) = email.split_once('@') {
            return local.to_string();
        }
    }

    let slug = WHITESPACE_RE.replace_all(name.trim(), "-").to_lowercase();
    if slug.is_empty() {
        "unknown".to_string()
    } else {
        slug
    }
}

/// `check-in`, `Check-In: day 3`, `CHECK-IN` match; `check-ins` and `checkin` do not.
pub fn has_subject_marker(subject: &str) -> bool {
    SUBJECT_RE.is_match(subject)
}

/// Values of every `Check-In-Date: YYYY-MM-DD` line, in message order.
/// Values are not checked to be real calendar dates.
pub fn trailer_values(message: &str) -> impl Iterator<Item = &str> {
    message
        .lines()
        .filter_map(|line| DATE_RE.captures(line))
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
}

pub fn is_check_in(commit: &RawCommit) -> bool {
    has_subject_marker(&commit.subject()) || trailer_values(&commit.message).next().is_some()
}

type DateResolver = fn(&RawCommit, &FixedOffset) -> Option<NaiveDate>;

/// Tried in order; the first date found wins.
const DATE_RESOLVERS: &[DateResolver] = &[trailer_date, commit_date];

fn trailer_date(commit: &RawCommit, _zone: &FixedOffset) -> Option<NaiveDate> {
    trailer_values(&commit.message).find_map(|value| {
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map_err(|e| {
                debug!(commit = %commit.hash, value, error = %e, "ignoring malformed check-in date trailer");
            })
            .ok()
    })
}

fn commit_date(commit: &RawCommit, zone: &FixedOffset) -> Option<NaiveDate> {
    Some(local_date(&commit.timestamp, zone))
}

pub fn resolve_date(commit: &RawCommit, zone: &FixedOffset) -> Option<NaiveDate> {
    DATE_RESOLVERS.iter().find_map(|resolve| resolve(commit, zone))
}

/// Turns raw commits into check-in events.
#[derive(Debug, Clone)]
pub struct Classifier {
    zone: FixedOffset,
    identity: IdentityMode,
}

impl Classifier {
    pub fn new(zone: FixedOffset, identity: IdentityMode) -> Self {
        Self { zone, identity }
    }

    /// `None` means "not a check-in"; that is not an error.
    pub fn parse(&self, commit: &RawCommit) -> Option<CheckInEvent> {
        if !is_check_in(commit) {
            return None;
        }
        let date = resolve_date(commit, &self.zone)?;
        Some(CheckInEvent {
            user: self.identity.resolve(commit),
            date,
            commit_hash: commit.hash.clone(),
            commit_instant: commit.timestamp,
        })
    }

    pub fn parse_all<'a>(
        &'a self,
        commits: &'a [RawCommit],
    ) -> impl Iterator<Item = CheckInEvent> + 'a {
        commits.iter().filter_map(move |c| self.parse(c))
    }
}
