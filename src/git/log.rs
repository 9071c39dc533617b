use super::CommitSource;
use crate::error::{AttendError, Result};
use crate::model::RawCommit;
use chrono::DateTime;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

const RECORD_SEP: char = '\x1e';
const FIELD_SEP: char = '\x1f';

/// hash, author ISO time, author name, author email, raw body
const LOG_FORMAT: &str = "--pretty=format:%H%x1f%aI%x1f%an%x1f%ae%x1f%B%x1e";

/// History read through the `git` executable.
pub struct GitLog {
    root: PathBuf,
}

impl GitLog {
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let dir = match path {
            Some(p) => p.as_ref().to_path_buf(),
            None => std::env::current_dir()?,
        };
        let top = run_git(&dir, &["rev-parse", "--show-toplevel"])?;
        let root = PathBuf::from(String::from_utf8_lossy(&top).trim());
        Ok(Self { root })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn collect_commits(&self) -> Result<Vec<RawCommit>> {
        let has_head = Command::new("git")
            .args(["rev-parse", "--verify", "--quiet", "HEAD"])
            .current_dir(&self.root)
            .output()
            .map_err(|e| AttendError::HistoryRead(format!("failed to run git: {e}")))?
            .status
            .success();
        if !has_head {
            debug!("HEAD is unborn, history is empty");
            return Ok(Vec::new());
        }

        let out = run_git(
            &self.root,
            &["log", "--no-color", "--no-notes", LOG_FORMAT],
        )?;
        let commits = parse_log(&String::from_utf8_lossy(&out))?;
        debug!(count = commits.len(), "commits read via git log");
        Ok(commits)
    }
}

impl CommitSource for GitLog {
    fn path(&self) -> &Path {
        &self.root
    }

    fn read_commits(&self) -> Result<Vec<RawCommit>> {
        self.collect_commits()
    }
}

fn run_git(dir: &Path, args: &[&str]) -> Result<Vec<u8>> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| AttendError::HistoryRead(format!("failed to run git: {e}")))?;
    if !output.status.success() {
        return Err(AttendError::HistoryRead(format!(
            "git {} exited with {}: {}",
            args.first().copied().unwrap_or(""),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    Ok(output.stdout)
}

/// Parse the output of `git log` run with [`LOG_FORMAT`].
///
/// A record that does not have all five fields, or whose timestamp does
/// not parse, fails the whole read rather than being skipped.
pub fn parse_log(output: &str) -> Result<Vec<RawCommit>> {
    let mut commits = Vec::new();
    for (index, record) in output.split(RECORD_SEP).enumerate() {
        let record = record.trim_start_matches(['\r', '\n']);
        if record.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = record.splitn(5, FIELD_SEP).collect();
        let &[hash, iso, name, email, body] = fields.as_slice() else {
            return Err(AttendError::HistoryRead(format!(
                "record {index} has {} fields, expected 5",
                fields.len()
            )));
        };

        let timestamp = DateTime::parse_from_rfc3339(iso.trim()).map_err(|e| {
            AttendError::HistoryRead(format!("record {index} ({hash}): bad timestamp '{iso}': {e}"))
        })?;

        commits.push(RawCommit {
            hash: hash.trim().to_string(),
            author_name: name.to_string(),
            author_email: email.to_string(),
            timestamp,
            message: body.trim_end_matches(['\r', '\n']).to_string(),
        });
    }
    Ok(commits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(hash: &str, iso: &str, name: &str, email: &str, body: &str) -> String {
        format!("{hash}\x1f{iso}\x1f{name}\x1f{email}\x1f{body}\x1e")
    }

    #[test]
    fn parses_records_separated_by_newlines() {
        let out = format!(
            "{}\n{}",
            record("aaa111", "2025-01-15T10:00:00+09:00", "alice", "alice@example.com", "check-in\n\nCheck-In-Date: 2025-01-15\n"),
            record("bbb222", "2025-01-15T01:05:00+00:00", "Bob Smith", "", "docs: typo\n"),
        );
        let commits = parse_log(&out).unwrap();
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].hash, "aaa111");
        assert_eq!(commits[0].message, "check-in\n\nCheck-In-Date: 2025-01-15");
        assert_eq!(commits[0].timestamp.offset().local_minus_utc(), 9 * 3600);
        assert_eq!(commits[1].hash, "bbb222");
        assert_eq!(commits[1].author_name, "Bob Smith");
        assert_eq!(commits[1].subject(), "docs: typo");
        assert_eq!(commits[0].timestamp, commits[1].timestamp - chrono::Duration::minutes(5));
    }

    #[test]
    fn empty_output_is_empty_history() {
        assert!(parse_log("").unwrap().is_empty());
        assert!(parse_log("\n").unwrap().is_empty());
    }

    #[test]
    fn truncated_record_is_fatal() {
        let err = parse_log("aaa111\x1f2025-01-15T10:00:00+09:00\x1falice\x1e").unwrap_err();
        assert!(matches!(err, AttendError::HistoryRead(_)));
    }

    #[test]
    fn bad_timestamp_is_fatal() {
        let out = record("aaa111", "yesterday", "alice", "a@x", "check-in");
        assert!(matches!(parse_log(&out), Err(AttendError::HistoryRead(_))));
    }
}
