use super::CommitSource;
use crate::error::{AttendError, Result};
use crate::model::RawCommit;
use chrono::{DateTime, FixedOffset};
use gix::{discover, ObjectId, Repository};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct GitRepo {
    repo: Repository,
    path: PathBuf,
    show_progress: bool,
}

impl GitRepo {
    /// Open a repository at `path`, or current dir if `None`
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let repo_path = match path {
            Some(p) => p.as_ref().to_path_buf(),
            None => std::env::current_dir()?,
        };

        let repo = discover(&repo_path)?;
        let path = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();

        Ok(Self {
            repo,
            path,
            show_progress: true,
        })
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Visit every commit reachable from HEAD exactly once.
    pub fn collect_commits(&self) -> Result<Vec<RawCommit>> {
        let mut head = self.repo.head()?;
        if head.is_unborn() {
            debug!("HEAD is unborn, history is empty");
            return Ok(Vec::new());
        }
        let head_commit = head.peel_to_commit_in_place()?;

        let mut commits = Vec::new();
        let mut seen: HashSet<ObjectId> = HashSet::new();
        let mut stack: VecDeque<ObjectId> = VecDeque::from([head_commit.id]);

        let pb = if self.show_progress {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::hidden()
        };
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg} {pos}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("Reading commits...");

        while let Some(commit_id) = stack.pop_back() {
            if !seen.insert(commit_id) {
                continue;
            }

            let (commit, parents) = self.read_commit(commit_id)?;
            commits.push(commit);
            stack.extend(parents);
            pb.inc(1);
        }

        pb.finish_and_clear();
        debug!(count = commits.len(), "commits read via gix");
        Ok(commits)
    }

    fn read_commit(&self, commit_id: ObjectId) -> Result<(RawCommit, Vec<ObjectId>)> {
        let commit = self.repo.find_commit(commit_id)?;

        let author = commit.author()?;
        // Author time survives rebase and amend; committer time does not.
        let time = author
            .time()
            .map_err(|e| AttendError::InvalidDate(format!("Invalid author time on {commit_id}: {e}")))?;
        let offset = FixedOffset::east_opt(time.offset)
            .ok_or_else(|| AttendError::InvalidDate(format!("Invalid UTC offset: {}s", time.offset)))?;
        let timestamp = DateTime::from_timestamp(time.seconds, 0)
            .ok_or_else(|| AttendError::InvalidDate(format!("Invalid timestamp: {}", time.seconds)))?
            .with_timezone(&offset);

        let parents: Vec<ObjectId> = commit.parent_ids().map(|id| id.into()).collect();

        let raw = RawCommit {
            hash: commit_id.to_string(),
            author_name: author.name.to_string(),
            author_email: author.email.to_string(),
            timestamp,
            message: commit.message_raw()?.to_string(),
        };

        Ok((raw, parents))
    }
}

impl CommitSource for GitRepo {
    fn path(&self) -> &Path {
        &self.path
    }

    fn read_commits(&self) -> Result<Vec<RawCommit>> {
        self.collect_commits()
    }
}
