//! Commit source adapters: everything that turns a repository into
//! [`RawCommit`]s. Nothing here knows what a check-in is.

pub mod log;
pub mod repo;

pub use log::{parse_log, GitLog};
pub use repo::GitRepo;

use crate::error::Result;
use crate::model::RawCommit;
use std::path::{Path, PathBuf};

/// Read-once access to the full commit history.
pub trait CommitSource {
    /// Work tree the history belongs to.
    fn path(&self) -> &Path;

    /// Every commit in history. Any failure is fatal for the run.
    fn read_commits(&self) -> Result<Vec<RawCommit>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Backend {
    /// Walk the object database in-process
    #[default]
    Gix,
    /// Shell out to `git log`
    GitCli,
}

/// Open the repository at `path` (or the current directory) with the chosen backend.
pub fn open_source(
    backend: Backend,
    path: Option<&PathBuf>,
    show_progress: bool,
) -> Result<Box<dyn CommitSource>> {
    Ok(match backend {
        Backend::Gix => Box::new(GitRepo::open(path)?.with_progress(show_progress)),
        Backend::GitCli => Box::new(GitLog::open(path)?),
    })
}

/// In-memory history, used by tests and by callers that already hold commits.
pub struct MemorySource {
    path: PathBuf,
    commits: Vec<RawCommit>,
}

impl MemorySource {
    pub fn new(commits: Vec<RawCommit>) -> Self {
        Self {
            path: PathBuf::from("."),
            commits,
        }
    }
}

impl CommitSource for MemorySource {
    fn path(&self) -> &Path {
        &self.path
    }

    fn read_commits(&self) -> Result<Vec<RawCommit>> {
        Ok(self.commits.clone())
    }
}
