//! Error types for clone runs

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use super::stats::CloneReport;

/// Failure of a single clone operation, as reported by a transport
#[derive(Error, Debug)]
pub enum CloneError {
    /// The destination already holds a repository. Never reported as a failure.
    #[error("destination already contains a repository")]
    AlreadyExists,

    /// A `.git` directory exists but is not a usable repository,
    /// typically left behind by an interrupted clone
    #[error("partial clone found at {}", .0.display())]
    PartialClone(PathBuf),

    #[error("destination {} exists and is not an empty directory", .0.display())]
    DestinationNotEmpty(PathBuf),

    #[error("invalid repository url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("git clone failed ({code}): {stderr}")]
    Git { code: String, stderr: String },

    #[error("clone timed out after {0} seconds")]
    TimedOut(u64),

    #[error("clone cancelled before it started")]
    Cancelled,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CloneError {
    /// Whether this outcome means the repository is already on disk
    pub fn is_already_exists(&self) -> bool {
        matches!(self, CloneError::AlreadyExists)
    }
}

/// One repository whose clone failed
#[derive(Debug)]
pub struct RepoFailure {
    pub name: String,
    pub path: PathBuf,
    pub error: CloneError,
}

impl fmt::Display for RepoFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.name, self.path.display(), self.error)
    }
}

/// Every per-repository failure collected during one run
#[derive(Debug)]
pub struct AggregateError {
    failures: Vec<RepoFailure>,
    report: CloneReport,
}

impl AggregateError {
    pub(crate) fn new(failures: Vec<RepoFailure>, report: CloneReport) -> Self {
        Self { failures, report }
    }

    /// Counters of the run that produced these failures
    pub fn report(&self) -> &CloneReport {
        &self.report
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failures(&self) -> &[RepoFailure] {
        &self.failures
    }

    pub fn into_failures(self) -> Vec<RepoFailure> {
        self.failures
    }
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = if self.failures.len() == 1 {
            "repository"
        } else {
            "repositories"
        };
        write!(f, "{} {} failed to clone", self.failures.len(), noun)?;
        for failure in &self.failures {
            write!(f, "\n  - {failure}")?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregateError {}

/// Terminal error of a clone run
#[derive(Error, Debug)]
pub enum RunError {
    #[error("no repositories to clone")]
    NoTargets,

    #[error("concurrency must be at least 1")]
    InvalidConcurrency,

    #[error(transparent)]
    Failed(#[from] AggregateError),

    #[error("clone run aborted: {0}")]
    Aborted(String),
}
