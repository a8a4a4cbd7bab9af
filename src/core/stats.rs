//! Statistics tracking for clone runs

use crate::core::config::{
    ERROR_MESSAGE_MAX_LENGTH, ERROR_MESSAGE_TRUNCATE_LENGTH, PATH_DISPLAY_WIDTH,
};
use crate::core::error::{CloneError, RepoFailure};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Statistics for tracking clone results across concurrent workers
///
/// Uses atomic counters for lock-free updates of simple counters,
/// while the failure list stays behind a Mutex.
#[derive(Debug, Default)]
pub struct CloneStatistics {
    pub attempted_repos: AtomicU64,
    pub cloned_repos: AtomicU64,
    pub existing_repos: AtomicU64,
    pub error_repos: AtomicU64,
    failed_repos: Mutex<Vec<RepoFailure>>,
}

impl CloneStatistics {
    /// Creates a new statistics tracker with all counters initialized to zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the outcome of one clone attempt
    pub fn record(&self, repo_name: &str, repo_path: &Path, result: Result<(), CloneError>) {
        self.attempted_repos.fetch_add(1, Ordering::Relaxed);
        match result {
            Ok(()) => {
                self.cloned_repos.fetch_add(1, Ordering::Relaxed);
            }
            Err(CloneError::AlreadyExists) => {
                self.existing_repos.fetch_add(1, Ordering::Relaxed);
            }
            Err(error) => {
                self.error_repos.fetch_add(1, Ordering::Relaxed);
                let failure = RepoFailure {
                    name: repo_name.to_string(),
                    path: repo_path.to_path_buf(),
                    error,
                };
                // A poisoned lock only means another worker panicked mid-push;
                // the vector itself is still consistent.
                match self.failed_repos.lock() {
                    Ok(mut guard) => guard.push(failure),
                    Err(poisoned) => poisoned.into_inner().push(failure),
                }
            }
        }
    }

    pub fn attempted(&self) -> u64 {
        self.attempted_repos.load(Ordering::Relaxed)
    }

    pub fn cloned(&self) -> u64 {
        self.cloned_repos.load(Ordering::Relaxed)
    }

    pub fn existing(&self) -> u64 {
        self.existing_repos.load(Ordering::Relaxed)
    }

    pub fn errors(&self) -> u64 {
        self.error_repos.load(Ordering::Relaxed)
    }

    /// Drains collected failures, sorted by destination path
    pub fn take_failures(&self) -> Vec<RepoFailure> {
        let mut failures = match self.failed_repos.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        };
        failures.sort_by(|a, b| a.path.cmp(&b.path));
        failures
    }
}

/// Snapshot of a finished run, handed to the caller after the join barrier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloneReport {
    pub total: u64,
    pub cloned: u64,
    pub existing: u64,
    pub failed: u64,
    pub duration: Duration,
}

impl CloneReport {
    pub(crate) fn from_statistics(stats: &CloneStatistics, duration: Duration) -> Self {
        Self {
            total: stats.attempted(),
            cloned: stats.cloned(),
            existing: stats.existing(),
            failed: stats.errors(),
            duration,
        }
    }

    /// Generates a one-line summary of the run
    pub fn summary(&self) -> String {
        let duration_secs = self.duration.as_secs_f64();
        if self.failed > 0 {
            format!(
                "⚠️  Completed with failures in {:.1}s • {} cloned • {} already present • {} failed",
                duration_secs, self.cloned, self.existing, self.failed
            )
        } else {
            format!(
                "✅ Completed in {:.1}s • {} cloned • {} already present",
                duration_secs, self.cloned, self.existing
            )
        }
    }
}

/// Generates the detailed failure tree shown after a run
pub fn generate_failure_summary(failures: &[RepoFailure]) -> String {
    if failures.is_empty() {
        return String::new();
    }

    let mut lines = Vec::with_capacity(failures.len() + 1);
    lines.push(format!("🔴 FAILED REPOS ({})", failures.len()));
    for (i, failure) in failures.iter().enumerate() {
        let tree_char = if i == failures.len() - 1 {
            "└─"
        } else {
            "├─"
        };
        let short_path =
            crate::utils::shorten_path(&failure.path.to_string_lossy(), PATH_DISPLAY_WIDTH);
        lines.push(format!(
            "   {} {:20} {:30} # {}",
            tree_char,
            failure.name,
            short_path,
            clean_error_message(&failure.error.to_string())
        ));
    }

    lines.join("\n")
}

/// Cleans and formats error messages for display
pub(crate) fn clean_error_message(error: &str) -> String {
    // Replace newlines/tabs with spaces and collapse whitespace
    let cleaned = error
        .replace('\n', " ")
        .replace('\r', "")
        .replace('\t', " ");
    let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

    if cleaned.contains("Authentication failed") || cleaned.contains("HTTP Basic: Access denied")
    {
        "authentication failed".to_string()
    } else if cleaned.contains("not found") {
        "repository not found".to_string()
    } else if cleaned.contains("timed out") {
        "timeout".to_string()
    } else if cleaned.contains("Could not resolve host") || cleaned.contains("Connection") {
        "network error".to_string()
    } else if cleaned.chars().count() > ERROR_MESSAGE_MAX_LENGTH {
        let truncated: String = cleaned.chars().take(ERROR_MESSAGE_TRUNCATE_LENGTH).collect();
        format!("{truncated}...")
    } else {
        cleaned
    }
}
