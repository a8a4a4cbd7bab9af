//! Concurrent clone orchestration
//!
//! Every repository gets its own tokio task. A per-run semaphore bounds how
//! many of them are inside the transport at once, failures are collected in
//! shared statistics, and the run only returns after every task has been
//! joined.

use futures::stream::{FuturesUnordered, StreamExt};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{watch, OwnedSemaphorePermit, Semaphore};

use super::error::{AggregateError, CloneError, RunError};
use super::progress::{finish_clone_bar, ProgressReporter};
use super::repository::{clone_target, Credentials, RepositoryDescriptor};
use super::stats::{clean_error_message, CloneReport, CloneStatistics};
use crate::git::Transport;

/// Settings shared by every clone of one run
#[derive(Clone)]
pub struct CloneOptions {
    /// Maximum number of clones in flight
    pub concurrency: usize,
    pub credentials: Credentials,
    /// Directory the `namespace/name` targets are created under
    pub destination_root: PathBuf,
    pub progress: ProgressReporter,
    /// Flips to `true` to stop clones that have not started yet
    pub cancel: Option<watch::Receiver<bool>>,
}

impl CloneOptions {
    pub fn new(concurrency: usize, credentials: Credentials) -> Self {
        Self {
            concurrency,
            credentials,
            destination_root: PathBuf::from("."),
            progress: ProgressReporter::hidden(),
            cancel: None,
        }
    }

    pub fn with_destination_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.destination_root = root.into();
        self
    }

    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_cancel(mut self, cancel: watch::Receiver<bool>) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

/// Clones every descriptor, at most `options.concurrency` at a time
///
/// Returns [`RunError::NoTargets`] without spawning anything when the list is
/// empty. A destination that already holds a repository counts as success.
/// Any other transport error is collected and returned as one
/// [`AggregateError`] once all clones have finished.
pub async fn clone_all<T>(
    descriptors: Vec<RepositoryDescriptor>,
    options: &CloneOptions,
    transport: Arc<T>,
) -> Result<CloneReport, RunError>
where
    T: Transport + ?Sized + 'static,
{
    if descriptors.is_empty() {
        return Err(RunError::NoTargets);
    }
    if options.concurrency == 0 {
        return Err(RunError::InvalidConcurrency);
    }

    // Semaphore::new panics above MAX_PERMITS
    let permits = options
        .concurrency
        .min(descriptors.len())
        .min(Semaphore::MAX_PERMITS);

    let start_time = Instant::now();
    let semaphore = Arc::new(Semaphore::new(permits));
    let statistics = Arc::new(CloneStatistics::new());
    let credentials = Arc::new(options.credentials.clone());

    tracing::debug!(
        repositories = descriptors.len(),
        concurrency = permits,
        "starting clone run"
    );

    let mut units = FuturesUnordered::new();
    for descriptor in descriptors {
        let unit = CloneUnit {
            descriptor,
            root: options.destination_root.clone(),
            semaphore: Arc::clone(&semaphore),
            transport: Arc::clone(&transport),
            credentials: Arc::clone(&credentials),
            progress: options.progress.clone(),
            statistics: Arc::clone(&statistics),
            cancel: options.cancel.clone(),
        };
        units.push(tokio::spawn(unit.run()));
    }

    // Join barrier: drain every handle, even after an abort
    let mut aborted = Vec::new();
    while let Some(joined) = units.next().await {
        if let Err(e) = joined {
            tracing::error!(error = %e, "clone task aborted");
            aborted.push(e.to_string());
        }
    }

    if !aborted.is_empty() {
        return Err(RunError::Aborted(aborted.join("; ")));
    }

    let report = CloneReport::from_statistics(&statistics, start_time.elapsed());
    let failures = statistics.take_failures();
    if failures.is_empty() {
        Ok(report)
    } else {
        Err(AggregateError::new(failures, report).into())
    }
}

struct CloneUnit<T: ?Sized> {
    descriptor: RepositoryDescriptor,
    root: PathBuf,
    semaphore: Arc<Semaphore>,
    transport: Arc<T>,
    credentials: Arc<Credentials>,
    progress: ProgressReporter,
    statistics: Arc<CloneStatistics>,
    cancel: Option<watch::Receiver<bool>>,
}

impl<T> CloneUnit<T>
where
    T: Transport + ?Sized + 'static,
{
    async fn run(mut self) {
        let name = self.descriptor.name.clone();
        let destination = self.root.join(clone_target(&self.descriptor));

        let permit = match acquire_permit(&self.semaphore, self.cancel.as_mut()).await {
            Ok(permit) => permit,
            Err(e) => {
                tracing::warn!(repo = %name, "skipping clone: {e}");
                self.statistics.record(&name, &destination, Err(e));
                return;
            }
        };

        tracing::info!(repo = %name, path = %destination.display(), "cloning project");
        self.progress.println(&format!("Cloning project: {name}"));
        let pb = self.progress.create_clone_bar(&name);

        let result = self
            .transport
            .clone_repo(&destination, &self.descriptor.url, &self.credentials, &pb)
            .await;
        drop(permit);

        match &result {
            Ok(()) => finish_clone_bar(&pb, &name, "✅", "cloned"),
            Err(CloneError::AlreadyExists) => {
                tracing::debug!(repo = %name, "already cloned, skipping");
                finish_clone_bar(&pb, &name, "🟢", "already present");
            }
            Err(e) => {
                tracing::warn!(repo = %name, error = %e, "clone failed");
                finish_clone_bar(&pb, &name, "🔴", &clean_error_message(&e.to_string()));
            }
        }

        self.statistics.record(&name, &destination, result);
    }
}

/// Waits for a concurrency slot unless the run is cancelled first
async fn acquire_permit(
    semaphore: &Arc<Semaphore>,
    cancel: Option<&mut watch::Receiver<bool>>,
) -> Result<OwnedSemaphorePermit, CloneError> {
    let Some(cancel) = cancel else {
        return Arc::clone(semaphore)
            .acquire_owned()
            .await
            .map_err(|_| CloneError::Cancelled);
    };

    let cancelled = *cancel.borrow();
    if cancelled {
        return Err(CloneError::Cancelled);
    }

    tokio::select! {
        biased;
        _ = wait_for_cancel(cancel) => Err(CloneError::Cancelled),
        permit = Arc::clone(semaphore).acquire_owned() => permit.map_err(|_| CloneError::Cancelled),
    }
}

async fn wait_for_cancel(cancel: &mut watch::Receiver<bool>) {
    let cancelled = cancel.wait_for(|cancelled| *cancelled).await.is_ok();
    // A dropped sender can never cancel the run
    if !cancelled {
        std::future::pending::<()>().await;
    }
}
