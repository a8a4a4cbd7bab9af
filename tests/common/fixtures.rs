//! Test fixtures: descriptor builders and a scriptable clone transport

use async_trait::async_trait;
use gsc::core::{CloneError, Credentials, RepositoryDescriptor};
use gsc::git::Transport;
use indicatif::ProgressBar;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub const MOCK_NAMESPACE: &str = "acme";

/// Builds a descriptor under the `acme` namespace
pub fn descriptor(name: &str) -> RepositoryDescriptor {
    RepositoryDescriptor::new(name, MOCK_NAMESPACE, mock_url(name))
}

/// Builds `count` descriptors named `repo-0`, `repo-1`, ...
pub fn descriptors(count: usize) -> Vec<RepositoryDescriptor> {
    (0..count).map(|i| descriptor(&format!("repo-{i}"))).collect()
}

pub fn mock_url(name: &str) -> String {
    format!("https://gitlab.test/{MOCK_NAMESPACE}/{name}.git")
}

/// What the mock transport does for one repository
#[derive(Debug, Clone)]
pub enum MockOutcome {
    Succeed,
    AlreadyExists,
    Fail(String),
    Panic,
}

/// Transport double that records calls and in-flight concurrency
pub struct MockTransport {
    outcomes: HashMap<String, MockOutcome>,
    delay: Duration,
    remember_clones: bool,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    clones_performed: AtomicUsize,
    calls: Mutex<Vec<(PathBuf, String)>>,
    populated: Mutex<HashSet<PathBuf>>,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            outcomes: HashMap::new(),
            delay: Duration::ZERO,
            remember_clones: false,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            clones_performed: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
            populated: Mutex::new(HashSet::new()),
        }
    }

    /// Scripts the outcome for the repository with this name
    pub fn with_outcome(mut self, name: &str, outcome: MockOutcome) -> Self {
        self.outcomes.insert(mock_url(name), outcome);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Reports destinations cloned earlier as already existing
    pub fn remembering_clones(mut self) -> Self {
        self.remember_clones = true;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn called_destinations(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().iter().map(|(p, _)| p.clone()).collect()
    }

    pub fn called_urls(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(_, u)| u.clone()).collect()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn clones_performed(&self) -> usize {
        self.clones_performed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn clone_repo(
        &self,
        destination: &Path,
        url: &str,
        _credentials: &Credentials,
        progress: &ProgressBar,
    ) -> Result<(), CloneError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.calls
            .lock()
            .unwrap()
            .push((destination.to_path_buf(), url.to_string()));

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        progress.inc(1024);

        let outcome = self
            .outcomes
            .get(url)
            .cloned()
            .unwrap_or(MockOutcome::Succeed);

        let result = match outcome {
            MockOutcome::Succeed => {
                if self.remember_clones
                    && !self.populated.lock().unwrap().insert(destination.to_path_buf())
                {
                    Err(CloneError::AlreadyExists)
                } else {
                    self.clones_performed.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            }
            MockOutcome::AlreadyExists => Err(CloneError::AlreadyExists),
            MockOutcome::Fail(message) => Err(CloneError::Io(std::io::Error::other(message))),
            MockOutcome::Panic => {
                self.in_flight.fetch_sub(1, Ordering::SeqCst);
                panic!("mock transport panicked for {url}");
            }
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}
