//! Clone transport abstraction

use async_trait::async_trait;
use indicatif::ProgressBar;
use std::path::Path;

use crate::core::{CloneError, Credentials};

/// Performs a single clone into a local directory
///
/// Implementations must return [`CloneError::AlreadyExists`] when the
/// destination already holds a repository; every other error is reported to
/// the user as a failed clone.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn clone_repo(
        &self,
        destination: &Path,
        url: &str,
        credentials: &Credentials,
        progress: &ProgressBar,
    ) -> Result<(), CloneError>;
}
