//! Group clone command implementation
//!
//! This module handles the clone command - listing the projects of a GitLab
//! group and cloning all of them concurrently into `namespace/name`
//! directories below the destination.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;

use crate::core::config::LISTING_MESSAGE;
use crate::core::{
    clone_all, generate_failure_summary, set_terminal_title, set_terminal_title_and_flush,
    CloneOptions, Credentials, ProgressReporter, RunError,
};
use crate::git::{GitCli, Transport};
use crate::gitlab::{list_repositories, AuthConfig, GitlabClient, ListOptions};

/// Everything the clone command needs, resolved from the command line
#[derive(Clone)]
pub struct CloneCommandConfig {
    pub auth: AuthConfig,
    /// Username for HTTP clones; the token doubles as the password
    pub username: String,
    pub list: ListOptions,
    pub concurrency: usize,
    pub destination: PathBuf,
}

/// Handles the clone command using the `git` binary as transport
pub async fn handle_clone_command(
    config: CloneCommandConfig,
    progress: ProgressReporter,
) -> Result<()> {
    handle_clone_command_with(config, progress, Arc::new(GitCli::new())).await
}

/// Handles the clone command with a caller-supplied transport
pub async fn handle_clone_command_with<T>(
    config: CloneCommandConfig,
    progress: ProgressReporter,
    transport: Arc<T>,
) -> Result<()>
where
    T: Transport + ?Sized + 'static,
{
    set_terminal_title("🚀 gsc");
    let result = run_clone_command(config, progress, transport).await;
    set_terminal_title_and_flush("✅ gsc");
    result
}

async fn run_clone_command<T>(
    config: CloneCommandConfig,
    progress: ProgressReporter,
    transport: Arc<T>,
) -> Result<()>
where
    T: Transport + ?Sized + 'static,
{
    let group = config.list.group;

    let client = GitlabClient::new(&config.auth).context("couldn't create GitLab client")?;
    tracing::debug!(host = %config.auth.host, "GitLab client successfully created");

    progress.println(LISTING_MESSAGE);
    let descriptors = list_repositories(&client, &config.list)
        .await
        .with_context(|| format!("couldn't get projects for group with ID {group}"))?;

    let repo_word = if descriptors.len() == 1 {
        "repository"
    } else {
        "repositories"
    };
    tracing::info!(
        "cloning {} {} ({} concurrent)",
        descriptors.len(),
        repo_word,
        config.concurrency
    );

    // Ctrl-C stops clones that have not started yet
    let (cancel_tx, cancel_rx) = watch::channel(false);
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, waiting for running clones to finish");
            let _ = cancel_tx.send(true);
        }
    });

    let options = CloneOptions::new(
        config.concurrency,
        Credentials::new(config.username, config.auth.token),
    )
    .with_destination_root(config.destination)
    .with_progress(progress)
    .with_cancel(cancel_rx);

    let outcome = clone_all(descriptors, &options, transport).await;
    interrupt.abort();

    match outcome {
        Ok(report) => {
            println!("\n{}", report.summary());
            Ok(())
        }
        Err(RunError::Failed(aggregate)) => {
            println!("\n{}", aggregate.report().summary());
            println!("{}", "━".repeat(70));
            println!("{}", generate_failure_summary(aggregate.failures()));
            println!("{}", "━".repeat(70));
            Err(anyhow::Error::new(aggregate).context("couldn't clone projects"))
        }
        Err(e) => Err(anyhow::Error::new(e).context("couldn't clone projects")),
    }
}
