//! Integration tests for the git-backed transport
//!
//! These clone real repositories from local upstream directories, or over
//! HTTP from a wiremock server. They are skipped when git is not installed.

mod common;
use common::{create_upstream_repo, is_git_available, prepare_dumb_http};

use anyhow::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use gsc::core::{clone_all, CloneError, CloneOptions, Credentials, RepositoryDescriptor, RunError};
use gsc::git::{GitCli, Transport};
use indicatif::ProgressBar;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Serves every file of a git directory under `prefix`, but only to requests
/// carrying the expected `Authorization` header
async fn serve_git_dir(
    server: &MockServer,
    git_dir: &Path,
    prefix: &str,
    authorization: &str,
) -> Result<()> {
    let mut pending = vec![git_dir.to_path_buf()];
    while let Some(dir) = pending.pop() {
        for entry in std::fs::read_dir(&dir)? {
            let entry_path = entry?.path();
            if entry_path.is_dir() {
                pending.push(entry_path);
                continue;
            }
            let relative = entry_path
                .strip_prefix(git_dir)?
                .to_string_lossy()
                .replace('\\', "/");
            let body = std::fs::read(&entry_path)?;
            Mock::given(method("GET"))
                .and(path(format!("{prefix}/{relative}")))
                .and(header("authorization", authorization))
                .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
                .mount(server)
                .await;
        }
    }
    Ok(())
}

#[tokio::test]
async fn test_clone_repo_creates_namespace_directories() -> Result<()> {
    if !is_git_available() {
        eprintln!("Git not available, skipping test");
        return Ok(());
    }

    let upstreams = TempDir::new()?;
    let upstream = create_upstream_repo(upstreams.path(), "api")?;
    let workspace = TempDir::new()?;
    let destination = workspace.path().join("acme").join("backend").join("api");

    GitCli::new()
        .clone_repo(
            &destination,
            &upstream.to_string_lossy(),
            &Credentials::default(),
            &ProgressBar::hidden(),
        )
        .await?;

    assert!(destination.join(".git").join("HEAD").exists());
    assert_eq!(std::fs::read_to_string(destination.join("README.md"))?, "# api");

    Ok(())
}

#[tokio::test]
async fn test_http_clone_sends_token_without_persisting_it() -> Result<()> {
    if !is_git_available() {
        eprintln!("Git not available, skipping test");
        return Ok(());
    }

    let upstreams = TempDir::new()?;
    let upstream = create_upstream_repo(upstreams.path(), "api")?;
    let git_dir = prepare_dumb_http(&upstream)?;

    let token = "glpat-SECRET123";
    let encoded = STANDARD.encode(format!("bot:{token}"));
    let server = MockServer::start().await;
    serve_git_dir(&server, &git_dir, "/acme/api.git", &format!("Basic {encoded}")).await?;

    let workspace = TempDir::new()?;
    let destination = workspace.path().join("acme").join("api");
    let url = format!("{}/acme/api.git", server.uri());

    GitCli::new()
        .clone_repo(
            &destination,
            &url,
            &Credentials::new("bot", token),
            &ProgressBar::hidden(),
        )
        .await?;

    assert_eq!(std::fs::read_to_string(destination.join("README.md"))?, "# api");
    let config = std::fs::read_to_string(destination.join(".git").join("config"))?;
    assert!(!config.contains(token), "token written to .git/config:\n{config}");
    assert!(!config.contains(&encoded));
    assert!(config.contains(&url));

    Ok(())
}

#[tokio::test]
async fn test_second_clone_reports_already_exists() -> Result<()> {
    if !is_git_available() {
        eprintln!("Git not available, skipping test");
        return Ok(());
    }

    let upstreams = TempDir::new()?;
    let upstream = create_upstream_repo(upstreams.path(), "web")?;
    let workspace = TempDir::new()?;
    let destination = workspace.path().join("acme").join("web");
    let git = GitCli::new();
    let url = upstream.to_string_lossy().to_string();

    git.clone_repo(&destination, &url, &Credentials::default(), &ProgressBar::hidden())
        .await?;
    let second = git
        .clone_repo(&destination, &url, &Credentials::default(), &ProgressBar::hidden())
        .await;

    assert!(matches!(second, Err(CloneError::AlreadyExists)));

    Ok(())
}

#[tokio::test]
async fn test_missing_upstream_is_a_git_error() -> Result<()> {
    if !is_git_available() {
        eprintln!("Git not available, skipping test");
        return Ok(());
    }

    let workspace = TempDir::new()?;
    let missing = workspace.path().join("does-not-exist");
    let destination = workspace.path().join("acme").join("ghost");

    let result = GitCli::new()
        .clone_repo(
            &destination,
            &missing.to_string_lossy(),
            &Credentials::default(),
            &ProgressBar::hidden(),
        )
        .await;

    match result {
        Err(CloneError::Git { code, stderr }) => {
            assert_eq!(code, "128");
            assert!(!stderr.is_empty());
        }
        other => panic!("expected git error, got {other:?}"),
    }

    Ok(())
}

#[tokio::test]
async fn test_partial_clone_is_not_already_exists() -> Result<()> {
    let workspace = TempDir::new()?;
    let destination = workspace.path().join("acme").join("broken");
    std::fs::create_dir_all(destination.join(".git"))?;

    let result = GitCli::new()
        .clone_repo(
            &destination,
            "https://gitlab.test/acme/broken.git",
            &Credentials::default(),
            &ProgressBar::hidden(),
        )
        .await;

    assert!(matches!(result, Err(CloneError::PartialClone(_))));

    Ok(())
}

#[tokio::test]
async fn test_orchestrated_run_over_local_upstreams() -> Result<()> {
    if !is_git_available() {
        eprintln!("Git not available, skipping test");
        return Ok(());
    }

    let upstreams = TempDir::new()?;
    let workspace = TempDir::new()?;
    let mut repos = Vec::new();
    for name in ["api", "web", "docs"] {
        let upstream = create_upstream_repo(upstreams.path(), name)?;
        repos.push(RepositoryDescriptor::new(
            name,
            "acme",
            upstream.to_string_lossy(),
        ));
    }
    repos.push(RepositoryDescriptor::new(
        "missing",
        "acme",
        upstreams.path().join("missing").to_string_lossy(),
    ));

    let options = CloneOptions::new(2, Credentials::default())
        .with_destination_root(workspace.path());
    let transport = Arc::new(GitCli::new());

    let result = clone_all(repos.clone(), &options, Arc::clone(&transport)).await;
    let aggregate = match result {
        Err(RunError::Failed(aggregate)) => aggregate,
        other => panic!("expected one failed clone, got {other:?}"),
    };
    assert_eq!(aggregate.len(), 1);
    assert_eq!(aggregate.failures()[0].name, "missing");
    for name in ["api", "web", "docs"] {
        assert!(workspace.path().join("acme").join(name).join("README.md").exists());
    }

    // Re-running only reports the repository that never cloned
    let rerun = clone_all(repos, &options, transport).await;
    match rerun {
        Err(RunError::Failed(aggregate)) => {
            assert_eq!(aggregate.len(), 1);
            assert_eq!(aggregate.report().existing, 3);
        }
        other => panic!("expected one failed clone on re-run, got {other:?}"),
    }

    Ok(())
}
