//! Clone transport backed by the `git` binary

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use indicatif::ProgressBar;
use reqwest::Url;
use std::collections::VecDeque;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

use super::transport::Transport;
use crate::core::config::{CLONE_TIMEOUT_SECS, TOKEN_ONLY_USERNAME};
use crate::core::{CloneError, Credentials};

// Git command arguments
const GIT_CLONE_ARGS: &[&str] = &["clone", "--progress"];

// Progress output prefixes that never carry error information
const PROGRESS_PREFIXES: &[&str] = &[
    "Cloning into",
    "Receiving objects",
    "Resolving deltas",
    "Updating files",
    "remote: Enumerating objects",
    "remote: Counting objects",
    "remote: Compressing objects",
    "remote: Total",
];

// Command-scoped git configuration; never written to the cloned repository
const GIT_CONFIG_COUNT_ENV: &str = "GIT_CONFIG_COUNT";
const GIT_CONFIG_KEY_ENV: &str = "GIT_CONFIG_KEY_0";
const GIT_CONFIG_VALUE_ENV: &str = "GIT_CONFIG_VALUE_0";
const EXTRA_HEADER_KEY: &str = "http.extraHeader";

const STDERR_TAIL_LINES: usize = 8;
const REDACTED: &str = "***";

/// Clones with `git clone`, streaming its progress output into the bar
#[derive(Debug, Clone)]
pub struct GitCli {
    timeout: Duration,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

impl GitCli {
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(CLONE_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    async fn run_clone(
        &self,
        destination: &Path,
        url: &str,
        auth_header: Option<&str>,
        progress: &ProgressBar,
    ) -> Result<(), CloneError> {
        let mut command = Command::new("git");
        command
            .args(GIT_CLONE_ARGS)
            .arg(url)
            .arg(destination)
            .env("GIT_TERMINAL_PROMPT", "0");
        if let Some(header) = auth_header {
            command
                .env(GIT_CONFIG_COUNT_ENV, "1")
                .env(GIT_CONFIG_KEY_ENV, EXTRA_HEADER_KEY)
                .env(GIT_CONFIG_VALUE_ENV, header);
        }

        let mut child = command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let mut tail: VecDeque<String> = VecDeque::with_capacity(STDERR_TAIL_LINES);
        if let Some(stderr) = child.stderr.take() {
            // git redraws progress with carriage returns
            let mut segments = BufReader::new(stderr).split(b'\r');
            while let Some(segment) = segments.next_segment().await? {
                let segment = String::from_utf8_lossy(&segment);
                for line in segment.split('\n').map(str::trim).filter(|l| !l.is_empty()) {
                    if let Some(bytes) = parse_received_bytes(line) {
                        progress.set_position(bytes);
                    }
                    progress.set_message(line.to_string());
                    if !is_progress_line(line) {
                        if tail.len() == STDERR_TAIL_LINES {
                            tail.pop_front();
                        }
                        tail.push_back(line.to_string());
                    }
                }
            }
        }

        let status = child.wait().await?;
        if status.success() {
            return Ok(());
        }

        let code = status
            .code()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "signal".to_string());
        Err(CloneError::Git {
            code,
            stderr: Vec::from(tail).join("\n"),
        })
    }
}

#[async_trait]
impl Transport for GitCli {
    async fn clone_repo(
        &self,
        destination: &Path,
        url: &str,
        credentials: &Credentials,
        progress: &ProgressBar,
    ) -> Result<(), CloneError> {
        inspect_destination(destination).await?;
        let auth_header = basic_auth_header(url, credentials)?;

        if let Some(parent) = destination.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        tracing::debug!(destination = %destination.display(), url, "running git clone");
        let clone = self.run_clone(destination, url, auth_header.as_deref(), progress);
        match tokio::time::timeout(self.timeout, clone).await {
            Ok(result) => result.map_err(|e| redact_error(e, credentials)),
            Err(_) => Err(CloneError::TimedOut(self.timeout.as_secs())),
        }
    }
}

/// Classifies an existing destination before cloning into it
///
/// A `.git/HEAD` file means a finished clone. A `.git` entry without `HEAD`
/// is reported as a partial clone, and any other non-empty directory blocks
/// the clone.
pub async fn inspect_destination(destination: &Path) -> Result<(), CloneError> {
    let git_dir = destination.join(".git");
    if tokio::fs::try_exists(git_dir.join("HEAD")).await? {
        return Err(CloneError::AlreadyExists);
    }
    if tokio::fs::try_exists(&git_dir).await? {
        return Err(CloneError::PartialClone(destination.to_path_buf()));
    }

    match tokio::fs::read_dir(destination).await {
        Ok(mut entries) => {
            if entries.next_entry().await?.is_some() {
                Err(CloneError::DestinationNotEmpty(destination.to_path_buf()))
            } else {
                Ok(())
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Builds the `Authorization` header git sends with an HTTP(S) clone
///
/// The header reaches git through its environment, so the token never shows
/// up in the process arguments or in the clone's `remote.origin.url`.
/// Non-HTTP URLs (ssh, local paths) and empty tokens get no header.
pub fn basic_auth_header(
    url: &str,
    credentials: &Credentials,
) -> Result<Option<String>, CloneError> {
    if credentials.token.is_empty() || !url.contains("://") {
        return Ok(None);
    }

    let parsed = Url::parse(url).map_err(|e| CloneError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Ok(None);
    }

    Ok(Some(format!(
        "Authorization: Basic {}",
        encoded_credentials(credentials)
    )))
}

fn encoded_credentials(credentials: &Credentials) -> String {
    let username = if credentials.username.is_empty() {
        TOKEN_ONLY_USERNAME
    } else {
        credentials.username.as_str()
    };
    STANDARD.encode(format!("{username}:{}", credentials.token))
}

/// Extracts the transferred size from a `Receiving objects` progress line
pub(crate) fn parse_received_bytes(line: &str) -> Option<u64> {
    if !line.starts_with("Receiving objects") {
        return None;
    }
    // "Receiving objects:  45% (450/1000), 1.20 MiB | 2.00 MiB/s"
    let (_, after_comma) = line.split_once("), ")?;
    let amount = after_comma.split('|').next()?.trim();
    let (value, unit) = amount.split_once(' ')?;
    let value: f64 = value.parse().ok()?;
    let multiplier = match unit {
        "bytes" => 1.0,
        "KiB" => 1024.0,
        "MiB" => 1024.0 * 1024.0,
        "GiB" => 1024.0 * 1024.0 * 1024.0,
        _ => return None,
    };
    Some((value * multiplier) as u64)
}

fn is_progress_line(line: &str) -> bool {
    PROGRESS_PREFIXES.iter().any(|prefix| line.starts_with(prefix))
}

fn redact_error(error: CloneError, credentials: &Credentials) -> CloneError {
    if credentials.token.is_empty() {
        return error;
    }
    match error {
        CloneError::Git { code, stderr } => CloneError::Git {
            code,
            stderr: stderr
                .replace(&credentials.token, REDACTED)
                .replace(&encoded_credentials(credentials), REDACTED),
        },
        other => other,
    }
}
