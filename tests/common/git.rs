//! Git testing utilities

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Sets up a git repository with user config
/// Returns Ok(()) on success, or an error if git is not available
pub fn setup_git_repo(path: &Path) -> Result<()> {
    let init_result = Command::new("git")
        .args(["init", "-q"])
        .current_dir(path)
        .output()?;

    if !init_result.status.success() {
        anyhow::bail!("Git not available - skipping test");
    }

    Command::new("git")
        .args(["config", "user.name", "Test User"])
        .current_dir(path)
        .output()?;

    Command::new("git")
        .args(["config", "user.email", "test@example.com"])
        .current_dir(path)
        .output()?;

    // Disable commit signing for tests
    Command::new("git")
        .args(["config", "commit.gpgsign", "false"])
        .current_dir(path)
        .output()?;

    Ok(())
}

/// Creates a test commit in the repository
pub fn create_test_commit(
    path: &Path,
    file_name: &str,
    content: &str,
    message: &str,
) -> Result<()> {
    std::fs::write(path.join(file_name), content)?;

    Command::new("git")
        .args(["add", file_name])
        .current_dir(path)
        .output()?;

    let commit_result = Command::new("git")
        .args(["commit", "-q", "-m", message])
        .current_dir(path)
        .output()?;

    if !commit_result.status.success() {
        anyhow::bail!(
            "Failed to create commit: {}",
            String::from_utf8_lossy(&commit_result.stderr)
        );
    }

    Ok(())
}

/// Creates a repository with one commit that can be cloned by path
pub fn create_upstream_repo(parent_dir: &Path, name: &str) -> Result<PathBuf> {
    let repo_path = parent_dir.join(name);
    std::fs::create_dir_all(&repo_path)?;
    setup_git_repo(&repo_path)?;
    create_test_commit(&repo_path, "README.md", &format!("# {name}"), "Initial commit")?;
    Ok(repo_path)
}

/// Checks if git is available in the system
pub fn is_git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Writes the index files git's dumb HTTP protocol needs and returns the
/// `.git` directory to serve
pub fn prepare_dumb_http(repo_path: &Path) -> Result<PathBuf> {
    let result = Command::new("git")
        .args(["update-server-info"])
        .current_dir(repo_path)
        .output()?;

    if !result.status.success() {
        anyhow::bail!(
            "Failed to update server info: {}",
            String::from_utf8_lossy(&result.stderr)
        );
    }

    Ok(repo_path.join(".git"))
}
