//! Public API for git operations.
//!
//! This module provides the stable public API for the clone transport:
//! - The [`Transport`] seam the orchestrator clones through
//! - [`GitCli`], the implementation backed by the `git` binary
//!
//! ## Example: Cloning one repository
//!
//! ```rust,no_run
//! use gsc::core::Credentials;
//! use gsc::git::{GitCli, Transport};
//! use indicatif::ProgressBar;
//! use std::path::Path;
//!
//! async fn clone_one() {
//!     let git = GitCli::new();
//!     let result = git
//!         .clone_repo(
//!             Path::new("group/api"),
//!             "https://gitlab.com/group/api.git",
//!             &Credentials::default(),
//!             &ProgressBar::hidden(),
//!         )
//!         .await;
//!     println!("{result:?}");
//! }
//! ```

pub use super::operations::GitCli;
pub use super::transport::Transport;

// Destination checks and auth helpers, exported for integration tests
pub use super::operations::{basic_auth_header, inspect_destination};
