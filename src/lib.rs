//! # gsc
//!
//! `gsc` clones every repository of a GitLab group into a directory tree
//! that mirrors the group structure. It powers the `gsc` CLI tool.
//!
//! ## Core Features
//!
//! - **Group Listing**: Resolves a group and, optionally, all descendant groups.
//! - **Name Filtering**: Regex matcher applied to project names.
//! - **Bounded Concurrency**: At most N clones in flight, failures isolated per repository.
//! - **Idempotent Re-runs**: Existing clones are skipped, not reported as errors.
//!
//! ## Example
//!
//! ```rust,no_run
//! use gsc::core::{clone_all, CloneOptions, Credentials, RepositoryDescriptor};
//! use gsc::git::GitCli;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let repos = vec![RepositoryDescriptor::new(
//!         "api",
//!         "acme/backend",
//!         "https://gitlab.com/acme/backend/api.git",
//!     )];
//!     let options = CloneOptions::new(4, Credentials::default());
//!     match clone_all(repos, &options, Arc::new(GitCli::new())).await {
//!         Ok(report) => println!("{}", report.summary()),
//!         Err(e) => eprintln!("{e}"),
//!     }
//! }
//! ```

pub mod commands;
pub mod core;
pub mod git;
pub mod gitlab;
pub mod utils;
