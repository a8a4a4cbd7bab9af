//! Public API for the core module.
//!
//! This module provides the stable public API for core functionality including:
//! - The concurrent clone orchestrator
//! - Repository descriptors and credentials
//! - Error and statistics types produced by a run
//! - Configuration utilities
//!
//! Internal implementation details are not exposed through this API.

// Orchestration
pub use super::clone::{clone_all, CloneOptions};

// Core types
pub use super::repository::{clone_target, Credentials, RepositoryDescriptor};
pub use super::error::{AggregateError, CloneError, RepoFailure, RunError};
pub use super::stats::{generate_failure_summary, CloneReport, CloneStatistics};
pub use super::progress::ProgressReporter;

// Configuration
pub use super::config::{get_clone_concurrency, DEFAULT_CLONE_CONCURRENCY, DEFAULT_GITLAB_HOST};

// Terminal utilities (re-exported from utils)
pub use crate::utils::{set_terminal_title, set_terminal_title_and_flush};
