//! Common test utilities and helpers
#![allow(dead_code, unused_imports)]

pub mod fixtures;
pub mod git;

pub use self::fixtures::{descriptor, descriptors, MockOutcome, MockTransport};
pub use self::git::{create_upstream_repo, is_git_available, prepare_dumb_http, setup_git_repo};
