//! GitLab group listing
//!
//! Resolves a group (and optionally all of its descendant groups), lists
//! their non-archived projects and turns them into clone descriptors.

pub mod client;
pub mod groups;

pub use client::{AuthConfig, GitlabClient, ListError};
pub use groups::{
    filter_projects, get_group_projects, list_repositories, Group, ListOptions, Namespace,
    Project,
};
