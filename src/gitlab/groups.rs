//! Group and project listing

use regex::Regex;
use serde::Deserialize;

use super::client::{GitlabClient, ListError};
use crate::core::RepositoryDescriptor;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Group {
    pub id: u64,
    #[serde(default)]
    pub full_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Namespace {
    pub full_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
    pub http_url_to_repo: String,
    pub namespace: Namespace,
}

impl From<Project> for RepositoryDescriptor {
    fn from(project: Project) -> Self {
        RepositoryDescriptor::new(
            project.name,
            project.namespace.full_path,
            project.http_url_to_repo,
        )
    }
}

/// Which projects of a group to clone
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub group: u64,
    /// Include every descendant group
    pub recursive: bool,
    /// Regex applied to project names; empty keeps everything
    pub matcher: String,
}

impl GitlabClient {
    /// Lists all descendant groups of a group
    pub async fn list_subgroups(&self, group: u64) -> Result<Vec<Group>, ListError> {
        self.get_paginated(&format!("/groups/{group}/descendant_groups"), &[])
            .await
    }

    /// Lists the non-archived projects directly inside a group
    pub async fn list_group_projects(&self, group: u64) -> Result<Vec<Project>, ListError> {
        self.get_paginated(
            &format!("/groups/{group}/projects"),
            &[("archived", "false")],
        )
        .await
    }
}

/// Collects the projects of a group, optionally with its subgroups, and
/// applies the name matcher
///
/// A failed subgroup lookup is logged and the listing continues with the
/// root group only.
pub async fn get_group_projects(
    client: &GitlabClient,
    options: &ListOptions,
) -> Result<Vec<Project>, ListError> {
    let matcher = compile_matcher(&options.matcher)?;

    let mut group_ids = vec![options.group];
    if options.recursive {
        match client.list_subgroups(options.group).await {
            Ok(subgroups) => {
                for subgroup in &subgroups {
                    tracing::debug!(
                        id = subgroup.id,
                        path = %subgroup.full_path,
                        "found subgroup"
                    );
                }
                group_ids.extend(subgroups.iter().map(|g| g.id));
            }
            Err(e) => {
                tracing::error!(group = options.group, error = %e, "failed to get subgroups")
            }
        }
    }
    tracing::debug!(groups = ?group_ids, "resolved groups");

    let mut projects = Vec::new();
    for group_id in group_ids {
        projects.extend(client.list_group_projects(group_id).await?);
    }

    Ok(filter_projects(projects, matcher.as_ref()))
}

/// Lists the clone targets for a group
///
/// An empty result is an error: it almost always means a wrong group id or
/// an over-eager matcher.
pub async fn list_repositories(
    client: &GitlabClient,
    options: &ListOptions,
) -> Result<Vec<RepositoryDescriptor>, ListError> {
    let projects = get_group_projects(client, options).await?;
    if projects.is_empty() {
        return Err(ListError::NoProjects(options.group));
    }
    Ok(projects.into_iter().map(RepositoryDescriptor::from).collect())
}

pub(crate) fn compile_matcher(matcher: &str) -> Result<Option<Regex>, ListError> {
    if matcher.is_empty() {
        return Ok(None);
    }
    Ok(Some(Regex::new(matcher)?))
}

/// Keeps projects whose name matches
pub fn filter_projects(projects: Vec<Project>, matcher: Option<&Regex>) -> Vec<Project> {
    match matcher {
        Some(regex) => projects
            .into_iter()
            .filter(|project| regex.is_match(&project.name))
            .collect(),
        None => projects,
    }
}
