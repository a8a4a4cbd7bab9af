//! GitLab REST API client

use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::core::config::{
    DEFAULT_GITLAB_HOST, GITLAB_API_PREFIX, GITLAB_NEXT_PAGE_HEADER, GITLAB_PAGE_SIZE,
    GITLAB_TOKEN_HEADER,
};

#[derive(Error, Debug)]
pub enum ListError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GitLab returned {status} for {url}: {body}")]
    Api {
        status: u16,
        url: String,
        body: String,
    },

    #[error("token contains characters that cannot be sent in a header")]
    InvalidToken,

    #[error("invalid regex matcher provided: {0}")]
    InvalidMatcher(#[from] regex::Error),

    #[error("no projects found for group: {0}")]
    NoProjects(u64),
}

/// Connection settings for a GitLab instance
#[derive(Clone)]
pub struct AuthConfig {
    pub host: String,
    pub token: String,
    /// Skip TLS certificate verification
    pub insecure: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_GITLAB_HOST.to_string(),
            token: String::new(),
            insecure: false,
        }
    }
}

pub struct GitlabClient {
    http: reqwest::Client,
    api_base: String,
}

impl GitlabClient {
    pub fn new(auth: &AuthConfig) -> Result<Self, ListError> {
        let mut headers = HeaderMap::new();
        if !auth.token.is_empty() {
            let mut value =
                HeaderValue::from_str(&auth.token).map_err(|_| ListError::InvalidToken)?;
            value.set_sensitive(true);
            headers.insert(GITLAB_TOKEN_HEADER, value);
        }

        if auth.insecure {
            tracing::warn!(host = %auth.host, "TLS certificate verification disabled");
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .danger_accept_invalid_certs(auth.insecure)
            .user_agent(concat!("gsc/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            api_base: format!("{}{}", auth.host.trim_end_matches('/'), GITLAB_API_PREFIX),
        })
    }

    /// Fetches every page of a list endpoint, following `x-next-page`
    pub(crate) async fn get_paginated<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, ListError> {
        let url = format!("{}{}", self.api_base, path);
        let per_page = GITLAB_PAGE_SIZE.to_string();
        let mut items = Vec::new();
        let mut page = Some("1".to_string());

        while let Some(current) = page {
            tracing::debug!(url = %url, page = %current, "listing");
            let response = self
                .http
                .get(&url)
                .query(query)
                .query(&[("per_page", per_page.as_str()), ("page", current.as_str())])
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(ListError::Api {
                    status: status.as_u16(),
                    url,
                    body,
                });
            }

            page = response
                .headers()
                .get(GITLAB_NEXT_PAGE_HEADER)
                .and_then(|value| value.to_str().ok())
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string);

            let mut batch: Vec<T> = response.json().await?;
            items.append(&mut batch);
        }

        Ok(items)
    }
}
