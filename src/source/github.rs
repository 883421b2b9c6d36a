//! GitHub REST API source.
//!
//! Two unauthenticated GETs:
//! - `{base}/users/{account}`       → [`Profile`]
//! - `{base}/users/{account}/repos` → first page of [`Repository`] (30 by default)

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::de::DeserializeOwned;

use crate::source::{Profile, ProfileSource, Repository, SourceError};

pub const DEFAULT_GITHUB_BASE_URL: &str = "https://api.github.com";

/// Page size GitHub applies when `per_page` is not given.
pub const DEFAULT_PAGE_SIZE: usize = 30;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

pub struct GitHubSource {
    base_url: String,
    client: reqwest::Client,
}

impl GitHubSource {
    /// Creates a new GitHub source.
    ///
    /// # Arguments
    /// * `base_url` - Optional custom base URL (defaults to the public API)
    pub fn new(base_url: Option<String>) -> Self {
        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_GITHUB_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GETs `path` and decodes the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, SourceError> {
        let url = format!("{}{}", self.base_url, path);
        info!("GitHub request: GET {}", url);

        let response = self
            .client
            .get(&url)
            // GitHub rejects requests without a User-Agent
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        debug!("GitHub response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let err_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("GitHub API error: {} - {}", status, err_body);
            return Err(SourceError::Api {
                status,
                message: err_body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| {
            warn!("Failed to decode {}: {}", url, e);
            SourceError::Parse(e.to_string())
        })
    }
}

#[async_trait]
impl ProfileSource for GitHubSource {
    fn name(&self) -> &str {
        "github"
    }

    async fn fetch_profile(&self, account: &str) -> Result<Profile, SourceError> {
        self.get_json(&format!("/users/{account}")).await
    }

    async fn fetch_repositories(&self, account: &str) -> Result<Vec<Repository>, SourceError> {
        self.get_json(&format!("/users/{account}/repos")).await
    }
}
