use async_trait::async_trait;
use blogpost_core::{BlogPostError, ReadmeContent, RepoMetadata, Result};
use octocrab::service::middleware::retry::RetryConfig;
use octocrab::Octocrab;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::PublisherConfig;

/// A read against the source host: its HTTP status and, on 200, the parsed body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched<T> {
    pub status: u16,
    pub data: Option<T>,
}

impl<T> Fetched<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: 200,
            data: Some(data),
        }
    }

    pub fn failed(status: u16) -> Self {
        Self { status, data: None }
    }
}

/// Where repository metadata and READMEs are read from.
///
/// Ordinary HTTP error codes come back as `Fetched::status`; only failures
/// that produce no usable response are returned as `Err`.
#[async_trait]
pub trait SourceHost: Send + Sync {
    /// `GET /repos/{owner}/{repo}`
    async fn get_repository(&self, owner: &str, repo: &str) -> Result<Fetched<RepoMetadata>>;

    /// `GET /repos/{owner}/{repo}/readme`
    async fn get_readme(&self, owner: &str, repo: &str) -> Result<Fetched<ReadmeContent>>;
}

/// GitHub REST API reads through octocrab
#[derive(Clone)]
pub struct GitHubSource {
    octocrab: Octocrab,
}

impl GitHubSource {
    /// Must be called from within a tokio runtime.
    pub fn new(config: &PublisherConfig) -> Result<Self> {
        let mut builder = Octocrab::builder()
            .base_uri(config.github_api_url.as_str())
            .map_err(|e| BlogPostError::GitHubError(format!("invalid GitHub API URL: {}", e)))?;
        builder.add_retry_config(RetryConfig::None);

        if !config.github_api_key.is_empty() {
            builder = builder.personal_token(config.github_api_key.clone());
        }

        let octocrab = builder
            .build()
            .map_err(|e| BlogPostError::GitHubError(e.to_string()))?;

        Ok(Self { octocrab })
    }

    async fn fetch<T: DeserializeOwned>(&self, route: &str) -> Result<Fetched<T>> {
        let response = self
            .octocrab
            ._get(route)
            .await
            .map_err(|e| BlogPostError::GitHubError(e.to_string()))?;

        let status = response.status().as_u16();
        debug!(route, status, "GitHub responded");

        if status != 200 {
            return Ok(Fetched::failed(status));
        }

        let body = self
            .octocrab
            .body_to_string(response)
            .await
            .map_err(|e| BlogPostError::GitHubResponse(e.to_string()))?;
        let data = serde_json::from_str(&body)
            .map_err(|e| BlogPostError::GitHubResponse(e.to_string()))?;

        Ok(Fetched::ok(data))
    }
}

#[async_trait]
impl SourceHost for GitHubSource {
    async fn get_repository(&self, owner: &str, repo: &str) -> Result<Fetched<RepoMetadata>> {
        self.fetch(&repo_route(owner, repo, "")).await
    }

    async fn get_readme(&self, owner: &str, repo: &str) -> Result<Fetched<ReadmeContent>> {
        self.fetch(&repo_route(owner, repo, "/readme")).await
    }
}

/// Owner and name are encoded so they can only ever fill their own segment.
fn repo_route(owner: &str, repo: &str, suffix: &str) -> String {
    format!(
        "/repos/{}/{}{}",
        urlencoding::encode(owner),
        urlencoding::encode(repo),
        suffix
    )
}
