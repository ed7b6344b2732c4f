use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BlogPostError, Result};

/// Base URL of the dev.to dashboard where drafts show up
pub const DEV_TO_DASHBOARD_URL: &str = "https://dev.to/dashboard";

/// Repository to turn into a blog post
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublishRequest {
    #[serde(rename = "repoowner")]
    pub repo_owner: String,
    #[serde(rename = "reponame")]
    pub repo_name: String,
}

impl PublishRequest {
    pub fn new(repo_owner: impl Into<String>, repo_name: impl Into<String>) -> Self {
        Self {
            repo_owner: repo_owner.into(),
            repo_name: repo_name.into(),
        }
    }

    /// Parse and validate the raw body of an inbound request.
    ///
    /// Both `repoowner` and `reponame` must be non-empty strings. A body that
    /// is empty, not JSON, or not an object is treated as if both were missing.
    pub fn from_body(body: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(body).unwrap_or(Value::Null);

        let field = |name: &str| {
            value
                .get(name)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(String::from)
        };

        match (field("repoowner"), field("reponame")) {
            (Some(repo_owner), Some(repo_name)) => Ok(Self {
                repo_owner,
                repo_name,
            }),
            _ => Err(BlogPostError::MissingRepository),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.repo_owner, self.repo_name)
    }
}

/// Subset of the GitHub repository record the article is built from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepoMetadata {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// README as returned by GitHub, still encoded
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReadmeContent {
    pub content: String,
    pub encoding: String,
}

/// Article fields accepted by the dev.to articles API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArticlePayload {
    pub title: String,
    pub description: Option<String>,
    pub body_markdown: String,
    pub tags: Vec<String>,
    pub published: bool,
    pub main_image: String,
}

/// Request body for `POST /api/articles`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArticleEnvelope {
    pub article: ArticlePayload,
}

impl From<ArticlePayload> for ArticleEnvelope {
    fn from(article: ArticlePayload) -> Self {
        Self { article }
    }
}

/// The part of a dev.to "article created" response we read
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublishedArticle {
    pub url: String,
}

/// Status and plain-text message returned by one invocation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FunctionResponse {
    pub status: u16,
    pub body: String,
}

impl FunctionResponse {
    pub fn published(article: &PublishedArticle) -> Self {
        Self {
            status: 201,
            body: format!(
                "Blog post published at dev.to. Check the post on your dashboard {} (preliminary URL: {})",
                DEV_TO_DASHBOARD_URL, article.url
            ),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl From<BlogPostError> for FunctionResponse {
    fn from(err: BlogPostError) -> Self {
        Self {
            status: err.status(),
            body: err.to_string(),
        }
    }
}
