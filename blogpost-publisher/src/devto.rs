use async_trait::async_trait;
use blogpost_core::{ArticleEnvelope, BlogPostError, Result};
use hyper::ext::ReasonPhrase;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::config::PublisherConfig;

/// Raw outcome of an article submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

/// Where finished articles are submitted
#[async_trait]
pub trait PublishingPlatform: Send + Sync {
    /// Submit an article. Any HTTP status is returned as a `PublishResponse`;
    /// `Err` means no response was received.
    async fn create_article(&self, envelope: &ArticleEnvelope) -> Result<PublishResponse>;
}

/// dev.to articles API client
#[derive(Clone)]
pub struct DevToClient {
    client: Client,
    articles_url: String,
    api_key: String,
}

impl DevToClient {
    pub fn new(config: &PublisherConfig) -> Self {
        Self {
            client: Client::new(),
            articles_url: config.dev_to_articles_url.clone(),
            api_key: config.dev_to_api_key.clone(),
        }
    }
}

#[async_trait]
impl PublishingPlatform for DevToClient {
    async fn create_article(&self, envelope: &ArticleEnvelope) -> Result<PublishResponse> {
        let response = self
            .client
            .post(&self.articles_url)
            .header("api-key", &self.api_key)
            .header(CONTENT_TYPE, "application/json")
            .json(envelope)
            .send()
            .await
            .map_err(|e| BlogPostError::NetworkError(e.to_string()))?;

        let status = response.status();
        let status_text = status_text(status, response.extensions().get::<ReasonPhrase>());
        debug!(status = status.as_u16(), %status_text, "dev.to responded");

        let body = response
            .text()
            .await
            .map_err(|e| BlogPostError::NetworkError(e.to_string()))?;

        Ok(PublishResponse {
            status: status.as_u16(),
            status_text,
            body,
        })
    }
}

/// Reason phrase sent on the wire, else the canonical one for the code.
///
/// hyper only records the wire phrase when it differs from the canonical one.
fn status_text(status: StatusCode, reason: Option<&ReasonPhrase>) -> String {
    reason
        .map(|phrase| String::from_utf8_lossy(phrase.as_bytes()).into_owned())
        .or_else(|| status.canonical_reason().map(String::from))
        .unwrap_or_default()
}
