use blogpost_core::{
    build_article, decode_readme, ArticleEnvelope, ArticlePayload, BlogPostError,
    FunctionResponse, PublishRequest, PublishedArticle, Result,
};
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::config::PublisherConfig;
use crate::devto::{DevToClient, PublishingPlatform};
use crate::github::{Fetched, GitHubSource, SourceHost};

/// Turns a repository into a draft article on a publishing platform
pub struct BlogPostPublisher<S, P> {
    source: S,
    platform: P,
}

/// Publisher wired to the real GitHub and dev.to APIs
pub type GitHubDevToPublisher = BlogPostPublisher<GitHubSource, DevToClient>;

impl GitHubDevToPublisher {
    pub fn from_config(config: &PublisherConfig) -> Result<Self> {
        Ok(Self::new(GitHubSource::new(config)?, DevToClient::new(config)))
    }
}

impl<S, P> BlogPostPublisher<S, P>
where
    S: SourceHost,
    P: PublishingPlatform,
{
    pub fn new(source: S, platform: P) -> Self {
        Self { source, platform }
    }

    /// Handle one raw inbound request body end to end.
    pub async fn handle(&self, body: &[u8]) -> FunctionResponse {
        match PublishRequest::from_body(body) {
            Ok(request) => self.publish(&request).await,
            Err(e) => {
                let response = FunctionResponse::from(e);
                info!(
                    status = response.status,
                    "Status: {} - Message: {}", response.status, response.body
                );
                response
            }
        }
    }

    /// Publish a validated request. Every failure becomes a response.
    pub async fn publish(&self, request: &PublishRequest) -> FunctionResponse {
        let invocation_id = Uuid::new_v4();
        let span = info_span!(
            "publish",
            %invocation_id,
            owner = %request.repo_owner,
            repo = %request.repo_name
        );

        async {
            let response = match self.try_publish(request).await {
                Ok(article) => FunctionResponse::published(&article),
                Err(e) => FunctionResponse::from(e),
            };

            if response.is_success() {
                info!(status = response.status, "{}", response.body);
            } else {
                warn!(status = response.status, "{}", response.body);
            }

            response
        }
        .instrument(span)
        .await
    }

    async fn try_publish(&self, request: &PublishRequest) -> Result<PublishedArticle> {
        let article = self.prepare_article(request).await?;

        info!(title = %article.title, "Submitting draft article");
        let response = self
            .platform
            .create_article(&ArticleEnvelope::from(article))
            .await?;

        if response.status != 201 {
            return Err(BlogPostError::UpstreamWrite {
                status: response.status,
                status_text: response.status_text,
            });
        }

        Ok(created_article(&response.body))
    }

    /// Fetch metadata and README, then build the article without submitting it.
    pub async fn prepare_article(&self, request: &PublishRequest) -> Result<ArticlePayload> {
        let owner = request.repo_owner.as_str();
        let repo = request.repo_name.as_str();

        info!("Fetching repository metadata");
        let metadata = self.source.get_repository(owner, repo).await?;

        info!("Fetching repository readme");
        let readme = self.source.get_readme(owner, repo).await?;

        let (metadata, readme) = match (metadata, readme) {
            (
                Fetched {
                    status: 200,
                    data: Some(metadata),
                },
                Fetched {
                    status: 200,
                    data: Some(readme),
                },
            ) => (metadata, readme),
            (metadata, readme) => {
                return Err(BlogPostError::UpstreamRead {
                    metadata_status: metadata.status,
                    readme_status: readme.status,
                })
            }
        };

        let text = decode_readme(&readme)?;
        Ok(build_article(&metadata, &text))
    }
}

/// The draft exists once dev.to answers 201, so an unreadable body only loses
/// the link: the raw body stands in for the URL.
fn created_article(body: &str) -> PublishedArticle {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("url").and_then(|url| url.as_str()).map(String::from))
        .map(|url| PublishedArticle { url })
        .unwrap_or_else(|| PublishedArticle {
            url: body.trim().to_string(),
        })
}
