//! Reads a GitHub repository's metadata and README and submits them to dev.to
//! as a draft article.

pub mod config;
pub mod devto;
pub mod github;
pub mod pipeline;

pub use config::PublisherConfig;
pub use devto::{DevToClient, PublishResponse, PublishingPlatform};
pub use github::{Fetched, GitHubSource, SourceHost};
pub use pipeline::{BlogPostPublisher, GitHubDevToPublisher};
