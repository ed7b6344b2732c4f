use std::env;

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_DEV_TO_ARTICLES_URL: &str = "https://dev.to/api/articles";

/// Credentials and endpoints injected into every invocation.
///
/// Missing API keys are kept as empty strings; the upstream APIs reject
/// them and that rejection flows through the normal status mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublisherConfig {
    pub github_api_key: String,
    pub dev_to_api_key: String,
    pub github_api_url: String,
    pub dev_to_articles_url: String,
}

impl PublisherConfig {
    pub fn new(github_api_key: impl Into<String>, dev_to_api_key: impl Into<String>) -> Self {
        Self {
            github_api_key: github_api_key.into(),
            dev_to_api_key: dev_to_api_key.into(),
            github_api_url: DEFAULT_GITHUB_API_URL.to_string(),
            dev_to_articles_url: DEFAULT_DEV_TO_ARTICLES_URL.to_string(),
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup (`GITHUB_API_KEY`, `DEV_TO_API_KEY`,
    /// `GITHUB_API_URL`, `DEV_TO_ARTICLES_URL`).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new(
            lookup("GITHUB_API_KEY").unwrap_or_default(),
            lookup("DEV_TO_API_KEY").unwrap_or_default(),
        );

        if let Some(url) = lookup("GITHUB_API_URL").filter(|u| !u.trim().is_empty()) {
            config = config.with_github_api_url(url);
        }
        if let Some(url) = lookup("DEV_TO_ARTICLES_URL").filter(|u| !u.trim().is_empty()) {
            config = config.with_dev_to_articles_url(url);
        }

        config
    }

    pub fn with_github_api_url(mut self, url: impl Into<String>) -> Self {
        self.github_api_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_dev_to_articles_url(mut self, url: impl Into<String>) -> Self {
        self.dev_to_articles_url = url.into();
        self
    }
}
