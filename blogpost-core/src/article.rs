use crate::models::{ArticlePayload, RepoMetadata};

/// Tags every generated article is filed under
pub const ARTICLE_TAGS: [&str; 3] = ["microsoft", "azure", "serverless"];

/// Cover image used for every generated article
pub const MAIN_IMAGE_URL: &str = "https://user-images.githubusercontent.com/69332964/114803220-14269100-9d6d-11eb-9a3a-e92a637e5d79.png";

/// Turn repository metadata and its decoded README into a draft article.
pub fn build_article(metadata: &RepoMetadata, readme: &str) -> ArticlePayload {
    ArticlePayload {
        title: metadata.name.clone(),
        description: metadata.description.clone(),
        body_markdown: readme.to_string(),
        tags: ARTICLE_TAGS.iter().map(|t| t.to_string()).collect(),
        published: false,
        main_image: MAIN_IMAGE_URL.to_string(),
    }
}
