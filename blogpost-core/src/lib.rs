pub mod article;
pub mod error;
pub mod models;
pub mod readme;

pub use article::{build_article, ARTICLE_TAGS, MAIN_IMAGE_URL};
pub use error::{BlogPostError, Result};
pub use models::*;
pub use readme::{decode_readme, ReadmeEncoding};
