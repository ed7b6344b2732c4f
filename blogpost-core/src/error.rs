use thiserror::Error;

/// Every way an invocation can end without a published article.
///
/// The `Display` text of each variant is the message returned to the caller.
#[derive(Error, Debug)]
pub enum BlogPostError {
    #[error("Please provide the name of the repository and the repository owner")]
    MissingRepository,

    #[error(
        "Error when fetching metadata (status: {metadata_status}) or readme (status: {readme_status}) from GitHub repository"
    )]
    UpstreamRead {
        metadata_status: u16,
        readme_status: u16,
    },

    #[error("Error when publishing blog post - status: {status} - {status_text}")]
    UpstreamWrite { status: u16, status_text: String },

    #[error("Error when contacting GitHub: {0}")]
    GitHubError(String),

    #[error("Error when reading GitHub response: {0}")]
    GitHubResponse(String),

    #[error("Error when decoding readme (encoding: {encoding}): {detail}")]
    DecodeError { encoding: String, detail: String },

    #[error("Error when publishing blog post: {0}")]
    NetworkError(String),
}

impl BlogPostError {
    /// HTTP status the invocation answers with for this failure.
    pub fn status(&self) -> u16 {
        match self {
            BlogPostError::MissingRepository => 400,
            BlogPostError::UpstreamWrite { status, .. } => *status,
            _ => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, BlogPostError>;
