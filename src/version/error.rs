use thiserror::Error;

/// Failures of the version resolver itself
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Unsupported autoupdate type '{0}'")]
    UnsupportedMode(String),

    #[error("No branch configured and the remote advertises no HEAD, can't determine default branch")]
    Configuration,

    #[error("Branch {0} doesn't exist")]
    BranchNotFound(String),

    #[error("No version tags found")]
    NoVersionTagsFound,
}

/// Failures while listing the refs of a remote repository
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Repository not found: {0}")]
    NotFound(String),

    #[error("Authentication required for {0}")]
    Unauthorized(String),

    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("git ls-remote failed: {0}")]
    Git(String),

    #[error("Failed to run git: {0}")]
    Io(#[from] std::io::Error),
}

impl FetchError {
    /// Whether repeating the request could succeed
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Network(e) => !e.is_builder() && !e.is_decode(),
            FetchError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
