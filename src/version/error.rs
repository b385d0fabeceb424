use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Fetch failed for {url}: unexpected status {status}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("Repository not found: {0}")]
    NotFound(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("git ls-remote failed: {0}")]
    Git(String),

    #[error("Cannot resolve latest version: {0}")]
    Resolution(String),

    #[error("Invalid tag filter: {0}")]
    InvalidFilter(#[from] regex::Error),
}

impl CatalogError {
    /// True when the remote could not be queried at all, as opposed to
    /// answering with something unusable.
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            CatalogError::Network(_)
                | CatalogError::UnexpectedStatus { .. }
                | CatalogError::NotFound(_)
                | CatalogError::InvalidResponse(_)
                | CatalogError::Git(_)
        )
    }
}
