//! Source trait for listing the tags of a remote repository

#[cfg(test)]
use mockall::automock;

use crate::version::error::CatalogError;

/// Trait for listing tags from a remote source-control repository
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait TagSource: Send + Sync {
    /// Lists every tag name of the repository
    ///
    /// # Arguments
    /// * `repository` - Location of the remote repository (e.g., "https://github.com/owner/tool")
    ///
    /// # Returns
    /// * `Ok(Vec<String>)` - Tag names with the `refs/tags/` namespace removed, in remote order
    /// * `Err(CatalogError)` - If the remote cannot be queried
    async fn list_tags(&self, repository: &str) -> Result<Vec<String>, CatalogError>;
}
