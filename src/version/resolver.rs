//! Latest version resolver trait
//!
//! Maps the symbolic version "latest" to a concrete tag.

#[cfg(test)]
use mockall::automock;

use crate::version::error::CatalogError;
use crate::version::types::VersionTag;

/// Symbolic version resolved through [`LatestResolver`]
pub const LATEST: &str = "latest";

/// Trait for remote-specific "latest release" resolution
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait LatestResolver: Send + Sync {
    /// Resolves the latest release of a repository
    ///
    /// # Returns
    /// * `Ok(VersionTag)` - The tag the remote designates as latest
    /// * `Err(CatalogError)` - Fetch failure, or a response that does not name a tag
    async fn resolve_latest(&self, repository: &str) -> Result<VersionTag, CatalogError>;
}
