//! Fake remote collaborators

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;

use version_catalog::install::checkout::SourceCheckout;
use version_catalog::install::error::InstallError;
use version_catalog::version::error::CatalogError;
use version_catalog::version::resolver::LatestResolver;
use version_catalog::version::source::TagSource;
use version_catalog::version::types::VersionTag;

/// Tag source serving fixed tag lists per repository
pub struct FakeTagSource {
    tags: HashMap<String, Vec<String>>,
}

impl FakeTagSource {
    pub fn new() -> Self {
        Self {
            tags: HashMap::new(),
        }
    }

    pub fn with_tags(mut self, repository: &str, tags: Vec<&str>) -> Self {
        self.tags.insert(
            repository.to_string(),
            tags.into_iter().map(|t| t.to_string()).collect(),
        );
        self
    }
}

#[async_trait]
impl TagSource for FakeTagSource {
    async fn list_tags(&self, repository: &str) -> Result<Vec<String>, CatalogError> {
        match self.tags.get(repository) {
            Some(tags) => Ok(tags.clone()),
            None => Err(CatalogError::NotFound(repository.to_string())),
        }
    }
}

/// Resolver that always answers with the same tag
pub struct FixedLatestResolver(pub &'static str);

#[async_trait]
impl LatestResolver for FixedLatestResolver {
    async fn resolve_latest(&self, _repository: &str) -> Result<VersionTag, CatalogError> {
        Ok(VersionTag::with_stripped_prefix(self.0, "v"))
    }
}

/// Checkout that writes a build script into the destination
pub struct ScriptCheckout {
    pub script: &'static str,
}

#[async_trait]
impl SourceCheckout for ScriptCheckout {
    async fn checkout(
        &self,
        _repository: &str,
        version: &VersionTag,
        dest: &Path,
    ) -> Result<(), InstallError> {
        std::fs::create_dir_all(dest).unwrap();
        std::fs::write(dest.join("VERSION"), version.raw()).unwrap();
        std::fs::write(dest.join("build.sh"), self.script).unwrap();
        Ok(())
    }
}
