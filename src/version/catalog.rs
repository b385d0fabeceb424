//! Version catalog for one tool
//!
//! Groups the tag source, the inclusion filter and the latest resolver that
//! together answer "which versions exist" and "which one is latest".

use std::sync::Arc;

use tracing::debug;

use crate::config::{PluginConfig, SourceKind};
use crate::version::error::CatalogError;
use crate::version::filter::TagFilter;
use crate::version::ordering::sort_versions;
use crate::version::resolver::{LATEST, LatestResolver};
use crate::version::resolvers::ReleaseRedirectResolver;
use crate::version::source::TagSource;
use crate::version::sources::{GitCommandSource, SmartHttpSource};
use crate::version::types::{VersionSet, VersionTag};

/// Prefix of a spec that asks for the highest version with a given prefix
const LATEST_PREFIX_SPEC: &str = "latest:";

pub struct VersionCatalog {
    repository: String,
    source: Arc<dyn TagSource>,
    filter: TagFilter,
    strip_prefix: String,
    latest: Arc<dyn LatestResolver>,
}

impl VersionCatalog {
    pub fn new(
        repository: impl Into<String>,
        source: Arc<dyn TagSource>,
        filter: TagFilter,
        strip_prefix: impl Into<String>,
        latest: Arc<dyn LatestResolver>,
    ) -> Self {
        Self {
            repository: repository.into(),
            source,
            filter,
            strip_prefix: strip_prefix.into(),
            latest,
        }
    }

    /// Builds the catalog described by the plugin configuration
    pub fn from_config(config: &PluginConfig) -> Result<Self, CatalogError> {
        let token = config.api_token.clone();
        let source: Arc<dyn TagSource> = match config.source {
            SourceKind::SmartHttp => Arc::new(SmartHttpSource::new(
                token.clone(),
                config.connect_timeout(),
            )?),
            SourceKind::GitCommand => Arc::new(GitCommandSource::new(token.clone())),
        };
        let latest = Arc::new(ReleaseRedirectResolver::new(
            token,
            &config.strip_prefix,
            config.connect_timeout(),
        )?);

        Ok(Self::new(
            config.repository.clone(),
            source,
            TagFilter::from_config(&config.filter)?,
            config.strip_prefix.clone(),
            latest,
        ))
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Lists the relevant versions, oldest first.
    ///
    /// An empty set is a successful answer; callers decide what nothing
    /// installable means to them.
    pub async fn list_versions(&self) -> Result<VersionSet, CatalogError> {
        let tags = self.source.list_tags(&self.repository).await?;
        let fetched = tags.len();

        let relevant = self.filter.filter_relevant(tags, &self.strip_prefix);
        debug!(
            "Kept {} of {} tags from {}",
            relevant.len(),
            fetched,
            self.repository
        );

        Ok(VersionSet::new(sort_versions(relevant)))
    }

    /// Resolves the remote's latest release
    pub async fn resolve_latest(&self) -> Result<VersionTag, CatalogError> {
        self.latest.resolve_latest(&self.repository).await
    }

    /// Resolves a version spec to a concrete version.
    ///
    /// - `latest` asks the remote for its latest release
    /// - `latest:<prefix>` picks the highest listed version starting with `<prefix>`
    /// - anything else names a version directly
    pub async fn resolve(&self, spec: &str) -> Result<VersionTag, CatalogError> {
        if spec == LATEST {
            return self.resolve_latest().await;
        }

        if let Some(prefix) = spec.strip_prefix(LATEST_PREFIX_SPEC) {
            let versions = self.list_versions().await?;
            return versions
                .tags
                .into_iter()
                .rev()
                .find(|tag| tag.name().starts_with(prefix))
                .ok_or_else(|| {
                    CatalogError::Resolution(format!("no version starts with {:?}", prefix))
                });
        }

        Ok(VersionTag::with_stripped_prefix(spec, &self.strip_prefix))
    }
}
