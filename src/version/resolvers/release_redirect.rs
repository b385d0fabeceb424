//! "Latest release" resolution through the release page redirect

use std::time::Duration;

use reqwest::Url;
use reqwest::header::{AUTHORIZATION, LOCATION};
use reqwest::redirect::Policy;
use tracing::{debug, warn};

use crate::version::error::CatalogError;
use crate::version::resolver::LatestResolver;
use crate::version::types::VersionTag;

/// Path marker that precedes the tag in a release URL
const TAG_PATH_MARKER: &str = "/tag/";

/// Resolves "latest" by reading the redirect of `<repo>/releases/latest`
///
/// GitHub-style hosts answer with a redirect to `<repo>/releases/tag/<tag>`.
pub struct ReleaseRedirectResolver {
    client: reqwest::Client,
    token: Option<String>,
    strip_prefix: String,
}

impl ReleaseRedirectResolver {
    pub fn new(
        token: Option<String>,
        strip_prefix: &str,
        connect_timeout: Duration,
    ) -> Result<Self, CatalogError> {
        Ok(Self {
            client: reqwest::Client::builder()
                .user_agent(concat!("version-catalog/", env!("CARGO_PKG_VERSION")))
                .redirect(Policy::none())
                .connect_timeout(connect_timeout)
                .build()?,
            token,
            strip_prefix: strip_prefix.to_string(),
        })
    }
}

/// Builds the release URL for a repository, dropping a `.git` suffix
fn latest_release_url(repository: &str) -> String {
    let base = repository.trim_end_matches('/');
    let base = base.strip_suffix(".git").unwrap_or(base);
    format!("{}/releases/latest", base)
}

/// Extracts the tag from a redirect target such as `.../releases/tag/v2.3.0`
fn tag_from_location(location: &Url) -> Option<&str> {
    let path = location.path().trim_end_matches('/');
    let (_, tag) = path.rsplit_once(TAG_PATH_MARKER)?;
    (!tag.is_empty() && !tag.contains('/')).then_some(tag)
}

#[async_trait::async_trait]
impl LatestResolver for ReleaseRedirectResolver {
    async fn resolve_latest(&self, repository: &str) -> Result<VersionTag, CatalogError> {
        let url = latest_release_url(repository);
        debug!("Resolving latest release via {}", url);

        let mut request = self.client.get(&url);
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        let response = request.send().await?;

        let status = response.status();

        if status.is_client_error() || status.is_server_error() {
            warn!("Remote returned status {}: {}", status, url);
            return Err(CatalogError::UnexpectedStatus {
                url,
                status: status.as_u16(),
            });
        }

        if !status.is_redirection() {
            return Err(CatalogError::Resolution(format!(
                "{} answered {} without a redirect",
                url, status
            )));
        }

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                CatalogError::Resolution(format!("redirect from {} has no location", url))
            })?;

        let target = response.url().join(location).map_err(|e| {
            CatalogError::Resolution(format!("invalid redirect location {:?}: {}", location, e))
        })?;

        let tag = tag_from_location(&target).ok_or_else(|| {
            CatalogError::Resolution(format!("redirect location {} does not name a tag", target))
        })?;

        debug!("Latest release of {} is {}", repository, tag);
        Ok(VersionTag::with_stripped_prefix(tag, &self.strip_prefix))
    }
}
