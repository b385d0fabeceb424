//! Tag listing over git's smart HTTP protocol

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use tracing::{debug, warn};

use crate::version::error::CatalogError;
use crate::version::source::TagSource;
use crate::version::sources::refs::{parse_advertisement, parse_ls_remote};

/// Content type of a smart HTTP ref advertisement
const ADVERTISEMENT_CONTENT_TYPE: &str = "application/x-git-upload-pack-advertisement";

/// Lists tags by fetching the ref advertisement of an HTTP(S) remote
pub struct SmartHttpSource {
    client: reqwest::Client,
    token: Option<String>,
}

impl SmartHttpSource {
    /// Creates a source that attaches `token` as a bearer credential when set
    pub fn new(token: Option<String>, connect_timeout: Duration) -> Result<Self, CatalogError> {
        Ok(Self {
            client: reqwest::Client::builder()
                .user_agent(concat!("version-catalog/", env!("CARGO_PKG_VERSION")))
                .connect_timeout(connect_timeout)
                .build()?,
            token,
        })
    }
}

#[async_trait::async_trait]
impl TagSource for SmartHttpSource {
    async fn list_tags(&self, repository: &str) -> Result<Vec<String>, CatalogError> {
        let url = format!(
            "{}/info/refs?service=git-upload-pack",
            repository.trim_end_matches('/')
        );
        debug!("Listing tags from {}", url);

        let mut request = self.client.get(&url);
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        let response = request.send().await?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(repository.to_string()));
        }

        if !status.is_success() {
            warn!("Remote returned status {}: {}", status, url);
            return Err(CatalogError::UnexpectedStatus {
                url,
                status: status.as_u16(),
            });
        }

        let is_advertisement = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with(ADVERTISEMENT_CONTENT_TYPE));

        let body = response.bytes().await.map_err(|e| {
            warn!("Failed to read ref listing from {}: {}", url, e);
            CatalogError::InvalidResponse(e.to_string())
        })?;

        let tags = if is_advertisement {
            parse_advertisement(&body)?
        } else {
            parse_ls_remote(&String::from_utf8_lossy(&body))
        };

        debug!("Remote {} advertised {} tags", repository, tags.len());
        Ok(tags)
    }
}
