//! Source checkout of a tagged revision

use std::path::Path;

#[cfg(test)]
use mockall::automock;
use tokio::process::Command;
use tracing::info;
use which::which;

use crate::install::error::InstallError;
use crate::version::sources::git_command::header_args;
use crate::version::types::VersionTag;

/// Trait for fetching the sources of a version into a directory
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait SourceCheckout: Send + Sync {
    async fn checkout(
        &self,
        repository: &str,
        version: &VersionTag,
        dest: &Path,
    ) -> Result<(), InstallError>;
}

/// Shallow `git clone` of a single tag
pub struct GitCheckout {
    token: Option<String>,
}

impl GitCheckout {
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }
}

/// True when `dir` exists and holds at least one entry
fn has_entries(dir: &Path) -> Result<bool, InstallError> {
    if !dir.exists() {
        return Ok(false);
    }
    let mut entries = std::fs::read_dir(dir).map_err(InstallError::io(dir))?;
    Ok(entries.next().is_some())
}

#[async_trait::async_trait]
impl SourceCheckout for GitCheckout {
    async fn checkout(
        &self,
        repository: &str,
        version: &VersionTag,
        dest: &Path,
    ) -> Result<(), InstallError> {
        if has_entries(dest)? {
            info!("Reusing sources already present in {}", dest.display());
            return Ok(());
        }

        let git =
            which("git").map_err(|e| InstallError::Checkout(format!("git not found: {}", e)))?;

        info!("Cloning {} at {}", repository, version.raw());
        let output = Command::new(git)
            .args(header_args(self.token.as_deref()))
            .args(["clone", "--depth", "1", "--branch", version.raw(), repository])
            .arg(dest)
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()
            .await
            .map_err(|e| InstallError::Checkout(e.to_string()))?;

        if !output.status.success() {
            return Err(InstallError::Checkout(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        Ok(())
    }
}
