//! Tag listing through the `git` executable

use tokio::process::Command;
use tracing::debug;
use which::which;

use crate::version::error::CatalogError;
use crate::version::source::TagSource;
use crate::version::sources::refs::parse_ls_remote;

/// Lists tags by running `git ls-remote --tags`
///
/// Works with any remote git understands, including SSH and local paths.
pub struct GitCommandSource {
    token: Option<String>,
}

impl GitCommandSource {
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }

    fn command(&self, repository: &str) -> Result<Command, CatalogError> {
        let git = which("git").map_err(|e| CatalogError::Git(format!("git not found: {}", e)))?;

        let mut cmd = Command::new(git);
        cmd.args(header_args(self.token.as_deref()));
        cmd.args(["ls-remote", "--tags", repository]);
        cmd.env("GIT_TERMINAL_PROMPT", "0");
        Ok(cmd)
    }
}

/// Config overrides that attach the bearer credential to git's HTTP requests
pub(crate) fn header_args(token: Option<&str>) -> Vec<String> {
    match token {
        Some(token) => vec![
            "-c".to_string(),
            format!("http.extraHeader=Authorization: Bearer {}", token),
        ],
        None => Vec::new(),
    }
}

#[async_trait::async_trait]
impl TagSource for GitCommandSource {
    async fn list_tags(&self, repository: &str) -> Result<Vec<String>, CatalogError> {
        debug!("Running git ls-remote --tags {}", repository);

        let output = self
            .command(repository)?
            .output()
            .await
            .map_err(|e| CatalogError::Git(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CatalogError::Git(format!(
                "{} ({})",
                stderr.trim(),
                output.status
            )));
        }

        Ok(parse_ls_remote(&String::from_utf8_lossy(&output.stdout)))
    }
}
