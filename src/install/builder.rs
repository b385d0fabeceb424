//! Builder capability: turns a source checkout into an installable binary

use std::path::{Path, PathBuf};

#[cfg(test)]
use mockall::automock;
use tokio::process::Command;
use tracing::{debug, info};
use which::which;

use crate::config::BuildConfig;
use crate::install::error::BuildError;
use crate::install::platform::Platform;

/// Output of a successful build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryArtifact {
    /// The built executable
    pub binary: PathBuf,
    /// Runtime files the executable needs at its install location
    pub runtime_dir: Option<PathBuf>,
}

/// Trait for building a tool from its source directory
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Builder: Send + Sync {
    async fn build(&self, source_dir: &Path) -> Result<BinaryArtifact, BuildError>;
}

/// Builds by running a configured external command in the source directory
pub struct CommandBuilder {
    config: BuildConfig,
    platform: Platform,
    tool_name: String,
}

impl CommandBuilder {
    pub fn new(config: BuildConfig, platform: Platform, tool_name: impl Into<String>) -> Self {
        Self {
            config,
            platform,
            tool_name: tool_name.into(),
        }
    }

    /// Expands `{os}`, `{arch}`, `{tool}` and `{source}` in a template
    fn expand(&self, template: &str, source_dir: &Path) -> String {
        template
            .replace("{os}", self.platform.os.as_str())
            .replace("{arch}", self.platform.arch.as_str())
            .replace("{tool}", &self.tool_name)
            .replace("{source}", &source_dir.to_string_lossy())
    }

    /// Locates the build program; paths are taken relative to the source directory
    fn locate(program: &str, source_dir: &Path) -> Result<PathBuf, BuildError> {
        if program.contains(std::path::MAIN_SEPARATOR) || program.contains('/') {
            let path = source_dir.join(program);
            return if path.is_file() {
                Ok(path)
            } else {
                Err(BuildError::ToolMissing(path.display().to_string()))
            };
        }
        which(program).map_err(|_| BuildError::ToolMissing(program.to_string()))
    }
}

#[async_trait::async_trait]
impl Builder for CommandBuilder {
    async fn build(&self, source_dir: &Path) -> Result<BinaryArtifact, BuildError> {
        let (program, args) = self
            .config
            .command
            .split_first()
            .ok_or(BuildError::EmptyCommand)?;

        let program = self.expand(program, source_dir);
        let args: Vec<String> = args.iter().map(|a| self.expand(a, source_dir)).collect();
        let resolved = Self::locate(&program, source_dir)?;

        info!(
            "Building {} for {} with {} {}",
            self.tool_name,
            self.platform,
            program,
            args.join(" ")
        );

        let output = Command::new(&resolved)
            .args(&args)
            .current_dir(source_dir)
            .output()
            .await?;

        if !output.status.success() {
            return Err(BuildError::CommandFailed {
                command: program,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        debug!("Build output: {}", String::from_utf8_lossy(&output.stdout));

        let binary = source_dir.join(self.expand(&self.config.artifact, source_dir));
        if !binary.is_file() {
            return Err(BuildError::ArtifactMissing(binary));
        }

        let runtime_dir = match &self.config.runtime_dir {
            Some(dir) => {
                let dir = source_dir.join(self.expand(dir, source_dir));
                if !dir.is_dir() {
                    return Err(BuildError::ArtifactMissing(dir));
                }
                Some(dir)
            }
            None => None,
        };

        Ok(BinaryArtifact {
            binary,
            runtime_dir,
        })
    }
}
