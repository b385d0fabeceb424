use std::path::PathBuf;

use thiserror::Error;

use crate::version::error::CatalogError;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Build tool not found: {0}")]
    ToolMissing(String),

    #[error("Build command is empty")]
    EmptyCommand,

    #[error("Build command {command} failed with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("Build finished but produced no artifact at {}", .0.display())]
    ArtifactMissing(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum InstallError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Nothing installable: the remote lists no matching versions")]
    NothingInstallable,

    #[error("Version {0} is not available")]
    VersionNotFound(String),

    #[error("Unsupported platform: {os}/{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    #[error("Source checkout failed: {0}")]
    Checkout(String),

    #[error("Build failed: {0}")]
    Build(#[from] BuildError),

    #[error("Cannot walk {}: {source}", .path.display())]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },

    #[error("IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl InstallError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| InstallError::Io { path, source }
    }
}
