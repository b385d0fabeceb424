//! Install pipeline: resolve, check out, build, copy, shim

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::PluginConfig;
use crate::install::builder::{Builder, CommandBuilder};
use crate::install::checkout::{GitCheckout, SourceCheckout};
use crate::install::error::InstallError;
use crate::install::platform::Platform;
use crate::install::shim::write_shim;
use crate::version::catalog::VersionCatalog;
use crate::version::types::VersionTag;

/// Scratch directory used for sources when no download path is given
const SCRATCH_DIR: &str = ".download";

/// Directory layout below an install path
///
/// ```text
/// <install>/bin/<tool>       shim
/// <install>/libexec/<tool>   real binary
/// <install>/lib/<tool>/      runtime files
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLayout {
    root: PathBuf,
    tool_name: String,
}

impl InstallLayout {
    pub fn new(root: impl Into<PathBuf>, tool_name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            tool_name: tool_name.into(),
        }
    }

    pub fn shim(&self) -> PathBuf {
        self.root.join("bin").join(&self.tool_name)
    }

    pub fn binary(&self) -> PathBuf {
        self.root.join("libexec").join(&self.tool_name)
    }

    pub fn runtime_dir(&self) -> PathBuf {
        self.root.join("lib").join(&self.tool_name)
    }
}

/// Result of a completed install
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledVersion {
    pub version: VersionTag,
    pub layout: InstallLayout,
}

pub struct Installer {
    catalog: VersionCatalog,
    checkout: Arc<dyn SourceCheckout>,
    builder: Arc<dyn Builder>,
    tool_name: String,
    shim_env: BTreeMap<String, String>,
}

impl Installer {
    pub fn new(
        catalog: VersionCatalog,
        checkout: Arc<dyn SourceCheckout>,
        builder: Arc<dyn Builder>,
        tool_name: impl Into<String>,
        shim_env: BTreeMap<String, String>,
    ) -> Self {
        Self {
            catalog,
            checkout,
            builder,
            tool_name: tool_name.into(),
            shim_env,
        }
    }

    /// Builds the installer described by the plugin configuration
    pub fn from_config(config: &PluginConfig) -> Result<Self, InstallError> {
        let platform = Platform::current()?;
        debug!("Detected platform {}", platform);

        Ok(Self::new(
            VersionCatalog::from_config(config)?,
            Arc::new(GitCheckout::new(config.api_token.clone())),
            Arc::new(CommandBuilder::new(
                config.build.clone(),
                platform,
                config.tool_name.clone(),
            )),
            config.tool_name.clone(),
            config.shim.env.clone(),
        ))
    }

    /// Installs the version named by `spec` into `install_path`.
    ///
    /// Sources go to `download_path` when given; otherwise to a scratch
    /// directory inside the install path that is removed afterwards.
    pub async fn install(
        &self,
        spec: &str,
        install_path: &Path,
        download_path: Option<&Path>,
    ) -> Result<InstalledVersion, InstallError> {
        let requested = self.catalog.resolve(spec).await?;
        let versions = self.catalog.list_versions().await?;

        if versions.is_empty() {
            return Err(InstallError::NothingInstallable);
        }

        let version = versions
            .find(requested.name())
            .or_else(|| versions.find(requested.raw()))
            .cloned()
            .ok_or_else(|| InstallError::VersionNotFound(requested.name().to_string()))?;

        info!("Installing {} {}", self.tool_name, version);

        let (source_dir, scratch) = match download_path {
            Some(path) => (path.to_path_buf(), false),
            None => (install_path.join(SCRATCH_DIR), true),
        };

        self.checkout
            .checkout(self.catalog.repository(), &version, &source_dir)
            .await?;
        let artifact = self.builder.build(&source_dir).await?;

        let layout = InstallLayout::new(install_path, &self.tool_name);

        if let Some(runtime_dir) = &artifact.runtime_dir {
            let copied = copy_dir(runtime_dir, &layout.runtime_dir())?;
            debug!("Copied {} runtime files", copied);
        }

        let binary = layout.binary();
        if let Some(parent) = binary.parent() {
            std::fs::create_dir_all(parent).map_err(InstallError::io(parent))?;
        }
        std::fs::copy(&artifact.binary, &binary).map_err(InstallError::io(&binary))?;

        write_shim(&layout.shim(), &binary, &self.shim_env, install_path)?;

        if scratch && source_dir.exists() {
            std::fs::remove_dir_all(&source_dir).map_err(InstallError::io(&source_dir))?;
        }

        info!("Installed {} {} to {}", self.tool_name, version, install_path.display());
        Ok(InstalledVersion { version, layout })
    }
}

/// Copies a directory tree, returning the number of files copied
fn copy_dir(from: &Path, to: &Path) -> Result<usize, InstallError> {
    let mut count = 0usize;

    for entry in WalkDir::new(from).follow_links(false) {
        let entry = entry.map_err(|source| InstallError::Walk {
            path: from.to_path_buf(),
            source,
        })?;

        let relative = entry
            .path()
            .strip_prefix(from)
            .map_err(|e| InstallError::Io {
                path: entry.path().to_path_buf(),
                source: std::io::Error::other(e),
            })?;
        let dest = to.join(relative);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&dest).map_err(InstallError::io(&dest))?;
        } else {
            std::fs::copy(entry.path(), &dest).map_err(InstallError::io(&dest))?;
            count += 1;
        }
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::install::builder::{BinaryArtifact, MockBuilder};
    use crate::install::checkout::MockSourceCheckout;
    use crate::install::error::BuildError;
    use crate::version::filter::TagFilter;
    use crate::version::resolver::MockLatestResolver;
    use crate::version::source::MockTagSource;
    use tempfile::TempDir;

    const REPOSITORY: &str = "https://example.com/owner/tool";

    fn catalog(tags: &[&str], latest: Option<&str>) -> VersionCatalog {
        let tags: Vec<String> = tags.iter().map(|s| s.to_string()).collect();
        let mut source = MockTagSource::new();
        source
            .expect_list_tags()
            .returning(move |_| Ok(tags.clone()));

        let mut resolver = MockLatestResolver::new();
        if let Some(latest) = latest {
            let latest = latest.to_string();
            resolver
                .expect_resolve_latest()
                .returning(move |_| Ok(VersionTag::with_stripped_prefix(latest.clone(), "v")));
        }

        VersionCatalog::new(
            REPOSITORY,
            Arc::new(source),
            TagFilter::All,
            "v",
            Arc::new(resolver),
        )
    }

    /// Prepares a build output with a binary and a runtime directory
    fn build_output(dir: &Path) -> BinaryArtifact {
        let runtime = dir.join("runtime");
        std::fs::create_dir_all(runtime.join("syntax")).unwrap();
        std::fs::write(runtime.join("syntax/tool.vim"), "syntax").unwrap();
        std::fs::write(runtime.join("doc.txt"), "doc").unwrap();
        let binary = dir.join("tool-bin");
        std::fs::write(&binary, "binary").unwrap();

        BinaryArtifact {
            binary,
            runtime_dir: Some(runtime),
        }
    }

    fn succeeding_checkout(expected_raw: &'static str) -> MockSourceCheckout {
        let mut checkout = MockSourceCheckout::new();
        checkout
            .expect_checkout()
            .withf(move |repository, version, _| {
                repository == REPOSITORY && version.raw() == expected_raw
            })
            .times(1)
            .returning(|_, _, _| Ok(()));
        checkout
    }

    fn succeeding_builder(artifact: BinaryArtifact) -> MockBuilder {
        let mut builder = MockBuilder::new();
        builder
            .expect_build()
            .times(1)
            .returning(move |_| Ok(artifact.clone()));
        builder
    }

    #[tokio::test]
    async fn install_copies_binary_runtime_and_writes_shim() {
        let build_dir = TempDir::new().unwrap();
        let install_dir = TempDir::new().unwrap();
        let download_dir = TempDir::new().unwrap();
        let installer = Installer::new(
            catalog(&["v1.0", "v1.1"], None),
            Arc::new(succeeding_checkout("v1.1")),
            Arc::new(succeeding_builder(build_output(build_dir.path()))),
            "tool",
            BTreeMap::from([("TOOL_RUNTIME".to_string(), "{install}/lib/tool".to_string())]),
        );

        let installed = installer
            .install("1.1", install_dir.path(), Some(download_dir.path()))
            .await
            .unwrap();

        let layout = InstallLayout::new(install_dir.path(), "tool");
        assert_eq!(installed.version.name(), "1.1");
        assert_eq!(installed.layout, layout);
        assert_eq!(std::fs::read_to_string(layout.binary()).unwrap(), "binary");
        assert_eq!(
            std::fs::read_to_string(layout.runtime_dir().join("syntax/tool.vim")).unwrap(),
            "syntax"
        );
        let shim = std::fs::read_to_string(layout.shim()).unwrap();
        assert!(shim.contains(&format!(
            "export TOOL_RUNTIME='{}/lib/tool'",
            install_dir.path().display()
        )));
        assert!(download_dir.path().exists());
    }

    #[tokio::test]
    async fn install_resolves_latest_and_removes_scratch_sources() {
        let build_dir = TempDir::new().unwrap();
        let install_dir = TempDir::new().unwrap();
        let installer = Installer::new(
            catalog(&["v1.0", "v2.3.0"], Some("v2.3.0")),
            Arc::new(succeeding_checkout("v2.3.0")),
            Arc::new(succeeding_builder(build_output(build_dir.path()))),
            "tool",
            BTreeMap::new(),
        );

        let installed = installer
            .install("latest", install_dir.path(), None)
            .await
            .unwrap();

        assert_eq!(installed.version.raw(), "v2.3.0");
        assert!(!install_dir.path().join(SCRATCH_DIR).exists());
    }

    #[tokio::test]
    async fn install_reports_nothing_installable_for_empty_catalog() {
        let install_dir = TempDir::new().unwrap();
        let installer = Installer::new(
            catalog(&[], None),
            Arc::new(MockSourceCheckout::new()),
            Arc::new(MockBuilder::new()),
            "tool",
            BTreeMap::new(),
        );

        let result = installer.install("1.0", install_dir.path(), None).await;

        assert!(matches!(result, Err(InstallError::NothingInstallable)));
    }

    #[tokio::test]
    async fn install_reports_unknown_version() {
        let install_dir = TempDir::new().unwrap();
        let installer = Installer::new(
            catalog(&["v1.0"], None),
            Arc::new(MockSourceCheckout::new()),
            Arc::new(MockBuilder::new()),
            "tool",
            BTreeMap::new(),
        );

        let result = installer.install("9.9", install_dir.path(), None).await;

        assert!(matches!(result, Err(InstallError::VersionNotFound(v)) if v == "9.9"));
    }

    #[tokio::test]
    async fn install_propagates_build_failure() {
        let install_dir = TempDir::new().unwrap();
        let mut builder = MockBuilder::new();
        builder
            .expect_build()
            .returning(|_| Err(BuildError::EmptyCommand));
        let installer = Installer::new(
            catalog(&["v1.0"], None),
            Arc::new(succeeding_checkout("v1.0")),
            Arc::new(builder),
            "tool",
            BTreeMap::new(),
        );

        let result = installer.install("1.0", install_dir.path(), None).await;

        assert!(matches!(
            result,
            Err(InstallError::Build(BuildError::EmptyCommand))
        ));
        assert!(!install_dir.path().join("bin/tool").exists());
    }

    #[test]
    fn copy_dir_copies_nested_files() {
        let from = TempDir::new().unwrap();
        let to = TempDir::new().unwrap();
        std::fs::create_dir_all(from.path().join("a/b")).unwrap();
        std::fs::write(from.path().join("a/b/c.txt"), "c").unwrap();
        std::fs::write(from.path().join("top.txt"), "top").unwrap();

        let copied = copy_dir(from.path(), &to.path().join("dest")).unwrap();

        assert_eq!(copied, 2);
        assert_eq!(
            std::fs::read_to_string(to.path().join("dest/a/b/c.txt")).unwrap(),
            "c"
        );
    }
}
