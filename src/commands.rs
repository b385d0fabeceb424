//! Plugin entry points
//!
//! Each command returns the text to print on stdout.

use std::path::Path;

use crate::install::error::InstallError;
use crate::install::installer::Installer;
use crate::version::catalog::VersionCatalog;
use crate::version::error::CatalogError;

/// Lists every relevant version, oldest first, separated by spaces.
///
/// An empty catalog prints an empty line.
pub async fn list_all(catalog: &VersionCatalog) -> Result<String, CatalogError> {
    let versions = catalog.list_versions().await?;
    Ok(versions.names().join(" "))
}

/// Prints the latest release
pub async fn latest(catalog: &VersionCatalog) -> Result<String, CatalogError> {
    Ok(catalog.resolve_latest().await?.name().to_string())
}

/// Prints the version a spec resolves to
pub async fn resolve(catalog: &VersionCatalog, spec: &str) -> Result<String, CatalogError> {
    Ok(catalog.resolve(spec).await?.name().to_string())
}

/// Installs a version and prints the path of its shim
pub async fn install(
    installer: &Installer,
    spec: &str,
    install_path: &Path,
    download_path: Option<&Path>,
) -> Result<String, InstallError> {
    let installed = installer.install(spec, install_path, download_path).await?;
    Ok(installed.layout.shim().display().to_string())
}
