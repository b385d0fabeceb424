use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};

use version_catalog::commands;
use version_catalog::config::{self, EnvOverrides, PluginConfig};
use version_catalog::install::installer::Installer;
use version_catalog::version::catalog::VersionCatalog;

#[derive(Parser)]
#[command(name = "version-catalog")]
#[command(version, about = "Version-manager plugin listing and installing tool versions from git tags")]
struct Cli {
    /// Plugin configuration file (JSON)
    #[arg(long, global = true, env = "VERSION_CATALOG_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List installable versions, oldest first
    ListAll,
    /// Print the latest release
    Latest,
    /// Resolve a version spec ("latest", "latest:<prefix>" or a version)
    Resolve { spec: String },
    /// Build and install a version
    Install {
        /// Version spec to install
        #[arg(long = "version", value_name = "SPEC", env = "ASDF_INSTALL_VERSION")]
        spec: String,
        #[arg(long, env = "ASDF_INSTALL_PATH")]
        install_path: PathBuf,
        #[arg(long, env = "ASDF_DOWNLOAD_PATH")]
        download_path: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let _guard = version_catalog::logging::init(Some(&config::log_path()));

    let config = match PluginConfig::load(cli.config.as_deref(), EnvOverrides::from_env()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("version-catalog: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")
        .and_then(|runtime| runtime.block_on(run(cli.command, &config)));

    match result {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::debug!("{:?}", e);
            eprintln!("version-catalog: {}: {:#}", config.tool_name, e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command, config: &PluginConfig) -> anyhow::Result<String> {
    match command {
        Command::ListAll => {
            let catalog = VersionCatalog::from_config(config)?;
            commands::list_all(&catalog)
                .await
                .with_context(|| format!("listing versions of {}", catalog.repository()))
        }
        Command::Latest => {
            let catalog = VersionCatalog::from_config(config)?;
            commands::latest(&catalog)
                .await
                .context("resolving latest release")
        }
        Command::Resolve { spec } => {
            let catalog = VersionCatalog::from_config(config)?;
            commands::resolve(&catalog, &spec)
                .await
                .with_context(|| format!("resolving {}", spec))
        }
        Command::Install {
            spec,
            install_path,
            download_path,
        } => {
            let installer = Installer::from_config(config)?;
            commands::install(
                &installer,
                &spec,
                &install_path,
                download_path.as_deref(),
            )
            .await
            .with_context(|| format!("installing {}", spec))
        }
    }
}
