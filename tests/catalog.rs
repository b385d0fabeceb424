//! Version catalog end-to-end tests

mod helper;

use std::sync::Arc;

use mockito::{Matcher, Server};

use helper::{FakeTagSource, FixedLatestResolver};
use version_catalog::commands;
use version_catalog::config::{EnvOverrides, PluginConfig, SourceKind};
use version_catalog::version::catalog::VersionCatalog;
use version_catalog::version::filter::{FilterConfig, TagFilter};

const REPOSITORY: &str = "https://example.com/owner/tool";

fn pkt(line: &str) -> String {
    format!("{:04x}{}", line.len() + 4, line)
}

fn advertisement(tags: &[&str]) -> String {
    let mut body = pkt("# service=git-upload-pack\n") + "0000";
    body += &pkt("0123456789012345678901234567890123456789 HEAD\0symref=HEAD:refs/heads/main\n");
    for tag in tags {
        body += &pkt(&format!(
            "0123456789012345678901234567890123456789 refs/tags/{}\n",
            tag
        ));
    }
    body + "0000"
}

fn config_for(server_url: &str, filter: FilterConfig) -> PluginConfig {
    PluginConfig {
        tool_name: "tool".to_string(),
        repository: format!("{}/owner/tool", server_url),
        source: SourceKind::SmartHttp,
        filter,
        ..PluginConfig::default()
    }
}

#[tokio::test]
async fn list_all_prints_dev_builds_in_order() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/owner/tool/info/refs")
        .match_query(Matcher::UrlEncoded(
            "service".into(),
            "git-upload-pack".into(),
        ))
        .with_status(200)
        .with_header(
            "content-type",
            "application/x-git-upload-pack-advertisement",
        )
        .with_body(advertisement(&[
            "dev-2024-02-01",
            "v1.0.0",
            "dev-2023-12-31",
            "dev-2024-01-15",
        ]))
        .create_async()
        .await;

    let catalog =
        VersionCatalog::from_config(&config_for(&server.url(), FilterConfig::default())).unwrap();
    let output = commands::list_all(&catalog).await.unwrap();

    mock.assert_async().await;
    assert_eq!(output, "dev-2023-12-31 dev-2024-01-15 dev-2024-02-01");
}

#[tokio::test]
async fn list_all_with_stable_filter_strips_version_prefix() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/owner/tool/info/refs")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header(
            "content-type",
            "application/x-git-upload-pack-advertisement",
        )
        .with_body(advertisement(&[
            "v1.10", "v1.9", "v1.2.p1", "v1.2", "v2.0-rc1", "nightly",
        ]))
        .create_async()
        .await;

    let catalog =
        VersionCatalog::from_config(&config_for(&server.url(), FilterConfig::Stable)).unwrap();
    let output = commands::list_all(&catalog).await.unwrap();

    mock.assert_async().await;
    assert_eq!(output, "1.2 1.2.p1 1.9 1.10");
}

#[tokio::test]
async fn list_all_of_empty_repository_is_not_an_error() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/owner/tool/info/refs")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header(
            "content-type",
            "application/x-git-upload-pack-advertisement",
        )
        .with_body(advertisement(&[]))
        .create_async()
        .await;

    let catalog =
        VersionCatalog::from_config(&config_for(&server.url(), FilterConfig::All)).unwrap();
    let output = commands::list_all(&catalog).await.unwrap();

    mock.assert_async().await;
    assert_eq!(output, "");
}

#[tokio::test]
async fn list_all_reports_fetch_error_for_unreachable_remote() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/owner/tool/info/refs")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let catalog =
        VersionCatalog::from_config(&config_for(&server.url(), FilterConfig::All)).unwrap();
    let result = commands::list_all(&catalog).await;

    mock.assert_async().await;
    assert!(result.is_err_and(|e| e.is_fetch_error()));
}

#[tokio::test]
async fn latest_follows_release_redirect_with_token() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/owner/tool/releases/latest")
        .match_header("authorization", "Bearer t0ken")
        .with_status(302)
        .with_header(
            "location",
            "https://example.com/owner/tool/releases/tag/v2.3.0",
        )
        .create_async()
        .await;

    let mut config = config_for(&server.url(), FilterConfig::All);
    config.api_token = Some("t0ken".to_string());
    let catalog = VersionCatalog::from_config(&config).unwrap();
    let output = commands::latest(&catalog).await.unwrap();

    mock.assert_async().await;
    assert_eq!(output, "2.3.0");
}

#[tokio::test]
async fn resolve_with_prefix_uses_sorted_listing() {
    let source = FakeTagSource::new().with_tags(REPOSITORY, vec!["v1.10", "v1.9", "v2.0", "v1.2"]);
    let catalog = VersionCatalog::new(
        REPOSITORY,
        Arc::new(source),
        TagFilter::All,
        "v",
        Arc::new(FixedLatestResolver("v2.0")),
    );

    assert_eq!(commands::resolve(&catalog, "latest:1").await.unwrap(), "1.10");
    assert_eq!(commands::resolve(&catalog, "latest").await.unwrap(), "2.0");
    assert_eq!(commands::resolve(&catalog, "1.9").await.unwrap(), "1.9");
}

#[test]
fn config_file_drives_catalog_construction() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("plugin.json");
    std::fs::write(
        &path,
        r#"{
            "toolName": "tool",
            "repository": "https://example.com/owner/tool",
            "filter": { "kind": "regex", "pattern": "^v[0-9]+\\.[0-9]+$" }
        }"#,
    )
    .unwrap();

    let config = PluginConfig::load(Some(&path), EnvOverrides::default()).unwrap();
    let catalog = VersionCatalog::from_config(&config).unwrap();

    assert_eq!(catalog.repository(), REPOSITORY);
}

#[test]
fn config_with_invalid_filter_is_rejected() {
    let config = PluginConfig {
        repository: REPOSITORY.to_string(),
        filter: FilterConfig::Regex {
            pattern: "[".to_string(),
        },
        ..PluginConfig::default()
    };

    assert!(VersionCatalog::from_config(&config).is_err());
}
