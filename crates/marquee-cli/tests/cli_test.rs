#![allow(clippy::unwrap_used)]
#![allow(missing_docs)]

use assert_cmd::cargo_bin_cmd;
use predicates::prelude::predicate;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn write_config(dir: &std::path::Path, base_url: &str) {
    std::fs::write(
        dir.join("config.toml"),
        format!(
            "[tmdb]\napi_key = \"test-key\"\nbase_url = \"{base_url}\"\n\n\
             [share]\nbase_url = \"https://example.org/marquee/\"\n"
        ),
    )
    .unwrap();
}

#[test]
fn test_help_lists_subcommands() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("marquee");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("popular"))
        .stdout(predicate::str::contains("label"))
        .stdout(predicate::str::contains("open"));
}

#[test]
fn test_label_help_shows_today() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("marquee");
    cmd.args(["label", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--today"));
}

#[test]
fn test_search_missing_query() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("marquee");
    cmd.args(["search"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--query"));
}

#[test]
fn test_invalid_type_rejected() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("marquee");
    cmd.args(["popular", "--type", "anime"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_missing_credentials() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("marquee");
    cmd.env_remove("TMDB_API_TOKEN")
        .env_remove("TMDB_API_KEY")
        .args(["--dir", dir.path().to_str().unwrap(), "popular"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("TMDB credentials are required"));
}

#[test]
fn test_invalid_config_file() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.toml"), "[tmdb\n").unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("marquee");
    cmd.args(["--dir", dir.path().to_str().unwrap(), "genres"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse"));
}

#[test]
fn test_open_without_slug() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("marquee");
    cmd.args([
        "--dir",
        dir.path().to_str().unwrap(),
        "open",
        "--title",
        "https://example.org/marquee/",
    ])
    .assert()
    .failure()
    .stderr(predicate::str::contains("no title slug found"));
}

#[tokio::test]
async fn test_label_against_mock_server() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/movie/693134/release_dates"))
        .and(query_param("api_key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_string(include_str!(
            "../../../fixtures/tmdb/movie_release_dates_693134.json"
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/3/movie/693134/watch/providers"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"id":693134,"results":{}}"#),
        )
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), &format!("{}/3/", server.uri()));

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("marquee");
    cmd.env_remove("TMDB_API_TOKEN")
        .env_remove("TMDB_API_KEY")
        .env_remove("OTEL_EXPORTER_OTLP_ENDPOINT")
        .env("RUST_LOG", "info")
        .args([
            "--dir",
            dir.path().to_str().unwrap(),
            "label",
            "--id",
            "693134",
            "--today",
            "2024-03-15",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cam"));
}

#[tokio::test]
async fn test_show_tv_prints_unknown_quality() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/tv/1399"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"id":1399,"name":"Game of Thrones","first_air_date":"2011-04-17","number_of_seasons":8,"vote_average":8.4}"#,
        ))
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), &format!("{}/3/", server.uri()));

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("marquee");
    cmd.env_remove("TMDB_API_TOKEN")
        .env_remove("TMDB_API_KEY")
        .env_remove("OTEL_EXPORTER_OTLP_ENDPOINT")
        .env("RUST_LOG", "info")
        .args([
            "--dir",
            dir.path().to_str().unwrap(),
            "show",
            "--id",
            "1399",
            "--type",
            "tv",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Availability: Unknown Quality"));
}
