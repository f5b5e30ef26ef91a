//! Fetcher and pipeline tests against a real HTTP server.

use std::collections::BTreeSet;
use std::sync::Arc;

use contest_fetch::models::{Config, Outcome};
use contest_fetch::pipeline::{NoProgress, run_download};
use contest_fetch::services::WinnersIndex;
use contest_fetch::utils::http::{self, HttpClient};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(config: &Config) -> reqwest::Client {
    http::create_client(&config.http).unwrap()
}

#[tokio::test]
async fn fetch_returns_body_on_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/summaries/660.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string("caption,votes\n"))
        .mount(&server)
        .await;

    let client = client(&Config::default());
    let url = format!("{}/summaries/660.csv", server.uri());
    let response = http::fetch(&client, &url).await.unwrap();
    assert_eq!(response.bytes().await.unwrap(), b"caption,votes\n");
}

#[tokio::test]
async fn fetch_treats_error_status_as_absent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cartoons/1.jpg"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cartoons/2.jpg"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client(&Config::default());
    assert!(http::fetch(&client, &format!("{}/cartoons/1.jpg", server.uri())).await.is_none());
    assert!(http::fetch(&client, &format!("{}/cartoons/2.jpg", server.uri())).await.is_none());
}

#[tokio::test]
async fn fetch_treats_connection_error_as_absent() {
    let client = client(&Config::default());
    // Port 9 (discard) is expected to refuse connections on test hosts.
    assert!(http::fetch(&client, "http://127.0.0.1:9/x").await.is_none());
}

#[tokio::test]
async fn winners_parsed_despite_text_plain_label() {
    let server = MockServer::start().await;
    let body = r##"[
        {"data": {"cartoon": {"title": "Contest #742 winners", "id": 1}}, "votes": 10},
        {"data": {"cartoon": {"title": "Contest ??? "}}}
    ]"##;
    Mock::given(method("GET"))
        .and(path("/nyccwinners/nyc_winners.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/plain; charset=utf-8"))
        .mount(&server)
        .await;

    let client = client(&Config::default());
    let url = format!("{}/nyccwinners/nyc_winners.json", server.uri());
    let index = WinnersIndex::build(&client as &dyn HttpClient, &url)
        .await
        .unwrap();

    assert_eq!(index.len(), 1);
    assert_eq!(index.get(742).unwrap()["votes"], 10);
    assert_eq!(index.unavailable().len(), 1);
}

#[tokio::test]
async fn run_download_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/nyccwinners/nyc_winners.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r##"[{"data": {"cartoon": {"title": "#801"}}, "winner": "A caption"}]"##,
            "text/plain",
        ))
        .mount(&server)
        .await;
    for id in [800, 801] {
        Mock::given(method("GET"))
            .and(path(format!("/cartoons/{id}.jpg")))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xFFu8, 0xD8]))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/summaries/{id}.csv")))
            .respond_with(ResponseTemplate::new(200).set_body_string("caption,votes\n"))
            .mount(&server)
            .await;
    }

    let tmp = TempDir::new().unwrap();
    let mut config = Config::default();
    config.remote.base_url = server.uri();
    config.output.data_dir = tmp.path().to_path_buf();

    let ids = BTreeSet::from([800, 801, 802]);
    let summary = run_download(
        &config,
        Arc::new(client(&config)),
        &ids,
        false,
        &NoProgress,
    )
    .await
    .unwrap();

    assert_eq!(summary.outcome(800), Some(Outcome::Written));
    assert_eq!(summary.outcome(801), Some(Outcome::Written));
    assert_eq!(summary.outcome(802), Some(Outcome::Failed));
    assert!(!tmp.path().join("802").exists());

    let winner: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(tmp.path().join("801").join("winners.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(winner["winner"], "A caption");
    assert_eq!(
        std::fs::read_to_string(tmp.path().join("800").join("winners.json")).unwrap(),
        "{}"
    );
}
