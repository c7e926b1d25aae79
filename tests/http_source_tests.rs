use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use holiday_planner::data::{load, DatasetSource, HttpDatasetSource, LoadError};

async fn spawn_dataset_server() -> SocketAddr {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("dataset.json");
    let document = std::fs::read_to_string(path).expect("read fixture");

    let app = Router::new()
        .route("/dataset.json", get(move || async move { document }))
        .route("/garbage.json", get(|| async { "<html>not json</html>" }))
        .route(
            "/down.json",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind loopback");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve fixture");
    });
    addr
}

fn source(addr: SocketAddr, path: &str) -> HttpDatasetSource {
    HttpDatasetSource::new(format!("http://{addr}{path}"), Duration::from_secs(5))
        .expect("client should build")
}

#[tokio::test]
async fn fetches_and_decodes_the_published_document() {
    let addr = spawn_dataset_server().await;
    let source = source(addr, "/dataset.json");

    let countries = load(&source).await.expect("dataset should load");
    assert_eq!(countries.len(), 4);
    assert_eq!(countries[0].code, "BE");
    assert_eq!(source.describe(), format!("http://{addr}/dataset.json"));
}

#[tokio::test]
async fn each_fetch_goes_back_to_the_source() {
    let addr = spawn_dataset_server().await;
    let source = source(addr, "/dataset.json");

    let first = source.fetch().await.expect("first fetch");
    let second = source.fetch().await.expect("second fetch");
    assert_eq!(first, second);
}

#[tokio::test]
async fn error_status_is_reported_with_the_code() {
    let addr = spawn_dataset_server().await;

    let err = load(&source(addr, "/down.json"))
        .await
        .expect_err("503 should fail");
    match err {
        LoadError::Status { status, url } => {
            assert_eq!(status, 503);
            assert!(url.ends_with("/down.json"));
        }
        other => panic!("expected status error, got {other:?}"),
    }

    let err = load(&source(addr, "/missing.json"))
        .await
        .expect_err("404 should fail");
    assert!(matches!(err, LoadError::Status { status: 404, .. }));
}

#[tokio::test]
async fn non_json_body_is_a_parse_error() {
    let addr = spawn_dataset_server().await;

    let err = load(&source(addr, "/garbage.json"))
        .await
        .expect_err("html should not decode");
    assert!(err.is_parse());
}

#[tokio::test]
async fn unreachable_host_is_a_fetch_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind loopback");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let err = load(&source(addr, "/dataset.json"))
        .await
        .expect_err("closed port should fail");
    assert!(matches!(err, LoadError::Fetch { .. }));
}
