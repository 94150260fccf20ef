// tests/client_retry_test.rs

use course_dl::client::{RobustClient, Transport};
use course_dl::config::AppConfig;
use course_dl::error::AppError;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use std::sync::Arc;

fn client_with_retries(max_retries: u32) -> RobustClient {
    let config = AppConfig {
        max_retries,
        ..AppConfig::default()
    };
    RobustClient::new(Arc::new(config)).expect("Failed to create client")
}

#[tokio::test(flavor = "multi_thread")]
async fn test_transport_sends_headers_and_returns_body() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/course")
        .match_header("authorization", "Bearer secret")
        .with_status(200)
        .with_body(r#"{"id": 42, "title": "Rust"}"#)
        .create_async()
        .await;

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer secret"));

    let client = client_with_retries(0);
    let response = client
        .get(&format!("{}/api/course", server.url()), &headers)
        .await
        .expect("Request should succeed");

    assert_eq!(response.status, 200);
    assert!(response.body.contains("\"id\": 42"));
    mock.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_forbidden_is_not_retried_and_maps_to_access_forbidden() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/video.mp4")
        .with_status(403)
        .expect(1)
        .create_async()
        .await;

    // 403 不属于瞬时错误，即使允许重试也只请求一次
    let client = client_with_retries(2);
    let err = client
        .get(&format!("{}/video.mp4", server.url()), &HeaderMap::new())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::AccessForbidden { ref url } if url.ends_with("/video.mp4")));
    assert!(err.is_auth_failure());
    mock.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_other_status_maps_to_http_status() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/missing")
        .with_status(404)
        .create_async()
        .await;

    let client = client_with_retries(0);
    let err = client
        .get(&format!("{}/missing", server.url()), &HeaderMap::new())
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(404));
    assert!(!err.is_auth_failure());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_transient_server_error_is_retried() {
    let mut server = mockito::Server::new_async().await;
    let failing = server
        .mock("GET", "/flaky")
        .with_status(503)
        .expect(1)
        .create_async()
        .await;
    let succeeding = server
        .mock("GET", "/flaky")
        .with_status(200)
        .with_body("ok")
        .expect(1)
        .create_async()
        .await;

    let client = client_with_retries(1);
    let response = client
        .get(&format!("{}/flaky", server.url()), &HeaderMap::new())
        .await
        .expect("Request should eventually succeed");

    assert_eq!(response.body, "ok");
    failing.assert_async().await;
    succeeding.assert_async().await;
}
