use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

fn test_client() -> FlyerClient {
    FlyerClient::new(5, "flyerdb-test/0.1").expect("failed to build test client")
}

#[tokio::test]
async fn fetch_html_returns_body_on_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/offer/1/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .mount(&server)
        .await;

    let body = test_client()
        .fetch_html(&format!("{}/offer/1/", server.uri()))
        .await
        .expect("fetch should succeed");
    assert_eq!(body, "<html>ok</html>");
}

#[tokio::test]
async fn fetch_html_maps_non_success_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = test_client().fetch_html(&server.uri()).await;
    assert!(
        matches!(result, Err(ScraperError::UnexpectedStatus { status: 503, .. })),
        "expected UnexpectedStatus(503), got: {result:?}"
    );
}

#[tokio::test]
async fn download_to_file_streams_bytes_to_disk() {
    let server = MockServer::start().await;
    let payload: Vec<u8> = (0..20_000u32).map(|i| (i % 251) as u8).collect();
    Mock::given(method("GET"))
        .and(path("/img/page1.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(payload.clone()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("image_1.jpg");
    let written = test_client()
        .download_to_file(&format!("{}/img/page1.jpg", server.uri()), &dest)
        .await
        .expect("download should succeed");

    assert_eq!(written, payload.len() as u64);
    assert_eq!(std::fs::read(&dest).unwrap(), payload);
}

#[tokio::test]
async fn download_to_file_does_not_create_file_on_404() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("image_1.jpg");
    let result = test_client().download_to_file(&server.uri(), &dest).await;

    assert!(matches!(
        result,
        Err(ScraperError::UnexpectedStatus { status: 404, .. })
    ));
    assert!(!dest.exists());
}

#[tokio::test]
async fn download_to_file_reports_io_error_for_missing_directory() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8, 2, 3]))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("missing").join("image_1.jpg");
    let result = test_client().download_to_file(&server.uri(), &dest).await;
    assert!(matches!(result, Err(ScraperError::Io { .. })));
}

#[tokio::test]
async fn fetch_page_body_returns_body_for_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/offers/111/expired"))
        .respond_with(ResponseTemplate::new(404).set_body_string("<html>gone</html>"))
        .mount(&server)
        .await;

    let body = test_client()
        .fetch_page_body(&format!("{}/offers/111/expired", server.uri()))
        .await
        .expect("error status should not fail the fetch");
    assert_eq!(body, "<html>gone</html>");
}

#[tokio::test]
async fn fetch_page_body_fails_on_connection_error() {
    let result = test_client()
        .fetch_page_body("http://127.0.0.1:9/offers/1/x")
        .await;
    assert!(matches!(result, Err(ScraperError::Http(_))));
}

#[tokio::test]
async fn download_to_file_removes_truncated_file() {
    let server = MockServer::start().await;
    // Declared length exceeds the body, so the stream ends early.
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-length", "4096")
                .set_body_bytes(vec![7u8; 16]),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("image_1.jpg");
    let result = test_client().download_to_file(&server.uri(), &dest).await;

    assert!(result.is_err(), "truncated body should fail: {result:?}");
    assert!(!dest.exists());
}

#[tokio::test]
async fn zero_timeout_waits_for_slow_responses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html>slow</html>")
                .set_delay(std::time::Duration::from_millis(1500)),
        )
        .mount(&server)
        .await;

    let bounded = FlyerClient::new(1, "flyerdb-test/0.1").unwrap();
    let result = bounded.fetch_html(&server.uri()).await;
    assert!(
        matches!(result, Err(ScraperError::Http(ref e)) if e.is_timeout()),
        "expected a timeout, got: {result:?}"
    );

    let unbounded = FlyerClient::new(0, "flyerdb-test/0.1").unwrap();
    let body = unbounded
        .fetch_html(&server.uri())
        .await
        .expect("no timeout should apply");
    assert_eq!(body, "<html>slow</html>");
}
