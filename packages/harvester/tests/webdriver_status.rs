//! WebDriver status preflight against a mock server.

use rera_harvester::http::{create_client, wait_for_webdriver};
use rera_harvester::HarvesterError;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn ready(ready: bool) -> ResponseTemplate {
    let message = if ready { "ChromeDriver ready" } else { "busy" };
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "value": { "ready": ready, "message": message }
    }))
}

#[tokio::test]
async fn test_ready_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ready(true))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client().unwrap();
    wait_for_webdriver(&client, &server.uri()).await.unwrap();
}

#[tokio::test]
async fn test_server_error_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ready(true))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client().unwrap();
    wait_for_webdriver(&client, &server.uri()).await.unwrap();
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client().unwrap();
    let err = wait_for_webdriver(&client, &server.uri()).await.unwrap_err();
    assert!(matches!(err, HarvesterError::WebDriverUnavailable { .. }));
    assert!(err.to_string().contains("404"));
}

#[tokio::test]
async fn test_not_ready_exhausts_retries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ready(false))
        .expect(3)
        .mount(&server)
        .await;

    let client = create_client().unwrap();
    let err = wait_for_webdriver(&client, &format!("{}/", server.uri()))
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("after 3 attempts"), "{message}");
    assert!(message.contains("Not ready: busy"), "{message}");
}

#[tokio::test]
async fn test_unreachable_server() {
    // Bind then drop a listener so the port is free and refuses connections
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let client = create_client().unwrap();
    let err = wait_for_webdriver(&client, &url).await.unwrap_err();
    assert!(matches!(err, HarvesterError::WebDriverUnavailable { .. }));
}
