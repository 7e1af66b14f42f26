//! Integration tests for the capture trigger, the image poller, and the
//! auth calls, run against a deterministic mock backend.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use api::{ApiClient, ApiConfig, CancelToken, PollOptions, Session, TokenPair};

fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(ApiConfig::new(server.uri()), Session::new())
}

fn fast_poll() -> PollOptions {
    PollOptions {
        timeout_ms: 50,
        interval_ms: 10,
    }
}

#[tokio::test]
async fn poll_returns_on_first_successful_probe() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/images/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 3, "image": "http://cdn.example.com/sample.jpg"},
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let outcome = client
        .poll_for_image(&fast_poll(), &CancelToken::new())
        .await;

    assert!(outcome.found());
    assert_eq!(
        outcome.image.as_deref(),
        Some("http://cdn.example.com/sample.jpg")
    );
    assert!(!outcome.cancelled);
}

#[tokio::test]
async fn relative_locators_are_absolutized_against_the_base() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/images/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"file": "/media/uploads/sample.jpg"}],
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let found = client.latest_image().await.unwrap();
    assert_eq!(found, Some(format!("{}/media/uploads/sample.jpg", server.uri())));
}

#[tokio::test]
async fn failing_probes_are_tolerated_until_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/images/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let outcome = client
        .poll_for_image(&fast_poll(), &CancelToken::new())
        .await;

    assert!(!outcome.found());
    assert!(!outcome.cancelled);
    let message = outcome.last_error.expect("latest error is kept");
    assert!(message.contains("500"), "unexpected message: {message}");
}

#[tokio::test]
async fn empty_listings_poll_until_timeout_without_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/images/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let outcome = client
        .poll_for_image(&fast_poll(), &CancelToken::new())
        .await;

    assert!(!outcome.found());
    assert!(outcome.last_error.is_none());
}

#[tokio::test]
async fn cancelled_token_short_circuits_the_loop() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/images/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let cancel = CancelToken::new();
    cancel.cancel();

    let outcome = client.poll_for_image(&fast_poll(), &cancel).await;
    assert!(outcome.cancelled);
    assert!(!outcome.found());
}

#[tokio::test]
async fn capture_trigger_reports_success_and_refusal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/upload/"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.trigger_capture().await.is_ok());

    server.reset().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/upload/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client.trigger_capture().await.unwrap_err();
    assert_eq!(err.status_code(), Some(503));
}

#[tokio::test]
async fn authenticated_requests_carry_the_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/images/"))
        .and(header("authorization", "Bearer access-789"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"image": "sample.jpg"},
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let session = Session::new();
    session.set_tokens(TokenPair {
        access: "access-789".into(),
        refresh: "refresh-789".into(),
    });
    let client = ApiClient::new(ApiConfig::new(server.uri()), session);

    let found = client.latest_image().await.unwrap();
    assert!(found.is_some());
}

#[tokio::test]
async fn login_stores_the_token_pair_on_the_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/token/"))
        .and(body_json(json!({"username": "marina", "password": "hunter22!"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access": "a-token",
            "refresh": "r-token",
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let tokens = client.login("marina", "hunter22!").await.unwrap();
    assert_eq!(tokens.access, "a-token");
    assert_eq!(client.session().access_token().as_deref(), Some("a-token"));
}

#[tokio::test]
async fn login_surfaces_the_backend_detail_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/token/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "No active account found with the given credentials",
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.login("marina", "wrong").await.unwrap_err();
    assert_eq!(err.status_code(), Some(401));
    assert!(err.to_string().contains("No active account"));
    assert!(!client.session().is_authenticated());
}

#[tokio::test]
async fn register_flattens_field_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/register/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "username": ["A user with that username already exists."],
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .register("marina", "marina@example.com", "hunter22!")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("username"));
}

#[tokio::test]
async fn image_bytes_come_back_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/media/uploads/sample.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jpeg-bytes".to_vec()))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let url = format!("{}/media/uploads/sample.jpg", server.uri());
    let bytes = client.fetch_image_bytes(&url).await.unwrap();
    assert_eq!(bytes, b"jpeg-bytes");

    let inline = client
        .fetch_image_bytes("data:image/png;base64,aGVsbG8=")
        .await
        .unwrap();
    assert_eq!(inline, b"hello");
}
