use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use clipper_core::Repository;
use clipper_gateway::extract::USER_ID_HEADER;
use clipper_gateway::{App, AppState};
use clipper_generator::SeqGenerator;
use clipper_service::ShortenerService;
use clipper_storage::{FileRepository, InMemoryRepository};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

const BASE_URL: &str = "http://localhost:8080";

fn router_over(repository: Arc<dyn Repository>) -> Router {
    let service = ShortenerService::new(repository, SeqGenerator::with_prefix("t"), BASE_URL);
    App::router(AppState::new(Arc::new(service)))
}

fn router() -> Router {
    router_over(Arc::new(InMemoryRepository::new()))
}

fn request(method: Method, uri: &str, user: Option<&str>, body: Body) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header(USER_ID_HEADER, user);
    }
    builder.body(body).unwrap()
}

fn json_request(method: Method, uri: &str, user: Option<&str>, body: Value) -> Request<Body> {
    let mut request = request(method, uri, user, Body::from(body.to_string()));
    request.headers_mut().insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/json"),
    );
    request
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, body.to_vec())
}

async fn send_json(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, _, body) = send(router, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn shorten_text_and_redirect() {
    let app = router();

    let (status, _, body) = send(
        &app,
        request(Method::POST, "/", None, Body::from("https://x.example/a?b=c\n")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, b"http://localhost:8080/t000000");

    let (status, headers, _) = send(&app, request(Method::GET, "/t000000", None, Body::empty())).await;
    assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(headers[header::LOCATION], "https://x.example/a?b=c");
}

#[tokio::test]
async fn shorten_json() {
    let app = router();

    let (status, body) = send_json(
        &app,
        json_request(
            Method::POST,
            "/api/shorten",
            None,
            json!({ "url": "https://x.example" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "result": "http://localhost:8080/t000000" }));
}

#[tokio::test]
async fn invalid_url_is_bad_request() {
    let app = router();

    let (status, _, _) = send(&app, request(Method::POST, "/", None, Body::from("not a url"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = send(
        &app,
        json_request(Method::POST, "/api/shorten", None, json!({ "url": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_and_malformed_slugs() {
    let app = router();

    let (status, _, _) = send(&app, request(Method::GET, "/missing", None, Body::empty())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, _) = send(&app, request(Method::GET, "/bad%20slug", None, Body::empty())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn batch_keeps_correlation_ids() {
    let app = router();

    let (status, body) = send_json(
        &app,
        json_request(
            Method::POST,
            "/api/shorten/batch",
            Some("7"),
            json!([
                { "correlation_id": "b", "original_url": "https://b.example" },
                { "correlation_id": "a", "original_url": "https://a.example" },
            ]),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body,
        json!([
            { "correlation_id": "b", "short_url": "http://localhost:8080/t000000" },
            { "correlation_id": "a", "short_url": "http://localhost:8080/t000001" },
        ])
    );
}

#[tokio::test]
async fn user_urls_are_scoped_to_the_caller() {
    let app = router();

    let (status, _, _) = send(
        &app,
        request(Method::GET, "/api/user/urls", Some("1"), Body::empty()),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    send(
        &app,
        request(Method::POST, "/", Some("1"), Body::from("https://one.example")),
    )
    .await;
    send(
        &app,
        request(Method::POST, "/", Some("2"), Body::from("https://two.example")),
    )
    .await;

    let (status, body) = send_json(
        &app,
        request(Method::GET, "/api/user/urls", Some("1"), Body::empty()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{ "short_url": "http://localhost:8080/t000000", "original_url": "https://one.example" }])
    );
}

#[tokio::test]
async fn delete_is_accepted_and_applied_in_background() {
    let app = router();

    send(
        &app,
        request(Method::POST, "/", Some("1"), Body::from("https://one.example")),
    )
    .await;
    send(
        &app,
        request(Method::POST, "/", Some("2"), Body::from("https://two.example")),
    )
    .await;

    let (status, _, _) = send(
        &app,
        json_request(
            Method::DELETE,
            "/api/user/urls",
            Some("2"),
            json!(["t000000", "t000001"]),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let mut gone = false;
    for _ in 0..100 {
        let (status, _, _) = send(&app, request(Method::GET, "/t000001", None, Body::empty())).await;
        if status == StatusCode::NOT_FOUND {
            gone = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(gone, "owned slug was not deleted");

    // slug owned by another user is untouched
    let (status, _, _) = send(&app, request(Method::GET, "/t000000", None, Body::empty())).await;
    assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
}

#[tokio::test]
async fn delete_with_malformed_slug_is_rejected() {
    let app = router();

    let (status, _, _) = send(
        &app,
        json_request(Method::DELETE, "/api/user/urls", Some("1"), json!(["ok", "not ok"])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn ping_and_stats() {
    let dir = tempfile::TempDir::new().unwrap();
    let repository = FileRepository::open(dir.path().join("urls.json")).await.unwrap();
    let app = router_over(Arc::new(repository));

    let (status, _, _) = send(&app, request(Method::GET, "/ping", None, Body::empty())).await;
    assert_eq!(status, StatusCode::OK);

    for (user, url) in [("1", "https://a.example"), ("1", "https://b.example"), ("", "https://c.example")] {
        let (status, _, _) = send(&app, request(Method::POST, "/", Some(user), Body::from(url))).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send_json(
        &app,
        request(Method::GET, "/api/internal/stats", None, Body::empty()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "urls": 3, "users": 1 }));
}

#[tokio::test]
async fn anonymous_callers_cannot_see_or_delete_each_others_urls() {
    let app = router();

    let (status, _, _) = send(
        &app,
        request(Method::POST, "/", None, Body::from("https://alice-private.example")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _, body) = send(&app, request(Method::GET, "/api/user/urls", None, Body::empty())).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());

    let (status, _, _) = send(
        &app,
        json_request(Method::DELETE, "/api/user/urls", None, json!(["t000000"])),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);

    tokio::time::sleep(Duration::from_millis(50)).await;
    let (status, headers, _) = send(&app, request(Method::GET, "/t000000", None, Body::empty())).await;
    assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(headers[header::LOCATION], "https://alice-private.example");
}
