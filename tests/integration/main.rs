//! Integration tests for the envelope API.
//!
//! Requests go through the full router with `tower::ServiceExt::oneshot`,
//! so no socket is bound.

use std::io::{Read, Write};
use std::net::SocketAddr;

use api_projects::api::{create_router, AppContext};
use api_projects::config::Config;
use api_projects::envelope::{construct_response, RequestInfo};
use api_projects::server;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::NaiveDateTime;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    create_router(AppContext::new(Config::default()))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::HOST, "testserver")
        .body(Body::empty())
        .unwrap()
}

async fn send(request: Request<Body>) -> (StatusCode, String) {
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn parse_timestamp(body: &Value) -> NaiveDateTime {
    body["timestamp"].as_str().unwrap().parse().unwrap()
}

/// Serve `router` on an ephemeral port; the server stops when the sender drops.
async fn spawn_router(router: Router) -> (SocketAddr, tokio::sync::oneshot::Sender<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();

    tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                rx.await.ok();
            })
            .await
            .unwrap();
    });

    (addr, tx)
}

/// Raw HTTP/1.1 GET over a real socket. Returns (status line, body).
async fn raw_get(addr: SocketAddr, path: &str) -> (String, String) {
    let path = path.to_string();
    tokio::task::spawn_blocking(move || {
        let mut stream = std::net::TcpStream::connect(addr).unwrap();
        write!(
            stream,
            "GET {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n"
        )
        .unwrap();

        let mut raw = String::new();
        stream.read_to_string(&mut raw).unwrap();

        let (head, body) = raw.split_once("\r\n\r\n").unwrap();
        let status_line = head.lines().next().unwrap().to_string();
        (status_line, body.to_string())
    })
    .await
    .unwrap()
}

/// Health check answers with the OK envelope.
#[tokio::test]
async fn test_index_envelope() {
    let (status, raw) = send(get("/")).await;
    assert_eq!(status, StatusCode::OK);

    let body: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(body["message"], json!("OK"));
    assert_eq!(body["method"], json!("GET"));
    assert_eq!(body["status-code"], json!(200));
    assert_eq!(body["url"], json!("http://testserver/"));
    assert_eq!(body["data"], json!({}));
    assert_eq!(body.as_object().unwrap().len(), 6);
}

/// Keys appear in the documented order on the wire.
#[tokio::test]
async fn test_envelope_key_order() {
    let (_, raw) = send(get("/")).await;

    let positions: Vec<usize> = ["message", "method", "status-code", "timestamp", "url", "data"]
        .iter()
        .map(|key| raw.find(&format!("\"{key}\":")).unwrap())
        .collect();

    let mut sorted = positions.clone();
    sorted.sort_unstable();
    assert_eq!(positions, sorted);
}

/// The url field is the full inbound URL, query string included.
#[tokio::test]
async fn test_url_is_full_request_url() {
    let (_, raw) = send(get("/?probe=1&verbose")).await;
    let body: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(body["url"], json!("http://testserver/?probe=1&verbose"));

    let forwarded = Request::builder()
        .uri("/")
        .header(header::HOST, "api.example.com")
        .header("x-forwarded-proto", "https")
        .body(Body::empty())
        .unwrap();
    let (_, raw) = send(forwarded).await;
    let body: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(body["url"], json!("https://api.example.com/"));
}

/// Timestamps are ISO-8601 and never move backwards between requests.
#[tokio::test]
async fn test_timestamps_are_non_decreasing() {
    let mut previous = None;

    for _ in 0..10 {
        let (_, raw) = send(get("/")).await;
        let body: Value = serde_json::from_str(&raw).unwrap();
        let ts = parse_timestamp(&body);

        if let Some(prev) = previous {
            assert!(ts >= prev);
        }
        previous = Some(ts);
    }
}

/// Only the health check route exists.
#[tokio::test]
async fn test_unknown_route_is_404() {
    let (status, _) = send(get("/predict")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// A context loaded with a run id still serves the same envelope.
#[tokio::test]
async fn test_router_with_run_id_context() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "run-42").unwrap();

    let ctx = AppContext::load(Config {
        run_id_path: Some(file.path().to_path_buf()),
        ..Config::default()
    })
    .unwrap();
    assert_eq!(ctx.run_id(), Some("run-42"));

    let response = create_router(ctx).oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

/// Codes that cannot carry a body on the status line still deliver the envelope.
#[tokio::test]
async fn test_bodyless_status_codes_keep_envelope() {
    let router = Router::new()
        .route(
            "/no-content",
            axum::routing::get(construct_response(|_request: RequestInfo| async {
                json!({"message": "No Content", "status-code": 204, "data": {"k": 1}})
            })),
        )
        .route(
            "/continue",
            axum::routing::get(construct_response(|_request: RequestInfo| async {
                json!({"message": "Continue", "status-code": 100})
            })),
        );
    let (addr, _stop) = spawn_router(router).await;

    let (status_line, body) = raw_get(addr, "/no-content").await;
    assert_eq!(status_line, "HTTP/1.1 200 OK");
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["status-code"], json!(204));
    assert_eq!(body["message"], json!("No Content"));
    assert_eq!(body["data"], json!({"k": 1}));
    assert_eq!(body["url"], json!(format!("http://{addr}/no-content")));

    let (status_line, body) = raw_get(addr, "/continue").await;
    assert_eq!(status_line, "HTTP/1.1 200 OK");
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["status-code"], json!(100));
    assert_eq!(body["message"], json!("Continue"));
    assert!(body.get("data").is_none());
}

/// The library server answers the health check over a real socket.
#[tokio::test]
async fn test_server_serves_index() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    let handle = tokio::spawn(server::serve(listener, AppContext::default(), async move {
        rx.await.ok();
    }));

    let (status_line, body) = raw_get(addr, "/").await;
    assert_eq!(status_line, "HTTP/1.1 200 OK");
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["message"], json!("OK"));
    assert_eq!(body["data"], json!({}));

    tx.send(()).unwrap();
    assert!(handle.await.unwrap().is_ok());
}
