//! Failure injection: panics and sink errors must not leak into responses.

use axum::{
    body::Body,
    http::{HeaderMap, Request, StatusCode},
    routing::any,
    Router,
};
use grace::http::{with_middleware, AppState, HttpServer, RequestId, RequestIdExt};
use grace::dump::RequestFormatter;
use grace::output::{FileSink, Output};
use tokio::net::TcpListener;
use tower::ServiceExt;

mod common;

async fn sometimes_panics(headers: HeaderMap) -> StatusCode {
    if headers.contains_key("x-boom") {
        panic!("boom requested");
    }
    StatusCode::OK
}

fn panicking_app() -> Router {
    with_middleware(Router::new().route("/", any(sometimes_panics)))
}

#[tokio::test]
async fn test_panic_becomes_500() {
    let app = panicking_app();

    let res = app
        .clone()
        .oneshot(Request::get("/").header("x-boom", "1").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = axum::body::to_bytes(res.into_body(), 1024).await.unwrap();
    assert!(body.is_empty());

    let res = app
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_server_keeps_serving_after_panics() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, panicking_app()).await;
    });

    let client = common::client();
    let url = format!("http://{addr}/");
    for _ in 0..3 {
        let res = client.get(&url).header("x-boom", "1").send().await.unwrap();
        assert_eq!(res.status(), 500);

        let res = client.get(&url).send().await.unwrap();
        assert_eq!(res.status(), 200);
    }
}

#[tokio::test]
async fn test_every_stage_sees_the_same_request_id() {
    let app = with_middleware(Router::new().route(
        "/",
        any(|req: axum::extract::Request| async move {
            req.request_id().map(RequestId::to_string).unwrap_or_default()
        }),
    ));

    let res = app
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let header = res.headers()["x-request-id"].to_str().unwrap().to_string();
    let body = axum::body::to_bytes(res.into_body(), 1024).await.unwrap();
    assert_eq!(body, header.as_bytes());
}

#[tokio::test]
async fn test_sink_failure_keeps_status() {
    let dir = tempfile::tempdir().unwrap();
    let output = Output::from(FileSink::open(dir.path()).unwrap());
    let app = HttpServer::build_router(AppState::new(RequestFormatter::default(), output));
    drop(dir);

    let res = app
        .clone()
        .oneshot(
            Request::post("/gone")
                .header("content-type", "text/plain")
                .body(Body::from("hello"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = app
        .oneshot(Request::delete("/gone").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_oversized_body_is_reported_not_rejected() {
    let buffer = common::SharedBuffer::default();
    let output = Output::from(grace::output::StreamSink::new(buffer.clone()));
    let app = HttpServer::build_router(AppState::new(RequestFormatter::new(8), output));

    let res = app
        .oneshot(
            Request::post("/")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"much":"too long"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let out = buffer.contents();
    assert!(out.contains("Body: application/json\n\n"), "{out}");
    assert!(!out.contains("too long"), "{out}");
}
