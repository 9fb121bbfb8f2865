//! HTTP API Integration Tests
//! Run with: cargo test --test api_test

use std::sync::{Arc, Once};

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use bucket_bot::application::messaging::CommandDispatcher;
use bucket_bot::domain::entities::Message;
use bucket_bot::domain::traits::BucketStore;
use bucket_bot::infrastructure::api::create_router;
use bucket_bot::infrastructure::config::Config;
use bucket_bot::infrastructure::storage::SqliteBucketStore;

static INIT: Once = Once::new();

fn ensure_init() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

fn setup() -> (tempfile::TempDir, Arc<SqliteBucketStore>) {
    ensure_init();
    let dir = tempfile::tempdir().expect("tempdir");
    let store = SqliteBucketStore::new(dir.path().join("quotes.db"));
    store.init().expect("init store");
    (dir, Arc::new(store))
}

async fn call(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.expect("request failed");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_form(uri: &str, body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_post_then_get() {
    let (_dir, store) = setup();
    let app = create_router(store.clone());

    let (status, body) = call(app.clone(), post_form("/movie", "quote=The+Big+Lebowski")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Danke");

    let (status, body) = call(app, get("/movie")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "The Big Lebowski");
}

#[tokio::test]
async fn test_get_unknown_bucket_is_not_found() {
    let (_dir, store) = setup();
    let (status, _) = call(create_router(store), get("/nothing")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_post_without_quote_is_rejected() {
    let (_dir, store) = setup();
    let app = create_router(store.clone());

    let (status, _) = call(app.clone(), post_form("/movie", "other=1")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = call(app, post_form("/movie", "quote=")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(store.read_all("movie").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_listing_is_numbered_from_zero() {
    let (_dir, store) = setup();
    store.append("movie", "Inception").await.unwrap();
    store.append("movie", "Heat").await.unwrap();

    let (status, body) = call(create_router(store), get("/movie/all")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "0. Inception\n1. Heat\n");
}

#[tokio::test]
async fn test_index_lists_buckets() {
    let (_dir, store) = setup();
    store.append("movie", "Inception").await.unwrap();
    store.append("movie_comedy", "Airplane!").await.unwrap();

    let (status, body) = call(create_router(store), get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Hello!\nmovie\nmovie_comedy\n");
}

#[tokio::test]
async fn test_store_failure_is_not_acceptable() {
    ensure_init();
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(SqliteBucketStore::new(dir.path().join("gone").join("quotes.db")));
    let app = create_router(store);

    let (status, _) = call(app.clone(), get("/movie")).await;
    assert_eq!(status, StatusCode::NOT_ACCEPTABLE);
    let (status, _) = call(app, post_form("/movie", "quote=x")).await;
    assert_eq!(status, StatusCode::NOT_ACCEPTABLE);
}

/// Quotes added over HTTP are served in the channel and vice versa
#[tokio::test]
async fn test_chat_and_http_share_the_store() {
    let (_dir, store) = setup();
    let app = create_router(store.clone());
    let mut config = Config::default();
    config.irc.nickname = "quotebot".to_string();
    let dispatcher = CommandDispatcher::new(config.dispatch_settings(), store.clone());

    call(app.clone(), post_form("/movie_comedy", "quote=Airplane!")).await;
    let reply = dispatcher
        .dispatch(&Message::new("alice", "!movie comedy bob"))
        .await
        .unwrap();
    assert_eq!(reply.text, "bob: Airplane!");

    let reply = dispatcher
        .dispatch(&Message::new("alice", "!movie add Inception"))
        .await
        .unwrap();
    assert_eq!(reply.text, config.bot.set_success_message);
    let (status, body) = call(app, get("/movie/all")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "0. Inception\n");
}
