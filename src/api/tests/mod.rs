use super::*;
use crate::persistence::MemorySnapshotStore;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};


/// Helper to create a test QuickBlog over a mock article source
async fn create_test_blog(server: &MockServer) -> Arc<QuickBlog> {
    let mut config = Config::default();
    config.source.base_url = server.uri();
    config.source.timeout = Duration::from_secs(2);
    config.retry.max_attempts = 0;
    config.api.bind_address = "127.0.0.1:0".parse().unwrap();

    let blog = QuickBlog::with_port(config, Arc::new(MemorySnapshotStore::new()))
        .await
        .unwrap();
    Arc::new(blog)
}

/// Serve `count` articles from the mock source's /posts
async fn mount_posts(server: &MockServer, count: i64) {
    let posts: Vec<serde_json::Value> = (1..=count)
        .map(|id| {
            serde_json::json!({
                "userId": 1,
                "id": id,
                "title": format!("Post {id}"),
                "body": if id % 5 == 0 { "all about docker" } else { "plain text" }
            })
        })
        .collect();

    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(posts))
        .mount(server)
        .await;
}

/// Run one request through a fresh router and return status and JSON body
async fn send(
    blog: &Arc<QuickBlog>,
    request: Request<Body>,
) -> (StatusCode, serde_json::Value) {
    let app = create_router(blog.clone(), blog.config().clone());
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_api_server_stops_on_shutdown() {
    let server = MockServer::start().await;
    let blog = create_test_blog(&server).await;

    let api_handle = blog.spawn_api_server();
    tokio::time::sleep(Duration::from_millis(100)).await;

    blog.shutdown().await.unwrap();

    let result = tokio::time::timeout(Duration::from_secs(5), api_handle)
        .await
        .expect("server should stop after shutdown")
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_cors_enabled() {
    let server = MockServer::start().await;
    let blog = create_test_blog(&server).await;

    let mut config = (**blog.config()).clone();
    config.api.cors_enabled = true;
    config.api.cors_origins = vec!["*".to_string()];
    let app = create_router(blog, Arc::new(config));

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .contains_key("access-control-allow-origin"),
        "CORS header should be present when CORS is enabled"
    );
}

#[tokio::test]
async fn test_cors_disabled() {
    let server = MockServer::start().await;
    let blog = create_test_blog(&server).await;

    let mut config = (**blog.config()).clone();
    config.api.cors_enabled = false;
    let app = create_router(blog, Arc::new(config));

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert!(!response.headers().contains_key("access-control-allow-origin"));
}

#[test]
fn test_cors_specific_origins() {
    // Unparseable origins are skipped rather than rejected
    let _layer = build_cors_layer(&[
        "http://localhost:3000".to_string(),
        "bad\norigin".to_string(),
    ]);
}
