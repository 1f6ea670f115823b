//! Fetch failure handling: timeouts, upstream errors and the retry policy

mod common;

use common::{assert_store_ids, next_event_matching, test_config, twenty_posts};
use quick_blog::{Article, Error, Event, FetchError, QuickBlog};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn timeout_leaves_store_in_prior_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(twenty_posts())
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let mut config = test_config(&server.uri(), dir.path());
    config.source.timeout = Duration::from_millis(300);
    config.retry.max_attempts = 0;
    let blog = QuickBlog::new(config).await.unwrap();
    blog.store()
        .set_posts(vec![Article::new(7, "Existing", "kept")])
        .await
        .unwrap();
    let mut events = blog.subscribe();

    let error = blog.refresh_articles().await.unwrap_err();

    assert!(
        matches!(error, Error::Fetch(FetchError::Timeout { .. })),
        "got {error:?}"
    );
    assert_store_ids(&blog, &[7]);
    let failed = next_event_matching(&mut events, Duration::from_secs(1), |e| {
        matches!(e, Event::LoadFailed { .. })
    })
    .await;
    assert!(matches!(
        failed,
        Some(Event::LoadFailed {
            retryable: true,
            ..
        })
    ));
}

#[tokio::test]
async fn server_errors_are_retried_then_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let blog = QuickBlog::new(test_config(&server.uri(), dir.path()))
        .await
        .unwrap();

    let error = blog.load_articles().await.unwrap_err();

    assert!(matches!(
        error,
        Error::Fetch(FetchError::UpstreamError { status: 503, .. })
    ));
    assert!(!blog.store().has_articles());
}

#[tokio::test]
async fn transient_failure_recovers_on_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(twenty_posts()))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let blog = QuickBlog::new(test_config(&server.uri(), dir.path()))
        .await
        .unwrap();

    blog.load_articles().await.unwrap();
    assert_eq!(blog.store().len(), 20);
}

#[tokio::test]
async fn malformed_body_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .expect(1)
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let blog = QuickBlog::new(test_config(&server.uri(), dir.path()))
        .await
        .unwrap();

    let error = blog.load_articles().await.unwrap_err();
    assert!(matches!(error, Error::Fetch(FetchError::Decode(_))));
}
