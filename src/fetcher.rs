//! Article source client
//!
//! Talks to a JSONPlaceholder-style REST API: `GET <base>/posts` for the
//! list and `GET <base>/posts/<id>` for a single article. Every request is
//! bounded by the configured timeout; when it expires the in-flight request
//! is dropped and [`FetchError::Timeout`] is returned. Nothing here touches
//! the store or retries; callers decide what to do with the result.

use crate::config::{RetryConfig, SourceConfig};
use crate::error::{Error, FetchError, Result};
use crate::retry::with_retry;
use crate::types::Article;
use reqwest::header::{CACHE_CONTROL, HeaderMap, HeaderValue, PRAGMA};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Path segment holding the article collection
const POSTS_PATH: &str = "posts";

/// HTTP client for the article source (cheap to clone)
#[derive(Clone, Debug)]
pub struct ArticleFetcher {
    http_client: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl ArticleFetcher {
    /// Create a fetcher for the configured source
    ///
    /// # Errors
    /// Returns [`Error::Config`] when the base URL does not parse, or when
    /// the HTTP client cannot be built.
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let mut base = config.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|e| {
            Error::config(
                "source.base_url",
                format!("invalid base url '{}': {e}", config.base_url),
            )
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(
            CACHE_CONTROL,
            HeaderValue::from_static("no-cache, no-store, must-revalidate"),
        );
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));

        let http_client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()
            .map_err(|e| Error::config("source", format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            base_url,
            timeout: config.timeout,
        })
    }

    /// URL of the article list
    pub fn endpoint(&self) -> Url {
        self.url_for(POSTS_PATH)
    }

    /// Fetch the full article list
    ///
    /// # Errors
    /// - [`FetchError::Timeout`] when the budget is exceeded
    /// - [`FetchError::UpstreamError`] for any non-success status
    /// - [`FetchError::Decode`] when the body is not an array of articles
    /// - [`FetchError::Network`] for transport failures
    pub async fn fetch_articles(&self) -> std::result::Result<Vec<Article>, FetchError> {
        let url = self.endpoint();
        debug!(url = %url, "Fetching article list");

        let articles: Vec<Article> = self.get_json(url).await?;

        debug!(count = articles.len(), "Fetched article list");
        Ok(articles)
    }

    /// Fetch one article by id
    ///
    /// A 404 from the source is reported as [`FetchError::NotFound`].
    pub async fn fetch_article(&self, id: i64) -> std::result::Result<Article, FetchError> {
        let url = self.url_for(&format!("{POSTS_PATH}/{id}"));
        debug!(url = %url, id, "Fetching article");

        match self.get_json(url).await {
            Err(FetchError::UpstreamError { status: 404, .. }) => Err(FetchError::NotFound { id }),
            other => other,
        }
    }

    /// [`fetch_articles`](Self::fetch_articles) under a caller retry policy
    pub async fn fetch_articles_with_retry(
        &self,
        retry: &RetryConfig,
    ) -> std::result::Result<Vec<Article>, FetchError> {
        with_retry(retry, || self.fetch_articles()).await
    }

    fn url_for(&self, path: &str) -> Url {
        // Relative paths without a leading slash always join onto a base ending in '/'
        self.base_url
            .join(path)
            .unwrap_or_else(|_| self.base_url.clone())
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> std::result::Result<T, FetchError> {
        let budget = self.timeout;
        let request = async {
            let response = self
                .http_client
                .get(url.clone())
                .send()
                .await
                .map_err(|e| classify_transport_error(e, budget))?;

            let status = response.status();
            if !status.is_success() {
                warn!(url = %url, status = status.as_u16(), "Article source returned an error status");
                return Err(FetchError::UpstreamError {
                    status: status.as_u16(),
                    status_text: status.canonical_reason().unwrap_or_default().to_string(),
                });
            }

            let bytes = response
                .bytes()
                .await
                .map_err(|e| classify_transport_error(e, budget))?;

            serde_json::from_slice::<T>(&bytes).map_err(|e| FetchError::Decode(e.to_string()))
        };

        match tokio::time::timeout(budget, request).await {
            Ok(result) => result,
            Err(_) => {
                warn!(url = %url, timeout_secs = budget.as_secs(), "Request to article source timed out");
                Err(FetchError::Timeout { after: budget })
            }
        }
    }
}

fn classify_transport_error(error: reqwest::Error, budget: Duration) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout { after: budget }
    } else {
        FetchError::Network(error.to_string())
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher_for(server: &MockServer, timeout: Duration) -> ArticleFetcher {
        ArticleFetcher::new(&SourceConfig {
            base_url: server.uri(),
            timeout,
            ..SourceConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn endpoint_joins_posts_onto_base() {
        let fetcher = ArticleFetcher::new(&SourceConfig {
            base_url: "https://example.com/api".into(),
            ..SourceConfig::default()
        })
        .unwrap();
        assert_eq!(fetcher.endpoint().as_str(), "https://example.com/api/posts");
    }

    #[test]
    fn invalid_base_url_is_config_error() {
        let result = ArticleFetcher::new(&SourceConfig {
            base_url: "::not a url::".into(),
            ..SourceConfig::default()
        });
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[tokio::test]
    async fn fetches_and_decodes_article_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts"))
            .and(header("pragma", "no-cache"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"userId": 1, "id": 1, "title": "A", "body": "x"},
                {"userId": 1, "id": 2, "title": "B", "body": "y"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let articles = fetcher_for(&server, Duration::from_secs(5))
            .fetch_articles()
            .await
            .unwrap();

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "A");
        assert_eq!(articles[1].user_id, Some(1));
    }

    #[tokio::test]
    async fn non_success_status_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let error = fetcher_for(&server, Duration::from_secs(5))
            .fetch_articles()
            .await
            .unwrap_err();

        assert_eq!(
            error,
            FetchError::UpstreamError {
                status: 503,
                status_text: "Service Unavailable".into()
            }
        );
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"posts": []})))
            .mount(&server)
            .await;

        let error = fetcher_for(&server, Duration::from_secs(5))
            .fetch_articles()
            .await
            .unwrap_err();

        assert!(matches!(error, FetchError::Decode(_)), "got {error:?}");
    }

    #[tokio::test]
    async fn slow_source_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([]))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let error = fetcher_for(&server, Duration::from_millis(200))
            .fetch_articles()
            .await
            .unwrap_err();

        assert_eq!(
            error,
            FetchError::Timeout {
                after: Duration::from_millis(200)
            }
        );
    }

    #[tokio::test]
    async fn single_article_404_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts/404"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let error = fetcher_for(&server, Duration::from_secs(5))
            .fetch_article(404)
            .await
            .unwrap_err();

        assert_eq!(error, FetchError::NotFound { id: 404 });
    }

    #[tokio::test]
    async fn single_article_is_decoded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts/7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!({"userId": 2, "id": 7, "title": "Seven", "body": "body"}),
            ))
            .mount(&server)
            .await;

        let article = fetcher_for(&server, Duration::from_secs(5))
            .fetch_article(7)
            .await
            .unwrap();

        assert_eq!(article.id, 7);
        assert_eq!(article.title, "Seven");
    }

    #[tokio::test]
    async fn unreachable_source_is_network_error() {
        let fetcher = ArticleFetcher::new(&SourceConfig {
            // Port 9 (discard) is closed on loopback in test environments
            base_url: "http://127.0.0.1:9".into(),
            timeout: Duration::from_secs(5),
            ..SourceConfig::default()
        })
        .unwrap();

        let error = fetcher.fetch_articles().await.unwrap_err();
        assert!(
            matches!(error, FetchError::Network(_) | FetchError::Timeout { .. }),
            "got {error:?}"
        );
    }
}
