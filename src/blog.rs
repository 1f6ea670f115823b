//! Blog facade tying the fetcher, store and views together

use crate::config::Config;
use crate::error::{Error, FetchError, Result};
use crate::fetcher::ArticleFetcher;
use crate::pagination::{page_labels, paginate, total_pages};
use crate::persistence::{self, SnapshotPort};
use crate::search::SearchView;
use crate::store::ArticleStore;
use crate::types::{
    ArticleCard, ArticleDetail, ArticleListing, Event, ImageVariant, LoadSource,
};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

/// Capacity of the event broadcast channel
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Blog instance (cloneable - all fields are Arc-wrapped or cheap to clone)
#[derive(Clone)]
pub struct QuickBlog {
    /// Configuration (wrapped in Arc for sharing with the API)
    pub(crate) config: Arc<Config>,
    /// Client for the article source
    pub(crate) fetcher: ArticleFetcher,
    /// Article collection shared with every view
    pub(crate) store: Arc<ArticleStore>,
    /// Event broadcast channel sender (multiple subscribers supported)
    pub(crate) event_tx: broadcast::Sender<Event>,
    /// Cancelled by [`shutdown`](Self::shutdown); the API server watches it
    pub(crate) shutdown_token: CancellationToken,
}

impl std::fmt::Debug for QuickBlog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuickBlog")
            .field("source", &self.fetcher.endpoint().as_str())
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl QuickBlog {
    /// Create a blog instance from configuration
    ///
    /// Validates the config, opens the configured snapshot backend and
    /// restores any compatible snapshot. Nothing is fetched yet; call
    /// [`load_articles`](Self::load_articles) for that.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use quick_blog::{Config, QuickBlog};
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let blog = QuickBlog::new(Config::default()).await?;
    /// blog.load_articles().await?;
    ///
    /// let listing = blog.list(Some("qui"), 1, None);
    /// println!("{} matching articles", listing.total_items);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let port = persistence::open_port(&config.persistence).await?;
        Self::with_port(config, port).await
    }

    /// Create a blog instance over an explicit snapshot port
    pub async fn with_port(config: Config, port: Arc<dyn SnapshotPort>) -> Result<Self> {
        config.validate()?;
        let fetcher = ArticleFetcher::new(&config.source)?;
        let store = ArticleStore::open(&config.store, port).await?;
        let (event_tx, _rx) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        tracing::info!(
            source = %fetcher.endpoint(),
            cached = store.len(),
            "Blog initialized"
        );

        Ok(Self {
            config: Arc::new(config),
            fetcher,
            store: Arc::new(store),
            event_tx,
            shutdown_token: CancellationToken::new(),
        })
    }

    /// Subscribe to blog events
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Current configuration
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// The shared article store
    pub fn store(&self) -> &Arc<ArticleStore> {
        &self.store
    }

    /// The article source client
    pub fn fetcher(&self) -> &ArticleFetcher {
        &self.fetcher
    }

    /// Populate the store unless it already holds articles
    ///
    /// A restored snapshot is used as-is and nothing is fetched.
    pub async fn load_articles(&self) -> Result<LoadSource> {
        if self.store.has_articles() {
            tracing::debug!(count = self.store.len(), "Using cached articles");
            self.emit_event(Event::ArticlesLoaded {
                count: self.store.len(),
                source: LoadSource::Snapshot,
            });
            return Ok(LoadSource::Snapshot);
        }

        self.refresh_articles().await
    }

    /// Fetch the article list (with the configured retry policy) and
    /// replace the store's collection
    ///
    /// On failure the store keeps its previous collection, a
    /// [`Event::LoadFailed`] is emitted and the fetch error is returned.
    pub async fn refresh_articles(&self) -> Result<LoadSource> {
        let articles = match self
            .fetcher
            .fetch_articles_with_retry(&self.config.retry)
            .await
        {
            Ok(articles) => articles,
            Err(e) => {
                tracing::error!(error = %e, "Loading articles failed");
                self.emit_event(Event::LoadFailed {
                    error: e.to_string(),
                    retryable: e.offers_retry(),
                });
                return Err(Error::Fetch(e));
            }
        };

        let source = self.store.set_posts(articles).await?;
        let count = self.store.len();
        tracing::info!(count, source = ?source, "Articles loaded");
        self.emit_event(Event::ArticlesLoaded { count, source });
        Ok(source)
    }

    /// One page of the collection, filtered by `query` when given
    ///
    /// `page` is clamped to the available pages. `page_size` falls back to
    /// the configured view page size.
    pub fn list(&self, query: Option<&str>, page: usize, page_size: Option<usize>) -> ArticleListing {
        let query = query.map(str::trim).filter(|q| !q.is_empty());
        let items = match query {
            Some(q) => self.store.search_articles(q),
            None => self.store.articles(),
        };

        let page_size = page_size
            .unwrap_or(self.config.view.page_size)
            .max(1);
        let pages = total_pages(items.len(), page_size);
        let page = page.clamp(1, pages.max(1));
        let window = paginate(&items, page_size, page);

        ArticleListing {
            items: window.slice.into_iter().map(ArticleCard::from).collect(),
            page,
            total_pages: pages,
            total_items: items.len(),
            labels: page_labels(pages, page, self.config.view.max_pages_shown),
            query: query.map(str::to_string),
        }
    }

    /// Detail page for article `id`
    ///
    /// Looks in the store first and asks the article source otherwise.
    ///
    /// # Errors
    /// [`Error::NotFound`] when neither has the article (including
    /// malformed ids); fetch errors from the source propagate.
    pub async fn article_detail(&self, id: &str) -> Result<ArticleDetail> {
        let article = match self.store.get_article_by_id(id) {
            Some(article) => article,
            None => {
                let numeric: i64 = id
                    .trim()
                    .parse()
                    .map_err(|_| Error::NotFound(format!("article {id}")))?;

                match self.fetcher.fetch_article(numeric).await {
                    Ok(article) => article,
                    Err(FetchError::NotFound { .. }) => {
                        return Err(Error::NotFound(format!("article {numeric}")));
                    }
                    Err(e) => return Err(Error::Fetch(e)),
                }
            }
        };

        let related = self
            .store
            .get_related_articles(id, self.config.store.related_count)
            .into_iter()
            .map(ArticleCard::from)
            .collect();

        Ok(ArticleDetail {
            hero_image: article.image_for(ImageVariant::Hero),
            article,
            related,
        })
    }

    /// Clear the store and erase its snapshot
    pub async fn reset(&self) -> Result<()> {
        self.store.reset_store().await?;
        self.emit_event(Event::StoreReset);
        Ok(())
    }

    /// New debounced search view over the store
    pub fn search_view(&self) -> SearchView {
        SearchView::new(self.store.clone(), &self.config.view)
    }

    /// Signal shutdown to the API server and subscribers
    pub async fn shutdown(&self) -> Result<()> {
        tracing::info!("Initiating graceful shutdown");
        self.shutdown_token.cancel();
        self.emit_event(Event::Shutdown);
        tracing::info!("Graceful shutdown complete");
        Ok(())
    }

    /// Spawn the REST API server in a background task
    pub fn spawn_api_server(self: &Arc<Self>) -> tokio::task::JoinHandle<Result<()>> {
        let blog = self.clone();
        let config = self.config.clone();

        tokio::spawn(async move { crate::api::start_api_server(blog, config).await })
    }

    pub(crate) fn emit_event(&self, event: Event) {
        // send() returns Err if there are no receivers, which is fine - we just drop the event
        self.event_tx.send(event).ok();
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemorySnapshotStore;
    use crate::types::Article;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> Config {
        let mut config = Config::default();
        config.source.base_url = server.uri();
        config.source.timeout = Duration::from_secs(2);
        config.retry.max_attempts = 0;
        config
    }

    async fn blog_for(server: &MockServer) -> QuickBlog {
        QuickBlog::with_port(config_for(server), Arc::new(MemorySnapshotStore::new()))
            .await
            .unwrap()
    }

    async fn mount_posts(server: &MockServer, count: i64) {
        let posts: Vec<serde_json::Value> = (1..=count)
            .map(|id| serde_json::json!({"userId": 1, "id": id, "title": format!("Post {id}"), "body": "body"}))
            .collect();
        Mock::given(method("GET"))
            .and(path("/posts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(posts))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn load_fetches_once_then_uses_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([{"id": 1, "title": "A", "body": "x"}])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let blog = blog_for(&server).await;
        let mut events = blog.subscribe();

        assert_eq!(blog.load_articles().await.unwrap(), LoadSource::Upstream);
        assert_eq!(blog.load_articles().await.unwrap(), LoadSource::Snapshot);

        assert!(matches!(
            events.recv().await.unwrap(),
            Event::ArticlesLoaded {
                count: 1,
                source: LoadSource::Upstream
            }
        ));
        assert!(matches!(
            events.recv().await.unwrap(),
            Event::ArticlesLoaded {
                source: LoadSource::Snapshot,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_collection() {
        let server = MockServer::start().await;
        let blog = blog_for(&server).await;
        blog.store
            .set_posts(vec![Article::new(5, "Kept", "")])
            .await
            .unwrap();

        Mock::given(method("GET"))
            .and(path("/posts"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let mut events = blog.subscribe();

        let error = blog.refresh_articles().await.unwrap_err();

        assert!(matches!(
            error,
            Error::Fetch(FetchError::UpstreamError { status: 500, .. })
        ));
        assert_eq!(blog.store.articles(), vec![Article::new(5, "Kept", "")]);
        assert!(matches!(
            events.recv().await.unwrap(),
            Event::LoadFailed {
                retryable: true,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn list_pages_and_filters() {
        let server = MockServer::start().await;
        mount_posts(&server, 20).await;
        let blog = blog_for(&server).await;
        blog.load_articles().await.unwrap();

        let first = blog.list(None, 1, None);
        assert_eq!(first.items.len(), 8);
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.total_items, 20);
        assert_eq!(first.query, None);

        let last = blog.list(None, 99, None);
        assert_eq!(last.page, 3);
        assert_eq!(last.items.len(), 4);

        let filtered = blog.list(Some("  post 2 "), 1, Some(5));
        assert_eq!(filtered.total_items, 2, "Post 2 and Post 20");
        assert_eq!(filtered.query.as_deref(), Some("post 2"));
        assert!(filtered.labels.is_empty());
    }

    #[tokio::test]
    async fn detail_uses_store_and_related() {
        let server = MockServer::start().await;
        mount_posts(&server, 6).await;
        let blog = blog_for(&server).await;
        blog.load_articles().await.unwrap();

        let detail = blog.article_detail("2").await.unwrap();

        assert_eq!(detail.article.id, 2);
        assert_eq!(detail.hero_image, "https://picsum.photos/seed/2/1200/600");
        assert_eq!(detail.related.len(), 3);
        assert!(detail.related.iter().all(|card| card.article.id != 2));
    }

    #[tokio::test]
    async fn detail_falls_back_to_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts/42"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"id": 42, "title": "Remote", "body": ""})),
            )
            .expect(1)
            .mount(&server)
            .await;
        let blog = blog_for(&server).await;

        let detail = blog.article_detail("42").await.unwrap();
        assert_eq!(detail.article.title, "Remote");
        assert!(detail.related.is_empty());
    }

    #[tokio::test]
    async fn detail_not_found_anywhere() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts/404"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        let blog = blog_for(&server).await;

        assert!(matches!(
            blog.article_detail("404").await,
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            blog.article_detail("not-a-number").await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn reset_empties_store_and_emits_event() {
        let server = MockServer::start().await;
        mount_posts(&server, 3).await;
        let blog = blog_for(&server).await;
        blog.load_articles().await.unwrap();
        let mut events = blog.subscribe();

        blog.reset().await.unwrap();

        assert!(!blog.store.has_articles());
        assert!(matches!(events.recv().await.unwrap(), Event::StoreReset));
    }

    #[tokio::test]
    async fn shutdown_cancels_token() {
        let server = MockServer::start().await;
        let blog = blog_for(&server).await;

        blog.shutdown().await.unwrap();
        assert!(blog.shutdown_token.is_cancelled());
    }
}
