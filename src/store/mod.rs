//! Article store
//!
//! [`ArticleStore`] owns the article collection. It is constructed explicitly
//! with an injected [`SnapshotPort`]: the persisted snapshot is loaded once in
//! [`ArticleStore::open`] and written back after every mutation
//! ([`set_posts`](ArticleStore::set_posts), [`reset_store`](ArticleStore::reset_store)).
//!
//! Query operations are total. Lookups answer with `Option`/empty vectors and
//! search faults degrade to the unfiltered collection. Locks are plain
//! `std::sync` locks held only for short synchronous sections, never across
//! an `.await`.

use crate::config::{RelatedPolicy, StoreConfig};
use crate::error::{Result, SearchError};
use crate::persistence::{SnapshotPort, StoreSnapshot};
use crate::types::{Article, LoadSource};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub mod sample;

pub use sample::sample_articles;

/// Related articles returned when the caller does not ask for a count
pub const DEFAULT_RELATED_COUNT: usize = 3;

/// Article collection with snapshot persistence, lookup, search and
/// related-article selection
pub struct ArticleStore {
    articles: RwLock<Vec<Article>>,
    filtered: RwLock<Vec<Article>>,
    port: Arc<dyn SnapshotPort>,
    snapshot_key: String,
    fallback_to_sample_data: bool,
    related_policy: RelatedPolicy,
    rng: Mutex<StdRng>,
}

impl std::fmt::Debug for ArticleStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArticleStore")
            .field("articles", &self.len())
            .field("snapshot_key", &self.snapshot_key)
            .field("fallback_to_sample_data", &self.fallback_to_sample_data)
            .field("related_policy", &self.related_policy)
            .finish_non_exhaustive()
    }
}

impl ArticleStore {
    /// Create a store and restore the persisted snapshot, if compatible
    ///
    /// A snapshot that does not decode, or whose version differs from
    /// [`SNAPSHOT_VERSION`](crate::persistence::SNAPSHOT_VERSION), is erased
    /// and the store starts empty.
    ///
    /// # Errors
    /// Fails only when the port itself cannot be read or erased.
    pub async fn open(config: &StoreConfig, port: Arc<dyn SnapshotPort>) -> Result<Self> {
        let rng = match config.related_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let store = Self {
            articles: RwLock::new(Vec::new()),
            filtered: RwLock::new(Vec::new()),
            port,
            snapshot_key: config.snapshot_key.clone(),
            fallback_to_sample_data: config.fallback_to_sample_data,
            related_policy: config.related_policy,
            rng: Mutex::new(rng),
        };
        store.restore().await?;
        Ok(store)
    }

    /// Replace the random source used for related-article selection
    pub fn with_rng(self, rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
            ..self
        }
    }

    async fn restore(&self) -> Result<()> {
        let Some(raw) = self.port.load(&self.snapshot_key).await? else {
            tracing::debug!(key = %self.snapshot_key, "No persisted snapshot");
            return Ok(());
        };

        match serde_json::from_str::<StoreSnapshot>(&raw) {
            Ok(snapshot) if snapshot.is_compatible() => {
                let articles = dedupe_by_id(snapshot.articles);
                tracing::info!(
                    key = %self.snapshot_key,
                    count = articles.len(),
                    "Restored article snapshot"
                );
                *self.write_articles() = articles;
                *self.write_filtered() = snapshot.filtered_articles;
            }
            Ok(snapshot) => {
                tracing::warn!(
                    key = %self.snapshot_key,
                    version = snapshot.version,
                    "Discarding incompatible article snapshot"
                );
                self.port.erase(&self.snapshot_key).await?;
            }
            Err(e) => {
                tracing::warn!(
                    key = %self.snapshot_key,
                    error = %e,
                    "Discarding unreadable article snapshot"
                );
                self.port.erase(&self.snapshot_key).await?;
            }
        }

        Ok(())
    }

    /// Replace the collection wholesale and persist it
    ///
    /// Duplicate ids keep their first occurrence. An empty `incoming` leaves
    /// the store empty, or installs [`sample_articles`] when
    /// `fallback_to_sample_data` is set. The last filtered result is cleared.
    ///
    /// Returns where the stored collection came from. The in-memory update
    /// happens before the snapshot is written, so on a persistence error the
    /// store still holds the new collection.
    pub async fn set_posts(&self, incoming: Vec<Article>) -> Result<LoadSource> {
        let (articles, source) = if incoming.is_empty() && self.fallback_to_sample_data {
            tracing::info!("Fetch returned no articles, using built-in sample set");
            (sample_articles(), LoadSource::Sample)
        } else {
            (dedupe_by_id(incoming), LoadSource::Upstream)
        };

        tracing::debug!(count = articles.len(), source = ?source, "Replacing article collection");
        *self.write_articles() = articles;
        self.write_filtered().clear();

        self.persist().await?;
        Ok(source)
    }

    /// Write the current collection and last filtered result to the port
    pub async fn persist(&self) -> Result<()> {
        let snapshot = StoreSnapshot::new(self.articles(), self.last_filtered());
        let raw = serde_json::to_string(&snapshot)?;
        self.port.save(&self.snapshot_key, &raw).await
    }

    /// Whether the collection is non-empty
    pub fn has_articles(&self) -> bool {
        !self.read_articles().is_empty()
    }

    /// Number of articles in the collection
    pub fn len(&self) -> usize {
        self.read_articles().len()
    }

    /// Whether the collection is empty
    pub fn is_empty(&self) -> bool {
        !self.has_articles()
    }

    /// Copy of the current collection in fetch order
    pub fn articles(&self) -> Vec<Article> {
        self.read_articles().clone()
    }

    /// Article whose id equals `id` parsed as an integer
    ///
    /// Malformed ids are "not found".
    pub fn get_article_by_id(&self, id: &str) -> Option<Article> {
        let id = parse_id(id)?;
        self.read_articles()
            .iter()
            .find(|article| article.id == id)
            .cloned()
    }

    /// Up to `count` other articles to show next to article `id`
    ///
    /// The article matching `id` is never included. A malformed `id`
    /// excludes nothing. Selection follows the configured
    /// [`RelatedPolicy`].
    pub fn get_related_articles(&self, id: &str, count: usize) -> Vec<Article> {
        let exclude = parse_id(id);
        let articles = self.read_articles();
        let candidates: Vec<&Article> = articles
            .iter()
            .filter(|article| Some(article.id) != exclude)
            .collect();

        match self.related_policy {
            RelatedPolicy::InOrder => candidates.into_iter().take(count).cloned().collect(),
            RelatedPolicy::Random => {
                let mut rng = self.rng.lock().unwrap_or_else(|p| p.into_inner());
                candidates
                    .choose_multiple(&mut *rng, count)
                    .map(|article| (*article).clone())
                    .collect()
            }
        }
    }

    /// Articles whose title or body contains `query`, case-insensitively
    ///
    /// A blank query yields the full collection. Never fails: an internal
    /// fault is logged and the unfiltered collection is returned. The result
    /// is cached for [`last_filtered`](Self::last_filtered).
    pub fn search_articles(&self, query: &str) -> Vec<Article> {
        let result = match self.try_search(query) {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(query, error = %e, "Search failed, showing all articles");
                self.articles()
            }
        };

        *self.write_filtered() = result.clone();
        result
    }

    fn try_search(&self, query: &str) -> std::result::Result<Vec<Article>, SearchError> {
        let articles = self.articles.read().map_err(|_| SearchError::Poisoned)?;

        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(articles.clone());
        }

        Ok(articles
            .iter()
            .filter(|article| article.matches_lowercase(&needle))
            .cloned()
            .collect())
    }

    /// Result of the most recent search
    pub fn last_filtered(&self) -> Vec<Article> {
        self.filtered
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    /// Clear the collection and erase the persisted snapshot
    pub async fn reset_store(&self) -> Result<()> {
        self.write_articles().clear();
        self.write_filtered().clear();

        self.port.erase(&self.snapshot_key).await?;
        tracing::info!(key = %self.snapshot_key, "Article store reset");
        Ok(())
    }

    fn read_articles(&self) -> RwLockReadGuard<'_, Vec<Article>> {
        self.articles.read().unwrap_or_else(|p| p.into_inner())
    }

    fn write_articles(&self) -> RwLockWriteGuard<'_, Vec<Article>> {
        self.articles.write().unwrap_or_else(|p| p.into_inner())
    }

    fn write_filtered(&self) -> RwLockWriteGuard<'_, Vec<Article>> {
        self.filtered.write().unwrap_or_else(|p| p.into_inner())
    }
}

fn parse_id(id: &str) -> Option<i64> {
    id.trim().parse().ok()
}

fn dedupe_by_id(articles: Vec<Article>) -> Vec<Article> {
    let mut seen = HashSet::with_capacity(articles.len());
    let before = articles.len();
    let unique: Vec<Article> = articles
        .into_iter()
        .filter(|article| seen.insert(article.id))
        .collect();

    if unique.len() != before {
        tracing::warn!(
            dropped = before - unique.len(),
            "Dropped articles with duplicate ids"
        );
    }
    unique
}
