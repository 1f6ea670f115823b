//! Debounced search view
//!
//! [`SearchView`] sits between user input and the [`ArticleStore`]. It is a
//! two-state machine:
//!
//! - [`SearchState::Idle`]: the full collection is displayed
//! - [`SearchState::Filtering`]: the results of a non-empty query are displayed
//!
//! Non-empty input is evaluated only after the input has been quiet for the
//! configured debounce delay; each keystroke reschedules the pending
//! evaluation through a single-slot [`Debouncer`], so the last write wins.
//! Clearing the input restores the pre-search collection immediately.
//!
//! The displayed collection lives in a [`Paginator`], which returns to page 1
//! whenever the collection is replaced.

use crate::config::ViewConfig;
use crate::pagination::{Page, PageLabel, Paginator};
use crate::store::ArticleStore;
use crate::types::Article;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

pub mod debounce;

pub use debounce::Debouncer;

/// Callback told whether a completed evaluation found anything
pub type ResultObserver = Arc<dyn Fn(bool) + Send + Sync>;

/// Search view state
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchState {
    /// Showing the full collection
    Idle,
    /// Showing results for `query`
    Filtering {
        /// The evaluated query, as typed
        query: String,
    },
}

#[derive(Debug)]
struct ViewState {
    state: SearchState,
    paginator: Paginator<Article>,
    /// Collection displayed before the current search started
    stashed: Option<Vec<Article>>,
    /// Latest non-blank input, evaluated or not
    input: Option<String>,
    /// Bumped on every input; stale evaluations compare and bail out
    generation: u64,
}

/// Debounced search over an [`ArticleStore`]
pub struct SearchView {
    store: Arc<ArticleStore>,
    inner: Arc<Mutex<ViewState>>,
    debouncer: Debouncer,
    delay: Duration,
    observer: Option<ResultObserver>,
}

impl std::fmt::Debug for SearchView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchView")
            .field("state", &self.state())
            .field("delay", &self.delay)
            .field("pending", &self.is_pending())
            .finish_non_exhaustive()
    }
}

impl SearchView {
    /// View showing the store's current collection
    pub fn new(store: Arc<ArticleStore>, config: &ViewConfig) -> Self {
        let paginator = Paginator::new(store.articles(), config.page_size)
            .with_max_pages_shown(config.max_pages_shown);

        Self {
            store,
            inner: Arc::new(Mutex::new(ViewState {
                state: SearchState::Idle,
                paginator,
                stashed: None,
                input: None,
                generation: 0,
            })),
            debouncer: Debouncer::new(),
            delay: config.search_debounce,
            observer: None,
        }
    }

    /// Register the callback run after each completed evaluation
    pub fn with_observer<F>(mut self, observer: F) -> Self
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.observer = Some(Arc::new(observer));
        self
    }

    /// Feed the current contents of the search input
    ///
    /// Blank input clears the search at once. Anything else is evaluated
    /// after the debounce delay unless more input arrives first.
    pub fn on_input(&self, text: &str) {
        if text.trim().is_empty() {
            self.clear();
            return;
        }

        let generation = {
            let mut inner = self.lock();
            inner.input = Some(text.to_string());
            inner.generation += 1;
            inner.generation
        };

        let query = text.to_string();
        let store = self.store.clone();
        let inner = self.inner.clone();
        let observer = self.observer.clone();

        tracing::trace!(query = %query, delay_ms = self.delay.as_millis(), "Search scheduled");
        self.debouncer.schedule(self.delay, async move {
            evaluate(&store, &inner, observer.as_ref(), generation, query);
        });
    }

    /// Leave filtering and show the pre-search collection again
    ///
    /// Cancels any pending evaluation. Does nothing to the display when
    /// already idle. Leaving filtering tells the observer whether the
    /// restored collection has anything in it.
    pub fn clear(&self) {
        self.debouncer.cancel();

        let restored = {
            let mut inner = self.lock();
            inner.generation += 1;
            inner.input = None;
            if let Some(previous) = inner.stashed.take() {
                inner.paginator.set_items(previous);
            }
            if inner.state == SearchState::Idle {
                None
            } else {
                tracing::debug!("Search cleared");
                inner.state = SearchState::Idle;
                Some(!inner.paginator.items().is_empty())
            }
        };

        if let (Some(found), Some(observer)) = (restored, self.observer.as_ref()) {
            observer(found);
        }
    }

    /// Pick up a replaced store collection
    ///
    /// While idle the display switches to the new collection. While
    /// filtering the new collection becomes the one restored on clear. The
    /// latest input is then evaluated against it right away, unless an
    /// evaluation is already waiting out its debounce delay.
    pub fn refresh(&self) {
        let articles = self.store.articles();
        let pending = self.debouncer.is_pending();
        let requery = {
            let mut inner = self.lock();
            match inner.state.clone() {
                SearchState::Idle => {
                    inner.paginator.set_items(articles);
                    None
                }
                SearchState::Filtering { query } => {
                    inner.stashed = Some(articles);
                    if pending {
                        None
                    } else {
                        let latest = inner.input.clone().unwrap_or(query);
                        inner.generation += 1;
                        Some((latest, inner.generation))
                    }
                }
            }
        };

        if let Some((query, generation)) = requery {
            evaluate(
                &self.store,
                &self.inner,
                self.observer.as_ref(),
                generation,
                query,
            );
        }
    }

    /// Current state
    pub fn state(&self) -> SearchState {
        self.lock().state.clone()
    }

    /// Whether an evaluation is waiting for its debounce delay
    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Full displayed collection (all pages)
    pub fn displayed(&self) -> Vec<Article> {
        self.lock().paginator.items().to_vec()
    }

    /// Whether the displayed collection is non-empty
    pub fn has_results(&self) -> bool {
        !self.lock().paginator.items().is_empty()
    }

    /// Current page of the displayed collection
    pub fn page(&self) -> Page<Article> {
        self.lock().paginator.page()
    }

    /// Current page number (1-based)
    pub fn current_page(&self) -> usize {
        self.lock().paginator.current_page()
    }

    /// Page labels for the displayed collection
    pub fn labels(&self) -> Vec<PageLabel> {
        self.lock().paginator.labels()
    }

    /// Jump to `page`, clamped to the available pages
    pub fn go_to_page(&self, page: usize) -> usize {
        self.lock().paginator.go_to(page)
    }

    fn lock(&self) -> MutexGuard<'_, ViewState> {
        lock_state(&self.inner)
    }
}

fn lock_state(inner: &Mutex<ViewState>) -> MutexGuard<'_, ViewState> {
    inner.lock().unwrap_or_else(|p| p.into_inner())
}

fn evaluate(
    store: &ArticleStore,
    inner: &Mutex<ViewState>,
    observer: Option<&ResultObserver>,
    generation: u64,
    query: String,
) {
    let found = {
        let mut state = lock_state(inner);
        if state.generation != generation {
            tracing::trace!(query = %query, "Discarding superseded search");
            return;
        }

        let results = store.search_articles(&query);
        let found = !results.is_empty();

        if state.state == SearchState::Idle && state.stashed.is_none() {
            let previous = state.paginator.items().to_vec();
            state.stashed = Some(previous);
        }
        state.paginator.set_items(results);
        state.state = SearchState::Filtering { query };
        found
    };

    tracing::debug!(found, "Search evaluated");
    if let Some(observer) = observer {
        observer(found);
    }
}
