//! # quick-blog
//!
//! Backend library for a small blog browser: fetch articles from a
//! JSONPlaceholder-style API, keep them in a persisted article store, and
//! derive paginated, searchable views and article detail pages from it.
//!
//! ## Pieces
//!
//! - [`fetcher::ArticleFetcher`] - bounded-time HTTP client for the article source
//! - [`store::ArticleStore`] - the article collection with snapshot persistence,
//!   lookup, search and related-article selection
//! - [`pagination`] - page slices and page-number labels
//! - [`search::SearchView`] - debounced search with last-write-wins semantics
//! - [`QuickBlog`] - wires the above together and emits [`Event`]s
//! - [`api`] - JSON HTTP surface over [`QuickBlog`]
//!
//! ## Quick Start
//!
//! ```no_run
//! use quick_blog::{Config, QuickBlog};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let blog = QuickBlog::new(Config::from_env()?).await?;
//!
//!     // Subscribe to events
//!     let mut events = blog.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     blog.load_articles().await?;
//!
//!     let page = blog.list(None, 1, None);
//!     for card in &page.items {
//!         println!("{} {}", card.article.id, card.article.title);
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// REST API module
pub mod api;
/// Blog facade
pub mod blog;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Article source client
pub mod fetcher;
/// Page slicing and page-number labels
pub mod pagination;
/// Snapshot persistence ports
pub mod persistence;
/// Retry logic with exponential backoff
pub mod retry;
/// Debounced search view
pub mod search;
/// Article store
pub mod store;
/// Core types and events
pub mod types;

// Re-export commonly used types
pub use blog::QuickBlog;
pub use config::{Config, RelatedPolicy};
pub use error::{ApiError, Error, ErrorDetail, FetchError, Result, ToHttpStatus};
pub use fetcher::ArticleFetcher;
pub use pagination::{Page, PageLabel, Paginator};
pub use persistence::{MemorySnapshotStore, SnapshotPort, SqliteSnapshotStore};
pub use search::{SearchState, SearchView};
pub use store::ArticleStore;
pub use types::{Article, ArticleCard, ArticleDetail, ArticleListing, Event, LoadSource};

/// Helper function to run the blog with graceful signal handling.
///
/// Waits for a termination signal and then calls [`QuickBlog::shutdown`],
/// which also stops an API server started with
/// [`QuickBlog::spawn_api_server`].
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
///
/// # Example
///
/// ```no_run
/// use quick_blog::{Config, QuickBlog, run_with_shutdown};
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let blog = Arc::new(QuickBlog::new(Config::default()).await?);
///     let server = blog.spawn_api_server();
///
///     run_with_shutdown(&blog).await?;
///     server.await??;
///
///     Ok(())
/// }
/// ```
pub async fn run_with_shutdown(blog: &QuickBlog) -> Result<()> {
    wait_for_signal().await;
    blog.shutdown().await
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Signal registration can fail in restricted environments (containers, tests)
    let sigterm_result = signal(SignalKind::terminate());
    let sigint_result = signal(SignalKind::interrupt());

    match (sigterm_result, sigint_result) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Err(e), _) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            if let Ok(mut sigint) = signal(SignalKind::interrupt()) {
                sigint.recv().await;
                tracing::info!("Received SIGINT signal (Ctrl+C)");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
        (_, Err(e)) => {
            tracing::warn!(error = %e, "Could not register SIGINT handler, waiting for SIGTERM only");
            if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
                sigterm.recv().await;
                tracing::info!("Received SIGTERM signal");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}
