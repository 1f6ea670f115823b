//! REST API server module
//!
//! A small JSON surface over [`QuickBlog`]: the paginated article list with
//! optional search, article detail pages, store maintenance and a
//! server-sent events stream.

use crate::{Config, QuickBlog, Result};
use axum::{
    Router,
    http::HeaderValue,
    routing::{delete, get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod error_response;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use state::AppState;

/// Create the API router with all route definitions
///
/// # Routes
///
/// ## Articles
/// - `GET /api/articles` - Paginated list (`q`, `page`, `page_size`)
/// - `GET /api/articles/:id` - Detail page with related articles
/// - `POST /api/articles/refresh` - Re-fetch from the article source
///
/// ## Store
/// - `DELETE /api/store` - Clear the store and its snapshot
///
/// ## System
/// - `GET /health` - Health check
/// - `GET /openapi.json` - OpenAPI specification
/// - `GET /events` - Server-sent events stream
/// - `POST /shutdown` - Graceful shutdown
pub fn create_router(blog: Arc<QuickBlog>, config: Arc<Config>) -> Router {
    let state = AppState::new(blog, config.clone());

    let router = Router::new()
        // Articles
        .route("/api/articles", get(routes::list_articles))
        .route("/api/articles/refresh", post(routes::refresh_articles))
        .route("/api/articles/:id", get(routes::get_article))
        // Store
        .route("/api/store", delete(routes::reset_store))
        // System
        .route("/health", get(routes::health_check))
        .route("/openapi.json", get(routes::openapi_spec))
        .route("/events", get(routes::event_stream))
        .route("/shutdown", post(routes::shutdown))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if config.api.cors_enabled {
        let cors = build_cors_layer(&config.api.cors_origins);
        router.layer(cors)
    } else {
        router
    }
}

/// Build a CORS layer based on configured origins
///
/// `"*"` (or an empty list) allows any origin.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let allow_any = origins.iter().any(|o| o == "*");

    if allow_any || origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(allowed))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Start the API server on the configured bind address.
///
/// Runs until [`QuickBlog::shutdown`] is called (or the listener fails),
/// then drains in-flight requests and returns.
///
/// # Example
///
/// ```no_run
/// use quick_blog::{Config, QuickBlog};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Arc::new(Config::default());
/// let blog = Arc::new(QuickBlog::new((*config).clone()).await?);
///
/// quick_blog::api::start_api_server(blog, config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_api_server(blog: Arc<QuickBlog>, config: Arc<Config>) -> Result<()> {
    let bind_address = config.api.bind_address;
    let shutdown = blog.shutdown_token.clone();

    tracing::info!(address = %bind_address, "Starting API server");

    let app = create_router(blog, config);

    let listener = TcpListener::bind(bind_address)
        .await
        .map_err(crate::error::Error::Io)?;

    let local_address = listener.local_addr().map_err(crate::error::Error::Io)?;
    tracing::info!(address = %local_address, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| crate::error::Error::ApiServerError(e.to_string()))?;

    tracing::info!("API server stopped");
    Ok(())
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
