//! REST API server demo
//!
//! Loads articles (from the snapshot when one exists, otherwise from the
//! article source) and serves them over HTTP until Ctrl+C.
//!
//! Configure with environment variables:
//! - `QUICK_BLOG_SOURCE_URL` - article source (default: JSONPlaceholder)
//! - `QUICK_BLOG_DATABASE_PATH` - SQLite snapshot file
//! - `QUICK_BLOG_BIND_ADDRESS` - API listen address
//! - `QUICK_BLOG_FALLBACK_TO_SAMPLE_DATA` - use built-in articles when the source is empty
//!
//! Set `RUST_LOG=quick_blog=debug` for more detail.

use quick_blog::{Config, QuickBlog, run_with_shutdown};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("quick_blog=info")),
        )
        .init();

    let config = Config::from_env()?;
    let address = config.api.bind_address;
    let blog = Arc::new(QuickBlog::new(config).await?);

    // The API is still useful with an empty store; refresh can be retried over HTTP
    if let Err(e) = blog.load_articles().await {
        tracing::error!(error = %e, "Initial article load failed");
    }

    let server = blog.spawn_api_server();

    println!("quick-blog listening on http://{address}");
    println!();
    println!("  curl 'http://{address}/api/articles?page=2'");
    println!("  curl 'http://{address}/api/articles?q=qui'");
    println!("  curl http://{address}/api/articles/1");
    println!("  curl -X POST http://{address}/api/articles/refresh");
    println!("  curl -N http://{address}/events");
    println!();

    run_with_shutdown(&blog).await?;
    server.await??;

    Ok(())
}
