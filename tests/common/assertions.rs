//! Custom assertions for integration tests

use quick_blog::{Article, Event, QuickBlog};
use std::time::Duration;
use tokio::sync::broadcast;

/// Ids of `articles`, in order
pub fn ids(articles: &[Article]) -> Vec<i64> {
    articles.iter().map(|a| a.id).collect()
}

/// Wait for the next event matching `predicate`, skipping others
pub async fn next_event_matching<F>(
    events: &mut broadcast::Receiver<Event>,
    timeout: Duration,
    predicate: F,
) -> Option<Event>
where
    F: Fn(&Event) -> bool,
{
    tokio::time::timeout(timeout, async {
        loop {
            match events.recv().await {
                Ok(event) if predicate(&event) => return Some(event),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    })
    .await
    .ok()
    .flatten()
}

/// Assert that the store holds exactly the articles with `expected` ids
pub fn assert_store_ids(blog: &QuickBlog, expected: &[i64]) {
    assert_eq!(ids(&blog.store().articles()), expected);
}
