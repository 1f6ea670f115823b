//! Debounced search over the 20-article fixture, driven with paused time

mod common;

use common::{DOCKER_IDS, ids, twenty_articles};
use quick_blog::{Config, MemorySnapshotStore, QuickBlog, SearchState};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

async fn loaded_blog() -> QuickBlog {
    let blog = QuickBlog::with_port(Config::default(), Arc::new(MemorySnapshotStore::new()))
        .await
        .unwrap();
    blog.store().set_posts(twenty_articles()).await.unwrap();
    blog
}

#[tokio::test(start_paused = true)]
async fn typing_docker_shows_matching_articles_after_debounce() {
    let blog = loaded_blog().await;
    let outcomes = Arc::new(Mutex::new(Vec::new()));
    let sink = outcomes.clone();
    let view = blog
        .search_view()
        .with_observer(move |found| sink.lock().unwrap().push(found));

    for prefix in ["d", "do", "doc", "dock", "docke", "docker"] {
        view.on_input(prefix);
        sleep(Duration::from_millis(50)).await;
    }
    assert_eq!(view.state(), SearchState::Idle);

    sleep(Duration::from_millis(300)).await;

    assert_eq!(
        view.state(),
        SearchState::Filtering {
            query: "docker".into()
        }
    );
    assert_eq!(ids(&view.displayed()), DOCKER_IDS);
    assert_eq!(*outcomes.lock().unwrap(), vec![true]);
    assert_eq!(ids(&blog.store().last_filtered()), DOCKER_IDS);
}

#[tokio::test(start_paused = true)]
async fn clearing_restores_all_twenty_on_first_page() {
    let blog = loaded_blog().await;
    let view = blog.search_view();

    view.on_input("docker");
    sleep(Duration::from_millis(400)).await;
    assert_eq!(view.displayed().len(), DOCKER_IDS.len());

    view.clear();

    assert_eq!(view.state(), SearchState::Idle);
    assert_eq!(view.displayed().len(), 20);
    assert_eq!(view.current_page(), 1);
    assert_eq!(view.page().slice.len(), 8);
}
