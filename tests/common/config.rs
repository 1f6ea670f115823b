//! Test configuration helpers

use quick_blog::Config;
use quick_blog::config::SnapshotBackend;
use std::path::Path;
use std::time::Duration;

/// Config pointed at a mock article source, with fast retries and a SQLite
/// snapshot inside `dir`
pub fn test_config(source_url: &str, dir: &Path) -> Config {
    let mut config = Config::default();
    config.source.base_url = source_url.to_string();
    config.source.timeout = Duration::from_secs(2);
    config.retry.initial_delay = Duration::from_millis(10);
    config.retry.max_delay = Duration::from_millis(50);
    config.persistence.backend = SnapshotBackend::Sqlite;
    config.persistence.database_path = dir.join("blog.db");
    config.api.bind_address = "127.0.0.1:0".parse().expect("valid address");
    config
}
