//! Article fixtures

use quick_blog::Article;
use serde_json::{Value, json};

/// Ids of the fixture articles mentioning "docker" in title or body
pub const DOCKER_IDS: &[i64] = &[2, 5, 9, 13, 17, 20];

/// Twenty articles shaped like the upstream `/posts` payload
///
/// Six of them mention docker, in varying case, in the title or the body.
pub fn twenty_posts() -> Value {
    let posts: Vec<Value> = (1..=20)
        .map(|id| {
            let (title, body) = match id {
                2 => ("Docker for beginners".to_string(), "images and containers".to_string()),
                5 => ("Shipping services".to_string(), "we moved everything to DOCKER last year".to_string()),
                9 => ("Why dockerfiles rot".to_string(), "pin your base images".to_string()),
                13 => ("Local dev setups".to_string(), "docker-compose up and go".to_string()),
                17 => ("Containers vs VMs".to_string(), "Docker shares the host kernel".to_string()),
                20 => ("dOcKeR tips".to_string(), "multi-stage builds".to_string()),
                3 => ("Dock workers".to_string(), "a history of harbours".to_string()),
                _ => (format!("Post number {id}"), "nothing about containers".to_string()),
            };
            json!({"userId": (id - 1) / 10 + 1, "id": id, "title": title, "body": body})
        })
        .collect();
    Value::Array(posts)
}

/// The fixture decoded into articles
pub fn twenty_articles() -> Vec<Article> {
    serde_json::from_value(twenty_posts()).expect("fixture decodes")
}
