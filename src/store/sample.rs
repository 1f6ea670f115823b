//! Built-in sample articles, used when a fetch comes back empty and
//! `fallback_to_sample_data` is enabled.

use crate::types::Article;

const SAMPLES: &[(i64, &str, &str)] = &[
    (
        1,
        "Getting started with Rust",
        "Ownership, borrowing and lifetimes are the three ideas everything else builds on.",
    ),
    (
        2,
        "Containers without the hype",
        "What a Docker image really is: a stack of tarballs plus some JSON metadata.",
    ),
    (
        3,
        "A gentle tour of async",
        "Futures do nothing until polled. An executor is the loop that polls them.",
    ),
    (
        4,
        "Designing small REST APIs",
        "Keep resources nouns, keep verbs in the method, and return errors as data.",
    ),
    (
        5,
        "SQLite is enough",
        "For a single writer on one machine, an embedded database is hard to beat.",
    ),
    (
        6,
        "Debouncing user input",
        "Wait for a quiet period before acting, and cancel anything the user superseded.",
    ),
    (
        7,
        "Pagination that does not lie",
        "Show the first page, the last page and a window around where the reader is.",
    ),
    (
        8,
        "Testing with a fake clock",
        "Timers become instant and deterministic once time itself is under test control.",
    ),
];

/// The fixed sample collection
pub fn sample_articles() -> Vec<Article> {
    SAMPLES
        .iter()
        .map(|&(id, title, body)| Article {
            user_id: Some(1),
            ..Article::new(id, title, body)
        })
        .collect()
}
