//! Application state for the API server

use crate::{Config, QuickBlog};
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// Cloned for each request (cheap Arc clone).
#[derive(Clone)]
pub struct AppState {
    /// The blog instance
    pub blog: Arc<QuickBlog>,

    /// Configuration (read-only)
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(blog: Arc<QuickBlog>, config: Arc<Config>) -> Self {
        Self { blog, config }
    }
}
