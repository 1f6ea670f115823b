//! Route handlers for the REST API
//!
//! Handlers are organized by domain:
//! - [`articles`] - Article list, detail pages, refresh and store reset
//! - [`system`] - Health, events, OpenAPI, shutdown

use crate::types::LoadSource;
use serde::{Deserialize, Serialize};

mod articles;
mod system;

pub use articles::*;
pub use system::*;

/// Largest page size a client may request
pub const MAX_PAGE_SIZE: usize = 100;

/// Query parameters for GET /api/articles
#[derive(Debug, Default, Deserialize, Serialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListArticlesQuery {
    /// Search text matched against title and body (case-insensitive)
    pub q: Option<String>,
    /// Page number, 1-based (default: 1)
    pub page: Option<usize>,
    /// Articles per page (default: configured view page size)
    pub page_size: Option<usize>,
}

/// Response for POST /api/articles/refresh
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct RefreshResponse {
    /// Number of articles now in the store
    pub count: usize,
    /// Where the collection came from
    pub source: LoadSource,
}
