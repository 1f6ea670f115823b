//! Core types and events

use crate::pagination::PageLabel;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Base of the seeded placeholder-image service
pub const PLACEHOLDER_IMAGE_BASE: &str = "https://picsum.photos/seed";

/// One blog post
///
/// `id` is the identity key; no two articles in a store snapshot share it.
/// Field names are camelCase on the wire (`userId`, `imageUrl`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Upstream-assigned identifier
    pub id: i64,
    /// Title, non-empty for valid articles
    pub title: String,
    /// Body text, possibly empty
    #[serde(default)]
    pub body: String,
    /// Author reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    /// Explicit image; a placeholder is derived from `id` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Article {
    /// Article with no author and no explicit image
    pub fn new(id: i64, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            body: body.into(),
            user_id: None,
            image_url: None,
        }
    }

    /// Image to render for the given variant
    ///
    /// Returns the explicit `image_url` when present (and non-blank),
    /// otherwise the deterministic placeholder for this id.
    pub fn image_for(&self, variant: ImageVariant) -> String {
        match self.image_url.as_deref() {
            Some(url) if !url.trim().is_empty() => url.to_string(),
            _ => variant.placeholder_url(self.id),
        }
    }

    /// Case-insensitive substring match on title or body
    ///
    /// `needle` must already be lowercase.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.body.to_lowercase().contains(needle)
    }
}

/// Rendering slot an image is requested for
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageVariant {
    /// Card thumbnail in list views (500x300)
    Thumbnail,
    /// Detail page hero (1200x600)
    Hero,
}

impl ImageVariant {
    /// Pixel dimensions (width, height)
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            ImageVariant::Thumbnail => (500, 300),
            ImageVariant::Hero => (1200, 600),
        }
    }

    /// Placeholder image URL seeded by article id
    pub fn placeholder_url(self, id: i64) -> String {
        let (width, height) = self.dimensions();
        format!("{PLACEHOLDER_IMAGE_BASE}/{id}/{width}/{height}")
    }
}

/// Where the store's current collection came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LoadSource {
    /// Fetched from the article API
    Upstream,
    /// Restored from the persisted snapshot
    Snapshot,
    /// Built-in sample set (upstream returned nothing)
    Sample,
}

/// Event emitted by [`crate::QuickBlog`]
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// The store now holds a collection
    ArticlesLoaded {
        /// Number of articles in the store
        count: usize,
        /// Origin of the collection
        source: LoadSource,
    },

    /// Fetching failed; the store kept its previous collection
    LoadFailed {
        /// Error message
        error: String,
        /// Whether a retry control should be offered
        retryable: bool,
    },

    /// Store cleared and snapshot erased
    StoreReset,

    /// Service is shutting down
    Shutdown,
}

/// One page of the article list, ready for rendering
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct ArticleListing {
    /// Articles on this page (thumbnail image resolved)
    pub items: Vec<ArticleCard>,
    /// Current page (1-based, clamped)
    pub page: usize,
    /// Total number of pages (0 when empty)
    pub total_pages: usize,
    /// Number of articles across all pages
    pub total_items: usize,
    /// Page-number labels; empty when there is at most one page
    #[schema(value_type = Vec<Object>)]
    pub labels: Vec<PageLabel>,
    /// Active search query, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

/// Article as shown on a list card
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct ArticleCard {
    /// The article
    #[serde(flatten)]
    pub article: Article,
    /// Resolved thumbnail URL
    pub thumbnail: String,
}

impl From<Article> for ArticleCard {
    fn from(article: Article) -> Self {
        let thumbnail = article.image_for(ImageVariant::Thumbnail);
        Self { article, thumbnail }
    }
}

/// Detail page content
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct ArticleDetail {
    /// The requested article
    pub article: Article,
    /// Resolved hero image URL
    pub hero_image: String,
    /// Other articles to show alongside
    pub related: Vec<ArticleCard>,
}
