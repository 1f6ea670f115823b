//! Pagination derived from a flat collection
//!
//! [`paginate`] and [`page_labels`] are pure functions; [`Paginator`] keeps the
//! current page for a view and resets it whenever the collection is replaced.

use serde::{Serialize, Serializer};

/// Default number of consecutive page labels
pub const DEFAULT_MAX_PAGES_SHOWN: usize = 5;

/// Text rendered for a gap in the page labels
pub const ELLIPSIS: &str = "…";

/// One page of a collection
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    /// Items on this page
    pub slice: Vec<T>,
    /// `ceil(len / page_size)`, 0 for an empty collection
    pub total_pages: usize,
    /// Index of the first item of the page (clamped to the collection length)
    pub start_index: usize,
    /// One past the last item of the page (clamped to the collection length)
    pub end_index: usize,
}

/// Slice `items` into the requested page
///
/// A `page_size` or `current_page` of 0 is treated as 1. Pages past the end
/// yield an empty slice with both indices at `items.len()`.
pub fn paginate<T: Clone>(items: &[T], page_size: usize, current_page: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let current_page = current_page.max(1);

    let start_index = (current_page - 1).saturating_mul(page_size).min(items.len());
    let end_index = current_page.saturating_mul(page_size).min(items.len());

    Page {
        slice: items[start_index..end_index].to_vec(),
        total_pages: total_pages(items.len(), page_size),
        start_index,
        end_index,
    }
}

/// Number of pages needed for `len` items
pub fn total_pages(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1))
}

/// Entry in the page-number control
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageLabel {
    /// Clickable page number
    Page(usize),
    /// Gap marker between non-adjacent page numbers
    Ellipsis,
}

impl Serialize for PageLabel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            PageLabel::Page(number) => serializer.serialize_u64(*number as u64),
            PageLabel::Ellipsis => serializer.serialize_str(ELLIPSIS),
        }
    }
}

/// Page-number labels for the pagination control
///
/// Shows a window of up to `max_pages_shown` pages centered on
/// `current_page`, shifted left when it would run past the last page. The
/// first and last page are always reachable, with an ellipsis when the
/// window does not touch them. Returns nothing for one page or fewer.
pub fn page_labels(
    total_pages: usize,
    current_page: usize,
    max_pages_shown: usize,
) -> Vec<PageLabel> {
    if total_pages <= 1 {
        return Vec::new();
    }

    let max_pages_shown = max_pages_shown.clamp(1, total_pages);
    let current_page = current_page.clamp(1, total_pages);
    let half = max_pages_shown / 2;

    let mut start = current_page.saturating_sub(half).max(1);
    let end = (start + max_pages_shown - 1).min(total_pages);
    if end - start + 1 < max_pages_shown {
        start = (end + 1).saturating_sub(max_pages_shown).max(1);
    }

    let mut labels = Vec::with_capacity(max_pages_shown + 4);
    if start > 1 {
        labels.push(PageLabel::Page(1));
        if start > 2 {
            labels.push(PageLabel::Ellipsis);
        }
    }
    labels.extend((start..=end).map(PageLabel::Page));
    if end < total_pages {
        if end < total_pages - 1 {
            labels.push(PageLabel::Ellipsis);
        }
        labels.push(PageLabel::Page(total_pages));
    }
    labels
}

/// Stateful pagination over an owned collection
#[derive(Clone, Debug)]
pub struct Paginator<T> {
    items: Vec<T>,
    page_size: usize,
    max_pages_shown: usize,
    current_page: usize,
}

impl<T: Clone> Paginator<T> {
    /// Paginator starting on page 1
    pub fn new(items: Vec<T>, page_size: usize) -> Self {
        Self {
            items,
            page_size: page_size.max(1),
            max_pages_shown: DEFAULT_MAX_PAGES_SHOWN,
            current_page: 1,
        }
    }

    /// Override the label window width
    #[must_use]
    pub fn with_max_pages_shown(mut self, max_pages_shown: usize) -> Self {
        self.max_pages_shown = max_pages_shown.max(1);
        self
    }

    /// Replace the collection and go back to page 1
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.current_page = 1;
    }

    /// The whole collection
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Current page (1-based)
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Number of pages
    pub fn total_pages(&self) -> usize {
        total_pages(self.items.len(), self.page_size)
    }

    /// Jump to `page`, clamped to the valid range; returns the new page
    pub fn go_to(&mut self, page: usize) -> usize {
        self.current_page = page.clamp(1, self.total_pages().max(1));
        self.current_page
    }

    /// Advance one page if possible
    pub fn next(&mut self) -> usize {
        self.go_to(self.current_page + 1)
    }

    /// Go back one page if possible
    pub fn previous(&mut self) -> usize {
        self.go_to(self.current_page.saturating_sub(1))
    }

    /// Whether a previous page exists
    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    /// Whether a next page exists
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    /// The current page
    pub fn page(&self) -> Page<T> {
        paginate(&self.items, self.page_size, self.current_page)
    }

    /// Labels for the current page
    pub fn labels(&self) -> Vec<PageLabel> {
        page_labels(self.total_pages(), self.current_page, self.max_pages_shown)
    }
}
