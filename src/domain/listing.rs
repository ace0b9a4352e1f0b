//! The listing pipeline core: normalization, filtering, and pagination.
//!
//! Every listing page follows the same shape: fetch a collection, normalize
//! each record into a [`ListingItem`], keep the whole set as the working set,
//! and recompute the filtered subsequence from scratch whenever the
//! [`FilterState`] changes. Filtering is never patched incrementally, which
//! trades recomputation for the guarantee that the visible set can not go
//! stale.

use time::{
    OffsetDateTime,
    format_description::FormatItem,
    macros::format_description,
};

use crate::domain::records::RawDocument;

/// Items shown per blog page.
pub const BLOG_PAGE_SIZE: usize = 6;

/// Sort key assigned to portfolio records without an explicit order.
pub const DEFAULT_PROJECT_ORDER: i64 = 99;

/// Image shown when a record carries no usable image URL.
pub const PLACEHOLDER_IMAGE: &str = "/static/images/placeholder.jpg";

const DATE_LABEL_FORMAT: &[FormatItem<'static>] =
    format_description!("[month repr:short] [day padding:none], [year]");

/// Remote collections the listing pipeline understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Blog,
    Portfolio,
}

impl Collection {
    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Blog => "blog",
            Collection::Portfolio => "portfolio",
        }
    }

    /// Category substituted when a record carries none.
    pub fn default_category(self) -> &'static str {
        match self {
            Collection::Blog => "uncategorized",
            Collection::Portfolio => "other",
        }
    }
}

/// A display-ready record. Immutable once built; replaced wholesale on the
/// next fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingItem {
    pub id: String,
    pub title: String,
    /// Lowercased, defaulted per collection.
    pub category: String,
    pub excerpt: String,
    pub date_label: String,
    pub published_at: Option<OffsetDateTime>,
    pub image: String,
    pub raw_order: Option<i64>,
}

/// Map a raw record into a [`ListingItem`].
///
/// Only `id` and `title` are structurally required; records missing either
/// are rejected (`None`) and the caller decides how loudly to complain. All
/// other fields get the documented defaults.
pub fn normalize(doc: &RawDocument, collection: Collection) -> Option<ListingItem> {
    let id = doc.id.as_deref()?.trim();
    let title = doc.title.as_deref()?.trim();
    if id.is_empty() || title.is_empty() {
        return None;
    }

    let category = doc
        .category
        .as_deref()
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| raw.trim().to_lowercase())
        .unwrap_or_else(|| collection.default_category().to_string());

    let excerpt = match collection {
        Collection::Blog => doc.excerpt.clone().unwrap_or_default(),
        // Portfolio cards prefer the short excerpt but fall back to the
        // long description.
        Collection::Portfolio => doc
            .excerpt
            .clone()
            .filter(|text| !text.is_empty())
            .or_else(|| doc.description.clone())
            .unwrap_or_default(),
    };

    let published_at = doc
        .created_at
        .and_then(|seconds| OffsetDateTime::from_unix_timestamp(seconds).ok());
    let date_label = published_at
        .and_then(|when| when.date().format(DATE_LABEL_FORMAT).ok())
        .unwrap_or_else(|| "Recent".to_string());

    let image = doc
        .image_url
        .clone()
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string());

    Some(ListingItem {
        id: id.to_string(),
        title: title.to_string(),
        category,
        excerpt,
        date_label,
        published_at,
        image,
        raw_order: doc.order,
    })
}

/// Sort a blog working set newest first; undated records sort last, ties keep
/// fetch order.
pub fn sort_newest_first(items: &mut [ListingItem]) {
    items.sort_by(|left, right| match (right.published_at, left.published_at) {
        (Some(r), Some(l)) => r.cmp(&l),
        (Some(_), None) => std::cmp::Ordering::Greater,
        (None, Some(_)) => std::cmp::Ordering::Less,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

/// Per-page filter state, owned by exactly one controller.
///
/// Any category or search change resets the page back to 1; picking a page
/// leaves the other fields alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    active_category: String,
    search_query: String,
    current_page: usize,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            active_category: "all".to_string(),
            search_query: String::new(),
            current_page: 1,
        }
    }
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_category(&self) -> &str {
        &self.active_category
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn set_category(&mut self, category: &str) {
        self.active_category = category.trim().to_lowercase();
        if self.active_category.is_empty() {
            self.active_category = "all".to_string();
        }
        self.current_page = 1;
    }

    pub fn set_search(&mut self, query: &str) {
        self.search_query = query.to_lowercase();
        self.current_page = 1;
    }

    pub fn set_page(&mut self, page: usize) {
        self.current_page = page.max(1);
    }
}

/// Whether one item passes both the category and the search predicate.
///
/// Category matching is substring containment, not equality: an item
/// categorized `socialmedia` matches the filter key `social`.
pub fn matches(item: &ListingItem, state: &FilterState) -> bool {
    let search_match = state.search_query.is_empty()
        || item.title.to_lowercase().contains(&state.search_query)
        || item.excerpt.to_lowercase().contains(&state.search_query);

    category_matches(&item.category, state) && search_match
}

/// The category predicate on its own, for card sets that carry no searchable
/// text (the services grid).
pub fn category_matches(category: &str, state: &FilterState) -> bool {
    state.active_category == "all" || category.contains(&state.active_category)
}

/// The order-preserving subsequence of the working set passing both
/// predicates. Always recomputed from the full set.
pub fn filter_items<'a>(items: &'a [ListingItem], state: &FilterState) -> Vec<&'a ListingItem> {
    items.iter().filter(|item| matches(item, state)).collect()
}

/// One page window over a filtered set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSlice {
    pub start: usize,
    pub end: usize,
    pub total_pages: usize,
}

/// Compute the slice `[(page-1)*size, page*size)` clamped to the set length.
/// A page beyond the last yields an empty window.
pub fn paginate(len: usize, current_page: usize, page_size: usize) -> PageSlice {
    let total_pages = len.div_ceil(page_size.max(1));
    let start = current_page
        .saturating_sub(1)
        .saturating_mul(page_size)
        .min(len);
    let end = start.saturating_add(page_size).min(len);
    PageSlice {
        start,
        end,
        total_pages,
    }
}
