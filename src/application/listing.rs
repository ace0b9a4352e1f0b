//! Blog listing service: fetch, normalize, filter, paginate, project to views.

use std::sync::Arc;

use thiserror::Error;
use tracing::warn;

use crate::application::collections::{CollectionsRepo, StoreError};
use crate::domain::listing::{
    Collection, FilterState, ListingItem, filter_items, normalize, paginate, sort_newest_first,
};
use crate::presentation::views::{
    BlogCard, BlogPageContext, FilterButton, GridOutcome, PageButton,
};
use crate::util::text::capitalize;

#[derive(Debug, Error)]
pub enum ListingError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Page controller for the blog listing. One instance owns the pipeline; the
/// per-request [`FilterState`] arrives decoded from query parameters.
#[derive(Clone)]
pub struct BlogService {
    store: Arc<dyn CollectionsRepo>,
    page_size: usize,
}

impl BlogService {
    pub fn new(store: Arc<dyn CollectionsRepo>, page_size: usize) -> Self {
        Self { store, page_size }
    }

    /// Run the whole pipeline for one request.
    pub async fn page_context(&self, state: &FilterState) -> Result<BlogPageContext, ListingError> {
        let working_set = self.load_working_set().await?;

        if working_set.is_empty() {
            return Ok(BlogPageContext::empty(state));
        }

        let filtered = filter_items(&working_set, state);
        let slice = paginate(filtered.len(), state.current_page(), self.page_size);

        let cards = filtered[slice.start..slice.end]
            .iter()
            .map(|item| item_to_card(item))
            .collect::<Vec<_>>();

        let outcome = if filtered.is_empty() {
            GridOutcome::NoMatches
        } else {
            GridOutcome::Items
        };

        Ok(BlogPageContext {
            cards,
            pages: page_buttons(slice.total_pages, state.current_page()),
            outcome,
            filters: filter_buttons(&working_set, state),
            active_category: state.active_category().to_string(),
            search_query: state.search_query().to_string(),
        })
    }

    /// Fetch and normalize the full working set, newest first. Records
    /// missing `id` or `title` are skipped with a warning.
    async fn load_working_set(&self) -> Result<Vec<ListingItem>, ListingError> {
        let documents = self.store.fetch_published(Collection::Blog).await?;

        let mut items = Vec::with_capacity(documents.len());
        for doc in &documents {
            match normalize(doc, Collection::Blog) {
                Some(item) => items.push(item),
                None => warn!(
                    target = "vetrina::listing",
                    id = doc.id.as_deref().unwrap_or(""),
                    "skipping blog record without id or title"
                ),
            }
        }

        sort_newest_first(&mut items);
        Ok(items)
    }
}

fn item_to_card(item: &ListingItem) -> BlogCard {
    BlogCard {
        id: item.id.clone(),
        title: item.title.clone(),
        excerpt: item.excerpt.clone(),
        date_label: item.date_label.clone(),
        category_label: capitalize(&item.category),
        image: item.image.clone(),
        read_time: "5 min read".to_string(),
    }
}

/// One numbered control per page; none at all when a single page suffices.
pub fn page_buttons(total_pages: usize, current_page: usize) -> Vec<PageButton> {
    if total_pages <= 1 {
        return Vec::new();
    }
    (1..=total_pages)
        .map(|number| PageButton {
            number,
            is_active: number == current_page,
        })
        .collect()
}

/// "All" plus the distinct categories present in the working set, sorted.
pub fn filter_buttons(items: &[ListingItem], state: &FilterState) -> Vec<FilterButton> {
    let mut keys: Vec<&str> = items.iter().map(|item| item.category.as_str()).collect();
    keys.sort_unstable();
    keys.dedup();

    let mut buttons = Vec::with_capacity(keys.len() + 1);
    buttons.push(FilterButton {
        key: "all".to_string(),
        label: "All".to_string(),
        is_active: state.active_category() == "all",
    });
    for key in keys {
        buttons.push(FilterButton {
            key: key.to_string(),
            label: capitalize(key),
            is_active: state.active_category() == key,
        });
    }
    buttons
}
