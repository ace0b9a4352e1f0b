//! Portfolio gallery service and the project detail modal.

use std::sync::Arc;

use thiserror::Error;
use time::OffsetDateTime;
use tracing::warn;

use crate::application::collections::{CollectionsRepo, StoreError};
use crate::domain::gallery::{ProjectDetail, ProjectItem, normalize_project};
use crate::domain::listing::{Collection, DEFAULT_PROJECT_ORDER, FilterState, matches};
use crate::presentation::views::{FilterButton, GalleryContext, ProjectCard};
use crate::util::text::capitalize;

#[derive(Debug, Error)]
pub enum GalleryError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Clone)]
pub struct GalleryService {
    store: Arc<dyn CollectionsRepo>,
}

impl GalleryService {
    pub fn new(store: Arc<dyn CollectionsRepo>) -> Self {
        Self { store }
    }

    /// Cards for the gallery grid, ordered by the editorial `order` field
    /// and filtered by the active category.
    pub async fn gallery_context(
        &self,
        state: &FilterState,
    ) -> Result<GalleryContext, GalleryError> {
        let projects = self.load_projects().await?;

        let visible: Vec<&ProjectItem> = projects
            .iter()
            .filter(|project| matches(&project.item, state))
            .collect();

        let cards = visible.iter().map(|project| project_card(project)).collect();

        Ok(GalleryContext {
            cards,
            visible_count: visible.len(),
            filters: category_buttons(&projects, state),
            active_category: state.active_category().to_string(),
        })
    }

    /// Detail payload for the modal, or `None` when the id is unknown.
    pub async fn project_modal(&self, id: &str) -> Result<Option<ProjectDetail>, GalleryError> {
        let projects = self.load_projects().await?;
        Ok(projects
            .iter()
            .find(|project| project.item.id == id)
            .map(ProjectDetail::from_project))
    }

    async fn load_projects(&self) -> Result<Vec<ProjectItem>, GalleryError> {
        let documents = self.store.fetch_published(Collection::Portfolio).await?;
        let now = OffsetDateTime::now_utc();

        let mut projects = Vec::with_capacity(documents.len());
        for doc in &documents {
            match normalize_project(doc, now) {
                Some(project) => projects.push(project),
                None => warn!(
                    target = "vetrina::gallery",
                    id = doc.id.as_deref().unwrap_or(""),
                    "skipping portfolio record without id or title"
                ),
            }
        }

        sort_projects(&mut projects);
        Ok(projects)
    }
}

fn sort_projects(projects: &mut [ProjectItem]) {
    projects.sort_by_key(|project| project.item.raw_order.unwrap_or(DEFAULT_PROJECT_ORDER));
}

fn project_card(project: &ProjectItem) -> ProjectCard {
    ProjectCard {
        id: project.item.id.clone(),
        title: project.item.title.clone(),
        category_label: capitalize(&project.item.category),
        year: project.year.clone(),
        excerpt: project.item.excerpt.clone(),
        image: project.item.image.clone(),
    }
}

/// "All Work" plus the distinct categories present in the set, sorted.
fn category_buttons(projects: &[ProjectItem], state: &FilterState) -> Vec<FilterButton> {
    let mut keys: Vec<&str> = projects
        .iter()
        .map(|project| project.item.category.as_str())
        .collect();
    keys.sort_unstable();
    keys.dedup();

    let mut buttons = vec![FilterButton {
        key: "all".to_string(),
        label: "All Work".to_string(),
        is_active: state.active_category() == "all",
    }];
    for key in keys {
        buttons.push(FilterButton {
            key: key.to_string(),
            label: capitalize(key),
            is_active: state.active_category() == key,
        });
    }
    buttons
}
