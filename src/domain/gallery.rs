//! Portfolio projects and the detail modal selector.

use time::OffsetDateTime;

use crate::domain::listing::{Collection, ListingItem, normalize};
use crate::domain::records::RawDocument;

/// A normalized portfolio project: the shared listing fields plus the detail
/// payload the modal needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectItem {
    pub item: ListingItem,
    pub year: String,
    pub description: String,
    /// `None` when the record supplied no usable link (`""` or `"#"`).
    pub link: Option<String>,
    pub cta: String,
}

/// Normalize one raw portfolio record. Same required-field rules as the
/// listing normalizer; the year falls back to the current year when the
/// record is undated.
pub fn normalize_project(doc: &RawDocument, now: OffsetDateTime) -> Option<ProjectItem> {
    let item = normalize(doc, Collection::Portfolio)?;

    let year = item
        .published_at
        .map(|when| when.year())
        .unwrap_or_else(|| now.year())
        .to_string();

    let link = doc
        .link
        .clone()
        .filter(|href| !href.is_empty() && href != "#");

    Some(ProjectItem {
        year,
        description: doc.description.clone().unwrap_or_default(),
        link,
        cta: doc
            .cta
            .clone()
            .filter(|label| !label.is_empty())
            .unwrap_or_else(|| "View Project".to_string()),
        item,
    })
}

/// Payload copied into the modal when a project is selected.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectDetail {
    pub title: String,
    pub category: String,
    pub year: String,
    pub image: String,
    pub description: String,
    pub link: Option<String>,
    pub cta: String,
}

impl ProjectDetail {
    pub fn from_project(project: &ProjectItem) -> Self {
        Self {
            title: project.item.title.clone(),
            category: project.item.category.clone(),
            year: project.year.clone(),
            image: project.item.image.clone(),
            description: project.description.clone(),
            link: project.link.clone(),
            cta: project.cta.clone(),
        }
    }
}

/// The modal selector: closed until a gallery item is picked, then carries
/// that item's payload until closed again. Always reflects the most recently
/// selected project.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ProjectModal {
    #[default]
    Closed,
    Open(ProjectDetail),
}

impl ProjectModal {
    /// Close → Open (or Open → Open with the new payload).
    pub fn select(&mut self, project: &ProjectItem) {
        *self = ProjectModal::Open(ProjectDetail::from_project(project));
    }

    /// Close control, outside click, and Escape all collapse to this.
    pub fn close(&mut self) {
        *self = ProjectModal::Closed;
    }

    pub fn is_open(&self) -> bool {
        matches!(self, ProjectModal::Open(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn project_doc(id: &str) -> RawDocument {
        RawDocument {
            category: Some("Social".to_string()),
            description: Some("Quarterly campaign".to_string()),
            link: Some("https://example.com/case".to_string()),
            cta: Some("See it live".to_string()),
            created_at: Some(1_600_000_000),
            ..RawDocument::new(id, "Campaign")
        }
    }

    #[test]
    fn project_year_comes_from_timestamp_or_current_year() {
        let now = datetime!(2026-08-28 0:00 UTC);

        let dated = normalize_project(&project_doc("p1"), now).expect("valid project");
        assert_eq!(dated.year, "2020");

        let undated = RawDocument::new("p2", "Fresh work");
        let normalized = normalize_project(&undated, now).expect("valid project");
        assert_eq!(normalized.year, "2026");
    }

    #[test]
    fn placeholder_links_are_dropped() {
        let now = datetime!(2026-08-28 0:00 UTC);
        for href in ["", "#"] {
            let doc = RawDocument {
                link: Some(href.to_string()),
                ..RawDocument::new("p3", "No link")
            };
            let project = normalize_project(&doc, now).expect("valid project");
            assert_eq!(project.link, None);
        }
    }

    #[test]
    fn modal_reflects_the_most_recently_selected_project() {
        let now = datetime!(2026-08-28 0:00 UTC);
        let first = normalize_project(&project_doc("p1"), now).unwrap();
        let second = normalize_project(
            &RawDocument {
                description: Some("Another brief".to_string()),
                ..RawDocument::new("p2", "Second")
            },
            now,
        )
        .unwrap();

        let mut modal = ProjectModal::default();
        assert!(!modal.is_open());

        modal.select(&first);
        modal.select(&second);
        match &modal {
            ProjectModal::Open(detail) => {
                assert_eq!(detail.title, "Second");
                assert_eq!(detail.description, "Another brief");
            }
            ProjectModal::Closed => panic!("modal should be open"),
        }

        modal.close();
        assert_eq!(modal, ProjectModal::Closed);
    }

    #[test]
    fn cta_defaults_when_absent() {
        let now = datetime!(2026-08-28 0:00 UTC);
        let doc = RawDocument::new("p4", "Plain");
        let project = normalize_project(&doc, now).expect("valid project");
        assert_eq!(project.cta, "View Project");
    }
}
