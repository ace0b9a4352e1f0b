//! Admin view models and templates.

use askama::Template;

use crate::application::content::DashboardStats;
use crate::domain::content::{ContentDocument, MediaRecord};
use crate::util::text::capitalize;

#[derive(Clone)]
pub struct AdminLayout<T> {
    pub site_title: String,
    pub content: T,
}

impl<T> AdminLayout<T> {
    pub fn new(site_title: &str, content: T) -> Self {
        Self {
            site_title: site_title.to_string(),
            content,
        }
    }
}

#[derive(Clone)]
pub struct AdminStatView {
    pub label: &'static str,
    pub value: usize,
}

#[derive(Clone)]
pub struct AdminDashboardView {
    pub stats: Vec<AdminStatView>,
}

impl AdminDashboardView {
    pub fn from_stats(stats: DashboardStats) -> Self {
        Self {
            stats: vec![
                AdminStatView {
                    label: "Blog entries",
                    value: stats.blog_entries,
                },
                AdminStatView {
                    label: "Projects",
                    value: stats.projects,
                },
                AdminStatView {
                    label: "Services",
                    value: stats.services,
                },
                AdminStatView {
                    label: "Media assets",
                    value: stats.media_assets,
                },
            ],
        }
    }
}

#[derive(Template)]
#[template(path = "admin/dashboard.html")]
pub struct AdminDashboardTemplate {
    pub view: AdminLayout<AdminDashboardView>,
}

#[derive(Clone)]
pub struct AdminBlogRowView {
    pub title: String,
    pub slug: String,
    pub category_label: String,
}

#[derive(Clone)]
pub struct AdminProjectRowView {
    pub name: String,
    pub category_label: String,
    pub featured: bool,
}

#[derive(Clone)]
pub struct AdminMediaRowView {
    pub name: String,
    pub kind: &'static str,
    pub size_bytes: u64,
}

/// Everything the editor page shows: the about body plus the three lists.
#[derive(Clone)]
pub struct AdminEditorView {
    pub about_body: String,
    pub blog: Vec<AdminBlogRowView>,
    pub projects: Vec<AdminProjectRowView>,
    pub media: Vec<AdminMediaRowView>,
}

impl AdminEditorView {
    pub fn new(document: &ContentDocument, media: &[MediaRecord]) -> Self {
        Self {
            about_body: document.about.body_html.clone(),
            blog: document
                .blog
                .iter()
                .map(|entry| AdminBlogRowView {
                    title: entry.title.clone(),
                    slug: entry.slug.clone(),
                    category_label: capitalize(&entry.category),
                })
                .collect(),
            projects: document
                .portfolio
                .iter()
                .map(|project| AdminProjectRowView {
                    name: project.name.clone(),
                    category_label: capitalize(&project.category),
                    featured: project.featured,
                })
                .collect(),
            media: media
                .iter()
                .map(|record| AdminMediaRowView {
                    name: record.name.clone(),
                    kind: match record.kind {
                        crate::domain::content::MediaKind::Image => "image",
                        crate::domain::content::MediaKind::Video => "video",
                    },
                    size_bytes: record.size_bytes,
                })
                .collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "admin/editor.html")]
pub struct AdminEditorTemplate {
    pub view: AdminLayout<AdminEditorView>,
}
