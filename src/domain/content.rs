//! The admin-managed content document and media records.
//!
//! The whole document lives under one key in the content store. It is read on
//! load and overwritten wholesale on every save; missing keys deserialize to
//! their defaults, so there is no migration handling.

use serde::{Deserialize, Serialize};
use slug::slugify;
use time::OffsetDateTime;
use uuid::Uuid;

/// Everything the admin editor manages, as one serialized structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentDocument {
    pub about: AboutContent,
    pub portfolio: Vec<ProjectEntry>,
    pub blog: Vec<BlogEntry>,
    pub services: Vec<ServiceEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AboutContent {
    /// Sanitized rich-text body.
    pub body_html: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogEntry {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub body_html: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub featured: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceEntry {
    pub title: String,
    pub description: String,
    pub category: String,
    pub icon: String,
}

/// Derive the URL slug for a blog entry title.
pub fn derive_slug(title: &str) -> String {
    slugify(title)
}

/// Media kinds tracked by the admin uploader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Images by MIME prefix, everything else treated as video.
    pub fn from_content_type(content_type: &str) -> Self {
        if content_type.starts_with("image/") {
            MediaKind::Image
        } else {
            MediaKind::Video
        }
    }
}

/// One uploaded media asset, tracked in a sibling list beside the content
/// document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaRecord {
    pub id: Uuid,
    pub kind: MediaKind,
    pub name: String,
    pub size_bytes: u64,
    pub checksum: String,
    #[serde(with = "time::serde::rfc3339")]
    pub uploaded_at: OffsetDateTime,
}
