//! Raw documents as returned by the remote collection fetcher.

use serde::Deserialize;

/// One document from a remote collection, before normalization.
///
/// The store contract only guarantees `id` and `title`; every other field is
/// optional and defaulted during normalization. Field names here are the
/// canonical wire contract for the document store.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawDocument {
    pub id: Option<String>,
    pub title: Option<String>,
    pub category: Option<String>,
    pub excerpt: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    /// Seconds since the Unix epoch.
    pub created_at: Option<i64>,
    pub link: Option<String>,
    pub cta: Option<String>,
    pub order: Option<i64>,
    pub published: bool,
}

impl RawDocument {
    /// A minimal valid document, convenient for tests and fixtures.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            title: Some(title.into()),
            published: true,
            ..Self::default()
        }
    }
}
