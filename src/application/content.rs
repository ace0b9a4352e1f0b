//! Admin content management over the persistent content store.

use std::sync::Arc;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use thiserror::Error;
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use crate::domain::content::{
    BlogEntry, ContentDocument, MediaKind, MediaRecord, ProjectEntry, derive_slug,
};

/// Persistence behind the admin editor. The document is stored wholesale;
/// media records live in a sibling list.
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn load(&self) -> Result<ContentDocument, ContentStoreError>;
    async fn save(&self, document: &ContentDocument) -> Result<(), ContentStoreError>;
    async fn load_media(&self) -> Result<Vec<MediaRecord>, ContentStoreError>;
    async fn save_media(&self, media: &[MediaRecord]) -> Result<(), ContentStoreError>;
}

#[derive(Debug, Error)]
pub enum ContentStoreError {
    #[error("content store i/o: {0}")]
    Io(String),
    #[error("content store decode: {0}")]
    Decode(String),
    #[error("content store encode: {0}")]
    Encode(String),
}

#[derive(Debug, Error)]
pub enum ContentError {
    #[error(transparent)]
    Store(#[from] ContentStoreError),
}

/// Counts shown on the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardStats {
    pub blog_entries: usize,
    pub projects: usize,
    pub services: usize,
    pub media_assets: usize,
}

/// Input for a new blog entry; id, slug and timestamp are derived here.
#[derive(Debug, Clone, Default)]
pub struct NewBlogEntry {
    pub title: String,
    pub category: String,
    pub excerpt: String,
    pub body_html: String,
}

/// Input for a new portfolio project.
#[derive(Debug, Clone, Default)]
pub struct NewProject {
    pub name: String,
    pub category: String,
    pub description: String,
    pub image_url: String,
    pub link: String,
    pub featured: bool,
}

#[derive(Clone)]
pub struct ContentService {
    store: Arc<dyn ContentStore>,
}

impl ContentService {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    pub async fn document(&self) -> Result<ContentDocument, ContentError> {
        Ok(self.store.load().await?)
    }

    pub async fn dashboard(&self) -> Result<DashboardStats, ContentError> {
        let document = self.store.load().await?;
        let media = self.store.load_media().await?;
        Ok(DashboardStats {
            blog_entries: document.blog.len(),
            projects: document.portfolio.len(),
            services: document.services.len(),
            media_assets: media.len(),
        })
    }

    /// Overwrite the whole document, as the editor's save button does.
    pub async fn save_document(&self, mut document: ContentDocument) -> Result<(), ContentError> {
        document.about.body_html = sanitize_html(&document.about.body_html);
        for entry in &mut document.blog {
            entry.body_html = sanitize_html(&entry.body_html);
        }
        self.store.save(&document).await?;
        info!(target = "vetrina::content", "content document saved");
        Ok(())
    }

    pub async fn save_about(&self, body_html: &str) -> Result<(), ContentError> {
        let mut document = self.store.load().await?;
        document.about.body_html = sanitize_html(body_html);
        self.store.save(&document).await?;
        Ok(())
    }

    /// New entries land at the head of the list, so the editor shows the
    /// latest entry first.
    pub async fn create_blog_entry(&self, input: NewBlogEntry) -> Result<BlogEntry, ContentError> {
        let entry = BlogEntry {
            id: Uuid::new_v4(),
            slug: derive_slug(&input.title),
            title: input.title,
            category: input.category,
            excerpt: input.excerpt,
            body_html: sanitize_html(&input.body_html),
            created_at: OffsetDateTime::now_utc(),
        };

        let mut document = self.store.load().await?;
        document.blog.insert(0, entry.clone());
        self.store.save(&document).await?;
        Ok(entry)
    }

    pub async fn create_project(&self, input: NewProject) -> Result<ProjectEntry, ContentError> {
        let project = ProjectEntry {
            id: Uuid::new_v4(),
            name: input.name,
            category: input.category,
            description: input.description,
            image_url: input.image_url,
            link: input.link,
            featured: input.featured,
        };

        let mut document = self.store.load().await?;
        document.portfolio.push(project.clone());
        self.store.save(&document).await?;
        Ok(project)
    }

    /// Register an uploaded asset: checksum the bytes and append the record.
    pub async fn record_media(
        &self,
        name: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<MediaRecord, ContentError> {
        let record = MediaRecord {
            id: Uuid::new_v4(),
            kind: MediaKind::from_content_type(content_type),
            name: name.to_string(),
            size_bytes: bytes.len() as u64,
            checksum: hex::encode(Sha256::digest(bytes)),
            uploaded_at: OffsetDateTime::now_utc(),
        };

        let mut media = self.store.load_media().await?;
        media.push(record.clone());
        self.store.save_media(&media).await?;
        info!(target = "vetrina::content", file = name, "media asset recorded");
        Ok(record)
    }

    pub async fn media(&self) -> Result<Vec<MediaRecord>, ContentError> {
        Ok(self.store.load_media().await?)
    }
}

/// Rich-text bodies pass through an HTML sanitizer before persisting.
pub fn sanitize_html(input: &str) -> String {
    ammonia::clean(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryStore {
        document: Mutex<ContentDocument>,
        media: Mutex<Vec<MediaRecord>>,
    }

    #[async_trait]
    impl ContentStore for MemoryStore {
        async fn load(&self) -> Result<ContentDocument, ContentStoreError> {
            Ok(self.document.lock().unwrap().clone())
        }

        async fn save(&self, document: &ContentDocument) -> Result<(), ContentStoreError> {
            *self.document.lock().unwrap() = document.clone();
            Ok(())
        }

        async fn load_media(&self) -> Result<Vec<MediaRecord>, ContentStoreError> {
            Ok(self.media.lock().unwrap().clone())
        }

        async fn save_media(&self, media: &[MediaRecord]) -> Result<(), ContentStoreError> {
            *self.media.lock().unwrap() = media.to_vec();
            Ok(())
        }
    }

    fn service() -> (ContentService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::default());
        (ContentService::new(store.clone()), store)
    }

    #[tokio::test]
    async fn new_blog_entries_are_prepended_with_derived_slugs() {
        let (service, _store) = service();

        service
            .create_blog_entry(NewBlogEntry {
                title: "First Post".to_string(),
                ..NewBlogEntry::default()
            })
            .await
            .unwrap();
        let second = service
            .create_blog_entry(NewBlogEntry {
                title: "Launching the 2026 Reel!".to_string(),
                ..NewBlogEntry::default()
            })
            .await
            .unwrap();

        assert_eq!(second.slug, "launching-the-2026-reel");
        let document = service.document().await.unwrap();
        assert_eq!(document.blog[0].id, second.id);
        assert_eq!(document.blog[1].slug, "first-post");
    }

    #[tokio::test]
    async fn rich_text_is_sanitized_before_saving() {
        let (service, _store) = service();
        service
            .save_about("<p>Hi</p><script>alert(1)</script>")
            .await
            .unwrap();
        let document = service.document().await.unwrap();
        assert_eq!(document.about.body_html, "<p>Hi</p>");
    }

    #[tokio::test]
    async fn media_records_carry_a_checksum_over_the_bytes() {
        let (service, _store) = service();
        let record = service
            .record_media("logo.png", "image/png", b"pixels")
            .await
            .unwrap();
        assert_eq!(record.kind, MediaKind::Image);
        assert_eq!(record.size_bytes, 6);
        assert_eq!(record.checksum, hex::encode(Sha256::digest(b"pixels")));

        let stats = service.dashboard().await.unwrap();
        assert_eq!(stats.media_assets, 1);
    }
}
