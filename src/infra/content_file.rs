//! JSON-file implementation of the admin content store.
//!
//! One directory holds `content.json` (the whole document) and `media.json`
//! (the uploaded-asset list). A missing file reads as the default value, so a
//! fresh deployment needs no seeding step.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tokio::fs;

use crate::application::content::{ContentStore, ContentStoreError};
use crate::domain::content::{ContentDocument, MediaRecord};

const DOCUMENT_FILE: &str = "content.json";
const MEDIA_FILE: &str = "media.json";

#[derive(Clone)]
pub struct JsonContentStore {
    dir: PathBuf,
}

impl JsonContentStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    async fn read_or_default<T: DeserializeOwned + Default>(
        &self,
        file: &str,
    ) -> Result<T, ContentStoreError> {
        let path = self.dir.join(file);
        match fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|err| ContentStoreError::Decode(format!("{}: {err}", path.display()))),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
            Err(err) => Err(ContentStoreError::Io(format!("{}: {err}", path.display()))),
        }
    }

    async fn write_json<T: Serialize>(&self, file: &str, value: &T) -> Result<(), ContentStoreError> {
        let bytes = serde_json::to_vec_pretty(value)
            .map_err(|err| ContentStoreError::Encode(err.to_string()))?;
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|err| ContentStoreError::Io(format!("{}: {err}", self.dir.display())))?;
        let path = self.dir.join(file);
        fs::write(&path, bytes)
            .await
            .map_err(|err| ContentStoreError::Io(format!("{}: {err}", path.display())))
    }
}

#[async_trait]
impl ContentStore for JsonContentStore {
    async fn load(&self) -> Result<ContentDocument, ContentStoreError> {
        self.read_or_default(DOCUMENT_FILE).await
    }

    async fn save(&self, document: &ContentDocument) -> Result<(), ContentStoreError> {
        self.write_json(DOCUMENT_FILE, document).await
    }

    async fn load_media(&self) -> Result<Vec<MediaRecord>, ContentStoreError> {
        self.read_or_default(MEDIA_FILE).await
    }

    async fn save_media(&self, media: &[MediaRecord]) -> Result<(), ContentStoreError> {
        self.write_json(MEDIA_FILE, &media).await
    }
}
