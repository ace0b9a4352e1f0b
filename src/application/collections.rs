//! The remote document store boundary.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::listing::Collection;
use crate::domain::records::RawDocument;

/// Failures crossing the document store boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store transport error: {0}")]
    Transport(String),
    #[error("store responded with status {code}")]
    Status { code: u16 },
    #[error("store payload could not be decoded: {0}")]
    Decode(String),
}

impl StoreError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }
}

/// Query/fetch capability over named collections.
///
/// The production adapter talks to the document store's HTTP API; tests use
/// an in-memory implementation. Only published documents are ever returned.
#[async_trait]
pub trait CollectionsRepo: Send + Sync {
    async fn fetch_published(&self, collection: Collection) -> Result<Vec<RawDocument>, StoreError>;
}
