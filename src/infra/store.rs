//! HTTP client for the remote document store.

use async_trait::async_trait;
use metrics::counter;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::debug;

use crate::application::collections::{CollectionsRepo, StoreError};
use crate::domain::listing::Collection;
use crate::domain::records::RawDocument;

use super::error::InfraError;

pub const METRIC_STORE_FETCH: &str = "vetrina_store_fetch_total";
pub const METRIC_STORE_FETCH_FAILED: &str = "vetrina_store_fetch_failed_total";

/// Wire envelope returned by the store's collection endpoint.
#[derive(Debug, Deserialize)]
struct DocumentsEnvelope {
    #[serde(default)]
    documents: Vec<RawDocument>,
}

#[derive(Clone)]
pub struct DocumentStoreClient {
    client: Client,
    base: Url,
}

impl DocumentStoreClient {
    pub fn new(base_url: &str) -> Result<Self, InfraError> {
        let base = Url::parse(base_url)
            .map_err(|err| InfraError::configuration(format!("invalid store URL: {err}")))?;
        let client = Client::builder()
            .user_agent(Self::user_agent())
            .build()
            .map_err(|err| InfraError::store(format!("failed to build http client: {err}")))?;
        Ok(Self { client, base })
    }

    pub fn user_agent() -> &'static str {
        concat!("vetrina/", env!("CARGO_PKG_VERSION"))
    }

    /// Endpoint for one collection, asking for published documents only.
    fn collection_url(&self, collection: Collection) -> Result<Url, StoreError> {
        let mut url = self
            .base
            .join(&format!("collections/{}/documents", collection.as_str()))
            .map_err(|err| StoreError::transport(err.to_string()))?;
        url.query_pairs_mut().append_pair("published", "true");
        Ok(url)
    }
}

#[async_trait]
impl CollectionsRepo for DocumentStoreClient {
    async fn fetch_published(
        &self,
        collection: Collection,
    ) -> Result<Vec<RawDocument>, StoreError> {
        counter!(METRIC_STORE_FETCH).increment(1);

        let url = self.collection_url(collection)?;
        let result = async {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|err| StoreError::transport(err.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(StoreError::Status {
                    code: status.as_u16(),
                });
            }

            let envelope: DocumentsEnvelope = response
                .json()
                .await
                .map_err(|err| StoreError::decode(err.to_string()))?;
            Ok(envelope.documents)
        }
        .await;

        match &result {
            Ok(documents) => debug!(
                target = "vetrina::store",
                collection = collection.as_str(),
                count = documents.len(),
                "fetched collection"
            ),
            Err(_) => counter!(METRIC_STORE_FETCH_FAILED).increment(1),
        }
        result
    }
}
