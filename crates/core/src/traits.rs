use crate::error::SearchError;
use crate::models::{AggregateRequest, AggregateRow};
use crate::schema::IndexSchema;
use async_trait::async_trait;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexInfo {
    pub num_docs: u64,
}

/// The consumed surface of the search-and-index engine. The pipeline only
/// issues these operations; it implements none of them.
#[async_trait]
pub trait SearchEngine: Send + Sync {
    /// Metadata for an existing index. Returns
    /// [`SearchError::IndexNotFound`] when the index does not exist.
    async fn index_info(&self, index: &str) -> Result<IndexInfo, SearchError>;

    /// Drop an index and its documents. Returns
    /// [`SearchError::IndexNotFound`] when there is nothing to drop.
    async fn drop_index(&self, index: &str) -> Result<(), SearchError>;

    async fn create_index(&self, index: &str, schema: &IndexSchema) -> Result<(), SearchError>;

    /// Write a document under `key` and register it for `index`.
    async fn write_document(
        &self,
        key: &str,
        fields: &HashMap<String, String>,
        index: &str,
    ) -> Result<(), SearchError>;

    async fn aggregate(
        &self,
        index: &str,
        request: &AggregateRequest,
    ) -> Result<Vec<AggregateRow>, SearchError>;

    /// Number of entries in a suggestion dictionary; 0 when it does not
    /// exist yet.
    async fn suggestion_len(&self, dictionary: &str) -> Result<u64, SearchError>;

    /// Upsert a weighted autocomplete entry. With `dedupe`, re-adding an
    /// existing string adjusts its weight instead of duplicating it.
    async fn add_suggestion(
        &self,
        dictionary: &str,
        text: &str,
        weight: f64,
        payload: Option<&str>,
        dedupe: bool,
    ) -> Result<(), SearchError>;

    /// Delete a key outright; used to reset a suggestion dictionary.
    async fn delete(&self, key: &str) -> Result<(), SearchError>;
}
