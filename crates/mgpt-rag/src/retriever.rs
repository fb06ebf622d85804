//! Retriever joining an embedding model with a vector index

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use mgpt_core::{Embedder, Error, Result, RetrievedPassage, Retriever, VectorIndex};

/// Embeds the query, then asks the index for its nearest passages.
///
/// Results are passed through as returned by the index: no re-ranking and
/// no score filtering.
pub struct IndexRetriever<E: Embedder, V: VectorIndex> {
    embedder: Arc<E>,
    index: V,
}

impl<E: Embedder, V: VectorIndex> IndexRetriever<E, V> {
    pub fn new(embedder: Arc<E>, index: V) -> Self {
        Self { embedder, index }
    }
}

#[async_trait]
impl<E: Embedder + 'static, V: VectorIndex + 'static> Retriever for IndexRetriever<E, V> {
    async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<RetrievedPassage>> {
        if query.trim().is_empty() {
            return Err(Error::InvalidInput("Cannot retrieve for an empty query".to_string()));
        }
        if top_k == 0 {
            return Ok(Vec::new());
        }

        let vector = self.embedder.embed_query(query).await?;
        let passages = self.index.search_by_vector(vector, top_k).await?;

        debug!(hits = passages.len(), top_k, "Retrieved passages");
        Ok(passages)
    }

    async fn passage_count(&self) -> Result<usize> {
        self.index.count().await
    }

    fn location(&self) -> String {
        self.index.location()
    }
}
