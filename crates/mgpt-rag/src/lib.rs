//! Passage retrieval for Mahabharat GPT
//!
//! This crate provides the vector indexes the chat is grounded on (a local
//! index directory or a Qdrant collection), the retriever that embeds
//! queries against them, and context block assembly.

mod context;
mod local_index;
mod qdrant_index;
mod retriever;

#[cfg(test)]
mod tests;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

pub use context::{build_context, PASSAGE_SEPARATOR};
pub use local_index::{IndexFile, LocalIndex, StoredPassage, INDEX_FILE};
pub use qdrant_index::QdrantIndex;
pub use retriever::IndexRetriever;

// Re-export core types for convenience
pub use mgpt_core::{Embedder, Error, Result, RetrievedPassage, Retriever, VectorIndex};

/// Where the passage index lives
#[derive(Debug, Clone, PartialEq)]
pub enum IndexBackend {
    /// Directory holding `index.json`
    Local { dir: PathBuf },
    /// Remote Qdrant collection
    Qdrant {
        url: String,
        api_key: Option<String>,
        collection: String,
    },
}

impl fmt::Display for IndexBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexBackend::Local { dir } => write!(f, "local index at {}", dir.display()),
            IndexBackend::Qdrant {
                url, collection, ..
            } => write!(f, "qdrant collection '{}' at {}", collection, url),
        }
    }
}

fn bare_model(model: &str) -> &str {
    model.strip_prefix("models/").unwrap_or(model)
}

/// Open the configured index and wrap it in a retriever.
///
/// Called once at startup; the caller keeps the outcome for the lifetime of
/// the process.
pub async fn open_retriever<E>(backend: &IndexBackend, embedder: Arc<E>) -> Result<Arc<dyn Retriever>>
where
    E: Embedder + 'static,
{
    info!(backend = %backend, "Opening passage index");

    match backend {
        IndexBackend::Local { dir } => {
            let index = LocalIndex::open(dir).await?;
            if bare_model(index.embedding_model()) != bare_model(embedder.model_id()) {
                warn!(
                    index_model = index.embedding_model(),
                    query_model = embedder.model_id(),
                    "Index was built with a different embedding model"
                );
            }
            Ok(Arc::new(IndexRetriever::new(embedder, index)))
        }
        IndexBackend::Qdrant {
            url,
            api_key,
            collection,
        } => {
            let index = QdrantIndex::open(url, api_key.as_deref(), collection).await?;
            Ok(Arc::new(IndexRetriever::new(embedder, index)))
        }
    }
}
