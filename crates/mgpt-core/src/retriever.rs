//! Retrieval traits: embedding model, vector index, and the retriever that
//! joins them

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// A passage returned for a query. Transient: never stored in the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedPassage {
    pub text: String,
    pub score: Option<f32>,
    pub source: Option<String>,
}

impl RetrievedPassage {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            score: None,
            source: None,
        }
    }
}

/// Trait for embedding models
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a search query
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>>;

    /// Get the embedding model ID
    fn model_id(&self) -> &str;
}

/// Trait for vector indexes holding pre-embedded passages
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Nearest passages to `vector`, best first, at most `top_k`
    async fn search_by_vector(&self, vector: Vec<f32>, top_k: usize) -> Result<Vec<RetrievedPassage>>;

    /// Number of passages held by the index
    async fn count(&self) -> Result<usize>;

    /// Human readable location of the index (directory or collection)
    fn location(&self) -> String;
}

/// Trait for query-to-passages retrieval
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Fetch the `top_k` passages most relevant to `query`
    async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<RetrievedPassage>>;

    /// Number of passages available to the retriever
    async fn passage_count(&self) -> Result<usize>;

    /// Where the passages come from
    fn location(&self) -> String;
}
