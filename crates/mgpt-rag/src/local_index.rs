//! Directory-backed passage index

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use mgpt_core::{Error, Result, RetrievedPassage, VectorIndex};

/// File holding the passages inside the index directory
pub const INDEX_FILE: &str = "index.json";

/// A pre-embedded passage as stored on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredPassage {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub source: Option<String>,
    pub embedding: Vec<f32>,
}

/// On-disk layout of `index.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexFile {
    pub embedding_model: String,
    pub dimension: usize,
    pub passages: Vec<StoredPassage>,
}

/// In-memory copy of an index directory, searched by cosine similarity
#[derive(Debug)]
pub struct LocalIndex {
    dir: PathBuf,
    embedding_model: String,
    dimension: usize,
    passages: Vec<StoredPassage>,
}

impl LocalIndex {
    /// Open the index stored in `dir`.
    ///
    /// A missing directory or index file yields `Error::IndexUnavailable`;
    /// a present but unreadable file yields `Error::VectorStore`.
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();

        if !tokio::fs::try_exists(dir).await.unwrap_or(false) {
            return Err(Error::IndexUnavailable(format!(
                "{} does not exist. Build the index before starting the chat",
                dir.display()
            )));
        }
        if !dir.is_dir() {
            return Err(Error::IndexUnavailable(format!(
                "{} is not a directory",
                dir.display()
            )));
        }

        let file = dir.join(INDEX_FILE);
        if !tokio::fs::try_exists(&file).await.unwrap_or(false) {
            return Err(Error::IndexUnavailable(format!(
                "{} has no {}",
                dir.display(),
                INDEX_FILE
            )));
        }

        let raw = tokio::fs::read_to_string(&file).await?;
        let index: IndexFile = serde_json::from_str(&raw).map_err(|e| {
            Error::VectorStore(format!("Malformed index file {}: {}", file.display(), e))
        })?;

        let opened = Self::from_file(dir, index)?;
        info!(
            dir = %dir.display(),
            passages = opened.passages.len(),
            dimension = opened.dimension,
            "Opened local index"
        );
        Ok(opened)
    }

    /// Build an index from already parsed contents
    pub fn from_file(dir: impl Into<PathBuf>, index: IndexFile) -> Result<Self> {
        if let Some(bad) = index
            .passages
            .iter()
            .find(|p| p.embedding.len() != index.dimension)
        {
            return Err(Error::VectorStore(format!(
                "Passage '{}' has {} dimensions, index declares {}",
                bad.id,
                bad.embedding.len(),
                index.dimension
            )));
        }

        Ok(Self {
            dir: dir.into(),
            embedding_model: index.embedding_model,
            dimension: index.dimension,
            passages: index.passages,
        })
    }

    pub fn embedding_model(&self) -> &str {
        &self.embedding_model
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.passages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    /// Simple cosine similarity calculation
    fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        if a.len() != b.len() {
            return 0.0;
        }

        let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }

        dot_product / (norm_a * norm_b)
    }
}

#[async_trait]
impl VectorIndex for LocalIndex {
    async fn search_by_vector(&self, vector: Vec<f32>, top_k: usize) -> Result<Vec<RetrievedPassage>> {
        if vector.len() != self.dimension {
            return Err(Error::VectorStore(format!(
                "Query embedding has {} dimensions, index expects {}",
                vector.len(),
                self.dimension
            )));
        }

        let mut scored: Vec<(f32, &StoredPassage)> = self
            .passages
            .iter()
            .map(|p| (Self::cosine_similarity(&vector, &p.embedding), p))
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
        scored.truncate(top_k);

        debug!(hits = scored.len(), top_k, "Local index search complete");

        Ok(scored
            .into_iter()
            .map(|(score, p)| RetrievedPassage {
                text: p.text.clone(),
                score: Some(score),
                source: p.source.clone(),
            })
            .collect())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.passages.len())
    }

    fn location(&self) -> String {
        self.dir.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passage(id: &str, text: &str, embedding: Vec<f32>) -> StoredPassage {
        StoredPassage {
            id: id.to_string(),
            text: text.to_string(),
            source: None,
            embedding,
        }
    }

    fn sample_index() -> LocalIndex {
        LocalIndex::from_file(
            "mem",
            IndexFile {
                embedding_model: "models/text-embedding-004".to_string(),
                dimension: 2,
                passages: vec![
                    passage("karna", "Karna, son of Surya", vec![1.0, 0.0]),
                    passage("arjuna", "Arjuna wields the Gandiva", vec![0.0, 1.0]),
                    passage("both", "Karna and Arjuna duel", vec![0.7, 0.7]),
                ],
            },
        )
        .unwrap()
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((LocalIndex::cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert_eq!(LocalIndex::cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
        assert_eq!(LocalIndex::cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert_eq!(LocalIndex::cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
    }

    #[tokio::test]
    async fn test_search_orders_by_score() {
        let index = sample_index();
        let hits = index.search_by_vector(vec![1.0, 0.1], 2).await.unwrap();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].text, "Karna, son of Surya");
        assert_eq!(hits[1].text, "Karna and Arjuna duel");
        assert!(hits[0].score.unwrap() >= hits[1].score.unwrap());
    }

    #[tokio::test]
    async fn test_search_rejects_wrong_dimension() {
        let index = sample_index();
        let err = index.search_by_vector(vec![1.0, 0.0, 0.0], 4).await.unwrap_err();
        assert!(matches!(err, Error::VectorStore(_)));
    }

    #[test]
    fn test_from_file_validates_dimensions() {
        let err = LocalIndex::from_file(
            "mem",
            IndexFile {
                embedding_model: "m".to_string(),
                dimension: 3,
                passages: vec![passage("short", "too short", vec![1.0])],
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("short"));
    }
}
