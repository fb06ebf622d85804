//! Qdrant-backed passage index
//!
//! Thin adapter over `qdrant-client`. Passages are read from the point
//! payload: `text` (or `page_content`, as written by LangChain loaders) and
//! an optional `source`.

use async_trait::async_trait;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::value::Kind;
use qdrant_client::qdrant::{CountPointsBuilder, SearchPointsBuilder, Value as QValue};
use std::collections::HashMap;
use tracing::{debug, info, warn};

use mgpt_core::{Error, Result, RetrievedPassage, VectorIndex};

const TEXT_KEYS: [&str; 2] = ["text", "page_content"];

pub struct QdrantIndex {
    client: Qdrant,
    url: String,
    collection: String,
}

impl QdrantIndex {
    /// Connect to Qdrant and check that the collection exists.
    ///
    /// An unreachable server or missing collection yields
    /// `Error::IndexUnavailable`.
    pub async fn open(url: &str, api_key: Option<&str>, collection: &str) -> Result<Self> {
        let mut builder = Qdrant::from_url(url);
        if let Some(key) = api_key {
            builder = builder.api_key(key.to_string());
        }
        let client = builder
            .build()
            .map_err(|e| Error::VectorStore(e.to_string()))?;

        let exists = client
            .collection_exists(collection.to_string())
            .await
            .map_err(|e| {
                Error::IndexUnavailable(format!("Qdrant at {} is unreachable: {}", url, e))
            })?;

        if !exists {
            return Err(Error::IndexUnavailable(format!(
                "Collection '{}' not found at {}",
                collection, url
            )));
        }

        info!(url, collection, "Opened Qdrant collection");
        Ok(Self {
            client,
            url: url.to_string(),
            collection: collection.to_string(),
        })
    }
}

fn payload_string(payload: &HashMap<String, QValue>, key: &str) -> Option<String> {
    match payload.get(key).and_then(|v| v.kind.as_ref()) {
        Some(Kind::StringValue(s)) => Some(s.clone()),
        _ => None,
    }
}

/// Extract the passage text and source from a point payload
pub(crate) fn passage_from_payload(
    payload: &HashMap<String, QValue>,
    score: f32,
) -> Option<RetrievedPassage> {
    let text = TEXT_KEYS.iter().find_map(|k| payload_string(payload, k))?;
    Some(RetrievedPassage {
        text,
        score: Some(score),
        source: payload_string(payload, "source"),
    })
}

#[async_trait]
impl VectorIndex for QdrantIndex {
    async fn search_by_vector(&self, vector: Vec<f32>, top_k: usize) -> Result<Vec<RetrievedPassage>> {
        let res = self
            .client
            .search_points(
                SearchPointsBuilder::new(&self.collection, vector, top_k as u64).with_payload(true),
            )
            .await
            .map_err(|e| Error::VectorStore(e.to_string()))?;

        let mut out = Vec::with_capacity(res.result.len());
        for point in res.result {
            match passage_from_payload(&point.payload, point.score) {
                Some(passage) => out.push(passage),
                None => warn!(collection = %self.collection, "Point without text payload skipped"),
            }
        }

        debug!(hits = out.len(), top_k, "Qdrant search complete");
        Ok(out)
    }

    async fn count(&self) -> Result<usize> {
        let res = self
            .client
            .count(CountPointsBuilder::new(&self.collection).exact(true))
            .await
            .map_err(|e| Error::VectorStore(e.to_string()))?;

        Ok(res.result.map(|r| r.count as usize).unwrap_or(0))
    }

    fn location(&self) -> String {
        format!("{}/{}", self.url, self.collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string_value(s: &str) -> QValue {
        QValue {
            kind: Some(Kind::StringValue(s.to_string())),
        }
    }

    #[test]
    fn test_passage_from_text_payload() {
        let mut payload = HashMap::new();
        payload.insert("text".to_string(), string_value("Bhishma's vow"));
        payload.insert("source".to_string(), string_value("adi_parva"));

        let passage = passage_from_payload(&payload, 0.8).unwrap();
        assert_eq!(passage.text, "Bhishma's vow");
        assert_eq!(passage.source.as_deref(), Some("adi_parva"));
        assert_eq!(passage.score, Some(0.8));
    }

    #[test]
    fn test_passage_from_langchain_payload() {
        let mut payload = HashMap::new();
        payload.insert("page_content".to_string(), string_value("Drona teaches archery"));

        let passage = passage_from_payload(&payload, 0.5).unwrap();
        assert_eq!(passage.text, "Drona teaches archery");
        assert!(passage.source.is_none());
    }

    #[test]
    fn test_payload_without_text() {
        let mut payload = HashMap::new();
        payload.insert(
            "text".to_string(),
            QValue {
                kind: Some(Kind::IntegerValue(7)),
            },
        );
        assert!(passage_from_payload(&payload, 0.1).is_none());
    }
}
