//! Snapshot tests for retrieval components

#[cfg(test)]
mod snapshot_tests {
    use crate::{
        build_context, open_retriever, Embedder, Error, IndexBackend, IndexFile, LocalIndex,
        Result, StoredPassage, VectorIndex, INDEX_FILE,
    };
    use async_trait::async_trait;
    use insta::assert_yaml_snapshot;
    use std::path::Path;
    use std::sync::Arc;
    use tempfile::TempDir;

    /// Embeds by keyword: one dimension per hero
    struct KeywordEmbedder;

    #[async_trait]
    impl Embedder for KeywordEmbedder {
        async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
            let text = text.to_lowercase();
            Ok(vec![
                if text.contains("karna") { 1.0 } else { 0.0 },
                if text.contains("arjuna") { 1.0 } else { 0.0 },
                if text.contains("bhishma") { 1.0 } else { 0.0 },
            ])
        }

        fn model_id(&self) -> &str {
            "models/text-embedding-004"
        }
    }

    fn stored(id: &str, text: &str, source: &str, embedding: Vec<f32>) -> StoredPassage {
        StoredPassage {
            id: id.to_string(),
            text: text.to_string(),
            source: Some(source.to_string()),
            embedding,
        }
    }

    fn write_index(dir: &Path) {
        let index = IndexFile {
            embedding_model: "models/text-embedding-004".to_string(),
            dimension: 3,
            passages: vec![
                stored("p1", "Karna was the son of Kunti and Surya.", "adi_parva", vec![1.0, 0.0, 0.0]),
                stored("p2", "Arjuna received the Gandiva from Agni.", "adi_parva", vec![0.0, 1.0, 0.0]),
                stored("p3", "Bhishma took a vow of lifelong celibacy.", "adi_parva", vec![0.0, 0.0, 1.0]),
                stored("p4", "Karna and Arjuna met at Kurukshetra.", "karna_parva", vec![0.6, 0.6, 0.0]),
                stored("p5", "The dice game was played in Hastinapura.", "sabha_parva", vec![0.1, 0.1, 0.1]),
            ],
        };
        let json = serde_json::to_string_pretty(&index).unwrap();
        std::fs::write(dir.join(INDEX_FILE), json).unwrap();
    }

    #[tokio::test]
    async fn test_retrieve_top_k_snapshot() {
        let dir = TempDir::new().unwrap();
        write_index(dir.path());

        let backend = IndexBackend::Local {
            dir: dir.path().to_path_buf(),
        };
        let retriever = open_retriever(&backend, Arc::new(KeywordEmbedder)).await.unwrap();
        assert_eq!(retriever.passage_count().await.unwrap(), 5);

        let passages = retriever.retrieve("Karna kaun tha", 4).await.unwrap();
        assert_eq!(passages.len(), 4);

        assert_yaml_snapshot!(passages, {
            "[].score" => insta::rounded_redaction(2),
        }, @r###"
        ---
        - text: Karna was the son of Kunti and Surya.
          score: 1.0
          source: adi_parva
        - text: Karna and Arjuna met at Kurukshetra.
          score: 0.71
          source: karna_parva
        - text: The dice game was played in Hastinapura.
          score: 0.58
          source: sabha_parva
        - text: Arjuna received the Gandiva from Agni.
          score: 0.0
          source: adi_parva
        "###);
    }

    #[tokio::test]
    async fn test_context_from_retrieval() {
        let dir = TempDir::new().unwrap();
        write_index(dir.path());

        let backend = IndexBackend::Local {
            dir: dir.path().to_path_buf(),
        };
        let retriever = open_retriever(&backend, Arc::new(KeywordEmbedder)).await.unwrap();
        let passages = retriever.retrieve("bhishma", 1).await.unwrap();

        assert_eq!(
            build_context(&passages),
            "Bhishma took a vow of lifelong celibacy."
        );
    }

    #[tokio::test]
    async fn test_missing_directory_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let backend = IndexBackend::Local {
            dir: dir.path().join("mahabharat_db"),
        };

        let err = open_retriever(&backend, Arc::new(KeywordEmbedder)).await.err().unwrap();
        assert!(matches!(err, Error::IndexUnavailable(_)));
    }

    #[tokio::test]
    async fn test_missing_index_file_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let err = LocalIndex::open(dir.path()).await.unwrap_err();
        assert!(matches!(err, Error::IndexUnavailable(_)));
        assert!(err.to_string().contains(INDEX_FILE));
    }

    #[tokio::test]
    async fn test_malformed_index_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(INDEX_FILE), "{ not json").unwrap();

        let err = LocalIndex::open(dir.path()).await.unwrap_err();
        assert!(matches!(err, Error::VectorStore(_)));
    }

    #[tokio::test]
    async fn test_local_index_location() {
        let dir = TempDir::new().unwrap();
        write_index(dir.path());

        let index = LocalIndex::open(dir.path()).await.unwrap();
        assert_eq!(index.location(), dir.path().display().to_string());
        assert_eq!(index.dimension(), 3);
        assert_eq!(index.len(), 5);
    }

    #[test]
    fn test_backend_display() {
        let backend = IndexBackend::Qdrant {
            url: "http://localhost:6334".to_string(),
            api_key: None,
            collection: "mahabharat".to_string(),
        };
        assert_eq!(
            backend.to_string(),
            "qdrant collection 'mahabharat' at http://localhost:6334"
        );
    }
}
