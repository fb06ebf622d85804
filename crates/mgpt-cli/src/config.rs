//! Application configuration

use std::path::PathBuf;
use url::Url;

use mgpt_core::{Error, Result};
use mgpt_gemini::GeminiConfig;
use mgpt_rag::IndexBackend;

pub const DEFAULT_DB_PATH: &str = "./mahabharat_db";
pub const DEFAULT_TOP_K: usize = 4;
pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";
pub const DEFAULT_QDRANT_COLLECTION: &str = "mahabharat";

/// Everything the engine needs at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub gemini: GeminiConfig,
    pub index: IndexBackend,
    pub top_k: usize,
}

impl AppConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from any key/value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let gemini = GeminiConfig::from_lookup(&lookup)?;

        let top_k = match lookup("MAHABHARAT_TOP_K") {
            Some(raw) => parse_top_k(&raw)?,
            None => DEFAULT_TOP_K,
        };

        let backend = lookup("MAHABHARAT_INDEX_BACKEND").unwrap_or_else(|| "local".to_string());
        let index = match backend.trim().to_lowercase().as_str() {
            "local" => IndexBackend::Local {
                dir: lookup("MAHABHARAT_DB_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH)),
            },
            "qdrant" => {
                let url = lookup("QDRANT_URL").unwrap_or_else(|| DEFAULT_QDRANT_URL.to_string());
                Url::parse(&url).map_err(|e| {
                    Error::Configuration(format!("Invalid QDRANT_URL '{}': {}", url, e))
                })?;
                IndexBackend::Qdrant {
                    url,
                    api_key: lookup("QDRANT_API_KEY").filter(|k| !k.is_empty()),
                    collection: lookup("QDRANT_COLLECTION")
                        .unwrap_or_else(|| DEFAULT_QDRANT_COLLECTION.to_string()),
                }
            }
            other => {
                return Err(Error::Configuration(format!(
                    "MAHABHARAT_INDEX_BACKEND must be 'local' or 'qdrant', got '{}'",
                    other
                )));
            }
        };

        Ok(Self {
            gemini,
            index,
            top_k,
        })
    }

    /// Point the local backend at another directory
    pub fn with_db_path(mut self, dir: impl Into<PathBuf>) -> Self {
        self.index = IndexBackend::Local { dir: dir.into() };
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Result<Self> {
        if top_k == 0 {
            return Err(Error::Configuration("top-k must be at least 1".to_string()));
        }
        self.top_k = top_k;
        Ok(self)
    }

    pub fn with_chat_model(mut self, model: impl Into<String>) -> Self {
        self.gemini.chat_model = model.into();
        self
    }
}

fn parse_top_k(raw: &str) -> Result<usize> {
    match raw.trim().parse::<usize>() {
        Ok(k) if k > 0 => Ok(k),
        _ => Err(Error::Configuration(format!(
            "MAHABHARAT_TOP_K must be a positive integer, got '{}'",
            raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig> {
        let map: HashMap<&str, &str> = pairs.iter().copied().collect();
        AppConfig::from_lookup(|key: &str| map.get(key).map(|v| v.to_string()))
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[("GOOGLE_API_KEY", "abc")]).unwrap();
        assert_eq!(config.top_k, 4);
        assert_eq!(
            config.index,
            IndexBackend::Local {
                dir: PathBuf::from("./mahabharat_db")
            }
        );
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let err = config_from(&[("MAHABHARAT_TOP_K", "4")]).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_qdrant_backend() {
        let config = config_from(&[
            ("GOOGLE_API_KEY", "abc"),
            ("MAHABHARAT_INDEX_BACKEND", "Qdrant"),
            ("QDRANT_COLLECTION", "epic"),
        ])
        .unwrap();
        assert_eq!(
            config.index,
            IndexBackend::Qdrant {
                url: "http://localhost:6334".to_string(),
                api_key: None,
                collection: "epic".to_string(),
            }
        );
    }

    #[test]
    fn test_invalid_values() {
        assert!(config_from(&[("GOOGLE_API_KEY", "abc"), ("MAHABHARAT_TOP_K", "0")]).is_err());
        assert!(config_from(&[("GOOGLE_API_KEY", "abc"), ("MAHABHARAT_TOP_K", "many")]).is_err());
        assert!(
            config_from(&[("GOOGLE_API_KEY", "abc"), ("MAHABHARAT_INDEX_BACKEND", "chroma")])
                .is_err()
        );
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[("GOOGLE_API_KEY", "abc")])
            .unwrap()
            .with_db_path("/tmp/epic_db")
            .with_top_k(6)
            .unwrap()
            .with_chat_model("gemini-1.5-flash");

        assert_eq!(config.top_k, 6);
        assert_eq!(config.gemini.chat_model, "gemini-1.5-flash");
        assert_eq!(
            config.index,
            IndexBackend::Local {
                dir: PathBuf::from("/tmp/epic_db")
            }
        );
        assert!(config_from(&[("GOOGLE_API_KEY", "abc")]).unwrap().with_top_k(0).is_err());
    }
}
