//! Process-wide retriever/generator pair

use std::sync::Arc;
use tracing::{info, warn};

use crate::config::AppConfig;
use mgpt_core::{ChatModel, Error, Result, Retriever};
use mgpt_gemini::GeminiClient;
use mgpt_rag::open_retriever;

/// Outcome of opening the index at startup
#[derive(Clone)]
pub enum IndexStatus {
    Ready(Arc<dyn Retriever>),
    Unavailable(String),
}

/// Handles built once per process and shared read-only by every session
pub struct Engine {
    index: IndexStatus,
    generator: Arc<dyn ChatModel>,
    top_k: usize,
}

impl Engine {
    pub fn new(index: IndexStatus, generator: Arc<dyn ChatModel>, top_k: usize) -> Self {
        Self {
            index,
            generator,
            top_k,
        }
    }

    /// Build the Gemini client and open the index.
    ///
    /// A missing index does not fail startup: it is recorded and every query
    /// is refused with `Error::IndexUnavailable`.
    pub async fn start(config: &AppConfig) -> Result<Self> {
        let client = Arc::new(GeminiClient::new(config.gemini.clone())?);

        let index = match open_retriever(&config.index, client.clone()).await {
            Ok(retriever) => {
                info!(location = %retriever.location(), "Index ready");
                IndexStatus::Ready(retriever)
            }
            Err(e) => {
                warn!(error = %e, "Index unavailable");
                let reason = match e {
                    Error::IndexUnavailable(reason) => reason,
                    other => other.to_string(),
                };
                IndexStatus::Unavailable(reason)
            }
        };

        Ok(Self::new(index, client, config.top_k))
    }

    pub fn index_status(&self) -> &IndexStatus {
        &self.index
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.index, IndexStatus::Ready(_))
    }

    /// The retriever, or the cached reason it could not be opened
    pub fn retriever(&self) -> Result<&Arc<dyn Retriever>> {
        match &self.index {
            IndexStatus::Ready(retriever) => Ok(retriever),
            IndexStatus::Unavailable(reason) => Err(Error::IndexUnavailable(reason.clone())),
        }
    }

    pub fn generator(&self) -> &Arc<dyn ChatModel> {
        &self.generator
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }
}
