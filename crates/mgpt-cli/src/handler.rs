//! Retrieve-then-generate query handling

use std::sync::Arc;
use tracing::{debug, info_span, warn, Instrument};

use crate::engine::Engine;
use crate::prompt::{build_system_instruction, ScriptDetector};
use crate::session::ChatSession;
use mgpt_core::{ChatRequest, Error, Result, Retriever};
use mgpt_rag::build_context;

/// Answers one query at a time against the shared engine
pub struct ChatHandler {
    engine: Arc<Engine>,
    detector: ScriptDetector,
}

impl ChatHandler {
    pub fn new(engine: Arc<Engine>) -> Self {
        Self {
            engine,
            detector: ScriptDetector::new(),
        }
    }

    pub fn engine(&self) -> &Arc<Engine> {
        &self.engine
    }

    /// Answer `query` and record both turns in `session`.
    ///
    /// The query is trimmed before use: surrounding whitespace is neither
    /// stored in the user turn nor sent to the retriever or the generator.
    /// Nothing is recorded when the index is unavailable or the query is
    /// blank. If retrieval or generation fails the user turn is removed
    /// again and the error is returned.
    pub async fn handle(&self, session: &mut ChatSession, query: &str) -> Result<String> {
        let retriever = self.engine.retriever()?;

        let query = query.trim();
        if query.is_empty() {
            return Err(Error::InvalidInput("Query is empty".to_string()));
        }

        let span = info_span!("query", session = %session.id(), turns = session.turns().len());

        session.push_user(query);
        match self.answer(retriever, session, query).instrument(span).await {
            Ok(reply) => {
                session.push_assistant(&reply);
                Ok(reply)
            }
            Err(e) => {
                session.rollback_user_turn();
                warn!(session = %session.id(), error = %e, "Query failed, user turn rolled back");
                Err(e)
            }
        }
    }

    /// Answer a single question in a fresh session that is then discarded
    pub async fn answer_once(&self, query: &str) -> Result<String> {
        let mut session = ChatSession::started();
        self.handle(&mut session, query).await
    }

    async fn answer(
        &self,
        retriever: &Arc<dyn Retriever>,
        session: &ChatSession,
        query: &str,
    ) -> Result<String> {
        let passages = retriever.retrieve(query, self.engine.top_k()).await?;
        debug!(passages = passages.len(), "Context retrieved");

        let context = build_context(&passages);
        let script = self.detector.detect(query);
        let instruction = build_system_instruction(&context, script);

        let request = ChatRequest::new(instruction, session.turns());
        let result = self.engine.generator().generate(&request).await?;

        if result.text.trim().is_empty() {
            return Err(Error::LLMProvider("Generator returned an empty reply".to_string()));
        }
        Ok(result.text)
    }
}
