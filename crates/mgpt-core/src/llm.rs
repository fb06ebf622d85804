//! Generator trait and types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{ChatTurn, Result};

/// Configuration for text generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub model_id: String,
    pub temperature: Option<f32>,
    pub timeout: Duration,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model_id: "gemini-1.5-pro".to_string(),
            temperature: Some(0.4),
            timeout: Duration::from_secs(60),
        }
    }
}

/// A single ordered generation request: one system instruction followed by
/// the conversation so far.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub system_instruction: String,
    pub turns: &'a [ChatTurn],
}

impl<'a> ChatRequest<'a> {
    pub fn new(system_instruction: impl Into<String>, turns: &'a [ChatTurn]) -> Self {
        Self {
            system_instruction: system_instruction.into(),
            turns,
        }
    }
}

/// Result of a text generation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    pub text: String,
    pub model_id: String,
    pub tokens_used: Option<u32>,
    pub finish_reason: Option<String>,
}

/// Trait for hosted chat models
///
/// The whole request is sent at once and the full reply is returned; there
/// is no streaming.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Generate a reply using the model's default configuration
    async fn generate(&self, request: &ChatRequest<'_>) -> Result<GenerationResult>;

    /// Generate a reply with custom configuration
    async fn generate_with_config(
        &self,
        request: &ChatRequest<'_>,
        config: &GenerationConfig,
    ) -> Result<GenerationResult>;

    /// Get the model ID being used
    fn model_id(&self) -> &str;
}
