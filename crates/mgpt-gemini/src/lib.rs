//! Google Gemini integration for Mahabharat GPT
//!
//! This crate provides the Gemini implementation of the `ChatModel` and
//! `Embedder` traits over the public REST API.

mod client;
mod config;


pub use client::GeminiClient;
pub use config::{
    GeminiConfig, DEFAULT_API_URL, DEFAULT_CHAT_MODEL, DEFAULT_EMBEDDING_MODEL,
    DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT_SECS,
};

// Re-export core types for convenience
pub use mgpt_core::{ChatModel, ChatRequest, Embedder, Error, GenerationConfig, GenerationResult, Result};
