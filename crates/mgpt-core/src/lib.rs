//! Core traits and types for Mahabharat GPT
//!
//! This crate defines the chat data model shared by every other crate, the
//! error type, and the capability-facing interfaces for the generator, the
//! embedding model and the passage index. Keeping these here lets the query
//! handler be exercised against fakes.

pub mod chat;
pub mod error;
pub mod llm;
pub mod retriever;


pub use chat::{ChatTurn, Conversation, Role};
pub use error::{Error, Result};
pub use llm::{ChatModel, ChatRequest, GenerationConfig, GenerationResult};
pub use retriever::{Embedder, RetrievedPassage, Retriever, VectorIndex};
