//! Core trait definitions

use crate::error::ComparoResult;
use crate::types::{ChatMessage, SearchResult};
use async_trait::async_trait;

/// Language-model completion capability
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Produce a single completion text for the given messages
    async fn complete(&self, messages: Vec<ChatMessage>, temperature: f32)
        -> ComparoResult<String>;
}

/// Web search capability
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Search the web, returning at most `max_results` hits in relevance order
    async fn search(&self, query: &str, max_results: usize) -> ComparoResult<Vec<SearchResult>>;
}
