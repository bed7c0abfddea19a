//! Comparo Workflow - compare options with an LLM grounded by web search
//!
//! The pipeline renders the user's request into a prompt, asks the model for
//! a search query, searches the web, flattens the hits into numbered sources
//! and asks the model again for the final report.

pub mod context;
mod http;
pub mod llm_client;
pub mod prompts;
pub mod search_client;
pub mod workflow;

pub use context::aggregate_search_context;
pub use llm_client::ChatCompletionsClient;
pub use prompts::{comparison_messages, render_prompt, render_user_prompt, search_query_messages};
pub use search_client::TavilySearchClient;
pub use workflow::{ComparisonWorkflow, WorkflowSettings};

// Re-export the core types callers need alongside the workflow
pub use comparo_core::{
    ComparisonRequest, ComparisonResult, CompletionProvider, SearchProvider, SearchResult,
};
