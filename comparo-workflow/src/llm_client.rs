//! Chat-completions client for OpenAI-compatible endpoints
//!
//! Both supported providers (OpenAI and the Hugging Face router) speak the
//! same `POST {base_url}/chat/completions` protocol, so one client covers
//! them; only the endpoint root and the API key differ.

use crate::http::{create_http_client, handle_response_error, transport_error, Upstream};
use async_trait::async_trait;
use comparo_core::{
    llm_error, ChatMessage, ComparoError, ComparoResult, CompletionProvider,
    Credentials, HttpConfig, LlmConfig, ModelEndpoint,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

/// Completion provider backed by a chat-completions HTTP API
pub struct ChatCompletionsClient {
    client: reqwest::Client,
    endpoint: ModelEndpoint,
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl ChatCompletionsClient {
    /// Create a client for the model named in `config`
    pub fn new(
        config: &LlmConfig,
        credentials: &Credentials,
        http: &HttpConfig,
    ) -> ComparoResult<Self> {
        let endpoint = config.resolve(credentials)?;
        let client = create_http_client(http)?;

        info!(
            "Created LLM client for provider: {} with model: {}",
            endpoint.provider.as_str(),
            endpoint.model
        );

        Ok(Self {
            client,
            endpoint,
            max_tokens: config.max_tokens,
        })
    }

    pub fn endpoint(&self) -> &ModelEndpoint {
        &self.endpoint
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.endpoint.base_url.trim_end_matches('/')
        )
    }

    /// Attach provider and model to an LLM error built without them
    fn tag(&self, error: ComparoError) -> ComparoError {
        match error {
            ComparoError::Llm {
                message, context, ..
            } => ComparoError::Llm {
                message,
                provider: Some(self.endpoint.provider.as_str().to_string()),
                model: Some(self.endpoint.model.clone()),
                context,
            },
            other => other,
        }
    }
}

/// Pull the first choice's text out of a decoded response
fn extract_content(response: ChatCompletionResponse) -> ComparoResult<String> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| llm_error!("LLM response contained no choices", "llm_client"))?;

    choice
        .message
        .content
        .ok_or_else(|| llm_error!("No text content in LLM response", "llm_client"))
}

#[async_trait]
impl CompletionProvider for ChatCompletionsClient {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        temperature: f32,
    ) -> ComparoResult<String> {
        let start_time = Instant::now();

        debug!(
            "Sending {} messages to {} (temperature {})",
            messages.len(),
            self.endpoint.model,
            temperature
        );

        let request = ChatRequest {
            model: &self.endpoint.model,
            messages: &messages,
            temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.endpoint.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error(e, "chat_completion"))?;

        if !response.status().is_success() {
            let error = handle_response_error(response, Upstream::Llm, "chat_completion").await;
            return Err(self.tag(error));
        }

        let body: ChatCompletionResponse = response.json().await.map_err(|e| {
            self.tag(llm_error!(
                format!("Failed to decode LLM response: {}", e),
                "llm_client"
            ))
        })?;

        let content = extract_content(body).map_err(|e| self.tag(e))?;

        info!(
            "Generated response in {:?} ({} chars)",
            start_time.elapsed(),
            content.len()
        );

        Ok(content)
    }
}
