//! Tavily web search client

use crate::http::{create_http_client, handle_response_error, transport_error, Upstream};
use async_trait::async_trait;
use comparo_core::{
    search_error, ComparoResult, Credentials, HttpConfig, SearchConfig, SearchProvider,
    SearchResult,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Search provider backed by the Tavily search API
pub struct TavilySearchClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    search_depth: String,
}

#[derive(Debug, Serialize)]
struct TavilySearchRequest<'a> {
    query: &'a str,
    search_depth: &'a str,
    max_results: usize,
}

#[derive(Debug, Deserialize)]
struct TavilySearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

impl TavilySearchClient {
    pub fn new(
        config: &SearchConfig,
        credentials: &Credentials,
        http: &HttpConfig,
    ) -> ComparoResult<Self> {
        let client = create_http_client(http)?;

        info!(
            "Created search client for {} (depth: {})",
            config.base_url, config.search_depth
        );

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: credentials.tavily_api_key.clone(),
            search_depth: config.search_depth.clone(),
        })
    }

    fn search_url(&self) -> String {
        format!("{}/search", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl SearchProvider for TavilySearchClient {
    async fn search(&self, query: &str, max_results: usize) -> ComparoResult<Vec<SearchResult>> {
        debug!("Searching for '{}' (max {} results)", query, max_results);

        let request = TavilySearchRequest {
            query,
            search_depth: &self.search_depth,
            max_results,
        };

        let response = self
            .client
            .post(self.search_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error(e, "web_search"))?;

        if !response.status().is_success() {
            return Err(handle_response_error(response, Upstream::Search, "web_search").await);
        }

        let body: TavilySearchResponse = response
            .json()
            .await
            .map_err(|e| {
                search_error!(
                    format!("Failed to decode search response: {}", e),
                    "search_client",
                    e
                )
            })?;

        info!("Search returned {} results", body.results.len());

        Ok(body.results)
    }
}
