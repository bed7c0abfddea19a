//! Comparison workflow: LLM -> web search -> LLM
//!
//! Steps run strictly one after another. Any step's error aborts the run
//! and is returned as is; there is no partial result.

use crate::context::aggregate_search_context;
use crate::llm_client::ChatCompletionsClient;
use crate::prompts::{
    comparison_messages, render_prompt, render_user_prompt, search_query_messages,
};
use crate::search_client::TavilySearchClient;
use comparo_core::{
    log_operation_error, log_operation_start, log_operation_success, performance,
    validation_error, ComparisonRequest, ComparisonResult, ComparoConfig, ComparoResult,
    CompletionProvider, Credentials, SearchProvider, SearchResult,
};
use tracing::{debug, info};

/// Sampling and search parameters for one workflow instance
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowSettings {
    pub query_temperature: f32,
    pub report_temperature: f32,
    pub max_results: usize,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            query_temperature: 0.0,
            report_temperature: 0.4,
            max_results: 5,
        }
    }
}

impl WorkflowSettings {
    /// Query generation runs at temperature 0.0; the report runs strictly above it
    pub fn validate(&self) -> ComparoResult<()> {
        if self.query_temperature != 0.0 {
            return Err(validation_error!(
                format!(
                    "query_temperature must be 0.0, got {}",
                    self.query_temperature
                ),
                "query_temperature",
                "workflow"
            ));
        }

        if self.report_temperature <= self.query_temperature {
            return Err(validation_error!(
                format!(
                    "report_temperature must be above query_temperature, got {}",
                    self.report_temperature
                ),
                "report_temperature",
                "workflow"
            ));
        }

        if self.max_results == 0 {
            return Err(validation_error!(
                "max_results must be greater than 0",
                "max_results",
                "workflow"
            ));
        }

        Ok(())
    }
}

impl From<&ComparoConfig> for WorkflowSettings {
    fn from(config: &ComparoConfig) -> Self {
        Self {
            query_temperature: config.llm.query_temperature,
            report_temperature: config.llm.report_temperature,
            max_results: config.search.max_results,
        }
    }
}

/// Compares options using a completion provider and a search provider
pub struct ComparisonWorkflow {
    llm: Box<dyn CompletionProvider>,
    search: Box<dyn SearchProvider>,
    settings: WorkflowSettings,
}

impl ComparisonWorkflow {
    pub fn new(
        llm: Box<dyn CompletionProvider>,
        search: Box<dyn SearchProvider>,
        settings: WorkflowSettings,
    ) -> Self {
        Self {
            llm,
            search,
            settings,
        }
    }

    /// Wire the HTTP-backed providers from validated configuration
    pub fn from_config(config: &ComparoConfig, credentials: &Credentials) -> ComparoResult<Self> {
        let settings = WorkflowSettings::from(config);
        settings.validate()?;

        let llm = ChatCompletionsClient::new(&config.llm, credentials, &config.http)?;
        let search = TavilySearchClient::new(&config.search, credentials, &config.http)?;

        Ok(Self::new(
            Box::new(llm),
            Box::new(search),
            settings,
        ))
    }

    pub fn settings(&self) -> &WorkflowSettings {
        &self.settings
    }

    /// Generate a concise web search query from the rendered comparison request
    pub async fn generate_search_query(&self, user_query: &str) -> ComparoResult<String> {
        let messages = search_query_messages(user_query);

        let response = self
            .llm
            .complete(messages, self.settings.query_temperature)
            .await?;

        Ok(response.trim().to_string())
    }

    /// Perform the web search with the configured result cap
    pub async fn perform_web_search(&self, search_query: &str) -> ComparoResult<Vec<SearchResult>> {
        self.search
            .search(search_query, self.settings.max_results)
            .await
    }

    /// Aggregate web search results into textual context
    pub fn aggregate_search_context(&self, search_results: &[SearchResult]) -> String {
        aggregate_search_context(search_results)
    }

    /// Generate the comparison report from the original request and search context
    pub async fn generate_comparison_report(
        &self,
        user_query: &str,
        search_context: &str,
    ) -> ComparoResult<String> {
        let messages = comparison_messages(user_query, search_context);

        let response = self
            .llm
            .complete(messages, self.settings.report_temperature)
            .await?;

        Ok(response.trim().to_string())
    }

    /// Run the full pipeline for raw options and constraints.
    ///
    /// Callers are expected to have checked that at least two options are given.
    pub async fn run(
        &self,
        options: &[String],
        constraints: Option<&[String]>,
    ) -> ComparoResult<ComparisonResult> {
        let user_prompt = render_prompt(options, constraints);
        self.run_prompt(user_prompt).await
    }

    /// Run the full pipeline for a validated request
    pub async fn run_request(&self, request: &ComparisonRequest) -> ComparoResult<ComparisonResult> {
        self.run_prompt(render_user_prompt(request)).await
    }

    async fn run_prompt(&self, user_prompt: String) -> ComparoResult<ComparisonResult> {
        log_operation_start!("comparison", prompt_chars = user_prompt.len());

        let result = self.execute(user_prompt).await;

        match &result {
            Ok(result) => {
                log_operation_success!(
                    "comparison",
                    search_query = %result.search_query,
                    report_chars = result.comparison_report.len()
                );
            }
            Err(e) => {
                log_operation_error!("comparison", e);
            }
        }

        result
    }

    async fn execute(&self, user_prompt: String) -> ComparoResult<ComparisonResult> {
        let search_query = performance::measure_async(
            "generate_search_query",
            self.generate_search_query(&user_prompt),
        )
        .await?;
        info!(search_query = %search_query, "Generated search query");

        let search_results =
            performance::measure_async("web_search", self.perform_web_search(&search_query))
                .await?;
        info!(results = search_results.len(), "Web search completed");

        let search_context = self.aggregate_search_context(&search_results);
        debug!(context_chars = search_context.len(), "Aggregated search context");

        let comparison_report = performance::measure_async(
            "generate_comparison_report",
            self.generate_comparison_report(&user_prompt, &search_context),
        )
        .await?;

        Ok(ComparisonResult {
            original_query: user_prompt,
            search_query,
            search_context,
            comparison_report,
        })
    }
}
