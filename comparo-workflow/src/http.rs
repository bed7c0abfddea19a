//! Shared HTTP plumbing for the upstream providers

use comparo_core::{ComparoError, ComparoResult, ErrorContext, HttpConfig};

/// Which upstream service a request was addressed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Upstream {
    Llm,
    Search,
}

/// Create an HTTP client with the configured timeout and user agent
pub(crate) fn create_http_client(config: &HttpConfig) -> ComparoResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(config.timeout_seconds))
        .user_agent(config.user_agent.as_str())
        .build()
        .map_err(|e| ComparoError::Internal {
            message: format!("Failed to create HTTP client: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("http_client").with_operation("create_client"),
        })
}

/// Map a transport failure (connect, timeout, TLS) to a network error
pub(crate) fn transport_error(error: reqwest::Error, operation: &str) -> ComparoError {
    let suggestion = if error.is_timeout() {
        "Increase http.timeout_seconds or retry later"
    } else {
        "Check network connectivity and API status"
    };

    ComparoError::Network {
        message: format!("Request failed during {}: {}", operation, error),
        source: Some(Box::new(error)),
        context: ErrorContext::new("http_client")
            .with_operation(operation)
            .with_suggestion(suggestion),
    }
}

/// Turn a non-success HTTP response into an upstream error
pub(crate) async fn handle_response_error(
    response: reqwest::Response,
    upstream: Upstream,
    operation: &str,
) -> ComparoError {
    let status = response.status();
    let url = response.url().clone();

    let error_body = response.text().await.unwrap_or_default();

    let message = format!(
        "HTTP {} error for {}: {}",
        status.as_u16(),
        url,
        if error_body.is_empty() {
            status.canonical_reason().unwrap_or("Unknown error")
        } else {
            error_body.trim()
        }
    );

    let context = ErrorContext::new(match upstream {
        Upstream::Llm => "llm_client",
        Upstream::Search => "search_client",
    })
    .with_operation(operation)
    .with_metadata("status", &status.as_u16().to_string())
    .with_suggestion(match status.as_u16() {
        401 => "Check your API key",
        403 => "Check account permissions for this API",
        404 => "Check the endpoint URL and model identifier",
        429 => "Rate limit reached; wait before running again",
        _ => "Check network connectivity and API status",
    });

    match upstream {
        Upstream::Llm => ComparoError::Llm {
            message,
            provider: None,
            model: None,
            context,
        },
        Upstream::Search => ComparoError::Search {
            message,
            source: None,
            context,
        },
    }
}
