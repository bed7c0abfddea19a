//! Integration tests for comparo-core infrastructure

use comparo_core::{
    config_error, init_logging, llm_error, performance, search_error, validation_error,
    ComparoConfig, ComparoError, ErrorContext, LogFormat, LoggingConfig,
};

#[tokio::test]
async fn test_error_handling() {
    let error = config_error!("Missing key", "test_component");

    match &error {
        ComparoError::Config {
            message, context, ..
        } => {
            assert_eq!(message, "Missing key");
            assert_eq!(context.component, "test_component");
            assert!(!context.error_id.is_empty());
        }
        _ => panic!("Expected Config error"),
    }

    // Should not panic without a subscriber
    error.log();

    assert!(!error.is_upstream());
    assert!(!error.suggestions().is_empty());

    let validation = validation_error!("Too few options", "options", "test");
    assert!(!validation.is_upstream());

    let llm = llm_error!("Bad gateway", "test", "openai", "gpt-4o-mini");
    match &llm {
        ComparoError::Llm {
            provider, model, ..
        } => {
            assert_eq!(provider.as_deref(), Some("openai"));
            assert_eq!(model.as_deref(), Some("gpt-4o-mini"));
        }
        _ => panic!("Expected Llm error"),
    }
    assert!(llm.is_upstream());

    let search = search_error!("Unauthorized", "test");
    assert!(search.is_upstream());
    assert_eq!(search.to_string(), "Search error: Unauthorized");

    let network = ComparoError::Network {
        message: "Connection refused".to_string(),
        source: None,
        context: ErrorContext::new("test").with_metadata("host", "api.tavily.com"),
    };
    assert!(network.is_upstream());
    assert_eq!(
        network.context().and_then(|c| c.metadata.get("host")).map(String::as_str),
        Some("api.tavily.com")
    );
}

#[test]
fn test_logging_initialization() {
    let config = LoggingConfig {
        format: LogFormat::Json,
        ..LoggingConfig::verbose()
    };

    // The global subscriber can only be installed once per process
    assert!(init_logging(&config).is_ok());
    assert!(init_logging(&config).is_err());

    let bad = LoggingConfig {
        filter_directives: vec!["comparo=verbose".to_string()],
        ..LoggingConfig::default()
    };
    assert!(init_logging(&bad).is_err());
}

#[tokio::test]
async fn test_measure_async_returns_inner_value() {
    let value = performance::measure_async("test_operation", async { 21 * 2 }).await;
    assert_eq!(value, 42);
}

#[test]
fn test_config_roundtrip_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("comparo.toml");

    let mut config = ComparoConfig::default();
    config.llm.model = "openai:gpt-4o-mini".to_string();
    config.search.max_results = 8;
    config.save_to_file(&path).unwrap();

    let loaded = ComparoConfig::from_file(&path).unwrap();
    assert_eq!(loaded.llm.model, "openai:gpt-4o-mini");
    assert_eq!(loaded.search.max_results, 8);
    assert_eq!(loaded.llm.report_temperature, 0.4);
    assert!(loaded.validate().is_ok());
}

#[test]
fn test_partial_config_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("comparo.toml");
    std::fs::write(&path, "[search]\nmax_results = 3\n").unwrap();

    let config = ComparoConfig::from_file(&path).unwrap();
    assert_eq!(config.search.max_results, 3);
    assert_eq!(config.search.search_depth, "advanced");
    assert_eq!(
        config.llm.model,
        "huggingface:mistralai/Mistral-7B-Instruct-v0.2"
    );
}

#[test]
fn test_invalid_config_file_reports_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "[search\nmax_results = ").unwrap();

    let err = ComparoConfig::from_file(&path).unwrap_err();
    assert!(matches!(err, ComparoError::Config { .. }));
    assert!(err.to_string().contains("Failed to parse config"));

    let missing = ComparoConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(missing.to_string().contains("Failed to read config file"));
}
