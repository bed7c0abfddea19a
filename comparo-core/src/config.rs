//! Configuration management
//!
//! Non-secret settings live in an optional TOML file; API keys are read from
//! the process environment once at startup.

use crate::config_error;
use crate::error::{ComparoError, ComparoResult, ErrorContext};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const HUGGINGFACE_API_KEY: &str = "HUGGINGFACE_API_KEY";
pub const TAVILY_API_KEY: &str = "TAVILY_API_KEY";

/// Every credential that must be present before the pipeline starts
pub const REQUIRED_KEYS: [&str; 3] = [OPENAI_API_KEY, HUGGINGFACE_API_KEY, TAVILY_API_KEY];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparoConfig {
    pub llm: LlmConfig,
    pub search: SearchConfig,
    pub http: HttpConfig,
}

/// Language-model settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// `provider:model`, e.g. `openai:gpt-4o-mini`
    pub model: String,
    /// Overrides the provider's default endpoint
    pub base_url: Option<String>,
    pub query_temperature: f32,
    pub report_temperature: f32,
    pub max_tokens: Option<u32>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "huggingface:mistralai/Mistral-7B-Instruct-v0.2".to_string(),
            base_url: None,
            query_temperature: 0.0,
            report_temperature: 0.4,
            max_tokens: None,
        }
    }
}

/// Web search settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub base_url: String,
    pub search_depth: String,
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.tavily.com".to_string(),
            search_depth: "advanced".to_string(),
            max_results: 5,
        }
    }
}

/// Shared HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 120,
            user_agent: format!("comparo/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ComparoConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> ComparoResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ComparoError::Config {
            message: format!("Failed to read config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("read_file")
                .with_suggestion("Check if the config file exists and is readable"),
        })?;

        let config: ComparoConfig = toml::from_str(&content).map_err(|e| ComparoError::Config {
            message: format!("Failed to parse config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("parse_toml")
                .with_suggestion("Check TOML syntax in config file"),
        })?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> ComparoResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ComparoError::Config {
            message: format!("Failed to serialize config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config").with_operation("serialize_toml"),
        })?;

        std::fs::write(path, content).map_err(|e| ComparoError::Config {
            message: format!("Failed to write config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("write_file")
                .with_suggestion("Check if the directory exists and is writable"),
        })?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> ComparoResult<()> {
        if self.llm.model.trim().is_empty() {
            return Err(invalid(
                "llm.model must not be empty",
                "Set llm.model, e.g. \"openai:gpt-4o-mini\"",
            ));
        }

        for (name, value) in [
            ("llm.query_temperature", self.llm.query_temperature),
            ("llm.report_temperature", self.llm.report_temperature),
        ] {
            if !(0.0..=2.0).contains(&value) {
                return Err(invalid(
                    &format!("{} must be between 0.0 and 2.0, got {}", name, value),
                    "Use a sampling temperature in the range 0.0 to 2.0",
                ));
            }
        }

        if self.llm.query_temperature != 0.0 {
            return Err(invalid(
                &format!(
                    "llm.query_temperature must be 0.0, got {}",
                    self.llm.query_temperature
                ),
                "Search query generation is deterministic; set llm.query_temperature = 0.0",
            ));
        }

        if self.llm.report_temperature <= self.llm.query_temperature {
            return Err(invalid(
                &format!(
                    "llm.report_temperature must be above llm.query_temperature, got {}",
                    self.llm.report_temperature
                ),
                "Use a non-zero report temperature such as 0.4",
            ));
        }

        if self.search.max_results == 0 {
            return Err(invalid(
                "search.max_results must be greater than 0",
                "Set search.max_results to a positive value",
            ));
        }

        if self.http.timeout_seconds == 0 {
            return Err(invalid(
                "http.timeout_seconds must be greater than 0",
                "Set http.timeout_seconds to a positive value",
            ));
        }

        Ok(())
    }
}

fn invalid(message: &str, suggestion: &str) -> ComparoError {
    ComparoError::Config {
        message: message.to_string(),
        source: None,
        context: ErrorContext::new("config")
            .with_operation("validate")
            .with_suggestion(suggestion),
    }
}

/// Model provider named by the prefix of a model identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelProvider {
    OpenAi,
    HuggingFace,
}

impl ModelProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::HuggingFace => "huggingface",
        }
    }

    /// OpenAI-compatible endpoint root for this provider
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::OpenAi => "https://api.openai.com/v1",
            Self::HuggingFace => "https://router.huggingface.co/v1",
        }
    }

    fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "openai" => Some(Self::OpenAi),
            "huggingface" | "hf" => Some(Self::HuggingFace),
            _ => None,
        }
    }
}

/// Fully resolved target for completion requests
#[derive(Clone)]
pub struct ModelEndpoint {
    pub provider: ModelProvider,
    pub model: String,
    pub base_url: String,
    pub api_key: String,
}

impl fmt::Debug for ModelEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelEndpoint")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl LlmConfig {
    /// Split the `provider:model` identifier and pick the matching key and endpoint
    pub fn resolve(&self, credentials: &Credentials) -> ComparoResult<ModelEndpoint> {
        let (provider, model) = match self.model.split_once(':') {
            Some((prefix, model)) => {
                let provider = ModelProvider::parse(prefix).ok_or_else(|| ComparoError::Config {
                    message: format!("Unsupported LLM provider: {}", prefix),
                    source: None,
                    context: ErrorContext::new("config")
                        .with_operation("resolve_model")
                        .with_suggestion("Supported providers: openai, huggingface"),
                })?;
                (provider, model.trim())
            }
            None => (ModelProvider::OpenAi, self.model.trim()),
        };

        if model.is_empty() {
            return Err(config_error!(
                format!("Model identifier '{}' has no model name", self.model),
                "config"
            ));
        }

        let api_key = match provider {
            ModelProvider::OpenAi => credentials.openai_api_key.clone(),
            ModelProvider::HuggingFace => credentials.huggingface_api_key.clone(),
        };

        Ok(ModelEndpoint {
            provider,
            model: model.to_string(),
            base_url: self
                .base_url
                .clone()
                .unwrap_or_else(|| provider.default_base_url().to_string()),
            api_key,
        })
    }
}

/// API keys for the upstream services
#[derive(Clone)]
pub struct Credentials {
    pub openai_api_key: String,
    pub huggingface_api_key: String,
    pub tavily_api_key: String,
}

impl Credentials {
    /// Read every required key from the process environment
    pub fn from_env() -> ComparoResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read every required key through `lookup`, reporting all missing keys at once
    pub fn from_lookup<F>(lookup: F) -> ComparoResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let fetch = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let missing: Vec<&str> = REQUIRED_KEYS
            .iter()
            .copied()
            .filter(|key| fetch(*key).is_none())
            .collect();

        if !missing.is_empty() {
            return Err(ComparoError::Config {
                message: format!(
                    "Missing required environment variables: {}",
                    missing.join(", ")
                ),
                source: None,
                context: ErrorContext::new("credentials")
                    .with_operation("from_env")
                    .with_suggestion("Set these in your environment or create a .env file"),
            });
        }

        Ok(Self {
            openai_api_key: fetch(OPENAI_API_KEY).unwrap_or_default(),
            huggingface_api_key: fetch(HUGGINGFACE_API_KEY).unwrap_or_default(),
            tavily_api_key: fetch(TAVILY_API_KEY).unwrap_or_default(),
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("openai_api_key", &"<redacted>")
            .field("huggingface_api_key", &"<redacted>")
            .field("tavily_api_key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn credentials() -> Credentials {
        Credentials {
            openai_api_key: "sk-openai".to_string(),
            huggingface_api_key: "hf-key".to_string(),
            tavily_api_key: "tvly-key".to_string(),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = ComparoConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.llm.query_temperature, 0.0);
        assert_eq!(config.llm.report_temperature, 0.4);
        assert_eq!(config.search.max_results, 5);
        assert_eq!(config.search.search_depth, "advanced");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ComparoConfig::default();
        config.search.max_results = 0;
        assert!(config.validate().is_err());

        let mut config = ComparoConfig::default();
        config.llm.report_temperature = 3.0;
        assert!(config.validate().is_err());

        let mut config = ComparoConfig::default();
        config.llm.query_temperature = 0.9;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_requires_report_temperature_above_query() {
        let mut config = ComparoConfig::default();
        config.llm.report_temperature = 0.0;
        let err = config.validate().unwrap_err();
        assert!(err
            .to_string()
            .contains("llm.report_temperature must be above llm.query_temperature"));

        let mut config = ComparoConfig::default();
        config.llm.query_temperature = 0.7;
        config.llm.report_temperature = 0.7;
        assert!(config.validate().is_err());

        let mut config = ComparoConfig::default();
        config.llm.query_temperature = 0.2;
        config.llm.report_temperature = 0.9;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("llm.query_temperature must be 0.0"));
    }

    #[test]
    fn test_resolve_huggingface_model() {
        let endpoint = LlmConfig::default().resolve(&credentials()).unwrap();
        assert_eq!(endpoint.provider, ModelProvider::HuggingFace);
        assert_eq!(endpoint.model, "mistralai/Mistral-7B-Instruct-v0.2");
        assert_eq!(endpoint.base_url, "https://router.huggingface.co/v1");
        assert_eq!(endpoint.api_key, "hf-key");
    }

    #[test]
    fn test_resolve_unprefixed_model_uses_openai() {
        let config = LlmConfig {
            model: "gpt-4o-mini".to_string(),
            base_url: Some("http://localhost:8080/v1".to_string()),
            ..Default::default()
        };
        let endpoint = config.resolve(&credentials()).unwrap();
        assert_eq!(endpoint.provider, ModelProvider::OpenAi);
        assert_eq!(endpoint.base_url, "http://localhost:8080/v1");
        assert_eq!(endpoint.api_key, "sk-openai");
    }

    #[test]
    fn test_resolve_unknown_provider_fails() {
        let config = LlmConfig {
            model: "mystery:model".to_string(),
            ..Default::default()
        };
        let err = config.resolve(&credentials()).unwrap_err();
        assert!(err.to_string().contains("Unsupported LLM provider: mystery"));
    }

    #[test]
    fn test_credentials_report_all_missing_keys() {
        let mut env = HashMap::new();
        env.insert(OPENAI_API_KEY, "sk".to_string());
        env.insert(TAVILY_API_KEY, "   ".to_string());

        let err = Credentials::from_lookup(|key| env.get(key).cloned()).unwrap_err();
        match &err {
            ComparoError::Config { message, .. } => {
                assert_eq!(
                    message,
                    "Missing required environment variables: HUGGINGFACE_API_KEY, TAVILY_API_KEY"
                );
            }
            other => panic!("Expected Config error, got {:?}", other),
        }
        assert!(!err.suggestions().is_empty());
    }

    #[test]
    fn test_credentials_debug_is_redacted() {
        let creds = Credentials::from_lookup(|key| Some(format!("secret-{}", key))).unwrap();
        assert_eq!(creds.tavily_api_key, "secret-TAVILY_API_KEY");
        assert!(!format!("{:?}", creds).contains("secret"));
    }
}
