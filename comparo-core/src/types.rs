//! Core data type definitions

use crate::error::ComparoResult;
use crate::validation_error;
use serde::{Deserialize, Serialize};

/// Minimum number of options a comparison needs
pub const MIN_OPTIONS: usize = 2;

/// A validated comparison request: the options to compare plus optional
/// dimensions to restrict the comparison to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonRequest {
    options: Vec<String>,
    constraints: Option<Vec<String>>,
}

impl ComparisonRequest {
    /// Build a request, rejecting fewer than two options or blank option names.
    ///
    /// Constraints are trimmed and blank entries dropped; an empty list is
    /// stored as `None` so renderers never see an empty section.
    pub fn new(options: Vec<String>, constraints: Option<Vec<String>>) -> ComparoResult<Self> {
        if options.len() < MIN_OPTIONS {
            return Err(validation_error!(
                format!(
                    "At least {} options are required for comparison, got {}",
                    MIN_OPTIONS,
                    options.len()
                ),
                "options",
                "comparison_request"
            ));
        }

        if let Some(index) = options.iter().position(|o| o.trim().is_empty()) {
            return Err(validation_error!(
                format!("Option {} is empty", index + 1),
                "options",
                "comparison_request"
            ));
        }

        let constraints = constraints
            .map(|list| {
                list.into_iter()
                    .map(|c| c.trim().to_string())
                    .filter(|c| !c.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|list| !list.is_empty());

        Ok(Self {
            options,
            constraints,
        })
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn constraints(&self) -> Option<&[String]> {
        self.constraints.as_deref()
    }
}

/// Split a comma-separated constraints argument, dropping blank entries
pub fn parse_constraints(raw: &str) -> Option<Vec<String>> {
    let constraints: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect();

    if constraints.is_empty() {
        None
    } else {
        Some(constraints)
    }
}

/// One web search hit, in provider relevance order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub url: String,
}

impl SearchResult {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            url: url.into(),
        }
    }
}

/// Output of one pipeline run. All fields are populated together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// The rendered user prompt
    pub original_query: String,
    pub search_query: String,
    pub search_context: String,
    pub comparison_report: String,
}

/// Role of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// A role-tagged message sent to a completion provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ComparoError;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_request_requires_two_options() {
        let err = ComparisonRequest::new(strings(&["Rust"]), None).unwrap_err();
        match err {
            ComparoError::Validation { field, message, .. } => {
                assert_eq!(field.as_deref(), Some("options"));
                assert!(message.contains("At least 2 options"));
            }
            other => panic!("Expected Validation error, got {:?}", other),
        }

        assert!(ComparisonRequest::new(Vec::new(), None).is_err());
    }

    #[test]
    fn test_request_rejects_blank_option() {
        let err = ComparisonRequest::new(strings(&["Rust", "  "]), None).unwrap_err();
        assert!(err.to_string().contains("Option 2 is empty"));
    }

    #[test]
    fn test_request_normalizes_constraints() {
        let request = ComparisonRequest::new(
            strings(&["React", "Vue.js"]),
            Some(strings(&[" Performance ", "", "Learning curve"])),
        )
        .unwrap();
        assert_eq!(
            request.constraints(),
            Some(&strings(&["Performance", "Learning curve"])[..])
        );

        let request =
            ComparisonRequest::new(strings(&["React", "Vue.js"]), Some(strings(&[" "]))).unwrap();
        assert!(request.constraints().is_none());
    }

    #[test]
    fn test_parse_constraints() {
        assert_eq!(
            parse_constraints("Cost, Features,,  Support "),
            Some(strings(&["Cost", "Features", "Support"]))
        );
        assert_eq!(parse_constraints(" , ,"), None);
        assert_eq!(parse_constraints(""), None);
    }

    #[test]
    fn test_search_result_missing_fields_default_to_empty() {
        let result: SearchResult = serde_json::from_str(r#"{"title": "A"}"#).unwrap();
        assert_eq!(result, SearchResult::new("A", "", ""));
    }

    #[test]
    fn test_chat_role_serializes_lowercase() {
        let json = serde_json::to_value(ChatMessage::system("hi")).unwrap();
        assert_eq!(json["role"], "system");
        assert_eq!(json["content"], "hi");
    }
}
