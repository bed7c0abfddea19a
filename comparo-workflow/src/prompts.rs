//! Prompt templates for the comparison workflow
//!
//! The user prompt is built directly from a [`ComparisonRequest`]; the two
//! model exchanges (query generation and report generation) are fixed
//! system + user message pairs.

use comparo_core::{ChatMessage, ComparisonRequest};

pub const SEARCH_QUERY_SYSTEM_PROMPT: &str = "You generate concise, effective web search queries. Return ONLY a SINGLE search query, no explanations.";

const SEARCH_QUERY_USER_PROMPT: &str = r#"You are generating a web search query for an information retrieval system.

First analyse the user query to find essential keywords to answer it.
Once you have analyzed it, produce:
- ONE concise web search query
- Maximum 8-12 words
- Include only essential keywords
- No explanations, no punctuation beyond spaces
- Do not include questions or full sentences

User query:
{user_query}

Output:"#;

pub const COMPARISON_SYSTEM_PROMPT: &str = r#"You are an expert assistant helping users to choose between multiple options by providing detailed explanations and reasoning for every option.
Although you are knowledgeable in various topics, some information from the web relevant to the user query is also provided to help you give a better comparison.
Use the web context provided along with your own understanding of the topic to answer the user query."#;

const COMPARISON_USER_PROMPT: &str = r#"Original comparison request: {user_query}

Web search context:
{search_context}"#;

const PROMPT_INTRO: &str = "Compare the following options in a clear and neutral way.";

const CONSTRAINTS_HEADER: &str = "Restrict the comparison to the following dimensions only:";

const PROMPT_INSTRUCTIONS: &str = r#"Instructions:
- Compare options only along the specified dimensions if provided
- Otherwise, choose relevant comparison dimensions
- Explain key differences and trade-offs
- Use clear section headings by dimension
- Cover all options consistently
- Keep corresponding dimension in same units

Output:
1. Detailed comparison by specified dimension
2. Final summary MUST include:
    - Aggregated pros and cons.
    - A concise comparison table containing essential attributes.

Formatting guidelines:
- Do NOT use markdown emphasis such as **bold**, italics, or inline styling
- Use clear section titles on their own lines (no special characters)
- Use bullet points only for lists
- Keep formatting simple and readable

Restrictions:
- Do not recommend a final option"#;

/// Render the user prompt for a validated request
pub fn render_user_prompt(request: &ComparisonRequest) -> String {
    render_prompt(request.options(), request.constraints())
}

/// Render the user prompt from raw options and constraints.
///
/// Options are numbered from 1. The constraints section is emitted only
/// when at least one constraint is given.
pub fn render_prompt(options: &[String], constraints: Option<&[String]>) -> String {
    let mut prompt = String::new();

    prompt.push_str(PROMPT_INTRO);
    prompt.push_str("\n\n<options>\n");
    for (i, option) in options.iter().enumerate() {
        prompt.push_str(&format!("{}. {}\n", i + 1, option));
    }
    prompt.push_str("</options>\n\n");

    if let Some(constraints) = constraints.filter(|c| !c.is_empty()) {
        prompt.push_str(CONSTRAINTS_HEADER);
        prompt.push_str("\n<constraints>\n");
        for constraint in constraints {
            prompt.push_str(&format!("- {}\n", constraint));
        }
        prompt.push_str("</constraints>\n\n");
    }

    prompt.push_str(PROMPT_INSTRUCTIONS);
    prompt
}

/// Messages asking the model for a single concise search query
pub fn search_query_messages(user_query: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SEARCH_QUERY_SYSTEM_PROMPT),
        ChatMessage::user(SEARCH_QUERY_USER_PROMPT.replace("{user_query}", user_query)),
    ]
}

/// Messages asking the model for the final comparison report
pub fn comparison_messages(user_query: &str, search_context: &str) -> Vec<ChatMessage> {
    // Substitute the context first so braces inside the prompt are left alone
    let user = COMPARISON_USER_PROMPT
        .replace("{search_context}", search_context)
        .replacen("{user_query}", user_query, 1);

    vec![
        ChatMessage::system(COMPARISON_SYSTEM_PROMPT),
        ChatMessage::user(user),
    ]
}
