//! Flattening of web search results into the text context sent to the model

use comparo_core::SearchResult;

/// Format results as numbered source blocks separated by a blank line.
///
/// Each block is `Source <i>: <title>\n<content>\nURL: <url>\n` with `i`
/// starting at 1. Content is passed through untouched.
pub fn aggregate_search_context(results: &[SearchResult]) -> String {
    results
        .iter()
        .enumerate()
        .map(|(i, result)| {
            format!(
                "Source {}: {}\n{}\nURL: {}\n",
                i + 1,
                result.title,
                result.content,
                result.url
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
