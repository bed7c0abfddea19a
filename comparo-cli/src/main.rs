//! Comparo CLI - compare options using an LLM and web search
//!
//! Examples:
//!   comparo Python JavaScript
//!   comparo -c "Performance,Learning curve" React Vue.js Angular
//!   comparo --constraints "Cost,Features" "AWS Lambda" "Google Cloud Functions"

use clap::Parser;
use comparo_core::{
    init_logging, parse_constraints, ComparisonRequest, ComparisonResult, ComparoConfig,
    ComparoError, ComparoResult, Credentials, ErrorContext, LoggingConfig,
};
use comparo_workflow::ComparisonWorkflow;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{debug, info};

const BANNER_WIDTH: usize = 60;

#[derive(Parser)]
#[command(name = "comparo")]
#[command(about = "Compare multiple options using LLM and web search")]
#[command(version)]
struct Cli {
    /// Two or more options to compare
    #[arg(required = true, value_name = "OPTION")]
    options: Vec<String>,

    /// Comma-separated list of comparison constraints
    #[arg(short, long)]
    constraints: Option<String>,

    /// Configuration file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the maximum number of search results
    #[arg(long)]
    max_results: Option<usize>,

    /// Print the full result as JSON
    #[arg(long)]
    json: bool,

    /// Also print the aggregated web search context
    #[arg(long)]
    show_context: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        e.log();
        eprintln!("Error running comparison: {}", e);
        for suggestion in e.suggestions() {
            eprintln!("  hint: {}", suggestion);
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> ComparoResult<()> {
    // A local .env may pre-populate the credentials
    let dotenv_path = dotenvy::dotenv().ok();

    let logging_config = if cli.verbose {
        LoggingConfig::verbose()
    } else {
        LoggingConfig::default()
    };

    init_logging(&logging_config).map_err(|e| ComparoError::Config {
        message: format!("Failed to initialize logging: {}", e),
        source: Some(e),
        context: ErrorContext::new("cli")
            .with_operation("init_logging")
            .with_suggestion("Check the RUST_LOG filter syntax"),
    })?;

    info!("Starting comparo v{}", env!("CARGO_PKG_VERSION"));
    if let Some(path) = dotenv_path {
        debug!("Loaded environment from {:?}", path);
    }

    let constraints = cli.constraints.as_deref().and_then(parse_constraints);
    let request = ComparisonRequest::new(cli.options, constraints)?;

    let mut config = load_config(cli.config.as_ref())?;
    if let Some(max_results) = cli.max_results {
        config.search.max_results = max_results;
    }
    config.validate()?;

    let credentials = Credentials::from_env()?;

    let workflow = ComparisonWorkflow::from_config(&config, &credentials)?;
    let result = workflow.run_request(&request).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_report(&mut io::stdout().lock(), &request, &result, cli.show_context).map_err(
            |e| ComparoError::Internal {
                message: format!("Failed to write report: {}", e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("cli").with_operation("print_report"),
            },
        )?;
    }

    Ok(())
}

/// Load configuration from the given path or the first default location found
fn load_config(config_path: Option<&PathBuf>) -> ComparoResult<ComparoConfig> {
    if let Some(path) = config_path {
        info!("Loading configuration from {:?}", path);
        return ComparoConfig::from_file(path);
    }

    let default_paths = [
        dirs::config_dir().map(|d| d.join("comparo").join("config.toml")),
        dirs::home_dir().map(|d| d.join(".comparo").join("config.toml")),
        Some(PathBuf::from("comparo.toml")),
    ];

    for path in default_paths.into_iter().flatten() {
        if path.exists() {
            info!("Loading configuration from {:?}", path);
            return ComparoConfig::from_file(&path);
        }
    }

    debug!("No configuration file found, using defaults");
    Ok(ComparoConfig::default())
}

fn print_report<W: Write>(
    out: &mut W,
    request: &ComparisonRequest,
    result: &ComparisonResult,
    show_context: bool,
) -> io::Result<()> {
    let rule = "=".repeat(BANNER_WIDTH);

    writeln!(out, "{}", rule)?;
    writeln!(out, "COMPARISON WORKFLOW RESULTS")?;
    writeln!(out, "{}", rule)?;
    writeln!(out, "Options: {}", request.options().join(", "))?;
    if let Some(constraints) = request.constraints() {
        writeln!(out, "Constraints: {}", constraints.join(", "))?;
    }
    writeln!(out, "Search Query: {}", result.search_query)?;
    writeln!(out)?;

    if show_context {
        writeln!(out, "{}", rule)?;
        writeln!(out, "WEB SEARCH CONTEXT")?;
        writeln!(out, "{}", rule)?;
        writeln!(out, "{}", result.search_context)?;
    }

    writeln!(out, "{}", rule)?;
    writeln!(out, "COMPARISON REPORT")?;
    writeln!(out, "{}", rule)?;
    writeln!(out, "{}", result.comparison_report)?;

    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_options_and_constraints() {
        let cli = Cli::try_parse_from([
            "comparo",
            "-c",
            "Performance, Learning curve",
            "React",
            "Vue.js",
            "Angular",
        ])
        .unwrap();

        assert_eq!(cli.options, vec!["React", "Vue.js", "Angular"]);
        assert_eq!(
            cli.constraints.as_deref().and_then(parse_constraints),
            Some(vec!["Performance".to_string(), "Learning curve".to_string()])
        );
        assert!(!cli.json);
    }

    #[test]
    fn test_options_are_required() {
        assert!(Cli::try_parse_from(["comparo"]).is_err());
    }

    #[test]
    fn test_single_option_fails_validation() {
        let cli = Cli::try_parse_from(["comparo", "Python"]).unwrap();
        let err = ComparisonRequest::new(cli.options, None).unwrap_err();
        assert!(matches!(err, ComparoError::Validation { .. }));
        assert!(err
            .to_string()
            .contains("At least 2 options are required for comparison"));
    }

    #[test]
    fn test_explicit_missing_config_file_is_an_error() {
        let path = PathBuf::from("/nonexistent/comparo/config.toml");
        assert!(load_config(Some(&path)).is_err());
    }

    fn sample_result() -> ComparisonResult {
        ComparisonResult {
            original_query: "Compare Python and JavaScript".to_string(),
            search_query: "python vs javascript performance".to_string(),
            search_context: "Source 1: Benchmarks\nPython is slower\nURL: https://example.com\n"
                .to_string(),
            comparison_report: "| Dimension | Python | JavaScript |".to_string(),
        }
    }

    fn render(request: &ComparisonRequest, show_context: bool) -> String {
        let mut out = Vec::new();
        print_report(&mut out, request, &sample_result(), show_context).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_report_lists_constraints_when_given() {
        let request = ComparisonRequest::new(
            vec!["Python".to_string(), "JavaScript".to_string()],
            Some(vec!["Performance".to_string(), "Cost".to_string()]),
        )
        .unwrap();

        let output = render(&request, false);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "=".repeat(BANNER_WIDTH));
        assert_eq!(lines[1], "COMPARISON WORKFLOW RESULTS");
        assert_eq!(lines[3], "Options: Python, JavaScript");
        assert_eq!(lines[4], "Constraints: Performance, Cost");
        assert_eq!(lines[5], "Search Query: python vs javascript performance");
        assert!(lines.contains(&"COMPARISON REPORT"));
        assert!(output.ends_with("| Dimension | Python | JavaScript |\n"));
        assert!(!output.contains("WEB SEARCH CONTEXT"));
    }

    #[test]
    fn test_report_omits_constraints_line_without_constraints() {
        let request =
            ComparisonRequest::new(vec!["React".to_string(), "Vue.js".to_string()], None).unwrap();

        let output = render(&request, false);

        assert!(output.contains("Options: React, Vue.js\n"));
        assert!(!output.contains("Constraints:"));
        assert!(output.contains("Search Query: python vs javascript performance\n\n"));
        assert!(output.contains("COMPARISON REPORT"));
    }

    #[test]
    fn test_report_shows_context_on_request() {
        let request =
            ComparisonRequest::new(vec!["A".to_string(), "B".to_string()], None).unwrap();

        let output = render(&request, true);

        let context_at = output.find("WEB SEARCH CONTEXT").unwrap();
        let report_at = output.find("COMPARISON REPORT").unwrap();
        assert!(context_at < report_at);
        assert!(output.contains("Source 1: Benchmarks\nPython is slower\nURL: https://example.com\n"));
    }
}
