//! webnav - browser automation tools for agent loops.
//!
//! Hosts the web navigator extension and drives its tools from the command
//! line or a line-delimited JSON REPL.

mod cli;

use std::sync::Arc;

use clap::Parser;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use webnav_config::{Config, ConfigError, ConfigLoader, ConfigValidator, LoggingConfig};
use webnav_protocols::{Extension, ExtensionContext, ToolContext, ToolResult};
use webnav_tools_browser::{OPEN_LINK_LANG, ToolCatalog, ToolInvocation, WebNavigatorExtension};

use cli::{Cli, Commands};

/// Initialize tracing with console and file output.
///
/// Log files are written to the configured directory with daily rotation.
fn init_tracing(logging: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(&logging.directory)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("webnav")
        .filename_suffix("log")
        .max_log_files(30)
        .build(&logging.directory)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // The guard flushes the file writer on drop; keep it for the whole run.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    // Console output goes to stderr; stdout carries tool results.
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

/// Log validation warnings and errors, failing on the first error.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let validation = ConfigValidator::validate(config)?;
    for error in &validation.errors {
        error!("Config {}: {}", error.path, error.message);
    }
    for warning in validation.into_result()? {
        warn!("Config {}: {}", warning.path, warning.message);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = ConfigLoader::load_or_default(&cli.config)?;
    init_tracing(&config.logging)?;
    validate_config(&config)?;

    info!("Starting webnav v{}", env!("CARGO_PKG_VERSION"));

    let catalog = Arc::new(ToolCatalog::new());
    let mut extension = WebNavigatorExtension::from_browser_config(&config.browser)
        .headless(config.browser.headless || cli.headless);
    extension
        .initialize(ExtensionContext::new(Value::Null, catalog.clone()))
        .await?;

    let outcome = match cli.command {
        Commands::Tools { format } => {
            list_tools(&catalog, &format);
            Ok(())
        }
        Commands::Call { tool, args } => call_tool(&catalog, tool, &args).await,
        Commands::Open { url } => open_link(&extension, &url).await,
        Commands::Repl => repl(&catalog).await,
    };

    if let Err(e) = extension.shutdown().await {
        error!("Shutdown failed: {}", e);
    }
    outcome
}

fn list_tools(catalog: &ToolCatalog, format: &str) {
    if format == "json" {
        println!("{}", Value::Array(catalog.openai_functions()));
        return;
    }
    for definition in catalog.definitions() {
        println!("{:<24} {}", definition.id, definition.description);
    }
}

async fn call_tool(
    catalog: &ToolCatalog,
    tool: String,
    args: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let arguments: Value = serde_json::from_str(args)?;
    let result = catalog
        .invoke(ToolInvocation::new(tool, arguments), ToolContext::new("cli"))
        .await;
    println!("{}", render(&result)?);
    Ok(())
}

async fn open_link(
    extension: &WebNavigatorExtension,
    url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    match extension.answer_codeblock(url, OPEN_LINK_LANG).await {
        Some(answer) => println!("{}", answer),
        None => warn!("No answer for {}", url),
    }
    Ok(())
}

/// Line-delimited JSON: `{"toolName": ..., "arguments": {...}}` in, one
/// `ToolResult` out. Unparseable lines get a failed result, not an exit.
async fn repl(catalog: &ToolCatalog) -> Result<(), Box<dyn std::error::Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let result = match serde_json::from_str::<ToolInvocation>(line) {
            Ok(invocation) => catalog.invoke(invocation, ToolContext::new("repl")).await,
            Err(e) => ToolResult::error(format!("Invalid invocation: {}", e)),
        };
        let mut out = render(&result)?;
        out.push('\n');
        stdout.write_all(out.as_bytes()).await?;
        stdout.flush().await?;
    }
    Ok(())
}

fn render(result: &ToolResult) -> Result<String, serde_json::Error> {
    serde_json::to_string(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_config_accepts_defaults() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_config_rejects_invalid_values() {
        let mut config = Config::default();
        config.browser.load_grace_ms = config.browser.navigation_timeout_ms;

        match validate_config(&config) {
            Err(ConfigError::InvalidValue { field, .. }) => {
                assert_eq!(field, "browser.load_grace_ms")
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
