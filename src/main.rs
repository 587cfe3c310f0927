//! GitLab MCP Server
//!
//! A Model Context Protocol server exposing GitLab merge request tools over stdio.

use clap::Parser;
use mcp_gitlab::{
    config::{LogFormat, LoggingConfig, load_config},
    server::GitLabMcpHandler,
    transport::run_stdio,
};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// GitLab MCP Server - merge requests, reviews and repositories via MCP
#[derive(Parser, Debug)]
#[command(name = "mcp-gitlab")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "MCP_GITLAB_CONFIG")]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long, env = "MCP_GITLAB_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format (pretty, json); overrides the config file
    #[arg(long, env = "MCP_GITLAB_LOG_FORMAT", ignore_case = true)]
    log_format: Option<LogFormat>,
}

/// Install the global subscriber; all output goes to stderr
fn init_logging(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logging settings may come from the config file, so load it first and
    // report a failure once the subscriber is up
    let config = load_config(args.config.as_deref());

    let logging = config
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_else(|_| LoggingConfig::default());
    init_logging(
        args.log_level.as_deref().unwrap_or(&logging.level),
        args.log_format.unwrap_or(logging.format),
    );

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting GitLab MCP server"
    );

    let config = config.inspect_err(|e| error!(error = %e, "Failed to load configuration"))?;

    info!(gitlab_url = %config.gitlab.url, "Connecting to GitLab");

    let handler = GitLabMcpHandler::from_config(&config)
        .inspect_err(|e| error!(error = %e, "Failed to initialize GitLab client"))?;

    run_stdio(handler)
        .await
        .inspect_err(|e| error!(error = %e, "MCP server error"))?;

    Ok(())
}
