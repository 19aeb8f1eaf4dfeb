//! DOCX MCP Server Entry Point
//!
//! Loads configuration from the environment, applies command-line overrides,
//! initializes logging on stderr, and serves over the selected transport.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use docx_mcp_server::core::{Config, McpServer, TransportConfig, TransportService};

/// MCP server exposing tools that read and edit Word .docx files.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Transport to serve on: stdio or http (overrides MCP_TRANSPORT).
    #[arg(long)]
    transport: Option<String>,

    /// Directory relative filenames resolve against (overrides MCP_DOCUMENTS_DIR).
    #[arg(long)]
    documents_dir: Option<PathBuf>,

    /// Restrict every read and write to this directory (overrides MCP_ROOT_PATH).
    #[arg(long)]
    root_path: Option<PathBuf>,

    /// Log level: trace, debug, info, warn or error (overrides MCP_LOG_LEVEL).
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn apply(self, config: &mut Config) {
        if let Some(transport) = self.transport {
            config.transport = TransportConfig::from_name(&transport);
        }
        if let Some(directory) = self.documents_dir {
            config.documents.default_directory = Some(directory);
        }
        if let Some(root) = self.root_path {
            config.security.root_path = Some(root);
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env();
    cli.apply(&mut config);

    init_logging(&config.logging.level);

    info!("Starting {} v{}", config.server.name, config.server.version);
    if let Some(directory) = &config.documents.default_directory {
        info!("Documents directory: {}", directory.display());
    }
    if let Some(root) = &config.security.root_path {
        info!("Path access restricted to {}", root.display());
    }

    let server = McpServer::new(config.clone());

    info!("Server initialized");

    let transport = TransportService::new(config.transport);
    transport.run(server).await?;

    info!("Server shutting down");

    Ok(())
}

/// Initialize the logging subsystem.
///
/// Logs go to stderr so they never interleave with the stdio protocol stream.
fn init_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
