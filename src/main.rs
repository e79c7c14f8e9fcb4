use actix_web::{web, App, HttpServer};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use jira_bridge::config::JiraConfig;
use jira_bridge::jira_handlers::{configure_routes, JiraAppState};
use jira_bridge::mcp::transport::StdioTransport;
use jira_bridge::mcp::MCPServer;
use jira_bridge::service::IssueService;

/// Jira bridge: REST and MCP access to a Jira instance.
#[derive(Parser)]
#[command(name = "jira-bridge")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the REST endpoints and the MCP JSON-RPC endpoint over HTTP
    Serve {
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        #[arg(short, long, default_value_t = 8090)]
        port: u16,
    },

    /// Serve MCP over stdin/stdout
    Stdio,

    /// Fetch recent and assigned tickets once to verify connectivity
    Check {
        #[arg(short, long, default_value_t = 5)]
        limit: u32,
    },
}

fn io_error(e: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(e.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();

    // stdout carries JSON-RPC frames in stdio mode, so logs always go to stderr
    let (writer, _guard) = tracing_appender::non_blocking(std::io::stderr());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(writer)
        .init();

    let config = JiraConfig::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        io_error(e)
    })?;
    let service = Arc::new(IssueService::from_config(&config).map_err(io_error)?);
    let mcp_server = Arc::new(MCPServer::new(service.clone()).map_err(io_error)?);

    match cli.command.unwrap_or(Commands::Serve {
        host: "0.0.0.0".to_string(),
        port: 8090,
    }) {
        Commands::Serve { host, port } => {
            info!("Starting Jira bridge at http://{}:{}", host, port);
            info!("Jira instance: {}", config.base_url);

            let app_state = web::Data::new(JiraAppState {
                service,
                mcp_server,
            });

            HttpServer::new(move || {
                App::new()
                    .app_data(app_state.clone())
                    .configure(configure_routes)
            })
            .bind((host.as_str(), port))?
            .run()
            .await
        }
        Commands::Stdio => {
            info!("Starting Jira MCP server on stdio");
            let mut transport = StdioTransport::stdio();
            mcp_server
                .handle_connection(&mut transport)
                .await
                .map_err(io_error)
        }
        Commands::Check { limit } => run_check(&service, limit).await.map_err(io_error),
    }
}

async fn run_check(service: &IssueService, limit: u32) -> jira_bridge::errors::JiraResult<()> {
    info!("Checking connectivity with recently updated tickets");
    for ticket in service.get_recently_updated_tickets(Some(limit)).await? {
        info!(
            "  {}: {}",
            ticket.key.as_deref().unwrap_or("?"),
            ticket.fields.summary.as_deref().unwrap_or("")
        );
    }

    info!("Checking connectivity with assigned tickets");
    for ticket in service.get_my_assigned_tickets(Some(limit)).await? {
        info!(
            "  {}: {}",
            ticket.key.as_deref().unwrap_or("?"),
            ticket.fields.summary.as_deref().unwrap_or("")
        );
    }

    info!("Jira connection OK");
    Ok(())
}
