//! ClawViz - Multi-agent visualization backend
//!
//! Serves agent decisions and live OpenClaw Gateway agents to the
//! visualization frontend.

use anyhow::Result;
use clap::{Parser, Subcommand};
use clawviz::{
    agent::{self, DecisionRequest},
    api::{build_app, AppState},
    config::ClawVizConfig,
    gateway::{GatewayClient, IntegrationRegistry, VisualizationAgent},
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "clawviz")]
#[command(author = "A3S Lab Team")]
#[command(version)]
#[command(about = "Multi-agent visualization backend for OpenClaw gateways")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "CLAWVIZ_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Gateway settings that override the configuration file
#[derive(clap::Args)]
struct GatewayArgs {
    /// OpenClaw Gateway URL
    #[arg(long)]
    gateway_url: Option<String>,

    /// Gateway API key (sent as a Bearer token)
    #[arg(long, env = "CLAWVIZ_GATEWAY_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,

        /// Seconds between gateway polls
        #[arg(long)]
        poll_interval: Option<f64>,

        /// Serve decisions only, without connecting to the gateway
        #[arg(long)]
        no_integration: bool,

        #[command(flatten)]
        gateway: GatewayArgs,
    },

    /// Run one decision cycle and print the result
    Decide {
        /// Agent identifier
        #[arg(long, default_value_t = 1)]
        agent_id: i64,

        /// Position, comma separated (e.g. 0,0 or 1.5,2,0)
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true, default_value = "0,0")]
        position: Vec<f64>,

        /// Neighbor agent ids, comma separated
        #[arg(long, value_delimiter = ',')]
        nearby: Vec<i64>,
    },

    /// Fetch gateway agents once and print them in visualization shape
    Agents {
        /// Only agents of the session with this key
        #[arg(long)]
        session: Option<String>,

        #[command(flatten)]
        gateway: GatewayArgs,
    },

    /// Show configuration
    Config {
        /// Show default configuration
        #[arg(long)]
        default: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("clawviz={},tower_http=debug", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let mut config = match &cli.config {
        Some(path) => ClawVizConfig::load(path)?,
        None => ClawVizConfig::default(),
    };

    match cli.command {
        Commands::Serve {
            host,
            port,
            poll_interval,
            no_integration,
            gateway,
        } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(poll_interval) = poll_interval {
                config.integration.poll_interval = poll_interval;
            }
            apply_gateway_args(&mut config, gateway);
            config.validate()?;
            run_server(config, !no_integration).await?;
        }
        Commands::Decide {
            agent_id,
            position,
            nearby,
        } => {
            let response = agent::decide(DecisionRequest {
                agent_id,
                position,
                nearby_agents: nearby,
            });
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Agents { session, gateway } => {
            apply_gateway_args(&mut config, gateway);
            config.validate()?;
            fetch_agents(&config, session.as_deref()).await?;
        }
        Commands::Config { default } => {
            let shown = if default {
                ClawVizConfig::default()
            } else {
                config
            };
            println!("{}", shown.to_toml()?);
        }
    }

    Ok(())
}

fn apply_gateway_args(config: &mut ClawVizConfig, args: GatewayArgs) {
    if let Some(url) = args.gateway_url {
        config.integration.gateway_url = url;
    }
    if let Some(key) = args.api_key {
        config.integration.api_key = Some(key);
    }
    if let Some(timeout) = args.timeout {
        config.integration.timeout = timeout;
    }
}

async fn run_server(config: ClawVizConfig, integration_enabled: bool) -> Result<()> {
    tracing::info!("Starting ClawViz");

    let registry = Arc::new(IntegrationRegistry::new());
    if integration_enabled {
        match registry.get_or_start(config.integration.clone()).await {
            Ok(manager) => {
                manager
                    .add_observer(Arc::new(
                        |agents: &[VisualizationAgent]| -> clawviz::Result<()> {
                            tracing::debug!(count = agents.len(), "Gateway agents updated");
                            Ok(())
                        },
                    ))
                    .await;
            }
            Err(e) => {
                tracing::warn!("{}. Serving without gateway data.", e);
            }
        }
    }

    let app = build_app(AppState::new(registry.clone()));
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("ClawViz listening on http://{}. Press Ctrl+C to stop.", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    registry.shutdown().await;
    tracing::info!("ClawViz stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down...");
}

async fn fetch_agents(config: &ClawVizConfig, session: Option<&str>) -> Result<()> {
    let client = GatewayClient::new((&config.integration).into());
    if !client.connect().await {
        anyhow::bail!(
            "Failed to connect to OpenClaw Gateway at {}",
            client.base_url()
        );
    }

    let agents = match session {
        Some(key) => client.get_session_agents(key).await,
        None => client.get_active_agents().await,
    };
    client.disconnect().await;

    let mapped: Vec<VisualizationAgent> = agents?
        .iter()
        .map(|a| client.map_to_visualization(a))
        .collect();
    println!("{}", serde_json::to_string_pretty(&mapped)?);

    Ok(())
}
