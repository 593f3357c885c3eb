// src/main.rs

use abstract_mcp_server::{config::Config, http, mcp::handler::handle_line, AppState};
use std::env;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Line-delimited JSON-RPC over stdin/stdout, the default MCP transport.
async fn run_stdio_server(state: AppState) {
    info!("🚀 serving MCP over stdin/stdout");

    let mut lines = io::BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if let Some(reply) = handle_line(&line, state.clone()).await {
                    if let Err(e) = stdout.write_all(reply.as_bytes()).await {
                        error!("failed to write response: {}", e);
                        break;
                    }
                }
            }
            Ok(None) => {
                info!("stdin closed, shutting down");
                break;
            }
            Err(e) => {
                error!("failed to read from stdin: {}", e);
                break;
            }
        }
    }
}

#[tokio::main]
async fn main() {
    // Log to stderr so stdout stays clean for MCP framing.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "abstract_mcp_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("❌ Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    info!(
        network = ?config.network,
        rpc_url = %config.rpc_url,
        signer_configured = config.private_key.is_some(),
        "configuration loaded"
    );

    let state = match AppState::new(config) {
        Ok(state) => state,
        Err(e) => {
            error!("❌ Failed to initialize server state: {}", e);
            std::process::exit(1);
        }
    };

    // HTTP mode only when explicitly requested; stdio MCP is the default.
    let args: Vec<String> = env::args().collect();
    if args.contains(&"--http".to_string()) || env::var("HTTP_MODE").is_ok() {
        if let Err(e) = http::serve(state).await {
            error!("❌ HTTP server error: {}", e);
            std::process::exit(1);
        }
    } else {
        run_stdio_server(state).await;
    }
}
