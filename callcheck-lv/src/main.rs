//! callcheck-lv (Lead Verification) - voice call-verification microservice
//!
//! Verifies inbound sales leads by placing an automated voice call, confirming
//! a human answered it, and forwarding accepted leads to the downstream
//! receiver.

use anyhow::Result;
use callcheck_common::AppConfig;
use callcheck_lv::services::HttpGateway;
use callcheck_lv::{build_router, AppState};
use clap::Parser;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "callcheck-lv", about = "Lead call-verification service")]
struct Args {
    /// Path to a TOML config file (overrides CALLCHECK_CONFIG)
    #[arg(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting callcheck Lead Verification (callcheck-lv) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let args = Args::parse();
    let config = Arc::new(AppConfig::resolve(args.config.as_deref())?);
    info!("Voice provider: {}", config.voice_base_url);
    info!("Lead receiver: {}", config.receiver_url);
    info!(
        "Confirm delay: {}s, gateway timeout: {}s",
        config.confirm_delay_secs, config.gateway_timeout_secs
    );

    let gateway = Arc::new(
        HttpGateway::new(config.gateway_timeout())
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP gateway: {}", e))?,
    );

    let state = AppState::new(config.clone(), gateway);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("callcheck-lv listening on http://{}", config.bind_addr);
    info!("Health check: http://{}/health", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
