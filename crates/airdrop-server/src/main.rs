mod api;
mod catalog;
mod config;
mod eligibility;
mod error;
mod metrics;
mod rpc;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use airdrop_core::EndpointRegistry;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::catalog::{builtin_programs, EligibilityProgram};
use crate::config::AppConfig;
use crate::eligibility::EligibilityService;
use crate::metrics::{ChainAggregator, MetricsFetcher};
use crate::rpc::RpcClient;

pub use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub registry: Arc<EndpointRegistry>,
    pub fetcher: MetricsFetcher,
    pub aggregator: ChainAggregator,
    pub eligibility: EligibilityService,
}

impl AppState {
    /// Wire every component from one immutable config.
    pub fn build(config: AppConfig, programs: Vec<EligibilityProgram>) -> anyhow::Result<Self> {
        let registry = Arc::new(
            EndpointRegistry::builtin(config.alchemy_api_key()).with_overrides(config.chains.clone())?,
        );

        let rpc = RpcClient::new(registry.clone(), Duration::from_millis(config.rpc.timeout_ms))?;
        let fetcher = MetricsFetcher::new(rpc, config.rpc.fetch_block_height);
        let aggregator = ChainAggregator::new(fetcher.clone());
        let eligibility = EligibilityService::new(
            fetcher.clone(),
            Arc::new(programs),
            config.eligibility.clone(),
            config.portfolio.clone(),
        )?;

        Ok(Self {
            config: Arc::new(config),
            registry,
            fetcher,
            aggregator,
            eligibility,
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing with pretty format
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "airdrop_radar=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false),
        )
        .init();

    println!("================================================");
    println!("         AIRDROP RADAR - Starting Up            ");
    println!("================================================");

    // Load configuration
    let config = AppConfig::load().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    println!("[CONFIG] Server: {}:{}", config.server.host, config.server.port);
    println!("[CONFIG] RPC timeout: {}ms per endpoint", config.rpc.timeout_ms);
    match config.alchemy_api_key() {
        Some(key) => println!("[CONFIG] Alchemy API Key: set (length: {})", key.len()),
        None => println!("[CONFIG] Alchemy API Key: not set, using public endpoints only"),
    }
    if config.eligibility.demo_mode {
        println!("[CONFIG] Demo mode: ON (demo records are labeled source=demo)");
    }
    if config.portfolio.enabled {
        println!("[CONFIG] Portfolio lookup: {}", config.portfolio.api_url);
    }

    tracing::info!(
        host = %config.server.host,
        port = %config.server.port,
        overrides = %config.chains.len(),
        "Starting Airdrop Radar"
    );

    let addr: SocketAddr = config.server_addr().parse()?;

    println!("[INIT] Building endpoint registry and clients...");
    let state = AppState::build(config, builtin_programs())?;
    println!(
        "[INIT] {} chains registered, {} eligibility programs",
        state.registry.chains().len(),
        state.eligibility.programs().len()
    );
    tracing::debug!(
        metered = %state.registry.has_metered_key(),
        demo_mode = %state.config.eligibility.demo_mode,
        "Application state ready"
    );

    // Build router
    println!("[ROUTER] Setting up API routes...");
    let app = Router::new()
        .merge(api::create_router())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);
    println!("[ROUTER] Routes configured: /health, /chains, /analyze, /analyze/all, /eligibility");

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;

    println!("================================================");
    println!("  Server listening on http://{}", addr);
    println!("================================================");
    println!();

    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
