use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use std::time::Instant;

use airdrop_core::registry::PRIMARY_CHAIN_ID;
use airdrop_core::EvmAddress;

use super::dto::*;
use crate::error::{AppError, AppResult};
use crate::AppState;

/// Validate and normalize the `address` query parameter.
fn parse_address(raw: Option<&str>) -> AppResult<EvmAddress> {
    let raw = raw.unwrap_or_default();
    EvmAddress::parse(raw).map_err(|_| AppError::InvalidAddress(raw.to_string()))
}

fn parse_chain_id(raw: &str) -> AppResult<u64> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| AppError::InvalidParam(format!("chainId must be a positive integer, got '{raw}'")))
}

/// Comma-separated chain ids; empty means "every registered chain".
fn parse_chain_ids(raw: Option<&str>) -> AppResult<Vec<u64>> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_chain_id)
        .collect()
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    println!("[REQUEST] GET /health");
    tracing::info!("Processing health check request");

    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        chains: state.registry.chains().len(),
        programs: state.eligibility.programs().len(),
    };

    println!("[RESPONSE] GET /health -> 200 OK chains={}", response.chains);
    Json(response)
}

pub async fn list_chains(State(state): State<AppState>) -> Json<ChainsResponse> {
    println!("[REQUEST] GET /chains");
    let metered = state.registry.has_metered_key();
    let chains: Vec<ChainInfo> = state
        .registry
        .chains()
        .iter()
        .map(|chain| ChainInfo::new(chain, metered))
        .collect();

    tracing::debug!(count = %chains.len(), metered = %metered, "Listing chains");
    println!("[RESPONSE] GET /chains -> 200 OK ({} chains)", chains.len());
    Json(ChainsResponse { chains })
}

pub async fn analyze(
    State(state): State<AppState>,
    Query(query): Query<AnalyzeQuery>,
) -> AppResult<Json<AnalyzeResponse>> {
    let start = Instant::now();
    println!(
        "[REQUEST] GET /analyze address={} chainId={}",
        query.address.as_deref().unwrap_or("-"),
        query.chain_id.as_deref().unwrap_or("-")
    );

    let address = parse_address(query.address.as_deref())?;
    let chain_id = match query.chain_id.as_deref() {
        Some(raw) => parse_chain_id(raw)?,
        None => PRIMARY_CHAIN_ID,
    };
    let chain = state
        .registry
        .descriptor(chain_id)
        .map_err(|_| AppError::UnsupportedChain(chain_id))?;
    tracing::info!(address = %address, chain_id = %chain_id, "Processing analyze request");

    let metrics = state
        .fetcher
        .fetch(&address, chain_id)
        .await
        .map_err(|e| AppError::from_rpc(chain_id, e))?;

    let rpc_type = if state.registry.has_metered_key() && chain.metered_network.is_some() {
        "metered"
    } else {
        "public"
    };

    let duration = start.elapsed().as_millis();
    println!(
        "[RESPONSE] GET /analyze -> 200 OK ({}ms) chain={} tx={} score={}",
        duration, chain.name, metrics.tx_count, metrics.score
    );
    tracing::info!(
        address = %address,
        chain_id = %chain_id,
        duration_ms = %duration,
        score = %metrics.score,
        "Analyze completed"
    );

    Ok(Json(AnalyzeResponse {
        success: true,
        address: address.to_string(),
        metrics: ChainMetrics::new(&metrics, chain),
        rpc_type: rpc_type.to_string(),
        timestamp: Utc::now(),
    }))
}

pub async fn analyze_all(
    State(state): State<AppState>,
    Query(query): Query<AnalyzeAllQuery>,
) -> AppResult<Json<AnalyzeAllResponse>> {
    let start = Instant::now();
    println!(
        "[REQUEST] GET /analyze/all address={} chainIds={}",
        query.address.as_deref().unwrap_or("-"),
        query.chain_ids.as_deref().unwrap_or("all")
    );

    let address = parse_address(query.address.as_deref())?;
    let mut chain_ids = parse_chain_ids(query.chain_ids.as_deref())?;
    if chain_ids.is_empty() {
        chain_ids = state.registry.chain_ids();
    }
    tracing::info!(address = %address, chains = ?chain_ids, "Processing multi-chain analyze request");

    let result = state.aggregator.fetch_many(&address, &chain_ids).await;

    let chains: Vec<ChainMetrics> = result
        .metrics
        .iter()
        .filter_map(|m| {
            let chain = state.registry.descriptor(m.chain_id).ok()?;
            Some(ChainMetrics::new(m, chain))
        })
        .collect();
    let aggregate = AggregateInfo::from(&result.summary);

    let duration = start.elapsed().as_millis();
    println!(
        "[RESPONSE] GET /analyze/all -> 200 OK ({}ms) ok={} failed={}",
        duration,
        chains.len(),
        result.failures.len()
    );
    tracing::info!(
        address = %address,
        duration_ms = %duration,
        chains_checked = %aggregate.chains_checked,
        failures = %result.failures.len(),
        "Multi-chain analyze completed"
    );

    Ok(Json(AnalyzeAllResponse {
        success: true,
        address: address.to_string(),
        chains,
        failures: result.failures.into_iter().map(FailureInfo::from).collect(),
        aggregate,
        timestamp: Utc::now(),
    }))
}

pub async fn eligibility(
    State(state): State<AppState>,
    Query(query): Query<EligibilityQuery>,
) -> AppResult<Json<EligibilityResponse>> {
    let start = Instant::now();
    println!(
        "[REQUEST] GET /eligibility address={}",
        query.address.as_deref().unwrap_or("-")
    );

    let address = parse_address(query.address.as_deref())?;
    tracing::info!(address = %address, "Processing eligibility request");

    let report = state.eligibility.evaluate(&address).await;
    let response = EligibilityResponse::from(report);

    let duration = start.elapsed().as_millis();
    println!(
        "[RESPONSE] GET /eligibility -> 200 OK ({}ms) airdrops={} value={}",
        duration,
        response.airdrops.len(),
        response.summary.total_value
    );

    Ok(Json(response))
}
