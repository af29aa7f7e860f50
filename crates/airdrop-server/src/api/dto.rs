use airdrop_core::{
    AccountMetrics, ActivityLevel, AggregateSummary, ChainDescriptor, ChainFailure, ClaimStatus,
    EligibilityResult, EstimatedAmount, Prediction, ProgramCheck, ResultSource,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Native amounts are reported as strings with four decimals.
pub fn format_native(value: Decimal) -> String {
    format!("{:.4}", value.round_dp(4))
}

// ============================================================================
// GET /health
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub chains: usize,
    pub programs: usize,
}

// ============================================================================
// GET /chains
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ChainsResponse {
    pub chains: Vec<ChainInfo>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainInfo {
    pub chain_id: u64,
    pub name: String,
    pub symbol: String,
    pub endpoint_count: usize,
    pub metered: bool,
}

impl ChainInfo {
    pub fn new(chain: &ChainDescriptor, metered_key: bool) -> Self {
        Self {
            chain_id: chain.id,
            name: chain.name.clone(),
            symbol: chain.symbol.clone(),
            endpoint_count: chain.endpoints.len(),
            metered: metered_key && chain.metered_network.is_some(),
        }
    }
}

// ============================================================================
// GET /analyze and /analyze/all
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AnalyzeQuery {
    pub address: Option<String>,
    #[serde(rename = "chainId")]
    pub chain_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeAllQuery {
    pub address: Option<String>,
    #[serde(rename = "chainIds")]
    pub chain_ids: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainMetrics {
    pub chain_id: u64,
    pub chain_name: String,
    pub symbol: String,
    pub balance: String,
    pub tx_count: u64,
    pub active_days_estimate: u32,
    pub contract_interactions: u64,
    pub gas_spent: String,
    pub airdrop_score: u8,
    pub block_number: Option<u64>,
}

impl ChainMetrics {
    pub fn new(metrics: &AccountMetrics, chain: &ChainDescriptor) -> Self {
        Self {
            chain_id: metrics.chain_id,
            chain_name: chain.name.clone(),
            symbol: chain.symbol.clone(),
            balance: format_native(metrics.balance),
            tx_count: metrics.tx_count,
            active_days_estimate: metrics.active_days_estimate,
            contract_interactions: metrics.contract_interactions,
            gas_spent: format_native(metrics.gas_spent),
            airdrop_score: metrics.score,
            block_number: metrics.block_number,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub success: bool,
    pub address: String,
    #[serde(flatten)]
    pub metrics: ChainMetrics,
    pub rpc_type: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureInfo {
    pub chain_id: u64,
    pub chain_name: Option<String>,
    pub reason: String,
}

impl From<ChainFailure> for FailureInfo {
    fn from(failure: ChainFailure) -> Self {
        Self {
            chain_id: failure.chain_id,
            chain_name: failure.chain_name,
            reason: failure.reason,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateInfo {
    pub chain_name: String,
    pub balance: String,
    pub tx_count: u64,
    pub gas_spent: String,
    pub contract_interactions: u64,
    pub active_days_estimate: u32,
    pub chains_checked: usize,
}

impl From<&AggregateSummary> for AggregateInfo {
    fn from(summary: &AggregateSummary) -> Self {
        Self {
            chain_name: "Multi-Chain Aggregate".to_string(),
            balance: format_native(summary.total_balance),
            tx_count: summary.total_tx_count,
            gas_spent: format_native(summary.total_gas_spent),
            contract_interactions: summary.total_contract_interactions,
            active_days_estimate: summary.max_active_days,
            chains_checked: summary.chains_checked,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeAllResponse {
    pub success: bool,
    pub address: String,
    pub chains: Vec<ChainMetrics>,
    pub failures: Vec<FailureInfo>,
    pub aggregate: AggregateInfo,
    pub timestamp: DateTime<Utc>,
}

// ============================================================================
// GET /eligibility
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct EligibilityQuery {
    pub address: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryInfo {
    pub total_claimable: usize,
    pub total_pending: usize,
    pub total_expiring: usize,
    pub total_value: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AirdropInfo {
    pub program_id: String,
    pub name: String,
    pub ticker: Option<String>,
    pub eligible: bool,
    pub amount: EstimatedAmount,
    pub claim_url: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub status: ClaimStatus,
    pub source: ResultSource,
}

impl From<EligibilityResult> for AirdropInfo {
    fn from(result: EligibilityResult) -> Self {
        Self {
            program_id: result.program_id,
            name: result.name,
            ticker: result.ticker,
            eligible: result.eligible,
            amount: result.amount,
            claim_url: result.claim_url,
            deadline: result.deadline,
            status: result.status,
            source: result.source,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInfo {
    pub program_id: String,
    pub eligible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<ProgramCheck> for CheckInfo {
    fn from(check: ProgramCheck) -> Self {
        Self {
            program_id: check.program_id,
            eligible: check.eligible,
            error: check.error,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionInfo {
    pub name: String,
    pub confidence: u8,
    pub est_amount: String,
    pub reason: String,
    pub speculative: bool,
}

impl From<Prediction> for PredictionInfo {
    fn from(p: Prediction) -> Self {
        Self {
            name: p.name,
            confidence: p.confidence,
            est_amount: p.est_amount,
            reason: p.reason,
            speculative: p.speculative,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ActivityInfo {
    pub nonce: u64,
    pub activity: ActivityLevel,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityResponse {
    pub success: bool,
    pub address: String,
    pub timestamp: DateTime<Utc>,
    pub summary: SummaryInfo,
    pub airdrops: Vec<AirdropInfo>,
    pub checks: Vec<CheckInfo>,
    pub predictions: Vec<PredictionInfo>,
    pub metrics: ActivityInfo,
}

impl From<crate::eligibility::EligibilityReport> for EligibilityResponse {
    fn from(report: crate::eligibility::EligibilityReport) -> Self {
        let summary = report.summary;
        Self {
            success: true,
            address: report.address.to_string(),
            timestamp: report.checked_at,
            summary: SummaryInfo {
                total_claimable: summary.total_claimable,
                total_pending: summary.total_pending,
                total_expiring: summary.total_expiring,
                total_value: summary.total_value.to_f64().unwrap_or_default(),
            },
            airdrops: summary.ranked.into_iter().map(AirdropInfo::from).collect(),
            checks: report.checks.into_iter().map(CheckInfo::from).collect(),
            predictions: report.predictions.into_iter().map(PredictionInfo::from).collect(),
            metrics: ActivityInfo {
                nonce: report.profile.nonce,
                activity: report.profile.activity,
            },
        }
    }
}
