//! Data models shared by the chain aggregator and the eligibility scorer
//!
//! Every per-chain and per-program record here belongs to exactly one
//! (address, chain) or (address, program) pair. Aggregates only ever combine
//! numbers, never records.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};

// =============================================================================
// Chains
// =============================================================================

/// Static description of one chain and the nodes that can answer for it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChainDescriptor {
    /// Numeric chain id (unique within a registry)
    pub id: u64,

    /// Display name (e.g., "Ethereum")
    pub name: String,

    /// Native asset symbol (e.g., "ETH")
    pub symbol: String,

    /// Public endpoints in preference order
    pub endpoints: Vec<String>,

    /// Alchemy network slug, when the chain is served by the metered provider
    #[serde(default)]
    pub metered_network: Option<String>,
}

/// Where an endpoint came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointKind {
    Metered,
    Public,
}

/// One candidate endpoint for a chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub url: String,
    pub kind: EndpointKind,
}

impl Endpoint {
    pub fn public(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: EndpointKind::Public,
        }
    }

    /// URL safe for logs: metered keys are replaced with `***`.
    pub fn redacted(&self) -> String {
        match self.kind {
            EndpointKind::Public => self.url.clone(),
            EndpointKind::Metered => match self.url.rfind('/') {
                Some(idx) => format!("{}/***", &self.url[..idx]),
                None => "***".to_string(),
            },
        }
    }
}

// =============================================================================
// Account metrics
// =============================================================================

/// Activity metrics for one address on one chain.
///
/// All derived fields are pure functions of `balance` and `tx_count`; see
/// [`crate::metrics::derive_metrics`].
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AccountMetrics {
    pub chain_id: u64,
    pub address: String,

    /// Native balance in whole units (wei / 10^18)
    pub balance: Decimal,

    /// Transactions originated by the address (nonce)
    pub tx_count: u64,

    pub active_days_estimate: u32,
    pub contract_interactions: u64,

    /// Estimated gas spent in native units
    pub gas_spent: Decimal,

    /// Heuristic airdrop score (0-100)
    pub score: u8,

    /// Latest block height seen while fetching, if it was available
    pub block_number: Option<u64>,
}

/// A chain that could not be queried during a fan-out.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChainFailure {
    pub chain_id: u64,
    pub chain_name: Option<String>,
    pub reason: String,
}

/// Numbers combined across the successfully queried chains.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct AggregateSummary {
    pub total_balance: Decimal,
    pub total_tx_count: u64,
    pub total_gas_spent: Decimal,
    pub total_contract_interactions: u64,
    /// Maximum, not sum, of the per-chain estimates
    pub max_active_days: u32,
    pub chains_checked: usize,
}

impl AggregateSummary {
    pub fn from_metrics(metrics: &[AccountMetrics]) -> Self {
        metrics.iter().fold(Self::default(), |mut acc, m| {
            acc.total_balance = acc.total_balance.checked_add(m.balance).unwrap_or(Decimal::MAX);
            acc.total_tx_count = acc.total_tx_count.saturating_add(m.tx_count);
            acc.total_gas_spent = acc.total_gas_spent.checked_add(m.gas_spent).unwrap_or(Decimal::MAX);
            acc.total_contract_interactions = acc
                .total_contract_interactions
                .saturating_add(m.contract_interactions);
            acc.max_active_days = acc.max_active_days.max(m.active_days_estimate);
            acc.chains_checked += 1;
            acc
        })
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ChainAggregateResult {
    pub metrics: Vec<AccountMetrics>,
    pub failures: Vec<ChainFailure>,
    pub summary: AggregateSummary,
}

// =============================================================================
// Eligibility
// =============================================================================

/// Estimated reward, or the sentinel when the source does not say.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EstimatedAmount {
    Known(Decimal),
    #[default]
    Unknown,
}

impl EstimatedAmount {
    /// Value used for ranking and totals; unknown counts as zero.
    pub fn value_or_zero(&self) -> Decimal {
        match self {
            EstimatedAmount::Known(v) => *v,
            EstimatedAmount::Unknown => Decimal::ZERO,
        }
    }
}

impl Serialize for EstimatedAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            EstimatedAmount::Known(v) => serializer.serialize_f64(v.to_f64().unwrap_or_default()),
            EstimatedAmount::Unknown => serializer.serialize_str("unknown"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimStatus {
    Claimable,
    Pending,
    Expiring,
    /// Reward token already sitting in the wallet
    Held,
}

/// Where an eligibility record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultSource {
    Program,
    Portfolio,
    Demo,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EligibilityResult {
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

/// Outcome of evaluating one configured program, eligible or not.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProgramCheck {
    pub program_id: String,
    pub eligible: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EligibilitySummary {
    pub total_claimable: usize,
    pub total_pending: usize,
    pub total_expiring: usize,
    pub total_value: Decimal,
    /// Eligible records, highest estimated amount first
    pub ranked: Vec<EligibilityResult>,
}

/// A speculative annotation. Never an eligibility determination.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Prediction {
    pub name: String,
    pub confidence: u8,
    pub est_amount: String,
    pub reason: String,
    pub speculative: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    High,
    Low,
    Unknown,
}

/// Primary-chain activity used by the prediction rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActivityProfile {
    pub nonce: u64,
    pub activity: ActivityLevel,
}

impl ActivityProfile {
    pub fn from_nonce(nonce: u64) -> Self {
        let activity = if nonce > 10 {
            ActivityLevel::High
        } else {
            ActivityLevel::Low
        };
        Self { nonce, activity }
    }

    pub fn unknown() -> Self {
        Self {
            nonce: 0,
            activity: ActivityLevel::Unknown,
        }
    }
}
