pub mod contract;
pub mod demo;
pub mod portfolio;
pub mod remote_api;

use std::sync::Arc;
use std::time::{Duration, Instant};

use airdrop_core::scoring::{predict, summarize};
use airdrop_core::{
    AccountMetrics, ActivityProfile, CoreError, EligibilityResult, EligibilitySummary, EvmAddress,
    Prediction, ProgramCheck,
};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use reqwest::Client;
use thiserror::Error;

use crate::catalog::{CheckerStrategy, EligibilityProgram, Verdict};
use crate::config::{EligibilityConfig, PortfolioConfig};
use crate::metrics::MetricsFetcher;
use crate::rpc::RpcError;

#[derive(Debug, Error)]
pub enum CheckError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("http status {0}")]
    Status(u16),

    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error(transparent)]
    Protocol(#[from] CoreError),

    #[error("timed out after {0}ms")]
    Timeout(u128),
}

/// Everything `/eligibility` reports for one address.
#[derive(Debug, Clone)]
pub struct EligibilityReport {
    pub address: EvmAddress,
    pub checked_at: DateTime<Utc>,
    pub summary: EligibilitySummary,
    pub checks: Vec<ProgramCheck>,
    pub predictions: Vec<Prediction>,
    pub profile: ActivityProfile,
}

#[derive(Clone)]
pub struct EligibilityService {
    http: Client,
    fetcher: MetricsFetcher,
    programs: Arc<Vec<EligibilityProgram>>,
    config: EligibilityConfig,
    portfolio: PortfolioConfig,
}

impl EligibilityService {
    pub fn new(
        fetcher: MetricsFetcher,
        programs: Arc<Vec<EligibilityProgram>>,
        config: EligibilityConfig,
        portfolio: PortfolioConfig,
    ) -> Result<Self, reqwest::Error> {
        // Per-check budgets are enforced in `check_program`.
        let http = Client::builder().build()?;

        Ok(Self {
            http,
            fetcher,
            programs,
            config,
            portfolio,
        })
    }

    pub fn programs(&self) -> &[EligibilityProgram] {
        &self.programs
    }

    /// Run every program check, the portfolio lookup and the primary-chain
    /// activity fetch concurrently, then merge and score.
    pub async fn evaluate(&self, address: &EvmAddress) -> EligibilityReport {
        let start = Instant::now();
        let checked_at = Utc::now();
        let today = checked_at.date_naive();
        let window = self.config.expiring_window_days;

        tracing::info!(
            address = %address,
            programs = %self.programs.len(),
            portfolio = %self.portfolio.enabled,
            demo_mode = %self.config.demo_mode,
            "Starting eligibility evaluation"
        );

        let checks = join_all(self.programs.iter().map(|p| self.check_program(p, address)));
        let (outcomes, held, activity) = tokio::join!(
            checks,
            self.portfolio_records(address),
            self.primary_activity(address)
        );

        let mut results: Vec<EligibilityResult> = Vec::new();
        let mut checks = Vec::with_capacity(self.programs.len());
        for (program, outcome) in self.programs.iter().zip(outcomes) {
            match outcome {
                Ok(verdict) => {
                    if verdict.eligible {
                        results.push(program.to_result(verdict.amount, today, window));
                    }
                    checks.push(ProgramCheck {
                        program_id: program.id.clone(),
                        eligible: verdict.eligible,
                        error: None,
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        program = %program.id,
                        strategy = %program.strategy_name(),
                        error = %e,
                        "Eligibility check failed, treating as not eligible"
                    );
                    checks.push(ProgramCheck {
                        program_id: program.id.clone(),
                        eligible: false,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        results.extend(held);
        if self.config.demo_mode {
            results.extend(demo::records(address, activity.as_ref(), today, window));
        }

        let profile = activity
            .as_ref()
            .map_or_else(ActivityProfile::unknown, |m| ActivityProfile::from_nonce(m.tx_count));
        let summary = summarize(results);
        let predictions = predict(&profile);

        tracing::info!(
            address = %address,
            eligible = %summary.ranked.len(),
            total_value = %summary.total_value,
            predictions = %predictions.len(),
            duration_ms = %start.elapsed().as_millis(),
            "Eligibility evaluation completed"
        );

        EligibilityReport {
            address: address.clone(),
            checked_at,
            summary,
            checks,
            predictions,
            profile,
        }
    }

    async fn check_program(&self, program: &EligibilityProgram, address: &EvmAddress) -> Result<Verdict, CheckError> {
        let budget = Duration::from_millis(self.config.timeout_ms);
        let rpc = self.fetcher.rpc();

        let check = async {
            match &program.strategy {
                CheckerStrategy::RemoteApi { url_template, schema } => {
                    remote_api::check(&self.http, url_template, schema, address).await
                }
                CheckerStrategy::OnChainContract {
                    chain_id,
                    contract,
                    signature,
                    decoder,
                } => contract::check_claim(rpc, *chain_id, contract, signature, *decoder, address).await,
                CheckerStrategy::DirectRpc {
                    chain_id,
                    contract,
                    signature,
                    decimals,
                } => contract::check_balance(rpc, *chain_id, contract, signature, *decimals, address).await,
            }
        };

        let verdict = tokio::time::timeout(budget, check)
            .await
            .map_err(|_| CheckError::Timeout(budget.as_millis()))??;

        tracing::debug!(program = %program.id, eligible = %verdict.eligible, "Eligibility check finished");
        Ok(verdict)
    }

    async fn portfolio_records(&self, address: &EvmAddress) -> Vec<EligibilityResult> {
        if !self.portfolio.enabled {
            return Vec::new();
        }
        let budget = Duration::from_millis(self.config.timeout_ms);
        let lookup = tokio::time::timeout(budget, portfolio::fetch_tokens(&self.http, &self.portfolio.api_url, address))
            .await
            .map_err(|_| CheckError::Timeout(budget.as_millis()))
            .and_then(|tokens| tokens);
        match lookup {
            Ok(tokens) => portfolio::held_records(&tokens, &self.programs),
            Err(e) => {
                tracing::warn!(address = %address, error = %e, "Portfolio lookup failed, skipping held tokens");
                Vec::new()
            }
        }
    }

    async fn primary_activity(&self, address: &EvmAddress) -> Option<AccountMetrics> {
        let chain_id = self.config.primary_chain_id;
        match self.fetcher.fetch(address, chain_id).await {
            Ok(metrics) => Some(metrics),
            Err(e) => {
                tracing::warn!(address = %address, chain_id = %chain_id, error = %e, "Activity profile unavailable");
                None
            }
        }
    }
}
