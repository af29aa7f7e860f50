use std::collections::HashSet;
use std::time::Instant;

use airdrop_core::{AggregateSummary, ChainAggregateResult, ChainFailure, EvmAddress};
use futures::future::join_all;

use super::fetcher::MetricsFetcher;

/// Fans the metrics fetcher out over several chains. One chain failing
/// never aborts the others.
#[derive(Clone)]
pub struct ChainAggregator {
    fetcher: MetricsFetcher,
}

impl ChainAggregator {
    pub fn new(fetcher: MetricsFetcher) -> Self {
        Self { fetcher }
    }

    pub async fn fetch_many(&self, address: &EvmAddress, chain_ids: &[u64]) -> ChainAggregateResult {
        let start = Instant::now();

        let mut seen = HashSet::new();
        let unique: Vec<u64> = chain_ids.iter().copied().filter(|id| seen.insert(*id)).collect();

        tracing::info!(address = %address, chains = ?unique, "Starting multi-chain fetch");

        let outcomes = join_all(
            unique
                .iter()
                .map(|&chain_id| async move { (chain_id, self.fetcher.fetch(address, chain_id).await) }),
        )
        .await;

        let registry = self.fetcher.rpc().registry();
        let mut result = ChainAggregateResult::default();
        for (chain_id, outcome) in outcomes {
            match outcome {
                Ok(metrics) => result.metrics.push(metrics),
                Err(e) => {
                    tracing::warn!(chain_id = %chain_id, error = %e, "Chain excluded from aggregate");
                    result.failures.push(ChainFailure {
                        chain_id,
                        chain_name: registry.descriptor(chain_id).ok().map(|d| d.name.clone()),
                        reason: e.to_string(),
                    });
                }
            }
        }
        result.summary = AggregateSummary::from_metrics(&result.metrics);

        tracing::info!(
            address = %address,
            succeeded = %result.metrics.len(),
            failed = %result.failures.len(),
            duration_ms = %start.elapsed().as_millis(),
            "Multi-chain fetch completed"
        );

        result
    }
}
