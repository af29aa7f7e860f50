use std::time::Instant;

use airdrop_core::metrics::derive_metrics;
use airdrop_core::{AccountMetrics, EvmAddress};

use crate::rpc::{RpcClient, RpcError};

/// Balance + nonce for one (address, chain) pair, turned into metrics.
#[derive(Clone)]
pub struct MetricsFetcher {
    rpc: RpcClient,
    fetch_block_height: bool,
}

impl MetricsFetcher {
    pub fn new(rpc: RpcClient, fetch_block_height: bool) -> Self {
        Self {
            rpc,
            fetch_block_height,
        }
    }

    pub fn rpc(&self) -> &RpcClient {
        &self.rpc
    }

    /// Balance and transaction count must both succeed. Block height is
    /// optional and never fails the fetch.
    pub async fn fetch(&self, address: &EvmAddress, chain_id: u64) -> Result<AccountMetrics, RpcError> {
        let start = Instant::now();
        if self.rpc.registry().descriptor(chain_id).is_err() {
            return Err(RpcError::UnknownChain(chain_id));
        }

        tracing::debug!(address = %address, chain_id = %chain_id, "Fetching account metrics");

        let required = async {
            tokio::try_join!(
                self.rpc.get_balance(chain_id, address),
                self.rpc.get_transaction_count(chain_id, address),
            )
        };
        let height = async {
            if !self.fetch_block_height {
                return None;
            }
            match self.rpc.block_number(chain_id).await {
                Ok(height) => Some(height),
                Err(e) => {
                    tracing::warn!(chain_id = %chain_id, error = %e, "Block height unavailable, continuing without it");
                    None
                }
            }
        };

        let (required, block_number) = tokio::join!(required, height);
        let (balance, tx_count) = required?;

        let metrics = derive_metrics(chain_id, address.as_str(), balance, tx_count, block_number);
        tracing::info!(
            address = %address,
            chain_id = %chain_id,
            balance = %metrics.balance,
            tx_count = %metrics.tx_count,
            score = %metrics.score,
            duration_ms = %start.elapsed().as_millis(),
            "Account metrics fetched"
        );

        Ok(metrics)
    }
}
