//! Heuristic account metrics
//!
//! Simple activity proxies derived from balance and nonce. They are not
//! economically meaningful.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::AccountMetrics;
use crate::registry::PRIMARY_CHAIN_ID;

const MAX_ACTIVE_DAYS: u32 = 365;

/// Estimated native gas per transaction.
pub fn per_tx_gas(chain_id: u64) -> Decimal {
    if chain_id == PRIMARY_CHAIN_ID {
        dec!(0.005)
    } else {
        dec!(0.001)
    }
}

/// `min(txCount * 2, 365)`
pub fn active_days_estimate(tx_count: u64) -> u32 {
    let days = tx_count.saturating_mul(2).min(MAX_ACTIVE_DAYS as u64);
    days as u32
}

/// `floor(txCount * 0.3)`
pub fn contract_interactions(tx_count: u64) -> u64 {
    (tx_count as u128 * 3 / 10) as u64
}

/// `txCount * perTxGas(chainId)`
pub fn gas_spent(chain_id: u64, tx_count: u64) -> Decimal {
    Decimal::from(tx_count) * per_tx_gas(chain_id)
}

/// `min(floor(txCount/100*50) + min(txCount*0.5, 50), 100)`, floored.
///
/// Both halves are floors of `txCount / 2`, the second capped at 50, so the
/// whole thing stays in integer arithmetic.
pub fn airdrop_score(tx_count: u64) -> u8 {
    let volume = tx_count / 2;
    let activity = tx_count.min(100) / 2;
    volume.saturating_add(activity).min(100) as u8
}

pub fn derive_metrics(
    chain_id: u64,
    address: &str,
    balance: Decimal,
    tx_count: u64,
    block_number: Option<u64>,
) -> AccountMetrics {
    AccountMetrics {
        chain_id,
        address: address.to_string(),
        balance,
        tx_count,
        active_days_estimate: active_days_estimate(tx_count),
        contract_interactions: contract_interactions(tx_count),
        gas_spent: gas_spent(chain_id, tx_count),
        score: airdrop_score(tx_count),
        block_number,
    }
}
