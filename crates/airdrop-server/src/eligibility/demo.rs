//! Demo records, only mixed in when `eligibility.demo_mode` is on.
//!
//! Everything produced here is labeled `source: demo`. Amounts are a pure
//! function of activity so repeated requests agree.

use airdrop_core::scoring::effective_status;
use airdrop_core::{AccountMetrics, ClaimStatus, EligibilityResult, EstimatedAmount, EvmAddress, ResultSource};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

struct DemoOverride {
    address: &'static str,
    program_id: &'static str,
    name: &'static str,
    ticker: &'static str,
    amount: u32,
    status: ClaimStatus,
}

const OVERRIDES: &[DemoOverride] = &[
    DemoOverride {
        address: "0x1691565c9e5846b348bf21707521e492614df376",
        program_id: "linea",
        name: "Linea",
        ticker: "LINEA",
        amount: 2500,
        status: ClaimStatus::Claimable,
    },
    DemoOverride {
        address: "0x1691565c9e5846b348bf21707521e492614df376",
        program_id: "eigenlayer",
        name: "EigenLayer",
        ticker: "EIGEN",
        amount: 1200,
        status: ClaimStatus::Pending,
    },
];

struct DemoTier {
    id: &'static str,
    name: &'static str,
    min_tx: u64,
    /// Minimum native balance, in hundredths
    min_value_cents: i64,
    max_reward: u32,
    deadline: (i32, u32, u32),
    status: ClaimStatus,
}

const TIERS: &[DemoTier] = &[
    DemoTier { id: "pengu", name: "Pengu", min_tx: 5, min_value_cents: 10, max_reward: 2098, deadline: (2026, 2, 15), status: ClaimStatus::Claimable },
    DemoTier { id: "venice", name: "Venice AI", min_tx: 10, min_value_cents: 50, max_reward: 755, deadline: (2026, 2, 20), status: ClaimStatus::Claimable },
    DemoTier { id: "morse", name: "Morse", min_tx: 3, min_value_cents: 5, max_reward: 449, deadline: (2026, 1, 30), status: ClaimStatus::Expiring },
    DemoTier { id: "looped", name: "loopedHYPE", min_tx: 8, min_value_cents: 20, max_reward: 324, deadline: (2026, 3, 1), status: ClaimStatus::Claimable },
    DemoTier { id: "monad", name: "Monad", min_tx: 20, min_value_cents: 100, max_reward: 3000, deadline: (2026, 4, 1), status: ClaimStatus::Pending },
    DemoTier { id: "eclipse", name: "Eclipse", min_tx: 15, min_value_cents: 50, max_reward: 1500, deadline: (2026, 2, 28), status: ClaimStatus::Claimable },
];

/// `floor(maxReward * min(min(tx/50, 1) + balance/10, 1) * 3/4)`
pub fn tier_amount(max_reward: u32, tx_count: u64, balance: Decimal) -> Decimal {
    let tx_factor = (Decimal::from(tx_count) / dec!(50)).min(Decimal::ONE);
    let factor = (tx_factor + balance / dec!(10)).min(Decimal::ONE);
    (Decimal::from(max_reward) * factor * dec!(3) / dec!(4)).floor()
}

pub fn records(
    address: &EvmAddress,
    activity: Option<&AccountMetrics>,
    today: NaiveDate,
    window_days: i64,
) -> Vec<EligibilityResult> {
    let mut results: Vec<EligibilityResult> = OVERRIDES
        .iter()
        .filter(|o| o.address == address.as_str())
        .map(|o| EligibilityResult {
            program_id: o.program_id.to_string(),
            name: o.name.to_string(),
            ticker: Some(o.ticker.to_string()),
            eligible: true,
            amount: EstimatedAmount::Known(Decimal::from(o.amount)),
            claim_url: None,
            deadline: None,
            status: o.status,
            source: ResultSource::Demo,
        })
        .collect();

    if let Some(metrics) = activity {
        results.extend(
            TIERS
                .iter()
                .filter(|t| metrics.tx_count >= t.min_tx && metrics.balance >= Decimal::new(t.min_value_cents, 2))
                .map(|t| {
                    let (y, m, d) = t.deadline;
                    let deadline = NaiveDate::from_ymd_opt(y, m, d);
                    EligibilityResult {
                        program_id: t.id.to_string(),
                        name: t.name.to_string(),
                        ticker: None,
                        eligible: true,
                        amount: EstimatedAmount::Known(tier_amount(t.max_reward, metrics.tx_count, metrics.balance)),
                        claim_url: None,
                        deadline,
                        status: effective_status(t.status, deadline, today, window_days),
                        source: ResultSource::Demo,
                    }
                }),
        );
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use airdrop_core::metrics::derive_metrics;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
    }

    #[test]
    fn test_tier_amount_is_deterministic() {
        assert_eq!(tier_amount(2098, 60, dec!(1.5)), dec!(1573));
        assert_eq!(tier_amount(2098, 10, dec!(0.2)), dec!(346));
        assert_eq!(tier_amount(2098, 10, dec!(0.2)), tier_amount(2098, 10, dec!(0.2)));
        assert_eq!(tier_amount(449, 0, Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_override_address_is_case_insensitive() {
        let address = EvmAddress::parse("0x1691565C9E5846B348BF21707521E492614DF376").unwrap();
        let results = records(&address, None, today(), 7);

        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.source == ResultSource::Demo));
        assert_eq!(results[0].amount, EstimatedAmount::Known(dec!(2500)));
        assert_eq!(results[1].status, ClaimStatus::Pending);
    }

    #[test]
    fn test_tiers_follow_thresholds() {
        let address = EvmAddress::parse("0x000000000000000000000000000000000000dead").unwrap();
        let metrics = derive_metrics(1, address.as_str(), dec!(0.2), 10, None);

        let ids: Vec<String> = records(&address, Some(&metrics), today(), 7)
            .into_iter()
            .map(|r| r.program_id)
            .collect();
        assert_eq!(ids, vec!["pengu", "morse", "looped"]);
    }
}
