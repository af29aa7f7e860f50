//! Eligibility scoring
//!
//! Merges normalized eligibility records into a ranked summary and applies
//! the fixed prediction rule table to primary-chain activity.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{
    ActivityProfile, ClaimStatus, EligibilityResult, EligibilitySummary, Prediction,
};

/// A speculative prediction rule: fires when the nonce is strictly above
/// `min_nonce`.
struct PredictionRule {
    min_nonce: u64,
    name: &'static str,
    confidence: u8,
    est_amount: &'static str,
    reason: &'static str,
}

const PREDICTION_RULES: &[PredictionRule] = &[
    PredictionRule {
        min_nonce: 50,
        name: "LayerZero (Speculated)",
        confidence: 75,
        est_amount: "$1,000 - $3,000",
        reason: "High transaction count detected",
    },
    PredictionRule {
        min_nonce: 100,
        name: "zkSync (Rumored)",
        confidence: 60,
        est_amount: "$500 - $2,000",
        reason: "Active DeFi user profile",
    },
];

/// Status of a freshly built record. Claimable rewards whose deadline falls
/// within `window_days` of `today` (and is not past) are reported as expiring.
pub fn effective_status(
    base: ClaimStatus,
    deadline: Option<NaiveDate>,
    today: NaiveDate,
    window_days: i64,
) -> ClaimStatus {
    match (base, deadline) {
        (ClaimStatus::Claimable, Some(deadline)) => {
            let days_left = (deadline - today).num_days();
            if (0..=window_days).contains(&days_left) {
                ClaimStatus::Expiring
            } else {
                ClaimStatus::Claimable
            }
        }
        (status, _) => status,
    }
}

/// Sort by descending estimated amount. Unknown amounts count as zero and
/// ties keep their enumeration order (`sort_by` is stable).
pub fn rank(mut results: Vec<EligibilityResult>) -> Vec<EligibilityResult> {
    results.sort_by(|a, b| b.amount.value_or_zero().cmp(&a.amount.value_or_zero()));
    results
}

/// Build the summary from merged records. Ineligible records are dropped.
pub fn summarize(results: Vec<EligibilityResult>) -> EligibilitySummary {
    let eligible: Vec<EligibilityResult> = results.into_iter().filter(|r| r.eligible).collect();

    let count = |status: ClaimStatus| eligible.iter().filter(|r| r.status == status).count();
    let total_claimable = count(ClaimStatus::Claimable);
    let total_pending = count(ClaimStatus::Pending);
    let total_expiring = count(ClaimStatus::Expiring);
    // Saturates instead of panicking if callers pass unbounded amounts.
    let total_value = eligible
        .iter()
        .map(|r| r.amount.value_or_zero())
        .fold(Decimal::ZERO, |acc, v| acc.checked_add(v).unwrap_or(Decimal::MAX));

    EligibilitySummary {
        total_claimable,
        total_pending,
        total_expiring,
        total_value,
        ranked: rank(eligible),
    }
}

pub fn predict(profile: &ActivityProfile) -> Vec<Prediction> {
    PREDICTION_RULES
        .iter()
        .filter(|rule| profile.nonce > rule.min_nonce)
        .map(|rule| Prediction {
            name: rule.name.to_string(),
            confidence: rule.confidence,
            est_amount: rule.est_amount.to_string(),
            reason: rule.reason.to_string(),
            speculative: true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EstimatedAmount, ResultSource};
    use rust_decimal_macros::dec;

    fn result(id: &str, amount: EstimatedAmount, status: ClaimStatus) -> EligibilityResult {
        EligibilityResult {
            program_id: id.to_string(),
            name: id.to_string(),
            ticker: None,
            eligible: true,
            amount,
            claim_url: None,
            deadline: None,
            status,
            source: ResultSource::Program,
        }
    }

    fn ids(results: &[EligibilityResult]) -> Vec<&str> {
        results.iter().map(|r| r.program_id.as_str()).collect()
    }

    #[test]
    fn test_rank_descending_with_stable_ties() {
        let ranked = rank(vec![
            result("a", EstimatedAmount::Known(dec!(10)), ClaimStatus::Claimable),
            result("b", EstimatedAmount::Known(dec!(50)), ClaimStatus::Claimable),
            result("c", EstimatedAmount::Known(dec!(10)), ClaimStatus::Claimable),
            result("d", EstimatedAmount::Unknown, ClaimStatus::Pending),
            result("e", EstimatedAmount::Known(dec!(0)), ClaimStatus::Pending),
        ]);
        assert_eq!(ids(&ranked), vec!["b", "a", "c", "d", "e"]);
    }

    #[test]
    fn test_summary_counts_and_value() {
        let mut ineligible = result("x", EstimatedAmount::Known(dec!(999)), ClaimStatus::Claimable);
        ineligible.eligible = false;

        let summary = summarize(vec![
            result("linea", EstimatedAmount::Known(dec!(2500)), ClaimStatus::Claimable),
            result("eigen", EstimatedAmount::Known(dec!(1200)), ClaimStatus::Pending),
            result("morse", EstimatedAmount::Unknown, ClaimStatus::Expiring),
            ineligible,
        ]);

        assert_eq!(summary.total_claimable, 1);
        assert_eq!(summary.total_pending, 1);
        assert_eq!(summary.total_expiring, 1);
        assert_eq!(summary.total_value, dec!(3700));
        assert_eq!(ids(&summary.ranked), vec!["linea", "eigen", "morse"]);
    }

    #[test]
    fn test_summary_total_saturates() {
        let summary = summarize(vec![
            result("a", EstimatedAmount::Known(Decimal::MAX), ClaimStatus::Claimable),
            result("b", EstimatedAmount::Known(Decimal::MAX), ClaimStatus::Claimable),
        ]);

        assert_eq!(summary.total_value, Decimal::MAX);
        assert_eq!(summary.total_claimable, 2);
    }

    #[test]
    fn test_empty_summary() {
        let summary = summarize(vec![]);
        assert_eq!(summary.total_value, Decimal::ZERO);
        assert!(summary.ranked.is_empty());
    }

    #[test]
    fn test_predictions_threshold_50_only() {
        let predictions = predict(&ActivityProfile::from_nonce(60));
        assert_eq!(predictions.len(), 1);
        assert_eq!(predictions[0].name, "LayerZero (Speculated)");
        assert_eq!(predictions[0].confidence, 75);
        assert!(predictions[0].speculative);
    }

    #[test]
    fn test_predictions_boundaries() {
        assert!(predict(&ActivityProfile::from_nonce(50)).is_empty());
        assert_eq!(predict(&ActivityProfile::from_nonce(100)).len(), 1);
        assert_eq!(predict(&ActivityProfile::from_nonce(101)).len(), 2);
        assert!(predict(&ActivityProfile::unknown()).is_empty());
    }

    #[test]
    fn test_effective_status_expiring_window() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 25).unwrap();
        let soon = NaiveDate::from_ymd_opt(2026, 1, 30);
        let later = NaiveDate::from_ymd_opt(2026, 3, 1);
        let past = NaiveDate::from_ymd_opt(2026, 1, 1);

        assert_eq!(effective_status(ClaimStatus::Claimable, soon, today, 7), ClaimStatus::Expiring);
        assert_eq!(effective_status(ClaimStatus::Claimable, later, today, 7), ClaimStatus::Claimable);
        assert_eq!(effective_status(ClaimStatus::Claimable, past, today, 7), ClaimStatus::Claimable);
        assert_eq!(effective_status(ClaimStatus::Claimable, None, today, 7), ClaimStatus::Claimable);
        assert_eq!(effective_status(ClaimStatus::Pending, soon, today, 7), ClaimStatus::Pending);
    }
}
