//! Eligibility program catalog
//!
//! Each program names exactly one checker strategy. The set of strategies is
//! closed; adding one means adding a variant and handling it in
//! `eligibility::EligibilityService::check_program`.

use std::str::FromStr;

use airdrop_core::scoring::effective_status;
use airdrop_core::units::scale_base_units;
use airdrop_core::{
    ClaimStatus, CoreError, CoreResult, EligibilityResult, EstimatedAmount, ResultSource,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;

// =============================================================================
// Response schemas
// =============================================================================

/// Dotted path into a JSON document, parsed once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    pub fn parse(dotted: &str) -> Self {
        Self(dotted.split('.').map(String::from).collect())
    }

    pub fn lookup<'a>(&self, document: &'a Value) -> Option<&'a Value> {
        self.0.iter().try_fold(document, |node, key| node.get(key))
    }
}

impl std::fmt::Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

/// Where a remote eligibility API puts its answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseSchema {
    pub eligible: FieldPath,
    pub amount: Option<FieldPath>,
}

impl ResponseSchema {
    pub fn new(eligible: &str, amount: Option<&str>) -> Self {
        Self {
            eligible: FieldPath::parse(eligible),
            amount: amount.map(FieldPath::parse),
        }
    }

    /// Decode a response body. The eligible field must be present and
    /// boolean-like; the amount field is optional.
    pub fn decode(&self, document: &Value) -> CoreResult<Verdict> {
        let flag = self.eligible.lookup(document).ok_or_else(|| {
            CoreError::UnknownProtocolResponse(format!("missing field `{}`", self.eligible))
        })?;

        let eligible = match flag {
            Value::Bool(b) => *b,
            Value::Null => false,
            Value::Number(n) if n.as_u64() == Some(1) => true,
            Value::Number(n) if n.as_u64() == Some(0) => false,
            other => {
                return Err(CoreError::UnknownProtocolResponse(format!(
                    "field `{}` is not a flag: {other}",
                    self.eligible
                )))
            }
        };

        let amount = match self.amount.as_ref().and_then(|path| path.lookup(document)) {
            None | Some(Value::Null) => EstimatedAmount::Unknown,
            Some(value) => EstimatedAmount::Known(parse_amount(value)?),
        };

        Ok(Verdict { eligible, amount })
    }
}

/// Largest token amount any source may report (10^15 whole tokens).
const MAX_AMOUNT_UNITS: i64 = 1_000_000_000_000_000;

/// Parse a token amount from a JSON number or numeric string.
///
/// Negative amounts and amounts above `MAX_AMOUNT_UNITS` are rejected so
/// that summing a whole report can never overflow.
pub fn parse_amount(value: &Value) -> CoreResult<Decimal> {
    let raw = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        other => {
            return Err(CoreError::UnknownProtocolResponse(format!(
                "amount is not numeric: {other}"
            )))
        }
    };

    let amount = Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .map_err(|_| CoreError::UnknownProtocolResponse(format!("amount is not numeric: {raw}")))?;
    bounded_amount(amount)
}

fn bounded_amount(amount: Decimal) -> CoreResult<Decimal> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(CoreError::UnknownProtocolResponse(format!(
            "negative amount: {amount}"
        )));
    }
    if amount > Decimal::from(MAX_AMOUNT_UNITS) {
        return Err(CoreError::UnknownProtocolResponse(format!(
            "amount out of range: {amount}"
        )));
    }
    Ok(amount)
}

/// How an on-chain claim view's return word is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimDecoder {
    /// Claimable token amount in base units
    UintAmount { decimals: u32 },
    /// Nonzero means eligible; the amount is not exposed
    BoolFlag,
}

impl ClaimDecoder {
    pub fn decode(&self, word: u128) -> CoreResult<Verdict> {
        if word == 0 {
            return Ok(Verdict::ineligible());
        }
        match self {
            ClaimDecoder::UintAmount { decimals } => Ok(Verdict {
                eligible: true,
                amount: EstimatedAmount::Known(bounded_amount(scale_base_units(word, *decimals)?)?),
            }),
            ClaimDecoder::BoolFlag => Ok(Verdict {
                eligible: true,
                amount: EstimatedAmount::Unknown,
            }),
        }
    }
}

/// A checker's answer for one program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub eligible: bool,
    pub amount: EstimatedAmount,
}

impl Verdict {
    pub fn ineligible() -> Self {
        Self {
            eligible: false,
            amount: EstimatedAmount::Unknown,
        }
    }
}

// =============================================================================
// Programs
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckerStrategy {
    /// GET a JSON document keyed by address
    RemoteApi {
        url_template: String,
        schema: ResponseSchema,
    },
    /// `eth_call` of a claim view taking the address
    OnChainContract {
        chain_id: u64,
        contract: String,
        signature: String,
        decoder: ClaimDecoder,
    },
    /// Token balance view (`balanceOf`-style)
    DirectRpc {
        chain_id: u64,
        contract: String,
        signature: String,
        decimals: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibilityProgram {
    pub id: String,
    pub name: String,
    pub ticker: String,
    pub claim_url: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub base_status: ClaimStatus,
    pub strategy: CheckerStrategy,
}

impl EligibilityProgram {
    pub fn strategy_name(&self) -> &'static str {
        match self.strategy {
            CheckerStrategy::RemoteApi { .. } => "remote-api",
            CheckerStrategy::OnChainContract { .. } => "on-chain-contract",
            CheckerStrategy::DirectRpc { .. } => "direct-rpc",
        }
    }

    /// Record for an eligible verdict.
    pub fn to_result(&self, amount: EstimatedAmount, today: NaiveDate, window_days: i64) -> EligibilityResult {
        EligibilityResult {
            program_id: self.id.clone(),
            name: self.name.clone(),
            ticker: Some(self.ticker.clone()),
            eligible: true,
            amount,
            claim_url: self.claim_url.clone(),
            deadline: self.deadline,
            status: effective_status(self.base_status, self.deadline, today, window_days),
            source: ResultSource::Program,
        }
    }
}

/// Programs checked on every eligibility request.
pub fn builtin_programs() -> Vec<EligibilityProgram> {
    vec![
        EligibilityProgram {
            id: "linea-voyage".to_string(),
            name: "Linea Voyage".to_string(),
            ticker: "LINEA".to_string(),
            claim_url: Some("https://linea.build/claim".to_string()),
            deadline: None,
            base_status: ClaimStatus::Pending,
            strategy: CheckerStrategy::RemoteApi {
                url_template: "https://linea-xp-poh-api.linea.build/api/poh/{address}".to_string(),
                schema: ResponseSchema::new("pohStatus", Some("xpAmount")),
            },
        },
        EligibilityProgram {
            id: "arbitrum".to_string(),
            name: "Arbitrum".to_string(),
            ticker: "ARB".to_string(),
            claim_url: Some("https://arbitrum.foundation".to_string()),
            deadline: None,
            base_status: ClaimStatus::Claimable,
            strategy: CheckerStrategy::OnChainContract {
                chain_id: 42161,
                contract: "0x67a24CE4321aB3aF51c2D0a4801c3E111D88C9d9".to_string(),
                signature: "claimableTokens(address)".to_string(),
                decoder: ClaimDecoder::UintAmount { decimals: 18 },
            },
        },
        EligibilityProgram {
            id: "uniswap".to_string(),
            name: "Uniswap".to_string(),
            ticker: "UNI".to_string(),
            claim_url: None,
            deadline: None,
            base_status: ClaimStatus::Held,
            strategy: CheckerStrategy::DirectRpc {
                chain_id: 1,
                contract: "0x1f9840a85d5aF5bf1D1762F925BDADdC4201F984".to_string(),
                signature: "balanceOf(address)".to_string(),
                decimals: 18,
            },
        },
        EligibilityProgram {
            id: "1inch".to_string(),
            name: "1inch".to_string(),
            ticker: "1INCH".to_string(),
            claim_url: None,
            deadline: None,
            base_status: ClaimStatus::Held,
            strategy: CheckerStrategy::DirectRpc {
                chain_id: 1,
                contract: "0x111111111117dC0aa78b770fA6A738034120C302".to_string(),
                signature: "balanceOf(address)".to_string(),
                decimals: 18,
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_field_path_lookup() {
        let doc = json!({ "data": { "user": { "eligible": true } } });
        assert_eq!(FieldPath::parse("data.user.eligible").lookup(&doc), Some(&json!(true)));
        assert_eq!(FieldPath::parse("data.missing").lookup(&doc), None);
    }

    #[test]
    fn test_schema_flags() {
        let schema = ResponseSchema::new("pohStatus", Some("xpAmount"));

        let yes = schema.decode(&json!({ "pohStatus": true, "xpAmount": 1250 })).unwrap();
        assert!(yes.eligible);
        assert_eq!(yes.amount, EstimatedAmount::Known(dec!(1250)));

        let numeric = schema.decode(&json!({ "pohStatus": 1, "xpAmount": "12.5" })).unwrap();
        assert!(numeric.eligible);
        assert_eq!(numeric.amount, EstimatedAmount::Known(dec!(12.5)));

        let no = schema.decode(&json!({ "pohStatus": null })).unwrap();
        assert!(!no.eligible);
        assert_eq!(no.amount, EstimatedAmount::Unknown);
    }

    #[test]
    fn test_schema_rejects_unknown_shapes() {
        let schema = ResponseSchema::new("pohStatus", Some("xpAmount"));

        assert!(matches!(
            schema.decode(&json!({ "status": "ok" })),
            Err(CoreError::UnknownProtocolResponse(_))
        ));
        assert!(schema.decode(&json!({ "pohStatus": "yes" })).is_err());
        assert!(schema.decode(&json!({ "pohStatus": 2 })).is_err());
        assert!(schema.decode(&json!({ "pohStatus": true, "xpAmount": [1] })).is_err());
    }

    #[test]
    fn test_amount_out_of_range_rejected() {
        let schema = ResponseSchema::new("eligible", Some("amount"));

        for amount in [json!("79228162514264337593543950335"), json!("-5"), json!(-5), json!(1e16)] {
            assert!(
                matches!(
                    schema.decode(&json!({ "eligible": true, "amount": amount })),
                    Err(CoreError::UnknownProtocolResponse(_))
                ),
                "{amount}"
            );
        }

        assert_eq!(parse_amount(&json!("0")).unwrap(), Decimal::ZERO);
        assert_eq!(parse_amount(&json!(1e15)).unwrap(), Decimal::from(MAX_AMOUNT_UNITS));
        assert!(ClaimDecoder::UintAmount { decimals: 0 }.decode(u128::from(u64::MAX)).is_err());
    }

    #[test]
    fn test_claim_decoders() {
        let amount = ClaimDecoder::UintAmount { decimals: 18 };
        assert_eq!(amount.decode(0).unwrap(), Verdict::ineligible());
        assert_eq!(
            amount.decode(1_500_000_000_000_000_000).unwrap().amount,
            EstimatedAmount::Known(dec!(1.5))
        );

        let flag = ClaimDecoder::BoolFlag.decode(1).unwrap();
        assert!(flag.eligible);
        assert_eq!(flag.amount, EstimatedAmount::Unknown);
        assert!(ClaimDecoder::BoolFlag.decode(2).unwrap().eligible);
        assert!(!ClaimDecoder::BoolFlag.decode(0).unwrap().eligible);
    }

    #[test]
    fn test_builtin_catalog_is_well_formed() {
        let programs = builtin_programs();
        let mut ids: Vec<&str> = programs.iter().map(|p| p.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), programs.len());
        assert!(programs.iter().all(|p| match &p.strategy {
            CheckerStrategy::RemoteApi { url_template, .. } => url_template.contains("{address}"),
            _ => true,
        }));
    }

    #[test]
    fn test_to_result_applies_expiring_window() {
        let mut program = builtin_programs().remove(1);
        program.deadline = NaiveDate::from_ymd_opt(2026, 2, 3);

        let today = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let result = program.to_result(EstimatedAmount::Known(dec!(10)), today, 7);
        assert_eq!(result.status, ClaimStatus::Expiring);
        assert_eq!(result.source, ResultSource::Program);
        assert_eq!(result.ticker.as_deref(), Some("ARB"));
    }
}
