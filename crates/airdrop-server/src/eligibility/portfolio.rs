//! Portfolio lookup (DeBank-style `user/addr` endpoint)
//!
//! Tokens already in the wallet whose symbol matches a catalog ticker are
//! reported as `held`.

use airdrop_core::{ClaimStatus, EligibilityResult, EstimatedAmount, EvmAddress, ResultSource};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use super::CheckError;
use crate::catalog::{parse_amount, EligibilityProgram};

#[derive(Debug, Deserialize)]
struct PortfolioResponse {
    #[serde(default)]
    data: Option<PortfolioData>,
}

#[derive(Debug, Deserialize)]
struct PortfolioData {
    #[serde(default)]
    tokens: Vec<PortfolioToken>,
}

#[derive(Debug, Deserialize)]
pub struct PortfolioToken {
    pub symbol: String,
    #[serde(default)]
    pub amount: Option<Value>,
}

impl PortfolioToken {
    fn amount(&self) -> EstimatedAmount {
        self.amount
            .as_ref()
            .and_then(|value| parse_amount(value).ok())
            .map_or(EstimatedAmount::Unknown, EstimatedAmount::Known)
    }
}

pub async fn fetch_tokens(http: &Client, api_url: &str, address: &EvmAddress) -> Result<Vec<PortfolioToken>, CheckError> {
    let response = http.get(api_url).query(&[("addr", address.as_str())]).send().await?;
    if !response.status().is_success() {
        return Err(CheckError::Status(response.status().as_u16()));
    }

    let body: PortfolioResponse = response.json().await?;
    Ok(body.data.map(|d| d.tokens).unwrap_or_default())
}

/// One `held` record per catalog program whose ticker the wallet holds.
pub fn held_records(tokens: &[PortfolioToken], programs: &[EligibilityProgram]) -> Vec<EligibilityResult> {
    programs
        .iter()
        .filter_map(|program| {
            let token = tokens
                .iter()
                .find(|t| t.symbol.eq_ignore_ascii_case(&program.ticker))?;
            Some(EligibilityResult {
                program_id: program.id.clone(),
                name: program.name.clone(),
                ticker: Some(program.ticker.clone()),
                eligible: true,
                amount: token.amount(),
                claim_url: None,
                deadline: None,
                status: ClaimStatus::Held,
                source: ResultSource::Portfolio,
            })
        })
        .collect()
}
