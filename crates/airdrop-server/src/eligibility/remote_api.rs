use airdrop_core::EvmAddress;
use reqwest::Client;
use serde_json::Value;

use super::CheckError;
use crate::catalog::{ResponseSchema, Verdict};

pub fn render_url(url_template: &str, address: &EvmAddress) -> String {
    url_template.replace("{address}", address.as_str())
}

pub async fn check(
    http: &Client,
    url_template: &str,
    schema: &ResponseSchema,
    address: &EvmAddress,
) -> Result<Verdict, CheckError> {
    let url = render_url(url_template, address);
    tracing::debug!(url = %url, "Querying remote eligibility API");

    let response = http.get(&url).send().await?;
    if !response.status().is_success() {
        return Err(CheckError::Status(response.status().as_u16()));
    }

    let document: Value = response.json().await?;
    Ok(schema.decode(&document)?)
}
