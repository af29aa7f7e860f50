use airdrop_core::units::scale_base_units;
use airdrop_core::{EstimatedAmount, EvmAddress};

use super::CheckError;
use crate::catalog::{ClaimDecoder, Verdict};
use crate::rpc::abi::{decode_uint_word, encode_address_call};
use crate::rpc::RpcClient;

async fn call_word(
    rpc: &RpcClient,
    chain_id: u64,
    contract: &str,
    signature: &str,
    address: &EvmAddress,
) -> Result<u128, CheckError> {
    let data = encode_address_call(signature, address);
    let raw = rpc.eth_call(chain_id, contract, &data).await?;
    Ok(decode_uint_word(&raw)?)
}

/// Claim view on a distributor contract.
pub async fn check_claim(
    rpc: &RpcClient,
    chain_id: u64,
    contract: &str,
    signature: &str,
    decoder: ClaimDecoder,
    address: &EvmAddress,
) -> Result<Verdict, CheckError> {
    let word = call_word(rpc, chain_id, contract, signature, address).await?;
    Ok(decoder.decode(word)?)
}

/// Token balance check: any nonzero balance counts.
pub async fn check_balance(
    rpc: &RpcClient,
    chain_id: u64,
    contract: &str,
    signature: &str,
    decimals: u32,
    address: &EvmAddress,
) -> Result<Verdict, CheckError> {
    let balance = call_word(rpc, chain_id, contract, signature, address).await?;
    if balance == 0 {
        return Ok(Verdict::ineligible());
    }
    Ok(Verdict {
        eligible: true,
        amount: EstimatedAmount::Known(scale_base_units(balance, decimals)?),
    })
}
