//! Error types for Airdrop Core

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Unknown chain: {0}")]
    UnknownChain(u64),

    #[error("Invalid chain descriptor: {0}")]
    InvalidChain(String),

    #[error("Unknown protocol response: {0}")]
    UnknownProtocolResponse(String),

    #[error("Value out of range: {0}")]
    Overflow(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
