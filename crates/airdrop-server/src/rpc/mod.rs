pub mod abi;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use airdrop_core::units::{parse_hex_quantity, wei_to_native};
use airdrop_core::{CoreError, Endpoint, EndpointKind, EndpointRegistry, EvmAddress};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

// ============================================================================
// Resilient JSON-RPC Client - ordered failover across a chain's endpoints
// ============================================================================

static NEXT_REQUEST_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Serialize)]
pub struct RpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub method: &'a str,
    pub params: &'a [Value],
    pub id: u64,
}

impl<'a> RpcRequest<'a> {
    pub fn new(method: &'a str, params: &'a [Value]) -> Self {
        Self {
            jsonrpc: "2.0",
            method,
            params,
            id: NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
}

/// Why a single endpoint attempt was abandoned.
#[derive(Debug, Clone, Error)]
pub enum EndpointFailure {
    #[error("timed out after {0}ms")]
    Timeout(u128),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("http status {0}")]
    Status(u16),

    #[error("rpc error: {0}")]
    Rpc(String),

    #[error("undecodable response: {0}")]
    Decode(String),
}

#[derive(Debug, Clone)]
pub struct FailedAttempt {
    /// Redacted endpoint URL
    pub endpoint: String,
    pub kind: EndpointKind,
    pub failure: EndpointFailure,
}

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("Chain not supported: {0}")]
    UnknownChain(u64),

    #[error("All RPC endpoints failed for chain {chain_id} ({method}, {} attempts)", .attempts.len())]
    AllEndpointsExhausted {
        chain_id: u64,
        method: String,
        attempts: Vec<FailedAttempt>,
    },

    #[error("Unexpected {method} result on chain {chain_id}: {reason}")]
    UnknownProtocolResponse {
        chain_id: u64,
        method: String,
        reason: String,
    },
}

impl RpcError {
    /// Whether a metered endpoint was among the failed attempts.
    pub fn tried_metered(&self) -> bool {
        match self {
            RpcError::AllEndpointsExhausted { attempts, .. } => {
                attempts.iter().any(|a| a.kind == EndpointKind::Metered)
            }
            _ => false,
        }
    }

    fn protocol(chain_id: u64, method: &str, err: CoreError) -> Self {
        RpcError::UnknownProtocolResponse {
            chain_id,
            method: method.to_string(),
            reason: err.to_string(),
        }
    }
}

#[derive(Clone)]
pub struct RpcClient {
    client: Client,
    registry: Arc<EndpointRegistry>,
    timeout: Duration,
}

impl RpcClient {
    pub fn new(registry: Arc<EndpointRegistry>, timeout: Duration) -> Result<Self, reqwest::Error> {
        tracing::debug!(
            chains = %registry.chains().len(),
            metered = %registry.has_metered_key(),
            timeout_ms = %timeout.as_millis(),
            "Creating RPC client"
        );

        Ok(Self {
            client: Client::builder().build()?,
            registry,
            timeout,
        })
    }

    pub fn registry(&self) -> &EndpointRegistry {
        &self.registry
    }

    /// Issue one logical request, walking the chain's endpoints in registry
    /// order until one returns a well-formed result.
    pub async fn call(&self, chain_id: u64, method: &str, params: Vec<Value>) -> Result<Value, RpcError> {
        let endpoints = self.registry.endpoints(chain_id).map_err(|e| match e {
            CoreError::UnknownChain(id) => RpcError::UnknownChain(id),
            other => RpcError::protocol(chain_id, method, other),
        })?;

        let request = RpcRequest::new(method, &params);
        let mut attempts = Vec::with_capacity(endpoints.len());

        for endpoint in &endpoints {
            let start = Instant::now();
            match self.attempt(endpoint, &request).await {
                Ok(result) => {
                    tracing::debug!(
                        chain_id = %chain_id,
                        method = %method,
                        endpoint = %endpoint.redacted(),
                        duration_ms = %start.elapsed().as_millis(),
                        "RPC call succeeded"
                    );
                    return Ok(result);
                }
                Err(failure) => {
                    tracing::warn!(
                        chain_id = %chain_id,
                        method = %method,
                        endpoint = %endpoint.redacted(),
                        error = %failure,
                        "RPC endpoint failed, trying next"
                    );
                    attempts.push(FailedAttempt {
                        endpoint: endpoint.redacted(),
                        kind: endpoint.kind,
                        failure,
                    });
                }
            }
        }

        tracing::error!(
            chain_id = %chain_id,
            method = %method,
            attempts = %attempts.len(),
            "All RPC endpoints exhausted"
        );
        Err(RpcError::AllEndpointsExhausted {
            chain_id,
            method: method.to_string(),
            attempts,
        })
    }

    async fn attempt(&self, endpoint: &Endpoint, request: &RpcRequest<'_>) -> Result<Value, EndpointFailure> {
        let response = self
            .client
            .post(&endpoint.url)
            .timeout(self.timeout)
            .json(request)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        if !response.status().is_success() {
            return Err(EndpointFailure::Status(response.status().as_u16()));
        }

        let body: RpcResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                self.classify(e)
            } else {
                EndpointFailure::Decode(e.to_string())
            }
        })?;

        if let Some(error) = body.error {
            return Err(EndpointFailure::Rpc(error.to_string()));
        }
        match body.result {
            Some(Value::Null) | None => Err(EndpointFailure::Decode("missing result".to_string())),
            Some(result) => Ok(result),
        }
    }

    fn classify(&self, err: reqwest::Error) -> EndpointFailure {
        if err.is_timeout() {
            EndpointFailure::Timeout(self.timeout.as_millis())
        } else {
            EndpointFailure::Transport(err.without_url().to_string())
        }
    }

    async fn call_string(&self, chain_id: u64, method: &str, params: Vec<Value>) -> Result<String, RpcError> {
        match self.call(chain_id, method, params).await? {
            Value::String(s) => Ok(s),
            other => Err(RpcError::UnknownProtocolResponse {
                chain_id,
                method: method.to_string(),
                reason: format!("expected hex string, got {other}"),
            }),
        }
    }

    /// Native balance in whole units.
    pub async fn get_balance(&self, chain_id: u64, address: &EvmAddress) -> Result<Decimal, RpcError> {
        let method = "eth_getBalance";
        let hex = self
            .call_string(chain_id, method, vec![json!(address.as_str()), json!("latest")])
            .await?;
        wei_to_native(&hex).map_err(|e| RpcError::protocol(chain_id, method, e))
    }

    pub async fn get_transaction_count(&self, chain_id: u64, address: &EvmAddress) -> Result<u64, RpcError> {
        let method = "eth_getTransactionCount";
        let hex = self
            .call_string(chain_id, method, vec![json!(address.as_str()), json!("latest")])
            .await?;
        self.quantity_u64(chain_id, method, &hex)
    }

    pub async fn block_number(&self, chain_id: u64) -> Result<u64, RpcError> {
        let method = "eth_blockNumber";
        let hex = self.call_string(chain_id, method, vec![]).await?;
        self.quantity_u64(chain_id, method, &hex)
    }

    /// Read-only contract call against the latest block. Returns the raw hex
    /// return data.
    pub async fn eth_call(&self, chain_id: u64, to: &str, data: &str) -> Result<String, RpcError> {
        self.call_string(
            chain_id,
            "eth_call",
            vec![json!({ "to": to, "data": data }), json!("latest")],
        )
        .await
    }

    fn quantity_u64(&self, chain_id: u64, method: &str, hex: &str) -> Result<u64, RpcError> {
        let value = parse_hex_quantity(hex).map_err(|e| RpcError::protocol(chain_id, method, e))?;
        u64::try_from(value).map_err(|_| RpcError::UnknownProtocolResponse {
            chain_id,
            method: method.to_string(),
            reason: format!("{hex} does not fit in 64 bits"),
        })
    }
}
