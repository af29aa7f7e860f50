use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::rpc::RpcError;

const RETRY_SUGGESTION: &str = "Network temporarily unavailable. Please try again.";
const METERED_SUGGESTION: &str =
    "The metered RPC endpoint failed as well. Check the API key or remove it to use public endpoints only.";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid parameter: {0}")]
    InvalidParam(String),

    #[error("Chain not supported: {0}")]
    UnsupportedChain(u64),

    #[error("{source}")]
    Upstream { chain_id: u64, source: RpcError },
}

impl AppError {
    /// Map an RPC failure for a single-chain operation.
    pub fn from_rpc(chain_id: u64, err: RpcError) -> Self {
        match err {
            RpcError::UnknownChain(id) => AppError::UnsupportedChain(id),
            source => AppError::Upstream { chain_id, source },
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    success: bool,
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    chain_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    suggestion: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, chain_id, suggestion) = match &self {
            AppError::InvalidAddress(address) => {
                tracing::warn!(address = %address, error_code = "INVALID_ADDRESS", "Invalid address");
                (StatusCode::BAD_REQUEST, "Invalid address", None, None)
            }
            AppError::InvalidParam(param) => {
                tracing::warn!(param = %param, error_code = "INVALID_PARAM", "Invalid parameter");
                (StatusCode::BAD_REQUEST, "Invalid parameter", None, None)
            }
            AppError::UnsupportedChain(chain_id) => {
                tracing::warn!(chain_id = %chain_id, error_code = "UNSUPPORTED_CHAIN", "Unsupported chain");
                (StatusCode::BAD_REQUEST, "Unsupported chain", Some(*chain_id), None)
            }
            AppError::Upstream { chain_id, source } => {
                tracing::error!(
                    chain_id = %chain_id,
                    error = %source,
                    error_code = "RPC_ERROR",
                    "Upstream RPC failure"
                );
                let suggestion = if source.tried_metered() {
                    METERED_SUGGESTION
                } else {
                    RETRY_SUGGESTION
                };
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "RPC Error",
                    Some(*chain_id),
                    Some(suggestion.to_string()),
                )
            }
        };

        tracing::debug!(
            status_code = %status.as_u16(),
            error_code = %code,
            error_message = %self.to_string(),
            "Returning error response"
        );

        let body = Json(ErrorResponse {
            success: false,
            error: code.to_string(),
            message: self.to_string(),
            chain_id,
            suggestion,
        });

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::{EndpointFailure, FailedAttempt};
    use airdrop_core::EndpointKind;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn exhausted(kind: EndpointKind) -> RpcError {
        RpcError::AllEndpointsExhausted {
            chain_id: 1,
            method: "eth_getBalance".to_string(),
            attempts: vec![FailedAttempt {
                endpoint: "https://eth-mainnet.g.alchemy.com/v2/***".to_string(),
                kind,
                failure: EndpointFailure::Status(401),
            }],
        }
    }

    #[tokio::test]
    async fn test_upstream_envelope() {
        let response = AppError::from_rpc(1, exhausted(EndpointKind::Public)).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "RPC Error");
        assert_eq!(body["chainId"], 1);
        assert_eq!(body["suggestion"], RETRY_SUGGESTION);
    }

    #[tokio::test]
    async fn test_metered_suggestion() {
        let body = body_json(AppError::from_rpc(1, exhausted(EndpointKind::Metered)).into_response()).await;
        assert_eq!(body["suggestion"], METERED_SUGGESTION);
    }

    #[tokio::test]
    async fn test_unknown_chain_is_bad_request() {
        let response = AppError::from_rpc(7, RpcError::UnknownChain(7)).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["chainId"], 7);
        assert!(body.get("suggestion").is_none());
    }
}
