pub mod dto;
pub mod handlers;

use axum::{routing::get, Router};

use crate::AppState;

pub fn create_router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        .route("/chains", get(handlers::list_chains))
        // Account activity
        .route("/analyze", get(handlers::analyze))
        .route("/analyze/all", get(handlers::analyze_all))
        // Airdrop eligibility
        .route("/eligibility", get(handlers::eligibility))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::metrics::fetcher::test_support::node;
    use airdrop_core::ChainDescriptor;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn chain(id: u64, url: String) -> ChainDescriptor {
        ChainDescriptor {
            id,
            name: format!("Test {id}"),
            symbol: "ETH".to_string(),
            endpoints: vec![url],
            metered_network: None,
        }
    }

    fn app(chains: Vec<ChainDescriptor>, demo_mode: bool) -> Router {
        let mut config = AppConfig::for_tests();
        config.chains = chains;
        config.eligibility.demo_mode = demo_mode;
        let state = AppState::build(config, vec![]).unwrap();
        create_router().with_state(state)
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_malformed_address_rejected_before_any_io() {
        let node = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&node)
            .await;
        let app = app(vec![chain(1, node.uri())], false);

        for uri in [
            "/analyze?address=0x123",
            "/analyze/all?address=not-an-address",
            "/eligibility",
            "/eligibility?address=0xzz91565c9e5846b348bf21707521e492614df376",
        ] {
            let (status, body) = get(app.clone(), uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body["success"], false);
            assert_eq!(body["error"], "Invalid address");
        }
    }

    #[tokio::test]
    async fn test_bad_chain_ids() {
        let app = app(vec![], false);
        let address = "0x1691565c9e5846b348bf21707521e492614df376";

        let (status, body) = get(app.clone(), &format!("/analyze?address={address}&chainId=abc")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid parameter");

        let (status, body) = get(app, &format!("/analyze?address={address}&chainId=999")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["chainId"], 999);
    }

    #[tokio::test]
    async fn test_analyze_single_chain() {
        // 1.5 ETH, nonce 60
        let node = node("0x14d1120d7b160000", "0x3c", "0x10").await;
        let app = app(vec![chain(1, node.uri())], false);

        let (status, body) = get(app, "/analyze?address=0x1691565C9E5846B348BF21707521E492614DF376").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["address"], "0x1691565c9e5846b348bf21707521e492614df376");
        assert_eq!(body["chainId"], 1);
        assert_eq!(body["chainName"], "Test 1");
        assert_eq!(body["balance"], "1.5000");
        assert_eq!(body["txCount"], 60);
        assert_eq!(body["activeDaysEstimate"], 120);
        assert_eq!(body["contractInteractions"], 18);
        assert_eq!(body["gasSpent"], "0.3000");
        assert_eq!(body["airdropScore"], 60);
        assert_eq!(body["rpcType"], "public");
    }

    #[tokio::test]
    async fn test_analyze_upstream_failure_envelope() {
        let node = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&node)
            .await;
        let app = app(vec![chain(137, node.uri())], false);

        let (status, body) = get(
            app,
            "/analyze?address=0x1691565c9e5846b348bf21707521e492614df376&chainId=137",
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "RPC Error");
        assert_eq!(body["chainId"], 137);
        assert!(body["suggestion"].is_string());
    }

    #[tokio::test]
    async fn test_analyze_all_partial_failure() {
        let node = node("0x1bc16d674ec80000", "0xa", "0x1").await;
        let app = app(vec![chain(1, node.uri())], false);

        let (status, body) = get(
            app,
            "/analyze/all?address=0x1691565c9e5846b348bf21707521e492614df376&chainIds=1,424242",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["chains"].as_array().unwrap().len(), 1);
        assert_eq!(body["failures"][0]["chainId"], 424242);
        assert_eq!(body["aggregate"]["chainName"], "Multi-Chain Aggregate");
        assert_eq!(body["aggregate"]["balance"], "2.0000");
        assert_eq!(body["aggregate"]["txCount"], 10);
        assert_eq!(body["aggregate"]["chainsChecked"], 1);
    }

    #[tokio::test]
    async fn test_eligibility_demo_mode() {
        let node = node("0x0", "0x3c", "0x1").await;
        let app = app(vec![chain(1, node.uri())], true);

        let (status, body) = get(app, "/eligibility?address=0x1691565c9e5846b348bf21707521e492614df376").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary"]["totalValue"], 3700.0);
        assert_eq!(body["summary"]["totalPending"], 1);
        assert_eq!(body["airdrops"][0]["programId"], "linea");
        assert_eq!(body["airdrops"][0]["source"], "demo");
        assert_eq!(body["metrics"]["nonce"], 60);
        assert_eq!(body["metrics"]["activity"], "high");
        assert_eq!(body["predictions"][0]["speculative"], true);
        assert!(body["checks"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_health_and_chains() {
        let app = app(vec![], false);

        let (status, body) = get(app.clone(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["chains"], 10);

        let (_, body) = get(app, "/chains").await;
        assert_eq!(body["chains"][0]["chainId"], 1);
        assert_eq!(body["chains"][0]["metered"], false);
    }
}
