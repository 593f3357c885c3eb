//! End-to-end tests for the MCP dispatcher.
//!
//! The chain client points at a dead local endpoint, so any path that passes
//! validation and actually needs the network fails fast; everything asserted
//! here must be decided before (or instead of) a network round trip.

use axum::body::Body;
use axum::http::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use abstract_mcp_server::{
    chain::{client::ChainClient, deploy::SubprocessDeployer},
    config::{Config, Network},
    http::rpc_router,
    mcp::{
        handler::{handle_line, handle_mcp_request},
        protocol::{error_codes, Request, Response},
    },
    AppState,
};

const TEST_KEY: &str = "0x4f3edf983ac636a65a842ce7c78d9aa706d3b113bce9c46f30d7d21715b23b1d";

fn offline_config(private_key: Option<&str>) -> Config {
    Config {
        network: Network::Testnet,
        rpc_url: "http://127.0.0.1:1".to_string(),
        private_key: private_key.map(String::from),
        agw_factory_address: None,
        deploy_script: "scripts/deployBasicToken.js".to_string(),
        port: 8080,
    }
}

fn test_state(private_key: Option<&str>, deploy_script: Option<&str>) -> AppState {
    let config = offline_config(private_key);
    let chain_client = ChainClient::new(&config).unwrap();
    let deployer = Arc::new(SubprocessDeployer::new(
        "sh",
        deploy_script.unwrap_or("/bin/false"),
        config.rpc_url.clone(),
        config.private_key.clone(),
    ));
    AppState {
        config,
        chain_client,
        deployer,
    }
}

fn request(method: &str, params: Value) -> Request {
    Request {
        jsonrpc: "2.0".to_string(),
        id: json!(1),
        method: method.to_string(),
        params: Some(params),
    }
}

fn tool_call(name: &str, arguments: Value) -> Request {
    request("tools/call", json!({ "name": name, "arguments": arguments }))
}

async fn dispatch(state: AppState, req: Request) -> Response {
    handle_mcp_request(req, state).await.expect("expected a response")
}

#[tokio::test]
async fn test_initialize() {
    let resp = dispatch(test_state(None, None), request("initialize", json!({}))).await;
    let result = resp.result.unwrap();
    assert_eq!(result["serverInfo"]["name"], "abstract_mcp");
    assert!(result["capabilities"]["tools"].is_object());
}

#[tokio::test]
async fn test_tools_list_contains_all_tools() {
    let resp = dispatch(test_state(None, None), request("tools/list", json!({}))).await;
    let tools = resp.result.unwrap()["tools"].as_array().unwrap().clone();
    let names: Vec<&str> = tools.iter().filter_map(|t| t["name"].as_str()).collect();
    for expected in [
        "ab_deploy_token_erc20",
        "ab_get_balance",
        "ab_transfer_token",
        "ab_agw_create_wallet",
        "ab_generate_wallet",
    ] {
        assert!(names.contains(&expected), "missing tool {}", expected);
    }
}

#[tokio::test]
async fn test_notifications_get_no_response() {
    let req = Request {
        jsonrpc: "2.0".to_string(),
        id: Value::Null,
        method: "tools/list".to_string(),
        params: None,
    };
    assert!(handle_mcp_request(req, test_state(None, None)).await.is_none());
}

#[tokio::test]
async fn test_unknown_method_and_tool() {
    let resp = dispatch(test_state(None, None), request("no/such_method", json!({}))).await;
    assert_eq!(resp.error.unwrap().code, error_codes::METHOD_NOT_FOUND);

    let resp = dispatch(test_state(None, None), tool_call("no_such_tool", json!({}))).await;
    assert_eq!(resp.error.unwrap().code, error_codes::METHOD_NOT_FOUND);
}

#[tokio::test]
async fn test_tool_call_requires_params_and_name() {
    let req = Request {
        jsonrpc: "2.0".to_string(),
        id: json!(1),
        method: "tools/call".to_string(),
        params: None,
    };
    let resp = dispatch(test_state(None, None), req).await;
    assert_eq!(resp.error.unwrap().code, error_codes::INVALID_PARAMS);

    let resp = dispatch(
        test_state(None, None),
        request("tools/call", json!({ "arguments": {} })),
    )
    .await;
    assert_eq!(resp.error.unwrap().code, error_codes::INVALID_PARAMS);
}

#[tokio::test]
async fn test_balance_rejects_both_token_fields_before_any_network_call() {
    let resp = dispatch(
        test_state(None, None),
        tool_call(
            "ab_get_balance",
            json!({
                "address": "0x742d35Cc6634C0532925a3b844Bc454e4438f44e",
                "tokenAddress": "0x0000000000000000000000000000000000000001",
                "tokenSymbol": "ETH",
            }),
        ),
    )
    .await;
    let err = resp.error.unwrap();
    assert_eq!(err.code, error_codes::INVALID_PARAMS);
    assert!(err.message.contains("not both"));
}

#[tokio::test]
async fn test_balance_unknown_symbol() {
    let resp = dispatch(
        test_state(None, None),
        tool_call(
            "ab_get_balance",
            json!({
                "address": "0x742d35Cc6634C0532925a3b844Bc454e4438f44e",
                "tokenSymbol": "DOGE",
            }),
        ),
    )
    .await;
    let err = resp.error.unwrap();
    assert_eq!(err.code, error_codes::INVALID_PARAMS);
    assert!(err.message.contains("unknown token symbol"));
}

#[tokio::test]
async fn test_transfer_unresolvable_recipient_is_resolution_error() {
    // The dead endpoint makes the single ENS lookup fail, which must surface
    // as an address-resolution error, not a transport fault, and no
    // transaction may be constructed (no signer is even configured here).
    let resp = dispatch(
        test_state(None, None),
        tool_call(
            "ab_transfer_token",
            json!({ "to": "not-a-real-name.eth", "amount": "1" }),
        ),
    )
    .await;
    let err = resp.error.unwrap();
    assert_eq!(err.code, error_codes::INVALID_PARAMS);
    assert!(err.message.contains("unable to resolve address"));
}

#[tokio::test]
async fn test_transfer_without_signer_is_configuration_error() {
    // Raw address recipient: resolution is local, so the pipeline reaches
    // the signer check without touching the network.
    let resp = dispatch(
        test_state(None, None),
        tool_call(
            "ab_transfer_token",
            json!({
                "to": "0x742d35Cc6634C0532925a3b844Bc454e4438f44e",
                "amount": "0.5",
            }),
        ),
    )
    .await;
    let err = resp.error.unwrap();
    assert_eq!(err.code, error_codes::INTERNAL_ERROR);
    assert!(err.message.contains("ABSTRACT_PRIVATE_KEY"));
}

#[tokio::test]
async fn test_transfer_rejects_excess_precision() {
    let resp = dispatch(
        test_state(Some(TEST_KEY), None),
        tool_call(
            "ab_transfer_token",
            json!({
                "to": "0x742d35Cc6634C0532925a3b844Bc454e4438f44e",
                // 19 fractional digits against ETH's 18 decimals.
                "amount": "1.0000000000000000001",
            }),
        ),
    )
    .await;
    let err = resp.error.unwrap();
    assert_eq!(err.code, error_codes::INVALID_PARAMS);
    assert!(err.message.contains("fractional digits"));
}

#[tokio::test]
async fn test_deploy_token_validates_supply_shape() {
    let resp = dispatch(
        test_state(Some(TEST_KEY), None),
        tool_call(
            "ab_deploy_token_erc20",
            json!({ "name": "DemoToken", "symbol": "DMT", "initialSupply": "1.5" }),
        ),
    )
    .await;
    let err = resp.error.unwrap();
    assert_eq!(err.code, error_codes::INVALID_PARAMS);
    assert!(err.message.contains("initialSupply"));
}

#[tokio::test]
async fn test_deploy_token_success_parses_address() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("deploy.sh");
    std::fs::write(
        &script,
        "#!/bin/sh\necho \"BasicToken deployed at: 0x5FbDB2315678afecb367f032d93F642f64180aa3\"\n",
    )
    .unwrap();

    let resp = dispatch(
        test_state(Some(TEST_KEY), Some(&script.to_string_lossy())),
        tool_call(
            "ab_deploy_token_erc20",
            json!({
                "name": "DemoToken",
                "symbol": "DMT",
                "initialSupply": "1000000000000000000000",
            }),
        ),
    )
    .await;
    let result = resp.result.unwrap();
    assert_eq!(
        result["contractAddress"],
        "0x5FbDB2315678afecb367f032d93F642f64180aa3"
    );
    assert_eq!(result["totalSupply"], "1000");
}

#[tokio::test]
async fn test_deploy_token_subprocess_failure_surfaces_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("deploy.sh");
    std::fs::write(
        &script,
        "#!/bin/sh\necho 'insufficient funds for gas' >&2\nexit 1\n",
    )
    .unwrap();

    let resp = dispatch(
        test_state(Some(TEST_KEY), Some(&script.to_string_lossy())),
        tool_call(
            "ab_deploy_token_erc20",
            json!({ "name": "DemoToken", "symbol": "DMT", "initialSupply": "1" }),
        ),
    )
    .await;
    let err = resp.error.unwrap();
    assert_eq!(err.code, error_codes::INTERNAL_ERROR);
    // Friendly classification in the message, raw stderr in the data.
    assert!(err.message.contains("Insufficient funds"));
    assert!(err.data.unwrap()["detail"]
        .as_str()
        .unwrap()
        .contains("insufficient funds for gas"));
}

#[tokio::test]
async fn test_generate_wallet_returns_keypair() {
    let resp = dispatch(
        test_state(None, None),
        tool_call("ab_generate_wallet", json!({})),
    )
    .await;
    let result = resp.result.unwrap();
    let private_key = result["privateKey"].as_str().unwrap();
    let address = result["address"].as_str().unwrap();
    assert!(private_key.starts_with("0x"));
    assert_eq!(private_key.len(), 66);
    assert!(address.starts_with("0x"));
    assert_eq!(address.len(), 42);
}

#[tokio::test]
async fn test_agw_create_wallet_without_signer_or_param() {
    let resp = dispatch(
        test_state(None, None),
        tool_call("ab_agw_create_wallet", json!({})),
    )
    .await;
    let err = resp.error.unwrap();
    assert_eq!(err.code, error_codes::INTERNAL_ERROR);
    assert!(err.message.contains("configuration error"));
}

#[tokio::test]
async fn test_http_rpc_route_serves_tools_list() {
    let app = rpc_router(test_state(None, None));
    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/rpc")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "jsonrpc": "2.0", "id": 1, "method": "tools/list", "params": {} })
                .to_string(),
        ))
        .unwrap();

    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let parsed: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(parsed["result"]["tools"].is_array());
}

#[tokio::test]
async fn test_http_rejects_notifications() {
    // No id means no response to send back, which HTTP cannot express.
    let app = rpc_router(test_state(None, None));
    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/rpc")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "jsonrpc": "2.0", "method": "tools/list" }).to_string(),
        ))
        .unwrap();

    let response = app.oneshot(req).await.unwrap();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let parsed: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(parsed["error"]["code"], error_codes::INVALID_REQUEST);
}

#[tokio::test]
async fn test_handle_line_reports_parse_errors() {
    let reply = handle_line("{not json", test_state(None, None))
        .await
        .unwrap();
    assert!(reply.ends_with('\n'));
    let parsed: Value = serde_json::from_str(&reply).unwrap();
    assert_eq!(parsed["error"]["code"], error_codes::PARSE_ERROR);
}

#[tokio::test]
async fn test_handle_line_skips_blank_lines_and_notifications() {
    assert!(handle_line("   ", test_state(None, None)).await.is_none());

    let notification = json!({ "jsonrpc": "2.0", "method": "tools/list" }).to_string();
    assert!(handle_line(&notification, test_state(None, None))
        .await
        .is_none());
}

#[test]
fn test_invalid_configuration_exits_nonzero() {
    // Supervisors need a failing exit status when startup validation fails.
    let status = std::process::Command::new(env!("CARGO_BIN_EXE_abstract_mcp"))
        .env("PORT", "not-a-number")
        .stdin(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .unwrap();
    assert!(!status.success());
}

#[tokio::test]
async fn test_direct_method_alias() {
    // Tool names double as direct JSON-RPC methods.
    let resp = dispatch(
        test_state(None, None),
        request("ab_generate_wallet", json!({})),
    )
    .await;
    assert!(resp.result.unwrap()["privateKey"].is_string());
}
