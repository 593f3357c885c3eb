//! MCP request dispatcher.
//!
//! Routes `initialize`, `tools/list`, and `tools/call` to the tool modules.
//! Registered tools:
//! - `ab_get_balance` — native or ERC-20 balance, ENS-aware
//! - `ab_transfer_token` — native or ERC-20 transfer from the server wallet
//! - `ab_deploy_token_erc20` — deploy a BasicToken ERC-20
//! - `ab_agw_create_wallet` — deploy an Abstract Global Wallet smart account
//! - `ab_generate_wallet` — generate a fresh EOA keypair

use serde_json::{json, Value};
use tracing::{error, info};

use crate::error::ToolError;
use crate::mcp::protocol::{error_codes, Request, Response};
use crate::{tools, AppState};

/// Main dispatcher for all incoming MCP requests. Returns `None` for
/// notifications, which expect no response.
pub async fn handle_mcp_request(req: Request, state: AppState) -> Option<Response> {
    info!(method = %req.method, "handling MCP request");

    if req.is_notification() {
        return None;
    }

    let response = match req.method.as_str() {
        "initialize" => handle_initialize(&req),
        "tools/list" => handle_tools_list(&req),
        "tools/call" => handle_tool_call(req, state).await,
        // Convenience aliases so CLIs can invoke tools as direct methods;
        // rewritten into tools/call to reuse the same logic.
        name if is_tool_name(name) => {
            let wrapped = Request {
                jsonrpc: req.jsonrpc.clone(),
                id: req.id.clone(),
                method: "tools/call".to_string(),
                params: Some(json!({
                    "name": name,
                    "arguments": req.params.clone().unwrap_or_else(|| json!({}))
                })),
            };
            handle_tool_call(wrapped, state).await
        }
        _ => Response::error(
            req.id,
            error_codes::METHOD_NOT_FOUND,
            format!("Method not found: {}", req.method),
        ),
    };

    Some(response)
}

/// Handle one line of stdio framing: parse, dispatch, serialize. `None`
/// means nothing should be written back (blank line or notification).
pub async fn handle_line(line: &str, state: AppState) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let response = match serde_json::from_str::<Request>(line) {
        Ok(request) => handle_mcp_request(request, state).await?,
        Err(parse_error) => {
            error!("malformed JSON-RPC line: {}", parse_error);
            Response::error(
                Value::Null,
                error_codes::PARSE_ERROR,
                format!("Parse error: {}", parse_error),
            )
        }
    };

    serde_json::to_string(&response).ok().map(|json| json + "\n")
}

fn is_tool_name(name: &str) -> bool {
    matches!(
        name,
        tools::balance::NAME
            | tools::transfer::NAME
            | tools::deploy_token::NAME
            | tools::agw_wallet::NAME
            | tools::generate_wallet::NAME
    )
}

/// Handles a 'tools/call' request by dispatching to the named tool.
async fn handle_tool_call(req: Request, state: AppState) -> Response {
    let params = match req.params.as_ref() {
        Some(p) => p,
        None => {
            return Response::error(
                req.id,
                error_codes::INVALID_PARAMS,
                "Missing 'params' object".into(),
            )
        }
    };

    let tool_name = match params.get("name").and_then(|n| n.as_str()) {
        Some(name) => name.to_string(),
        None => {
            return Response::error(
                req.id,
                error_codes::INVALID_PARAMS,
                "Missing 'name' field in params".into(),
            )
        }
    };

    let empty_args = json!({});
    let args = params.get("arguments").unwrap_or(&empty_args);

    let result = match tool_name.as_str() {
        tools::balance::NAME => tools::balance::execute(&state, args).await,
        tools::transfer::NAME => tools::transfer::execute(&state, args).await,
        tools::deploy_token::NAME => tools::deploy_token::execute(&state, args).await,
        tools::agw_wallet::NAME => tools::agw_wallet::execute(&state, args).await,
        tools::generate_wallet::NAME => tools::generate_wallet::execute(&state, args).await,
        other => {
            return Response::error(
                req.id,
                error_codes::METHOD_NOT_FOUND,
                format!("Unknown tool: {}", other),
            )
        }
    };

    into_response(req.id, &tool_name, result)
}

/// Map a tool outcome onto the JSON-RPC envelope. Failures keep their raw
/// external detail in the error's `data` field; the message is the
/// user-facing description.
fn into_response(id: Value, tool_name: &str, result: Result<Value, ToolError>) -> Response {
    match result {
        Ok(payload) => Response::success(id, payload),
        Err(err) => {
            error!(tool = tool_name, error = %err, detail = ?err.detail(), "tool call failed");
            match err.detail() {
                Some(detail) => Response::error_with_data(
                    id,
                    err.rpc_code(),
                    err.to_string(),
                    json!({ "detail": detail }),
                ),
                None => Response::error(id, err.rpc_code(), err.to_string()),
            }
        }
    }
}

fn handle_initialize(req: &Request) -> Response {
    Response::success(
        req.id.clone(),
        json!({
            "serverInfo": { "name": "abstract_mcp", "version": env!("CARGO_PKG_VERSION") },
            "protocolVersion": "2025-06-18",
            "capabilities": { "tools": { "listChanged": false } },
            "instructions": "Abstract network MCP server: token deployment, balance queries, \
                transfers, AGW smart-account creation, and EOA key generation."
        }),
    )
}

/// Returns the JSON definitions of all registered tools.
fn handle_tools_list(req: &Request) -> Response {
    let tools = json!([
        tools::deploy_token::definition(),
        tools::balance::definition(),
        tools::transfer::definition(),
        tools::agw_wallet::definition(),
        tools::generate_wallet::definition(),
    ]);
    Response::success(req.id.clone(), json!({ "tools": tools }))
}
