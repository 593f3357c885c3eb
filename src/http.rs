// src/http.rs
//
// Optional HTTP transport: the same JSON-RPC surface as stdio, exposed on a
// single /rpc route.

use axum::{extract::State, routing::post, Json, Router};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::mcp::handler::handle_mcp_request;
use crate::mcp::protocol::{error_codes, Request, Response};
use crate::AppState;

/// The JSON-RPC router for HTTP mode. Split from `serve` so tests can drive
/// it in-process with `tower::ServiceExt::oneshot`.
pub fn rpc_router(state: AppState) -> Router {
    Router::new()
        .route("/rpc", post(rpc_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn rpc_handler(State(state): State<AppState>, Json(req): Json<Request>) -> Json<Response> {
    match handle_mcp_request(req, state).await {
        Some(resp) => Json(resp),
        // HTTP is request/response; a notification has nothing to answer
        // with, so it is rejected rather than silently dropped.
        None => Json(Response::error(
            serde_json::Value::Null,
            error_codes::INVALID_REQUEST,
            "Notifications are not supported over HTTP".into(),
        )),
    }
}

/// Bind and serve the router on the configured port.
pub async fn serve(state: AppState) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([127, 0, 0, 1], state.config.port));
    let app = rpc_router(state);
    info!("🚀 HTTP server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
