// src/tools/agw_wallet.rs

use ethers::utils::to_checksum;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::chain::agw;
use crate::error::ToolError;
use crate::resolve::resolve_address;
use crate::tools::{parse_params, text_result};
use crate::AppState;

pub const NAME: &str = "ab_agw_create_wallet";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct Params {
    /// EOA signer address or ENS. Defaults to the server wallet's account.
    signer: Option<String>,
}

pub fn definition() -> Value {
    json!({
        "name": NAME,
        "description": "Deploy a new Abstract Global Wallet (smart-contract account) \
            for a given signer. Returns the smart-account address and the deployment \
            tx hash (null when the account already exists).",
        "inputSchema": {
            "type": "object",
            "properties": {
                "signer": {
                    "type": "string",
                    "description": "EOA signer address or ENS. If omitted, uses the server wallet's account as the initial signer"
                }
            },
            "additionalProperties": false
        },
        "annotations": { "destructiveHint": true, "title": "AGW Deploy Smart Account" }
    })
}

pub async fn execute(state: &AppState, args: &Value) -> Result<Value, ToolError> {
    let params: Params = parse_params(args)?;

    let initial_signer = match &params.signer {
        Some(identifier) => resolve_address(&state.chain_client, identifier)
            .await
            .ok_or_else(|| ToolError::Resolution(identifier.clone()))?,
        None => state.chain_client.signer_address().ok_or_else(|| {
            ToolError::Configuration(
                "no signer given and ABSTRACT_PRIVATE_KEY is not configured".to_string(),
            )
        })?,
    };

    let factory = agw::factory_address(&state.config)?;
    info!(signer = %to_checksum(&initial_signer, None), "deploying AGW smart account");

    let deployment = agw::deploy_account(&state.chain_client, factory, initial_signer).await?;
    let smart_account = to_checksum(&deployment.smart_account, None);
    let tx_hash = deployment.tx_hash.map(|h| format!("{:?}", h));

    Ok(text_result(
        smart_account.clone(),
        json!({
            "smartAccountAddress": smart_account,
            "txHash": tx_hash,
            "initialSigner": to_checksum(&initial_signer, None),
        }),
    ))
}
