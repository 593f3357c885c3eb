// src/tools/balance.rs

use ethers::utils::to_checksum;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::amount::format_units;
use crate::error::ToolError;
use crate::resolve::resolve_address;
use crate::tokens::TokenSelector;
use crate::tools::{parse_params, text_result};
use crate::AppState;

pub const NAME: &str = "ab_get_balance";

const DEFAULT_DECIMALS: u8 = 18;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct Params {
    /// Target wallet (address or ENS) to query.
    address: String,
    token_address: Option<String>,
    token_symbol: Option<String>,
}

pub fn definition() -> Value {
    json!({
        "name": NAME,
        "description": "Fetch the current on-chain balance for a wallet. \
            Native ETH by default; ERC-20 via tokenAddress OR a well-known tokenSymbol. \
            The target address may be an ENS name. Read-only, no gas spent.",
        "inputSchema": {
            "type": "object",
            "properties": {
                "address": {"type": "string", "description": "Target wallet (address or ENS) to query"},
                "tokenAddress": {"type": "string", "description": "ERC-20 token contract address"},
                "tokenSymbol": {"type": "string", "description": "Token symbol to resolve (e.g. ETH)"}
            },
            "required": ["address"],
            "additionalProperties": false
        },
        "annotations": { "readOnlyHint": true, "title": "Get Balance" }
    })
}

pub async fn execute(state: &AppState, args: &Value) -> Result<Value, ToolError> {
    let params: Params = parse_params(args)?;
    // Token fields are checked before any resolution or network activity.
    let selector = TokenSelector::from_fields(
        params.token_address.as_deref(),
        params.token_symbol.as_deref(),
    )?;

    info!(address = %params.address, "resolving balance target");
    let target = resolve_address(&state.chain_client, &params.address)
        .await
        .ok_or_else(|| ToolError::Resolution(params.address.clone()))?;

    match selector {
        TokenSelector::Native => {
            let balance = state.chain_client.get_balance(target).await?;
            let formatted = format_units(balance, DEFAULT_DECIMALS.into());
            info!(balance = %formatted, "retrieved native balance");
            Ok(text_result(
                formatted.clone(),
                json!({
                    "address": to_checksum(&target, None),
                    "balance": formatted,
                    "asset": "ETH",
                }),
            ))
        }
        TokenSelector::Erc20 { address, decimals } => {
            let decimals = match decimals {
                Some(d) => d,
                // Best effort: a token that does not answer decimals() is
                // assumed to use 18, which may misread magnitude.
                None => match state.chain_client.erc20_decimals(address).await {
                    Ok(d) => d,
                    Err(e) => {
                        warn!(token = %to_checksum(&address, None), error = %e,
                            "decimals lookup failed, falling back to 18");
                        DEFAULT_DECIMALS
                    }
                },
            };

            let raw = state.chain_client.erc20_balance_of(address, target).await?;
            let formatted = format_units(raw, decimals.into());
            info!(token = %to_checksum(&address, None), balance = %formatted, "retrieved ERC-20 balance");
            Ok(text_result(
                formatted.clone(),
                json!({
                    "address": to_checksum(&target, None),
                    "tokenAddress": to_checksum(&address, None),
                    "balance": formatted,
                    "decimals": decimals,
                }),
            ))
        }
    }
}
