// src/tools/transfer.rs

use ethers::utils::to_checksum;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::amount::parse_units;
use crate::error::ToolError;
use crate::resolve::resolve_address;
use crate::tokens::TokenSelector;
use crate::tools::{parse_params, text_result};
use crate::AppState;

pub const NAME: &str = "ab_transfer_token";

const DEFAULT_DECIMALS: u8 = 18;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct Params {
    /// Recipient address or ENS name.
    to: String,
    /// Amount in human units, e.g. "1.5".
    amount: String,
    token_address: Option<String>,
    token_symbol: Option<String>,
}

pub fn definition() -> Value {
    json!({
        "name": NAME,
        "description": "Transfer value from the server wallet to another address. \
            Native ETH by default; ERC-20 via tokenAddress OR a well-known tokenSymbol. \
            The recipient may be an ENS name. Returns the transaction hash.",
        "inputSchema": {
            "type": "object",
            "properties": {
                "to": {"type": "string", "description": "Recipient address or ENS name"},
                "amount": {"type": "string", "description": "Amount to transfer (human units)"},
                "tokenAddress": {"type": "string", "description": "ERC-20 token contract address"},
                "tokenSymbol": {"type": "string", "description": "Token symbol to resolve (e.g. ETH)"}
            },
            "required": ["to", "amount"],
            "additionalProperties": false
        },
        "annotations": { "destructiveHint": true, "title": "Transfer Token" }
    })
}

pub async fn execute(state: &AppState, args: &Value) -> Result<Value, ToolError> {
    let params: Params = parse_params(args)?;
    let selector = TokenSelector::from_fields(
        params.token_address.as_deref(),
        params.token_symbol.as_deref(),
    )?;

    let recipient = resolve_address(&state.chain_client, &params.to)
        .await
        .ok_or_else(|| ToolError::Resolution(params.to.clone()))?;

    match selector {
        TokenSelector::Native => {
            let value = parse_units(&params.amount, DEFAULT_DECIMALS.into())?;
            info!(to = %to_checksum(&recipient, None), amount = %params.amount, "sending native ETH");
            let tx_hash = state.chain_client.send_native(recipient, value).await?;
            let tx_hash = format!("{:?}", tx_hash);
            info!(%tx_hash, "transaction sent");
            Ok(text_result(
                tx_hash.clone(),
                json!({
                    "txHash": tx_hash,
                    "to": to_checksum(&recipient, None),
                    "amount": params.amount,
                    "asset": "ETH",
                }),
            ))
        }
        TokenSelector::Erc20 { address, decimals } => {
            let decimals = match decimals {
                Some(d) => d,
                None => match state.chain_client.erc20_decimals(address).await {
                    Ok(d) => d,
                    Err(e) => {
                        warn!(token = %to_checksum(&address, None), error = %e,
                            "decimals lookup failed, falling back to 18");
                        DEFAULT_DECIMALS
                    }
                },
            };

            let amount = parse_units(&params.amount, decimals.into())?;
            info!(
                token = %to_checksum(&address, None),
                to = %to_checksum(&recipient, None),
                amount = %params.amount,
                "sending ERC-20 transfer"
            );
            let tx_hash = state
                .chain_client
                .send_erc20_transfer(address, recipient, amount)
                .await?;
            let tx_hash = format!("{:?}", tx_hash);
            info!(%tx_hash, "ERC-20 transfer sent");
            Ok(text_result(
                tx_hash.clone(),
                json!({
                    "txHash": tx_hash,
                    "to": to_checksum(&recipient, None),
                    "tokenAddress": to_checksum(&address, None),
                    "amount": params.amount,
                    "decimals": decimals,
                }),
            ))
        }
    }
}
