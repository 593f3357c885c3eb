// src/tools/deploy_token.rs

use ethers::utils::to_checksum;
use ethers_core::types::U256;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::amount::format_units;
use crate::chain::deploy::TokenDeployment;
use crate::error::ToolError;
use crate::tools::{parse_params, text_result};
use crate::AppState;

pub const NAME: &str = "ab_deploy_token_erc20";

lazy_static! {
    static ref SUPPLY_RE: Regex = Regex::new(r"^\d+$").unwrap();
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct Params {
    /// Token name, e.g. "DemoToken".
    name: String,
    /// Token symbol / ticker, e.g. "DMT".
    symbol: String,
    /// Initial supply as a numeric string in wei (18 decimals).
    initial_supply: String,
}

pub fn definition() -> Value {
    json!({
        "name": NAME,
        "description": "Deploy an ERC-20 BasicToken to the Abstract network. \
            initialSupply is a numeric string of the total supply in wei (18 decimals). \
            The deployer wallet must hold enough funds on the target network. \
            Returns the deployed contract address.",
        "inputSchema": {
            "type": "object",
            "properties": {
                "name": {"type": "string", "description": "Token name"},
                "symbol": {"type": "string", "description": "Token symbol / ticker"},
                "initialSupply": {
                    "type": "string",
                    "description": "Initial token supply, in wei (e.g. 1000000000000000000000 for 1000 tokens)"
                }
            },
            "required": ["name", "symbol", "initialSupply"],
            "additionalProperties": false
        },
        "annotations": { "destructiveHint": true, "title": "Contract Deployment Tool" }
    })
}

fn validate(params: &Params) -> Result<(), ToolError> {
    if params.name.trim().is_empty() {
        return Err(ToolError::Validation("token name must not be empty".to_string()));
    }
    if params.symbol.trim().is_empty() {
        return Err(ToolError::Validation(
            "token symbol must not be empty".to_string(),
        ));
    }
    if !SUPPLY_RE.is_match(&params.initial_supply) {
        return Err(ToolError::Validation(
            "initialSupply must be a numeric string representing the amount in wei (18 decimals)"
                .to_string(),
        ));
    }
    Ok(())
}

pub async fn execute(state: &AppState, args: &Value) -> Result<Value, ToolError> {
    let params: Params = parse_params(args)?;
    validate(&params)?;

    info!(name = %params.name, symbol = %params.symbol, "starting ERC-20 token deployment");

    let request = TokenDeployment {
        name: params.name.clone(),
        symbol: params.symbol.clone(),
        initial_supply: params.initial_supply.clone(),
    };
    let contract_address = state.deployer.deploy(&request).await?;
    let contract_address = to_checksum(&contract_address, None);

    // Human-readable supply; the token is deployed with 18 decimals.
    let human_supply = U256::from_dec_str(&params.initial_supply)
        .map(|units| format_units(units, 18))
        .unwrap_or_else(|_| params.initial_supply.clone());

    info!(address = %contract_address, "token deployment completed");

    let summary = format!(
        "ERC-20 Token Deployed Successfully!\n\n\
         - Address: {}\n\
         - Name: {}\n\
         - Symbol: {}\n\
         - Total Supply: {} {}\n\
         - Initial Supply (wei): {}\n\
         - Network: Abstract, Standard: ERC-20, Decimals: 18",
        contract_address,
        params.name,
        params.symbol,
        human_supply,
        params.symbol,
        params.initial_supply
    );

    Ok(text_result(
        summary,
        json!({
            "contractAddress": contract_address,
            "name": params.name,
            "symbol": params.symbol,
            "initialSupply": params.initial_supply,
            "totalSupply": human_supply,
            "decimals": 18,
        }),
    ))
}
