// src/chain/agw.rs
//
// Abstract Global Wallet account factory. The factory's deployAccount call
// is deterministic for a given signer, so simulating it first tells us the
// smart-account address (and whether it already exists) before we spend gas.

use ethers_core::abi::Token;
use ethers_core::types::{Address, Bytes, TransactionRequest, H256};
use std::str::FromStr;
use tracing::info;

use crate::chain::client::ChainClient;
use crate::chain::erc20::{decode_address, encode_call};
use crate::config::Config;
use crate::error::ToolError;

/// AGW account factory, deployed at the same address on testnet and mainnet.
const DEFAULT_FACTORY: &str = "0x9B947df68D35281C972511B3E7BC875926f26C1A";

/// The configured factory address, falling back to the canonical deployment.
pub fn factory_address(config: &Config) -> Result<Address, ToolError> {
    let raw = config
        .agw_factory_address
        .as_deref()
        .unwrap_or(DEFAULT_FACTORY);
    Address::from_str(raw)
        .map_err(|_| ToolError::Configuration(format!("invalid AGW factory address: {}", raw)))
}

/// Call data for `deployAccount(address)`.
pub fn deploy_account_call(initial_signer: Address) -> Bytes {
    encode_call("deployAccount(address)", vec![Token::Address(initial_signer)])
}

/// Outcome of a smart-account deployment. `tx_hash` is `None` when the
/// account already existed and no transaction was submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgwDeployment {
    pub smart_account: Address,
    pub tx_hash: Option<H256>,
}

/// Deploy an AGW smart account for `initial_signer`.
pub async fn deploy_account(
    client: &ChainClient,
    factory: Address,
    initial_signer: Address,
) -> Result<AgwDeployment, ToolError> {
    let data = deploy_account_call(initial_signer);

    // Simulate first to learn the deterministic account address.
    let out = client.call(factory, data.clone()).await?;
    let smart_account = decode_address(&out)?;

    if client.has_code(smart_account).await? {
        info!(account = %smart_account, "smart account already deployed");
        return Ok(AgwDeployment {
            smart_account,
            tx_hash: None,
        });
    }

    let tx_hash = client
        .send(TransactionRequest::new().to(factory).data(data))
        .await?;
    Ok(AgwDeployment {
        smart_account,
        tx_hash: Some(tx_hash),
    })
}
