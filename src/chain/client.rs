// src/chain/client.rs

use anyhow::{Context, Result};
use ethers_providers::{Http, Middleware, Provider};
use ethers_signers::{LocalWallet, Signer};
use ethers_core::types::transaction::eip2718::TypedTransaction;
use ethers_core::types::{Address, Bytes, TransactionRequest, H256, U256};
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

use crate::chain::erc20;
use crate::config::Config;
use crate::error::ToolError;

/// Client for the Abstract network. Constructed once at startup and shared
/// read-only through `AppState`; every network side effect in the server
/// goes through this type.
#[derive(Clone)]
pub struct ChainClient {
    provider: Arc<Provider<Http>>,
    signer: Option<LocalWallet>,
    chain_id: u64,
}

impl ChainClient {
    pub fn new(config: &Config) -> Result<Self> {
        let provider = Provider::<Http>::try_from(config.rpc_url.as_str())
            .with_context(|| format!("invalid RPC URL: {}", config.rpc_url))?;

        let chain_id = config.network.chain_id();
        let signer = match &config.private_key {
            Some(key) => {
                let wallet = LocalWallet::from_str(key)
                    .context("ABSTRACT_PRIVATE_KEY is not a valid secp256k1 key")?
                    .with_chain_id(chain_id);
                Some(wallet)
            }
            None => None,
        };

        Ok(Self {
            provider: Arc::new(provider),
            signer,
            chain_id,
        })
    }

    /// The configured signer, or a configuration error for write operations
    /// attempted without one.
    pub fn signer(&self) -> Result<&LocalWallet, ToolError> {
        self.signer.as_ref().ok_or_else(|| {
            ToolError::Configuration(
                "ABSTRACT_PRIVATE_KEY environment variable is required for this operation"
                    .to_string(),
            )
        })
    }

    pub fn signer_address(&self) -> Option<Address> {
        self.signer.as_ref().map(|w| w.address())
    }

    /// Native balance in wei.
    pub async fn get_balance(&self, address: Address) -> Result<U256, ToolError> {
        self.provider
            .get_balance(address, None)
            .await
            .map_err(ToolError::external)
    }

    /// Whether the address has contract code deployed.
    pub async fn has_code(&self, address: Address) -> Result<bool, ToolError> {
        let code = self
            .provider
            .get_code(address, None)
            .await
            .map_err(ToolError::external)?;
        Ok(!code.is_empty())
    }

    /// One ENS lookup. Any failure (no record, malformed name, transport
    /// error) is reported as `None`; resolution misses are expected.
    pub async fn lookup_ens(&self, name: &str) -> Option<Address> {
        match self.provider.resolve_name(name).await {
            Ok(address) => Some(address),
            Err(e) => {
                debug!(name, error = %e, "ENS lookup failed");
                None
            }
        }
    }

    /// Read-only eth_call against a contract.
    pub async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ToolError> {
        let tx: TypedTransaction = TransactionRequest::new().to(to).data(data).into();
        self.provider
            .call(&tx, None)
            .await
            .map_err(ToolError::external)
    }

    /// ERC-20 `decimals()` for a token contract.
    pub async fn erc20_decimals(&self, token: Address) -> Result<u8, ToolError> {
        let out = self.call(token, erc20::decimals_call()).await?;
        erc20::decode_decimals(&out)
    }

    /// ERC-20 `balanceOf(owner)` in base units.
    pub async fn erc20_balance_of(&self, token: Address, owner: Address) -> Result<U256, ToolError> {
        let out = self.call(token, erc20::balance_of_call(owner)).await?;
        erc20::decode_u256(&out)
    }

    /// Transfer the native asset. Returns the transaction hash.
    pub async fn send_native(&self, to: Address, value: U256) -> Result<H256, ToolError> {
        let tx = TransactionRequest::new().to(to).value(value);
        self.send(tx).await
    }

    /// Call ERC-20 `transfer(to, amount)` on a token contract.
    pub async fn send_erc20_transfer(
        &self,
        token: Address,
        to: Address,
        amount: U256,
    ) -> Result<H256, ToolError> {
        let tx = TransactionRequest::new()
            .to(token)
            .data(erc20::transfer_call(to, amount));
        self.send(tx).await
    }

    /// Fill, sign and submit a transaction with the configured signer.
    /// Exactly one submission per invocation; retries belong to the caller.
    pub async fn send(&self, tx: TransactionRequest) -> Result<H256, ToolError> {
        let wallet = self.signer()?;
        let from = wallet.address();

        let nonce = self
            .provider
            .get_transaction_count(from, None)
            .await
            .map_err(ToolError::external)?;

        let mut tx = tx.from(from).nonce(nonce).chain_id(self.chain_id);

        let typed: TypedTransaction = tx.clone().into();
        let gas = self
            .provider
            .estimate_gas(&typed, None)
            .await
            .map_err(ToolError::external)?;
        tx = tx.gas(gas);

        let gas_price = self
            .provider
            .get_gas_price()
            .await
            .map_err(ToolError::external)?;
        tx = tx.gas_price(gas_price);

        let typed: TypedTransaction = tx.into();
        let signature = wallet
            .sign_transaction(&typed)
            .await
            .map_err(ToolError::external)?;
        let raw = typed.rlp_signed(&signature);

        let pending = self
            .provider
            .send_raw_transaction(raw)
            .await
            .map_err(ToolError::external)?;
        Ok(pending.tx_hash())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Network;

    fn config_with_key(key: Option<&str>) -> Config {
        Config {
            network: Network::Testnet,
            rpc_url: "http://127.0.0.1:1".to_string(),
            private_key: key.map(String::from),
            agw_factory_address: None,
            deploy_script: "scripts/deployBasicToken.js".to_string(),
            port: 8080,
        }
    }

    #[test]
    fn test_missing_signer_is_configuration_error() {
        let client = ChainClient::new(&config_with_key(None)).unwrap();
        let err = client.signer().unwrap_err();
        assert!(matches!(err, ToolError::Configuration(_)));
        assert!(client.signer_address().is_none());
    }

    #[test]
    fn test_signer_derives_expected_address() {
        // Well-known hardhat test key.
        let client = ChainClient::new(&config_with_key(Some(
            "0x4f3edf983ac636a65a842ce7c78d9aa706d3b113bce9c46f30d7d21715b23b1d",
        )))
        .unwrap();
        assert_eq!(
            client.signer_address(),
            Some(Address::from_str("0x90f8bf6a479f320ead074411a4b0e7944ea8c9c1").unwrap())
        );
    }

    #[test]
    fn test_bad_private_key_fails_construction() {
        assert!(ChainClient::new(&config_with_key(Some("0xnot-a-key"))).is_err());
    }
}
