// src/config.rs

use anyhow::{bail, Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::env;

lazy_static! {
    static ref PRIVATE_KEY_RE: Regex = Regex::new(r"^0x[0-9a-fA-F]{64}$").unwrap();
}

/// Which Abstract network the server targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Network {
    Testnet,
    Mainnet,
}

impl Network {
    pub fn chain_id(&self) -> u64 {
        match self {
            Network::Testnet => 11124,
            Network::Mainnet => 2741,
        }
    }

    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            Network::Testnet => "https://api.testnet.abs.xyz",
            Network::Mainnet => "https://api.mainnet.abs.xyz",
        }
    }
}

/// All configuration, loaded once at startup from the environment / .env file.
#[derive(Clone, Debug)]
pub struct Config {
    pub network: Network,
    pub rpc_url: String,
    /// Signer key for write operations (0x-prefixed 32-byte hex). Optional at
    /// startup; read-only tools work without it.
    pub private_key: Option<String>,
    /// Override for the AGW account factory address.
    pub agw_factory_address: Option<String>,
    /// Path to the out-of-process token deployment script.
    pub deploy_script: String,
    /// Port for the optional HTTP /rpc mode.
    pub port: u16,
}

impl Config {
    /// Loads configuration from environment variables. Malformed values are
    /// a hard startup failure naming the offending variable.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let network = match env::var("TESTNET")
            .unwrap_or_else(|_| "true".to_string())
            .to_lowercase()
            .as_str()
        {
            "true" | "1" | "yes" => Network::Testnet,
            _ => Network::Mainnet,
        };

        let rpc_url =
            env::var("ABSTRACT_RPC_URL").unwrap_or_else(|_| network.default_rpc_url().to_string());

        let private_key =
            match env::var("ABSTRACT_PRIVATE_KEY").or_else(|_| env::var("PRIVATE_KEY")) {
                Ok(raw) => {
                    let key = if raw.starts_with("0x") {
                        raw
                    } else {
                        format!("0x{}", raw)
                    };
                    if !PRIVATE_KEY_RE.is_match(&key) {
                        bail!("ABSTRACT_PRIVATE_KEY must be 64 hex characters prefixed with 0x");
                    }
                    Some(key)
                }
                Err(_) => None,
            };

        let agw_factory_address = match env::var("AGW_FACTORY_ADDRESS") {
            Ok(addr) => {
                if !crate::resolve::is_address(&addr) {
                    bail!("AGW_FACTORY_ADDRESS must be a 0x-prefixed 20-byte hex address");
                }
                Some(addr)
            }
            Err(_) => None,
        };

        Ok(Config {
            network,
            rpc_url,
            private_key,
            agw_factory_address,
            deploy_script: env::var("DEPLOY_SCRIPT")
                .unwrap_or_else(|_| "scripts/deployBasicToken.js".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_parameters() {
        assert_eq!(Network::Testnet.chain_id(), 11124);
        assert_eq!(Network::Mainnet.chain_id(), 2741);
        assert!(Network::Testnet.default_rpc_url().contains("testnet"));
    }

    #[test]
    fn test_private_key_format() {
        assert!(PRIVATE_KEY_RE
            .is_match("0x4f3edf983ac636a65a842ce7c78d9aa706d3b113bce9c46f30d7d21715b23b1d"));
        assert!(!PRIVATE_KEY_RE.is_match("0x1234"));
        assert!(!PRIVATE_KEY_RE
            .is_match("4f3edf983ac636a65a842ce7c78d9aa706d3b113bce9c46f30d7d21715b23b1d"));
        assert!(!PRIVATE_KEY_RE
            .is_match("0xzf3edf983ac636a65a842ce7c78d9aa706d3b113bce9c46f30d7d21715b23b1d"));
    }
}
