// src/lib.rs

use anyhow::Result;
use std::sync::Arc;

pub mod amount;
pub mod chain;
pub mod config;
pub mod error;
pub mod http;
pub mod mcp;
pub mod resolve;
pub mod tokens;
pub mod tools;

use chain::client::ChainClient;
use chain::deploy::{SubprocessDeployer, TokenDeployer};
use config::Config;

/// Application state shared across all request handlers. Constructed once
/// at startup and treated as immutable afterwards; handlers receive clones.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Config,
    /// Client for the Abstract network
    pub chain_client: ChainClient,
    /// Pluggable ERC-20 deployment backend
    pub deployer: Arc<dyn TokenDeployer>,
}

impl AppState {
    /// Wire up the default production state: one chain client and the
    /// subprocess deployment backend.
    pub fn new(config: Config) -> Result<Self> {
        let chain_client = ChainClient::new(&config)?;
        let deployer = Arc::new(SubprocessDeployer::from_config(&config));
        Ok(Self {
            config,
            chain_client,
            deployer,
        })
    }
}
