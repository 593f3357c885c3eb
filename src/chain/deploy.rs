// src/chain/deploy.rs
//
// Pluggable ERC-20 deployment backend. The default backend shells out to
// the bundled zksync-ethers script, which handles contract compilation
// artifacts and deployment; this layer only validates, forwards, and parses
// the result.

use async_trait::async_trait;
use ethers_core::types::Address;
use lazy_static::lazy_static;
use regex::Regex;
use std::str::FromStr;
use tokio::process::Command;
use tracing::{error, info};

use crate::config::Config;
use crate::error::ToolError;

lazy_static! {
    // Success marker printed by the deploy script.
    static ref DEPLOYED_AT_RE: Regex =
        Regex::new(r"(?i)BasicToken deployed at:\s*(0x[0-9a-fA-F]{40})").unwrap();
}

/// Parameters for a token deployment, already validated by the tool layer.
#[derive(Debug, Clone)]
pub struct TokenDeployment {
    pub name: String,
    pub symbol: String,
    /// Initial supply in wei (18 decimals), as a decimal string.
    pub initial_supply: String,
}

/// A deployment backend. The tool layer neither knows nor cares whether
/// deployment happens in-process or out-of-process.
#[async_trait]
pub trait TokenDeployer: Send + Sync {
    async fn deploy(&self, request: &TokenDeployment) -> Result<Address, ToolError>;
}

/// Deploys by spawning the zksync-ethers deployment script in a child
/// process, passing parameters through environment variables.
pub struct SubprocessDeployer {
    program: String,
    script: String,
    rpc_url: String,
    private_key: Option<String>,
}

impl SubprocessDeployer {
    pub fn new(
        program: impl Into<String>,
        script: impl Into<String>,
        rpc_url: impl Into<String>,
        private_key: Option<String>,
    ) -> Self {
        Self {
            program: program.into(),
            script: script.into(),
            rpc_url: rpc_url.into(),
            private_key,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            "node",
            config.deploy_script.clone(),
            config.rpc_url.clone(),
            config.private_key.clone(),
        )
    }
}

/// Extract the deployed contract address from the script's stdout.
pub fn parse_deployed_address(stdout: &str) -> Result<Address, ToolError> {
    let captures = DEPLOYED_AT_RE.captures(stdout).ok_or_else(|| {
        ToolError::Parse("deployed token address not found in script output".to_string())
    })?;
    Address::from_str(&captures[1])
        .map_err(|e| ToolError::Parse(format!("deployed address: {}", e)))
}

#[async_trait]
impl TokenDeployer for SubprocessDeployer {
    async fn deploy(&self, request: &TokenDeployment) -> Result<Address, ToolError> {
        let private_key = self.private_key.as_deref().ok_or_else(|| {
            ToolError::Configuration(
                "ABSTRACT_PRIVATE_KEY environment variable is required for deployment"
                    .to_string(),
            )
        })?;

        info!(
            name = %request.name,
            symbol = %request.symbol,
            script = %self.script,
            "spawning token deployment subprocess"
        );

        let output = Command::new(&self.program)
            .arg(&self.script)
            .env("ABSTRACT_RPC_URL", &self.rpc_url)
            .env("ABSTRACT_PRIVATE_KEY", private_key)
            .env("TOKEN_NAME", &request.name)
            .env("TOKEN_SYMBOL", &request.symbol)
            .env("TOKEN_SUPPLY", &request.initial_supply)
            .output()
            .await
            .map_err(|e| ToolError::external(format!("failed to spawn {}: {}", self.program, e)))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if !output.status.success() {
            let detail = if stderr.trim().is_empty() {
                stdout.trim().to_string()
            } else {
                format!("{}\n{}", stderr.trim(), stdout.trim())
            };
            error!(status = ?output.status.code(), "token deployment subprocess failed");
            let detail = if detail.is_empty() {
                "deployment subprocess failed".to_string()
            } else {
                detail
            };
            return Err(ToolError::external(detail));
        }

        parse_deployed_address(&stdout)
    }
}
