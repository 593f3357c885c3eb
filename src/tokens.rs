// src/tokens.rs

use ethers_core::types::Address;
use std::str::FromStr;

use crate::error::ToolError;

/// A token known to the server. The registry is static configuration:
/// adding a token is a data change, not a code change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenInfo {
    pub symbol: &'static str,
    /// 0x-prefixed 20-byte hex address of the token contract.
    pub address: &'static str,
    pub decimals: u8,
}

/// Known tokens on the Abstract network. ETH is modelled as the zero
/// address so symbol lookups for the native asset also succeed.
pub const TOKENS: &[TokenInfo] = &[TokenInfo {
    symbol: "ETH",
    address: "0x0000000000000000000000000000000000000000",
    decimals: 18,
}];

/// Case-insensitive symbol lookup. Returns `None` when the symbol is not
/// registered; callers turn that into a user-facing validation error.
pub fn lookup(symbol: &str) -> Option<&'static TokenInfo> {
    TOKENS
        .iter()
        .find(|t| t.symbol.eq_ignore_ascii_case(symbol))
}

/// Which asset a tool call targets, after the token-identification fields
/// have been validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSelector {
    /// The chain's native asset (ETH).
    Native,
    /// An ERC-20 contract. `decimals` is known when the token came from the
    /// registry; otherwise handlers query it on chain (best effort).
    Erc20 {
        address: Address,
        decimals: Option<u8>,
    },
}

impl TokenSelector {
    /// Interpret the mutually exclusive `tokenAddress` / `tokenSymbol`
    /// fields shared by balance and transfer requests. Exactly one of the
    /// two may be set; neither means the native asset.
    pub fn from_fields(
        token_address: Option<&str>,
        token_symbol: Option<&str>,
    ) -> Result<Self, ToolError> {
        match (token_address, token_symbol) {
            (Some(_), Some(_)) => Err(ToolError::Validation(
                "provide either tokenAddress or tokenSymbol, not both".to_string(),
            )),
            (Some(addr), None) => {
                let address = Address::from_str(addr).map_err(|_| {
                    ToolError::Validation(format!("invalid token address: {}", addr))
                })?;
                Ok(TokenSelector::Erc20 {
                    address,
                    decimals: None,
                })
            }
            (None, Some(symbol)) => {
                let token =
                    lookup(symbol).ok_or_else(|| ToolError::UnknownSymbol(symbol.to_string()))?;
                // The registry only holds syntactically valid addresses.
                let address = Address::from_str(token.address).map_err(|_| {
                    ToolError::Configuration(format!(
                        "registry entry for {} has a malformed address",
                        token.symbol
                    ))
                })?;
                if address == Address::zero() {
                    // Zero address marks the native asset in the registry.
                    return Ok(TokenSelector::Native);
                }
                Ok(TokenSelector::Erc20 {
                    address,
                    decimals: Some(token.decimals),
                })
            }
            (None, None) => Ok(TokenSelector::Native),
        }
    }
}
