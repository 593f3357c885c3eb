// src/error.rs

use thiserror::Error;

/// Errors surfaced by tool handlers. Every variant carries a message that is
/// safe to show to the calling agent; raw low-level detail stays in
/// `ExternalCall::detail` and the logs.
#[derive(Error, Debug)]
pub enum ToolError {
    /// Malformed or contradictory input. Rejected before any network call.
    #[error("invalid input: {0}")]
    Validation(String),

    /// An address or ENS name could not be resolved to a canonical address.
    #[error("unable to resolve address: {0}")]
    Resolution(String),

    /// A token symbol not present in the registry.
    #[error("unknown token symbol: {0}")]
    UnknownSymbol(String),

    /// Required configuration missing or malformed.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The chain client or deployment subprocess reported failure.
    #[error("{friendly}")]
    ExternalCall { friendly: String, detail: String },

    /// A successful external call produced output we could not interpret.
    #[error("failed to parse external output: {0}")]
    Parse(String),
}

// Known low-level failure substrings and the operator-friendly descriptions
// they are rewritten to. Checked in order; first match wins.
const EXTERNAL_ERROR_TABLE: &[(&str, &str)] = &[
    (
        "insufficient funds",
        "Insufficient funds in the server wallet. Fund the wallet and try again.",
    ),
    (
        "network",
        "Network connection issue. Check the RPC URL and try again.",
    ),
    (
        "connection",
        "Network connection issue. Check the RPC URL and try again.",
    ),
    (
        "timed out",
        "The RPC endpoint timed out. Try again later.",
    ),
    (
        "private key",
        "Invalid private key. Check the ABSTRACT_PRIVATE_KEY environment variable.",
    ),
    ("nonce", "Transaction nonce conflict. Retry the operation."),
    ("revert", "The contract call reverted on chain."),
];

impl ToolError {
    /// Wrap a low-level chain/subprocess failure, classifying well-known
    /// substrings into friendlier categories. The raw message is retained
    /// as `detail` for diagnostics.
    pub fn external(detail: impl std::fmt::Display) -> Self {
        let detail = detail.to_string();
        let lower = detail.to_lowercase();
        let friendly = EXTERNAL_ERROR_TABLE
            .iter()
            .find(|(needle, _)| lower.contains(needle))
            .map(|(_, msg)| (*msg).to_string())
            .unwrap_or_else(|| detail.clone());
        ToolError::ExternalCall { friendly, detail }
    }

    /// JSON-RPC error code for this error kind. Input-shaped problems map to
    /// INVALID_PARAMS so callers can distinguish them from runtime faults.
    pub fn rpc_code(&self) -> i32 {
        use crate::mcp::protocol::error_codes;
        match self {
            ToolError::Validation(_)
            | ToolError::Resolution(_)
            | ToolError::UnknownSymbol(_) => error_codes::INVALID_PARAMS,
            ToolError::Configuration(_)
            | ToolError::ExternalCall { .. }
            | ToolError::Parse(_) => error_codes::INTERNAL_ERROR,
        }
    }

    /// Raw underlying detail, when this error wraps an external failure.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ToolError::ExternalCall { detail, .. } => Some(detail.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_classification() {
        let err = ToolError::external("server returned: insufficient funds for gas * price");
        match &err {
            ToolError::ExternalCall { friendly, detail } => {
                assert!(friendly.contains("Insufficient funds"));
                assert!(detail.contains("insufficient funds for gas"));
            }
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn test_external_unclassified_passes_through() {
        let err = ToolError::external("something exotic happened");
        assert_eq!(err.to_string(), "something exotic happened");
    }

    #[test]
    fn test_external_classification_is_case_insensitive() {
        let err = ToolError::external("Execution REVERTed");
        assert!(err.to_string().contains("reverted on chain"));
    }

    #[test]
    fn test_rpc_codes() {
        use crate::mcp::protocol::error_codes;
        assert_eq!(
            ToolError::Validation("x".into()).rpc_code(),
            error_codes::INVALID_PARAMS
        );
        assert_eq!(
            ToolError::UnknownSymbol("FOO".into()).rpc_code(),
            error_codes::INVALID_PARAMS
        );
        assert_eq!(
            ToolError::external("boom").rpc_code(),
            error_codes::INTERNAL_ERROR
        );
    }
}
