// src/resolve.rs
//
// Normalizes user-supplied identifiers (raw hex addresses or ENS names)
// into canonical on-chain addresses. Every externally supplied address goes
// through here before it is used in a read or write call.

use ethers_core::types::Address;
use std::str::FromStr;
use tracing::debug;

use crate::chain::client::ChainClient;

/// Syntactic check for a 0x-prefixed 20-byte hex address. Checksum-agnostic.
pub fn is_address(value: &str) -> bool {
    let Some(body) = value.strip_prefix("0x") else {
        return false;
    };
    body.len() == 40 && body.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Resolve an identifier to an address.
///
/// A syntactically valid address passes through unchanged with zero network
/// calls. Anything else is treated as an ENS-style name and looked up once
/// against the chain client. `None` means "unresolved" and is an expected
/// outcome (no record, malformed name, lookup failure), never a fault.
pub async fn resolve_address(client: &ChainClient, identifier: &str) -> Option<Address> {
    if is_address(identifier) {
        // from_str cannot fail after the syntactic check above.
        return Address::from_str(identifier).ok();
    }
    match client.lookup_ens(identifier).await {
        Some(address) => Some(address),
        None => {
            debug!(identifier, "name did not resolve to an address");
            None
        }
    }
}
