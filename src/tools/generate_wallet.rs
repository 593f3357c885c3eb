// src/tools/generate_wallet.rs

use ethers_core::utils::keccak256;
use k256::ecdsa::SigningKey;
use rand::RngCore;
use serde_json::{json, Value};
use tracing::info;

use crate::error::ToolError;
use crate::tools::text_result;
use crate::AppState;

pub const NAME: &str = "ab_generate_wallet";

pub fn definition() -> Value {
    json!({
        "name": NAME,
        "description": "Generate a brand-new Externally Owned Account (EOA). \
            Returns the 0x-prefixed private key and the derived address. \
            The private key is returned in plaintext; the caller must store it securely.",
        "inputSchema": { "type": "object", "properties": {}, "additionalProperties": false },
        "annotations": { "destructiveHint": false, "title": "Generate EOA Wallet" }
    })
}

/// A freshly generated keypair. Only ever returned to the caller, never
/// persisted or logged.
struct GeneratedWallet {
    private_key: String,
    address: String,
}

fn generate() -> Result<GeneratedWallet, ToolError> {
    let mut key_bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut key_bytes);

    let signing_key = SigningKey::from_bytes(&key_bytes.into())
        .map_err(|e| ToolError::external(format!("key generation failed: {}", e)))?;

    // Address = last 20 bytes of keccak256 of the uncompressed public key.
    let public_key = signing_key.verifying_key().to_encoded_point(false);
    let hash = keccak256(&public_key.as_bytes()[1..]);
    let address = format!("0x{}", hex::encode(&hash[12..]));

    Ok(GeneratedWallet {
        private_key: format!("0x{}", hex::encode(key_bytes)),
        address,
    })
}

pub async fn execute(_state: &AppState, _args: &Value) -> Result<Value, ToolError> {
    let wallet = generate()?;
    info!(address = %wallet.address, "generated new EOA");

    Ok(text_result(
        serde_json::to_string(&json!({
            "privateKey": wallet.private_key,
            "address": wallet.address,
        }))
        .unwrap_or_default(),
        json!({
            "privateKey": wallet.private_key,
            "address": wallet.address,
        }),
    ))
}
