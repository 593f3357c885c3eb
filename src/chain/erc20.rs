// src/chain/erc20.rs
//
// Minimal ABI fragments for the ERC-20 functions the tools need. Call data
// is built from keccak selectors plus ABI-encoded arguments; no full
// contract bindings required.

use ethers_core::abi::{decode, encode, ParamType, Token};
use ethers_core::types::{Address, Bytes, U256};
use ethers_core::utils::keccak256;

use crate::error::ToolError;

pub(crate) fn selector(sig: &str) -> [u8; 4] {
    let mut sel = [0u8; 4];
    sel.copy_from_slice(&keccak256(sig.as_bytes())[0..4]);
    sel
}

pub(crate) fn encode_call(sig: &str, tokens: Vec<Token>) -> Bytes {
    let mut out = selector(sig).to_vec();
    out.extend(encode(&tokens));
    Bytes::from(out)
}

/// Call data for `decimals()`.
pub fn decimals_call() -> Bytes {
    encode_call("decimals()", vec![])
}

/// Call data for `balanceOf(address)`.
pub fn balance_of_call(owner: Address) -> Bytes {
    encode_call("balanceOf(address)", vec![Token::Address(owner)])
}

/// Call data for `transfer(address,uint256)`.
pub fn transfer_call(to: Address, amount: U256) -> Bytes {
    encode_call(
        "transfer(address,uint256)",
        vec![Token::Address(to), Token::Uint(amount)],
    )
}

/// Decode a single uint256 return value.
pub fn decode_u256(data: &Bytes) -> Result<U256, ToolError> {
    let tokens = decode(&[ParamType::Uint(256)], data.as_ref())
        .map_err(|e| ToolError::Parse(format!("uint256 return value: {}", e)))?;
    match tokens.first() {
        Some(Token::Uint(n)) => Ok(*n),
        _ => Err(ToolError::Parse("empty uint256 return value".to_string())),
    }
}

/// Decode a single address return value.
pub fn decode_address(data: &Bytes) -> Result<Address, ToolError> {
    let tokens = decode(&[ParamType::Address], data.as_ref())
        .map_err(|e| ToolError::Parse(format!("address return value: {}", e)))?;
    match tokens.first() {
        Some(Token::Address(a)) => Ok(*a),
        _ => Err(ToolError::Parse("empty address return value".to_string())),
    }
}

/// Decode a `decimals()` result. Tokens return uint8 but it arrives
/// ABI-padded to a word.
pub fn decode_decimals(data: &Bytes) -> Result<u8, ToolError> {
    let value = decode_u256(data)?;
    if value > U256::from(u8::MAX) {
        return Err(ToolError::Parse(format!(
            "decimals value {} out of range",
            value
        )));
    }
    Ok(value.as_u32() as u8)
}
