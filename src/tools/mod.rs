// src/tools/mod.rs
//
// One module per registered tool. Each exposes its NAME, a JSON schema
// definition for tools/list, and an execute function running the shared
// pipeline: validate, resolve, normalize, one external call, map result.

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::error::ToolError;

pub mod agw_wallet;
pub mod balance;
pub mod deploy_token;
pub mod generate_wallet;
pub mod transfer;

/// Deserialize tool arguments against their declared shape. A schema
/// violation is a validation error and never reaches the network.
pub(crate) fn parse_params<T: DeserializeOwned>(args: &Value) -> Result<T, ToolError> {
    serde_json::from_value(args.clone())
        .map_err(|e| ToolError::Validation(format!("invalid parameters: {}", e)))
}

/// Produce a result that always contains a text content array while keeping
/// structured fields for JSON-friendly clients.
pub(crate) fn text_result(text: String, payload: Value) -> Value {
    let content = json!([{ "type": "text", "text": text }]);
    match payload {
        Value::Object(mut map) => {
            map.insert("content".into(), content);
            Value::Object(map)
        }
        other => json!({ "data": other, "content": content }),
    }
}
