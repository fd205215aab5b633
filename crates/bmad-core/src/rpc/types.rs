//! JSON-RPC 2.0 envelopes and the error codes the BMAD methods answer with.
//!
//! | code   | meaning                                   |
//! |--------|-------------------------------------------|
//! | -32001 | agent, workflow, task, template not found |
//! | -32002 | bad request (mode name, no dispatcher)    |
//! | -32003 | no active workflow                        |
//! | -32004 | active workflow already completed         |
//! | -32005 | project type not supported (`data` set)   |
//! | -32006 | state file could not be read or written   |
//! | -32007 | state file is not a valid workflow state  |
//! | -32008 | no active agent                           |

use serde::{Deserialize, Serialize};

pub const JSONRPC_VERSION: &str = "2.0";

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;

pub const NOT_FOUND: i64 = -32001;
pub const BAD_REQUEST: i64 = -32002;
pub const NO_ACTIVE_WORKFLOW: i64 = -32003;
pub const ALREADY_COMPLETED: i64 = -32004;
pub const UNSUPPORTED_PROJECT_TYPE: i64 = -32005;
pub const IO_FAILURE: i64 = -32006;
pub const DECODE_FAILURE: i64 = -32007;
pub const NO_ACTIVE_AGENT: i64 = -32008;

/// Incoming call. `params` is always a named-parameter object for the
/// BMAD methods; `null` or absent means no parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    /// e.g. `"workflow.advance"`
    pub method: String,
    #[serde(default)]
    pub params: Option<serde_json::Value>,
}

/// Exactly one of `result` / `error` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl JsonRpcError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

impl JsonRpcResponse {
    pub fn success(id: Option<serde_json::Value>, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.into(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Option<serde_json::Value>, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.into(),
            id,
            result: None,
            error: Some(error),
        }
    }

    /// Shorthand for a failure without `data`.
    pub fn error(id: Option<serde_json::Value>, code: i64, message: impl Into<String>) -> Self {
        Self::failure(id, JsonRpcError::new(code, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_without_id_or_params() {
        let req: JsonRpcRequest =
            serde_json::from_value(json!({"jsonrpc": "2.0", "method": "system.status"})).unwrap();
        assert!(req.id.is_none());
        assert!(req.params.is_none());
    }

    #[test]
    fn test_success_omits_error_member() {
        let response = JsonRpcResponse::success(Some(json!(7)), json!({"ok": true}));
        let value = serde_json::to_value(response).unwrap();
        assert_eq!(value["id"], 7);
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_failure_carries_data_only_when_set() {
        let plain =
            serde_json::to_value(JsonRpcResponse::error(None, NO_ACTIVE_WORKFLOW, "idle")).unwrap();
        assert!(plain.get("result").is_none());
        assert!(plain["error"].get("data").is_none());
        assert!(plain["id"].is_null());

        let detailed = JsonRpcResponse::failure(
            None,
            JsonRpcError::new(UNSUPPORTED_PROJECT_TYPE, "nope")
                .with_data(json!({"supportedTypes": ["saas"]})),
        );
        let value = serde_json::to_value(detailed).unwrap();
        assert_eq!(value["error"]["data"]["supportedTypes"][0], "saas");
    }
}
