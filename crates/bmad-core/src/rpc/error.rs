//! RPC error type that bridges `CoreError` to JSON-RPC errors.

use serde_json::json;

use super::types;
use crate::error::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("No active workflow")]
    NoActiveWorkflow,

    #[error("Workflow already completed")]
    AlreadyCompleted,

    #[error("{message}")]
    UnsupportedProjectType {
        message: String,
        supported: Vec<String>,
    },

    #[error("I/O failure: {0}")]
    Io(String),

    #[error("Decode failure: {0}")]
    Decode(String),

    #[error("No agent activated. Please activate an agent first.")]
    NoActiveAgent,
}

impl RpcError {
    pub fn code(&self) -> i64 {
        match self {
            RpcError::NotFound(_) => types::NOT_FOUND,
            RpcError::BadRequest(_) => types::BAD_REQUEST,
            RpcError::Internal(_) => types::INTERNAL_ERROR,
            RpcError::InvalidParams(_) => types::INVALID_PARAMS,
            RpcError::MethodNotFound(_) => types::METHOD_NOT_FOUND,
            RpcError::NoActiveWorkflow => types::NO_ACTIVE_WORKFLOW,
            RpcError::AlreadyCompleted => types::ALREADY_COMPLETED,
            RpcError::UnsupportedProjectType { .. } => types::UNSUPPORTED_PROJECT_TYPE,
            RpcError::Io(_) => types::IO_FAILURE,
            RpcError::Decode(_) => types::DECODE_FAILURE,
            RpcError::NoActiveAgent => types::NO_ACTIVE_AGENT,
        }
    }

    pub fn to_response(&self, id: Option<serde_json::Value>) -> types::JsonRpcResponse {
        match self {
            RpcError::UnsupportedProjectType { supported, .. } => types::JsonRpcResponse::failure(
                id,
                types::JsonRpcError::new(self.code(), self.to_string())
                    .with_data(json!({ "supportedTypes": supported })),
            ),
            _ => types::JsonRpcResponse::error(id, self.code(), self.to_string()),
        }
    }
}

impl From<CoreError> for RpcError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound(what) => RpcError::NotFound(what),
            CoreError::UnsupportedProjectType { ref supported, .. } => {
                RpcError::UnsupportedProjectType {
                    message: err.to_string(),
                    supported: supported.clone(),
                }
            }
            CoreError::NoActiveWorkflow => RpcError::NoActiveWorkflow,
            CoreError::AlreadyCompleted => RpcError::AlreadyCompleted,
            CoreError::NoActiveAgent => RpcError::NoActiveAgent,
            CoreError::InvalidMode(_) | CoreError::DispatchUnavailable(_) => {
                RpcError::BadRequest(err.to_string())
            }
            CoreError::Dispatch(msg) => RpcError::Internal(msg),
            CoreError::Encode { .. } => RpcError::Internal(err.to_string()),
            CoreError::Io { .. } => RpcError::Io(err.to_string()),
            CoreError::Decode { .. } => RpcError::Decode(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_map_to_codes() {
        let cases = [
            (CoreError::NotFound("workflow 'x'".into()), types::NOT_FOUND),
            (CoreError::NoActiveWorkflow, types::NO_ACTIVE_WORKFLOW),
            (CoreError::AlreadyCompleted, types::ALREADY_COMPLETED),
            (CoreError::NoActiveAgent, types::NO_ACTIVE_AGENT),
            (CoreError::InvalidMode("x".into()), types::BAD_REQUEST),
            (
                CoreError::io("/tmp/x", std::io::Error::other("disk full")),
                types::IO_FAILURE,
            ),
            (
                CoreError::Encode {
                    source: serde_json::from_str::<u8>("x").unwrap_err(),
                },
                types::INTERNAL_ERROR,
            ),
            (
                CoreError::Decode {
                    path: "/tmp/state.json".into(),
                    source: serde_json::from_str::<u8>("x").unwrap_err(),
                },
                types::DECODE_FAILURE,
            ),
        ];
        for (core, code) in cases {
            assert_eq!(RpcError::from(core).code(), code);
        }
    }

    #[test]
    fn test_unsupported_project_type_carries_data() {
        let err = RpcError::from(CoreError::UnsupportedProjectType {
            workflow_id: "greenfield".into(),
            project_type: "cli".into(),
            supported: vec!["web-app".into(), "saas".into()],
        });
        let response = err.to_response(Some(serde_json::json!(7)));
        let error = response.error.unwrap();
        assert_eq!(error.code, types::UNSUPPORTED_PROJECT_TYPE);
        assert_eq!(
            error.message,
            "Project type 'cli' not supported by workflow 'greenfield'"
        );
        assert_eq!(
            error.data.unwrap()["supportedTypes"],
            serde_json::json!(["web-app", "saas"])
        );
    }
}
