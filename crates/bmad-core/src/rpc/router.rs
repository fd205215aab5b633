//! Transport-agnostic JSON-RPC 2.0 dispatcher.
//!
//! `RpcRouter` holds a `SharedContext` and dispatches incoming requests to
//! the method handlers. Each request takes the context lock once and keeps
//! it until its response is built. Usable from:
//!
//! - Stdio (`bmad serve`)
//! - A one-shot CLI call (`bmad rpc`)
//! - Tests, by handing it a `serde_json::Value`

use serde::Serialize;

use super::error::RpcError;
use super::methods;
use super::types::*;
use crate::context::{Context, SharedContext};

const SERIALIZE_FAILURE: &str =
    r#"{"jsonrpc":"2.0","error":{"code":-32603,"message":"Failed to serialize response"},"id":null}"#;

/// Transport-agnostic JSON-RPC router.
///
/// ```ignore
/// let router = RpcRouter::new(Context::open(settings).into_shared());
///
/// // From a raw JSON string:
/// let response_json = router.handle_request(raw_json_str).await;
///
/// // From a parsed request:
/// let response = router.dispatch(request).await;
/// ```
#[derive(Clone)]
pub struct RpcRouter {
    context: SharedContext,
}

impl RpcRouter {
    pub fn new(context: SharedContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &SharedContext {
        &self.context
    }

    /// Handle a raw JSON string (single request or batch) and return the
    /// serialized response.
    pub async fn handle_request(&self, raw: &str) -> String {
        let value: serde_json::Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                return serde_json::to_string(&JsonRpcResponse::error(
                    None,
                    PARSE_ERROR,
                    format!("Parse error: {}", e),
                ))
                .unwrap_or_else(|_| SERIALIZE_FAILURE.into());
            }
        };

        let response = self.handle_value(value).await;
        serde_json::to_string(&response).unwrap_or_else(|_| SERIALIZE_FAILURE.into())
    }

    /// Handle a pre-parsed value. An array is treated as a batch and yields
    /// an array of responses in request order.
    pub async fn handle_value(&self, value: serde_json::Value) -> serde_json::Value {
        match value {
            serde_json::Value::Array(items) if items.is_empty() => to_value_or_default(
                JsonRpcResponse::error(None, INVALID_REQUEST, "Empty batch"),
            ),
            serde_json::Value::Array(items) => {
                let mut responses = Vec::with_capacity(items.len());
                for item in items {
                    responses.push(to_value_or_default(self.handle_single(item).await));
                }
                serde_json::Value::Array(responses)
            }
            single => to_value_or_default(self.handle_single(single).await),
        }
    }

    async fn handle_single(&self, value: serde_json::Value) -> JsonRpcResponse {
        match serde_json::from_value::<JsonRpcRequest>(value) {
            Ok(request) => self.dispatch(request).await,
            Err(e) => JsonRpcResponse::error(
                None,
                INVALID_REQUEST,
                format!("Invalid request: {}", e),
            ),
        }
    }

    /// Dispatch a parsed JSON-RPC request to the correct method handler.
    pub async fn dispatch(&self, req: JsonRpcRequest) -> JsonRpcResponse {
        if req.jsonrpc != JSONRPC_VERSION {
            return JsonRpcResponse::error(
                req.id,
                INVALID_REQUEST,
                "Invalid JSON-RPC version, expected \"2.0\"",
            );
        }

        let id = req.id.clone();
        let params = match req.params {
            Some(serde_json::Value::Null) | None => serde_json::Value::Object(Default::default()),
            Some(params) => params,
        };

        tracing::debug!("rpc: {}", req.method);
        let mut ctx = self.context.lock().await;
        match route(&mut ctx, &req.method, params) {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(err) => {
                tracing::debug!("rpc: {} failed: {}", req.method, err);
                err.to_response(id)
            }
        }
    }

    /// All supported method names.
    pub fn method_list(&self) -> Vec<&'static str> {
        METHODS.to_vec()
    }
}

const METHODS: &[&str] = &[
    "agents.list",
    "agents.get",
    "agents.activate",
    "agents.tasks",
    "agents.call",
    "agents.validate",
    "workflows.list",
    "workflows.get",
    "workflows.validate",
    "workflow.start",
    "workflow.status",
    "workflow.advance",
    "workflow.reset",
    "workflow.report",
    "workflow.export",
    "workflow.import",
    "tasks.list",
    "tasks.get",
    "tasks.execute",
    "templates.list",
    "templates.get",
    "system.status",
    "system.scan",
    "system.mode",
    "system.setMode",
];

/// Route a method call to its handler and return the result as JSON.
fn route(
    ctx: &mut Context,
    method: &str,
    params: serde_json::Value,
) -> Result<serde_json::Value, RpcError> {
    match method {
        // ----- Agents -----
        "agents.list" => to_json(methods::agents::list(ctx)?),
        "agents.get" => to_json(methods::agents::get(ctx, parse_params(params)?)?),
        "agents.activate" => to_json(methods::agents::activate(ctx, parse_params(params)?)?),
        "agents.tasks" => to_json(methods::agents::tasks(ctx, parse_params(params)?)?),
        "agents.call" => to_json(methods::agents::call(ctx, parse_params(params)?)?),
        "agents.validate" => to_json(methods::agents::validate(ctx, parse_params(params)?)?),

        // ----- Workflow catalog -----
        "workflows.list" => to_json(methods::workflows::list(ctx)?),
        "workflows.get" => to_json(methods::workflows::get(ctx, parse_params(params)?)?),
        "workflows.validate" => {
            to_json(methods::workflows::validate(ctx, parse_params(params)?)?)
        }

        // ----- Active workflow -----
        "workflow.start" => to_json(methods::workflows::start(ctx, parse_params(params)?)?),
        "workflow.status" => to_json(methods::workflows::status(ctx)?),
        "workflow.advance" => to_json(methods::workflows::advance(ctx, parse_params(params)?)?),
        "workflow.reset" => to_json(methods::workflows::reset(ctx)?),
        "workflow.report" => to_json(methods::workflows::report(ctx)?),
        "workflow.export" => to_json(methods::workflows::export(ctx, parse_params(params)?)?),
        "workflow.import" => to_json(methods::workflows::import(ctx, parse_params(params)?)?),

        // ----- Tasks -----
        "tasks.list" => to_json(methods::tasks::list(ctx, parse_params(params)?)?),
        "tasks.get" => to_json(methods::tasks::get(ctx, parse_params(params)?)?),
        "tasks.execute" => to_json(methods::tasks::execute(ctx, parse_params(params)?)?),

        // ----- Templates -----
        "templates.list" => to_json(methods::templates::list(ctx)?),
        "templates.get" => to_json(methods::templates::get(ctx, parse_params(params)?)?),

        // ----- System -----
        "system.status" => to_json(methods::system::status(ctx)?),
        "system.scan" => to_json(methods::system::scan(ctx)?),
        "system.mode" => to_json(methods::system::mode(ctx)?),
        "system.setMode" => to_json(methods::system::set_mode(ctx, parse_params(params)?)?),

        // ----- Unknown method -----
        _ => Err(RpcError::MethodNotFound(method.to_string())),
    }
}

/// Deserialize `serde_json::Value` into a typed params struct.
fn parse_params<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> Result<T, RpcError> {
    serde_json::from_value(value).map_err(|e| RpcError::InvalidParams(e.to_string()))
}

fn to_json<T: Serialize>(result: T) -> Result<serde_json::Value, RpcError> {
    serde_json::to_value(result)
        .map_err(|e| RpcError::Internal(format!("Failed to serialize result: {}", e)))
}

fn to_value_or_default(response: JsonRpcResponse) -> serde_json::Value {
    serde_json::to_value(response).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use serde_json::json;
    use std::fs;

    fn router() -> (tempfile::TempDir, RpcRouter) {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("workflows")).unwrap();
        fs::write(
            dir.path().join("workflows/w1.yaml"),
            "workflow:\n  id: w1\n  name: W1\n  project_types: [web-app]\n  sequence: [A, B]\n",
        )
        .unwrap();
        let ctx = Context::open(Settings::new(dir.path()));
        (dir, RpcRouter::new(ctx.into_shared()))
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let (_dir, router) = router();
        let response = router
            .handle_value(json!({"jsonrpc": "2.0", "id": 1, "method": "nope"}))
            .await;
        assert_eq!(response["error"]["code"], METHOD_NOT_FOUND);
        assert_eq!(response["id"], 1);
    }

    #[tokio::test]
    async fn test_parse_error() {
        let (_dir, router) = router();
        let raw = router.handle_request("{not json").await;
        let response: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(response["error"]["code"], PARSE_ERROR);
    }

    #[tokio::test]
    async fn test_wrong_version() {
        let (_dir, router) = router();
        let response = router
            .handle_value(json!({"jsonrpc": "1.0", "id": 1, "method": "system.status"}))
            .await;
        assert_eq!(response["error"]["code"], INVALID_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_params_field() {
        let (_dir, router) = router();
        let response = router
            .handle_value(json!({"jsonrpc": "2.0", "id": 1, "method": "workflow.start"}))
            .await;
        assert_eq!(response["error"]["code"], INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_batch_runs_in_order() {
        let (_dir, router) = router();
        let response = router
            .handle_value(json!([
                {"jsonrpc": "2.0", "id": 1, "method": "workflow.start", "params": {"workflowId": "w1"}},
                {"jsonrpc": "2.0", "id": 2, "method": "workflow.advance", "params": {"artifacts": ["a.md"]}},
                {"jsonrpc": "2.0", "id": 3, "method": "workflow.status"}
            ]))
            .await;
        let responses = response.as_array().unwrap();
        assert_eq!(responses.len(), 3);
        assert_eq!(responses[2]["result"]["progress"]["percentage"], 50.0);
        assert_eq!(responses[2]["result"]["progress"]["created_artifacts"], json!(["a.md"]));
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let (_dir, router) = router();
        let response = router.handle_value(json!([])).await;
        assert_eq!(response["error"]["code"], INVALID_REQUEST);
    }

    #[tokio::test]
    async fn test_unsupported_project_type_data() {
        let (_dir, router) = router();
        let response = router
            .handle_value(json!({
                "jsonrpc": "2.0", "id": "s", "method": "workflow.start",
                "params": {"workflowId": "w1", "projectType": "cli"}
            }))
            .await;
        assert_eq!(response["error"]["code"], UNSUPPORTED_PROJECT_TYPE);
        assert_eq!(response["error"]["data"]["supportedTypes"], json!(["web-app"]));
    }

    #[test]
    fn test_method_list_is_routed() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = Context::open(Settings::new(dir.path()));
        for method in METHODS {
            let result = route(&mut ctx, method, json!({}));
            assert!(
                !matches!(result, Err(RpcError::MethodNotFound(_))),
                "{} is listed but not routed",
                method
            );
        }
    }
}
