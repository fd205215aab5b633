//! CLI command implementations.
//!
//! Each submodule corresponds to a top-level CLI command and reaches the
//! bmad-core domain through the same JSON-RPC router the stdio server uses.

pub mod agent;
pub mod rpc;
pub mod serve;
pub mod state;
pub mod system;
pub mod task;
pub mod template;
pub mod workflow;

use bmad_core::rpc::RpcRouter;
use bmad_core::{Context, Settings, SharedContext};

/// Open the catalog at `settings.root` and wrap it for the router.
pub fn init_context(settings: Settings) -> SharedContext {
    Context::open(settings).into_shared()
}

/// Pretty-print a JSON value to stdout.
pub fn print_json(value: &serde_json::Value) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
    );
}

/// Send one request through the router, print the response and turn a
/// JSON-RPC error into a command failure.
pub async fn invoke(
    ctx: &SharedContext,
    method: &str,
    params: serde_json::Value,
) -> Result<serde_json::Value, String> {
    let router = RpcRouter::new(ctx.clone());
    let response = router
        .handle_value(serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params
        }))
        .await;
    print_json(&response);

    match response.get("error") {
        Some(error) => Err(format!(
            "{} failed: {} (code {})",
            method,
            error["message"].as_str().unwrap_or("unknown error"),
            error["code"]
        )),
        None => Ok(response),
    }
}
