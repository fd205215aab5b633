//! `bmad rpc` — Raw JSON-RPC invocation.

use std::path::Path;

use bmad_core::SharedContext;

use super::{invoke, state};

pub async fn call(
    ctx: &SharedContext,
    method: &str,
    params_str: &str,
    state_file: Option<&Path>,
) -> Result<(), String> {
    let params: serde_json::Value =
        serde_json::from_str(params_str).map_err(|e| format!("Invalid JSON params: {}", e))?;

    state::restore(ctx, state_file).await?;
    invoke(ctx, method, params).await?;
    state::persist(ctx, state_file).await
}
