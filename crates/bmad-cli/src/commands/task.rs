//! `bmad task` — Task commands.

use std::path::Path;

use bmad_core::SharedContext;

use super::agent::parse_object;
use super::{invoke, state};

pub async fn list(ctx: &SharedContext, agent_id: Option<&str>) -> Result<(), String> {
    let params = match agent_id {
        Some(agent_id) => serde_json::json!({ "agentId": agent_id }),
        None => serde_json::json!({}),
    };
    invoke(ctx, "tasks.list", params).await?;
    Ok(())
}

pub async fn get(ctx: &SharedContext, name: &str) -> Result<(), String> {
    invoke(ctx, "tasks.get", serde_json::json!({ "name": name })).await?;
    Ok(())
}

/// Activate `agent` (the active agent does not outlive a process), then run
/// the task. With a state file the run lands in the workflow history.
pub async fn execute(
    ctx: &SharedContext,
    name: &str,
    agent: &str,
    context: Option<&str>,
    state_file: Option<&Path>,
) -> Result<(), String> {
    state::restore(ctx, state_file).await?;
    {
        let mut guard = ctx.lock().await;
        guard.activate_agent(agent).map_err(|e| e.to_string())?;
    }

    let mut params = serde_json::json!({ "name": name });
    if let Some(raw) = context {
        params["context"] = parse_object(raw)?;
    }
    invoke(ctx, "tasks.execute", params).await?;
    state::persist(ctx, state_file).await
}
