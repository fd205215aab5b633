//! `bmad workflow` — Workflow catalog and progression commands.
//!
//! Progression commands take an optional state file so a workflow can be
//! driven one step per invocation:
//!
//! ```text
//! bmad workflow start greenfield-fullstack --state .bmad-state.json
//! bmad workflow advance --artifact docs/brief.md --state .bmad-state.json
//! bmad workflow status --state .bmad-state.json
//! ```

use std::path::Path;

use bmad_core::SharedContext;

use super::{invoke, state};

pub async fn list(ctx: &SharedContext, state_file: Option<&Path>) -> Result<(), String> {
    state::restore(ctx, state_file).await?;
    invoke(ctx, "workflows.list", serde_json::json!({})).await?;
    Ok(())
}

pub async fn get(ctx: &SharedContext, id: &str) -> Result<(), String> {
    invoke(ctx, "workflows.get", serde_json::json!({ "id": id })).await?;
    Ok(())
}

pub async fn validate(ctx: &SharedContext, id: &str) -> Result<(), String> {
    invoke(ctx, "workflows.validate", serde_json::json!({ "id": id })).await?;
    Ok(())
}

pub async fn start(
    ctx: &SharedContext,
    id: &str,
    project_type: Option<&str>,
    state_file: Option<&Path>,
) -> Result<(), String> {
    state::restore(ctx, state_file).await?;
    let mut params = serde_json::json!({ "workflowId": id });
    if let Some(project_type) = project_type {
        params["projectType"] = serde_json::json!(project_type);
    }
    invoke(ctx, "workflow.start", params).await?;
    state::persist(ctx, state_file).await
}

pub async fn status(ctx: &SharedContext, state_file: Option<&Path>) -> Result<(), String> {
    state::restore(ctx, state_file).await?;
    invoke(ctx, "workflow.status", serde_json::json!({})).await?;
    Ok(())
}

pub async fn advance(
    ctx: &SharedContext,
    artifacts: Vec<String>,
    state_file: Option<&Path>,
) -> Result<(), String> {
    state::restore(ctx, state_file).await?;
    invoke(
        ctx,
        "workflow.advance",
        serde_json::json!({ "artifacts": artifacts }),
    )
    .await?;
    state::persist(ctx, state_file).await
}

pub async fn reset(ctx: &SharedContext, state_file: Option<&Path>) -> Result<(), String> {
    state::restore(ctx, state_file).await?;
    invoke(ctx, "workflow.reset", serde_json::json!({})).await?;
    state::persist(ctx, state_file).await
}

/// Print the markdown report as plain text rather than JSON.
pub async fn report(ctx: &SharedContext, state_file: Option<&Path>) -> Result<(), String> {
    state::restore(ctx, state_file).await?;
    let guard = ctx.lock().await;
    let outcome = guard.workflow_report().map_err(|e| e.to_string())?;
    println!("{}", outcome.report);
    Ok(())
}

pub async fn export(
    ctx: &SharedContext,
    path: &Path,
    state_file: Option<&Path>,
) -> Result<(), String> {
    state::restore(ctx, state_file).await?;
    invoke(ctx, "workflow.export", serde_json::json!({ "path": path })).await?;
    Ok(())
}

pub async fn import(
    ctx: &SharedContext,
    path: &Path,
    state_file: Option<&Path>,
) -> Result<(), String> {
    invoke(ctx, "workflow.import", serde_json::json!({ "path": path })).await?;
    state::persist(ctx, state_file).await
}
