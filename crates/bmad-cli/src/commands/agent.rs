//! `bmad agent` — Agent catalog commands.

use bmad_core::SharedContext;

use super::invoke;

pub async fn list(ctx: &SharedContext) -> Result<(), String> {
    invoke(ctx, "agents.list", serde_json::json!({})).await?;
    Ok(())
}

pub async fn get(ctx: &SharedContext, id: &str) -> Result<(), String> {
    invoke(ctx, "agents.get", serde_json::json!({ "id": id })).await?;
    Ok(())
}

pub async fn activate(ctx: &SharedContext, id: &str) -> Result<(), String> {
    invoke(ctx, "agents.activate", serde_json::json!({ "id": id })).await?;
    Ok(())
}

pub async fn tasks(ctx: &SharedContext, id: &str) -> Result<(), String> {
    invoke(ctx, "agents.tasks", serde_json::json!({ "id": id })).await?;
    Ok(())
}

pub async fn call(
    ctx: &SharedContext,
    id: &str,
    task: &str,
    context: Option<&str>,
) -> Result<(), String> {
    let mut params = serde_json::json!({ "id": id, "task": task });
    if let Some(raw) = context {
        params["context"] = parse_object(raw)?;
    }
    invoke(ctx, "agents.call", params).await?;
    Ok(())
}

pub async fn validate(ctx: &SharedContext, id: &str) -> Result<(), String> {
    invoke(ctx, "agents.validate", serde_json::json!({ "id": id })).await?;
    Ok(())
}

/// Parse a `--context` argument, which must be a JSON object.
pub fn parse_object(raw: &str) -> Result<serde_json::Value, String> {
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| format!("Invalid JSON context: {}", e))?;
    if !value.is_object() {
        return Err("Context must be a JSON object".to_string());
    }
    Ok(value)
}
