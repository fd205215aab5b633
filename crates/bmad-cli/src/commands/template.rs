//! `bmad template` — Template commands.

use bmad_core::SharedContext;

use super::invoke;

pub async fn list(ctx: &SharedContext) -> Result<(), String> {
    invoke(ctx, "templates.list", serde_json::json!({})).await?;
    Ok(())
}

/// Print the template body as-is.
pub async fn get(ctx: &SharedContext, name: &str, raw: bool) -> Result<(), String> {
    if raw {
        let mut guard = ctx.lock().await;
        let template = guard.get_template(name).map_err(|e| e.to_string())?;
        print!("{}", template.content);
        return Ok(());
    }
    invoke(ctx, "templates.get", serde_json::json!({ "name": name })).await?;
    Ok(())
}
