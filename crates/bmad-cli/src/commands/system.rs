//! `bmad system` — Service status, catalog scan and dispatch mode.

use bmad_core::SharedContext;

use super::invoke;

pub async fn status(ctx: &SharedContext) -> Result<(), String> {
    invoke(ctx, "system.status", serde_json::json!({})).await?;
    Ok(())
}

/// Scan the catalog. `markdown` prints the human-readable report instead of
/// the JSON response.
pub async fn scan(ctx: &SharedContext, markdown: bool) -> Result<(), String> {
    if markdown {
        let guard = ctx.lock().await;
        print!("{}", guard.scan_catalog().report);
        return Ok(());
    }
    invoke(ctx, "system.scan", serde_json::json!({})).await?;
    Ok(())
}

/// Show the dispatch mode, or switch it for the rest of this process.
pub async fn mode(ctx: &SharedContext, set: Option<&str>) -> Result<(), String> {
    match set {
        Some(mode) => invoke(ctx, "system.setMode", serde_json::json!({ "mode": mode })).await?,
        None => invoke(ctx, "system.mode", serde_json::json!({})).await?,
    };
    Ok(())
}
