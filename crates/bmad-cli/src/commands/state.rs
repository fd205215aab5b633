//! Carrying workflow progress across CLI invocations.
//!
//! Each `bmad` invocation opens a fresh context, so commands that read or
//! mutate the active workflow restore it from `--state <file>` first and
//! write it back afterwards.

use std::path::Path;

use bmad_core::SharedContext;

/// Import `path` into the context if the file exists.
pub async fn restore(ctx: &SharedContext, path: Option<&Path>) -> Result<(), String> {
    let Some(path) = path else {
        return Ok(());
    };
    if !path.exists() {
        tracing::debug!("No state file at {}, starting idle", path.display());
        return Ok(());
    }
    let mut ctx = ctx.lock().await;
    ctx.import_state(path)
        .map(|_| ())
        .map_err(|e| format!("Failed to restore workflow state: {}", e))
}

/// Write the active workflow to `path`, or remove the file once no
/// workflow is active.
pub async fn persist(ctx: &SharedContext, path: Option<&Path>) -> Result<(), String> {
    let Some(path) = path else {
        return Ok(());
    };
    let ctx = ctx.lock().await;
    if ctx.engine().is_active() {
        ctx.export_state(path)
            .map(|_| ())
            .map_err(|e| format!("Failed to save workflow state: {}", e))
    } else if path.exists() {
        std::fs::remove_file(path)
            .map_err(|e| format!("Failed to remove {}: {}", path.display(), e))
    } else {
        Ok(())
    }
}
