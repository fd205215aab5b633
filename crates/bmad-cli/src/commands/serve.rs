//! `bmad serve` — JSON-RPC over stdio.
//!
//! One request (or batch) per line on stdin, one response per line on
//! stdout. Logs go to stderr. The loop ends at EOF.

use bmad_core::rpc::RpcRouter;
use bmad_core::SharedContext;
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

pub async fn run(ctx: &SharedContext) -> Result<(), String> {
    let router = RpcRouter::new(ctx.clone());
    tracing::info!(
        "Serving {} JSON-RPC methods on stdio",
        router.method_list().len()
    );
    serve_lines(&router, tokio::io::stdin(), tokio::io::stdout()).await
}

/// Drive the router over any line-oriented reader/writer pair.
pub async fn serve_lines<R, W>(router: &RpcRouter, reader: R, mut writer: W) -> Result<(), String>
where
    R: tokio::io::AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    let mut handled = 0usize;

    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| format!("Failed to read stdin: {}", e))?
    {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = router.handle_request(line).await;
        writer
            .write_all(response.as_bytes())
            .await
            .map_err(|e| format!("Failed to write response: {}", e))?;
        writer
            .write_all(b"\n")
            .await
            .map_err(|e| format!("Failed to write response: {}", e))?;
        writer
            .flush()
            .await
            .map_err(|e| format!("Failed to flush stdout: {}", e))?;
        handled += 1;
    }

    tracing::info!("stdin closed after {} requests", handled);
    Ok(())
}
