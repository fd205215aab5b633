//! RPC methods for service status, catalog scanning and dispatch mode.
//!
//! Methods:
//! - `system.status`  — paths, counts, pointers and lazy-load state
//! - `system.scan`    — validate every catalog file
//! - `system.mode`    — current dispatch mode and the alternatives
//! - `system.setMode` — switch dispatch mode

use serde::Deserialize;

use crate::context::{CatalogScan, Context, ModeSwitch, SystemStatus};
use crate::dispatch::ModeInfo;
use crate::rpc::error::RpcError;

pub fn status(ctx: &mut Context) -> Result<SystemStatus, RpcError> {
    Ok(ctx.system_status())
}

pub fn scan(ctx: &mut Context) -> Result<CatalogScan, RpcError> {
    Ok(ctx.scan_catalog())
}

pub fn mode(ctx: &mut Context) -> Result<ModeInfo, RpcError> {
    Ok(ctx.dispatch_mode_info())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetModeParams {
    pub mode: String,
}

pub fn set_mode(ctx: &mut Context, params: SetModeParams) -> Result<ModeSwitch, RpcError> {
    Ok(ctx.set_dispatch_mode(&params.mode)?)
}
