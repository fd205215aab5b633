//! RPC methods for workflow definitions and the active workflow.
//!
//! Catalog:
//! - `workflows.list`, `workflows.get`, `workflows.validate`
//!
//! Progression of the single active workflow:
//! - `workflow.start`  — begin a workflow (optionally for a project type)
//! - `workflow.status` — progress snapshot
//! - `workflow.advance`— complete the current step
//! - `workflow.reset`  — drop the active workflow
//! - `workflow.report` — markdown execution report
//! - `workflow.export` / `workflow.import` — JSON snapshot on disk

use std::path::PathBuf;

use serde::Deserialize;

use crate::catalog::validation::ValidationReport;
use crate::catalog::WorkflowDescriptor;
use crate::context::{Context, WorkflowList};
use crate::rpc::error::RpcError;
use crate::workflow::{
    AdvanceOutcome, ExportOutcome, ImportOutcome, ReportOutcome, ResetOutcome, StartOutcome,
    StatusSnapshot,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdParams {
    pub id: String,
}

pub fn list(ctx: &mut Context) -> Result<WorkflowList, RpcError> {
    Ok(ctx.list_workflows())
}

pub fn get(ctx: &mut Context, params: IdParams) -> Result<WorkflowDescriptor, RpcError> {
    let workflow = ctx.get_workflow(&params.id)?;
    Ok(workflow.as_ref().clone())
}

pub fn validate(ctx: &mut Context, params: IdParams) -> Result<ValidationReport, RpcError> {
    Ok(ctx.validate_workflow(&params.id)?)
}

// ---------------------------------------------------------------------------
// workflow.start
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartParams {
    pub workflow_id: String,
    #[serde(default)]
    pub project_type: Option<String>,
}

pub fn start(ctx: &mut Context, params: StartParams) -> Result<StartOutcome, RpcError> {
    Ok(ctx.start_workflow(&params.workflow_id, params.project_type)?)
}

pub fn status(ctx: &mut Context) -> Result<StatusSnapshot, RpcError> {
    Ok(ctx.workflow_status()?)
}

// ---------------------------------------------------------------------------
// workflow.advance
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceParams {
    #[serde(default)]
    pub artifacts: Option<Vec<String>>,
}

pub fn advance(ctx: &mut Context, params: AdvanceParams) -> Result<AdvanceOutcome, RpcError> {
    Ok(ctx.advance_workflow(params.artifacts.unwrap_or_default())?)
}

pub fn reset(ctx: &mut Context) -> Result<ResetOutcome, RpcError> {
    Ok(ctx.reset_workflow())
}

pub fn report(ctx: &mut Context) -> Result<ReportOutcome, RpcError> {
    Ok(ctx.workflow_report()?)
}

// ---------------------------------------------------------------------------
// workflow.export / workflow.import
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathParams {
    pub path: PathBuf,
}

pub fn export(ctx: &mut Context, params: PathParams) -> Result<ExportOutcome, RpcError> {
    Ok(ctx.export_state(&params.path)?)
}

pub fn import(ctx: &mut Context, params: PathParams) -> Result<ImportOutcome, RpcError> {
    Ok(ctx.import_state(&params.path)?)
}
