//! RPC methods for tasks.
//!
//! Methods:
//! - `tasks.list`    — all tasks, or those an agent depends on
//! - `tasks.get`     — one task by name
//! - `tasks.execute` — run a task under the active agent

use serde::Deserialize;

use crate::catalog::TaskDescriptor;
use crate::context::{Context, TaskList, TaskRun};
use crate::rpc::error::RpcError;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    #[serde(default)]
    pub agent_id: Option<String>,
}

pub fn list(ctx: &mut Context, params: ListParams) -> Result<TaskList, RpcError> {
    Ok(ctx.list_tasks(params.agent_id.as_deref())?)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetParams {
    pub name: String,
}

pub fn get(ctx: &mut Context, params: GetParams) -> Result<TaskDescriptor, RpcError> {
    Ok(ctx.get_task(&params.name)?)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteParams {
    pub name: String,
    #[serde(default)]
    pub context: Option<serde_json::Map<String, serde_json::Value>>,
}

pub fn execute(ctx: &mut Context, params: ExecuteParams) -> Result<TaskRun, RpcError> {
    Ok(ctx.execute_task(&params.name, params.context)?)
}
