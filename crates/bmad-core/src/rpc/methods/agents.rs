//! RPC methods for the agent catalog.
//!
//! Methods:
//! - `agents.list`     — list discovered agents
//! - `agents.get`      — full descriptor of one agent
//! - `agents.activate` — make an agent the current one
//! - `agents.tasks`    — an agent's tasks, templates and dependencies
//! - `agents.call`     — frame a task in the agent's persona and dispatch it
//! - `agents.validate` — structural check of `agents/<id>.md`

use serde::Deserialize;

use crate::catalog::validation::ValidationReport;
use crate::catalog::AgentDescriptor;
use crate::context::{Activation, AgentList, AgentTasks, Context};
use crate::rpc::error::RpcError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdParams {
    pub id: String,
}

pub fn list(ctx: &mut Context) -> Result<AgentList, RpcError> {
    Ok(ctx.list_agents())
}

pub fn get(ctx: &mut Context, params: IdParams) -> Result<AgentDescriptor, RpcError> {
    let agent = ctx.get_agent(&params.id)?;
    Ok(agent.as_ref().clone())
}

pub fn activate(ctx: &mut Context, params: IdParams) -> Result<Activation, RpcError> {
    Ok(ctx.activate_agent(&params.id)?)
}

pub fn tasks(ctx: &mut Context, params: IdParams) -> Result<AgentTasks, RpcError> {
    Ok(ctx.get_agent_tasks(&params.id)?)
}

// ---------------------------------------------------------------------------
// agents.call
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallParams {
    pub id: String,
    pub task: String,
    #[serde(default)]
    pub context: Option<serde_json::Map<String, serde_json::Value>>,
}

pub fn call(ctx: &mut Context, params: CallParams) -> Result<serde_json::Value, RpcError> {
    if params.task.trim().is_empty() {
        return Err(RpcError::InvalidParams("task must not be empty".into()));
    }
    Ok(ctx.call_agent(&params.id, &params.task, params.context)?)
}

pub fn validate(ctx: &mut Context, params: IdParams) -> Result<ValidationReport, RpcError> {
    Ok(ctx.validate_agent(&params.id)?)
}
