//! RPC methods for templates.
//!
//! Methods:
//! - `templates.list` — template names
//! - `templates.get`  — template content by name

use serde::{Deserialize, Serialize};

use crate::context::{Context, TemplateList};
use crate::rpc::error::RpcError;

pub fn list(ctx: &mut Context) -> Result<TemplateList, RpcError> {
    Ok(ctx.list_templates())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetParams {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct GetResult {
    pub template_name: String,
    pub content: String,
}

pub fn get(ctx: &mut Context, params: GetParams) -> Result<GetResult, RpcError> {
    let template = ctx.get_template(&params.name)?;
    Ok(GetResult {
        template_name: template.name,
        content: template.content,
    })
}
