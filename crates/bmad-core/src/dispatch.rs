//! Agent dispatch — framing a task in an agent's persona and handing it to
//! whichever model will run it.
//!
//! In `builtin` mode the role prompt is returned to the caller, whose own
//! model is expected to adopt it. In `external` mode the request goes to an
//! [`AgentDispatcher`] registered on the `Context`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::AgentDescriptor;
use crate::error::CoreError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchMode {
    #[default]
    Builtin,
    External,
}

impl DispatchMode {
    /// Accepts the canonical names and their aliases, case-insensitively.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "builtin" | "builtin_llm" | "internal" => Some(DispatchMode::Builtin),
            "external" | "external_api" | "api" => Some(DispatchMode::External),
            _ => None,
        }
    }

    /// Label attached to every `call_agent` result.
    pub fn label(&self) -> &'static str {
        match self {
            DispatchMode::Builtin => "builtin_llm",
            DispatchMode::External => "external_api",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            DispatchMode::Builtin => "Host model (role prompt returned to the caller)",
            DispatchMode::External => "External dispatcher registered on the service",
        }
    }
}

impl fmt::Display for DispatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Everything an external dispatcher needs to run one agent call.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchRequest {
    pub agent_id: String,
    pub agent_title: String,
    pub role_prompt: String,
    pub task: String,
    pub context: serde_json::Map<String, serde_json::Value>,
}

/// Runs an agent call outside the process. Implementations return a JSON
/// object; the caller tags it with the mode label and a timestamp.
pub trait AgentDispatcher: Send {
    fn name(&self) -> &str;

    fn dispatch(&self, request: &DispatchRequest) -> Result<serde_json::Value, CoreError>;
}

/// Persona framing for `agent`, in the order name, identity, focus, style,
/// role, when-to-use.
pub fn role_prompt(agent: &AgentDescriptor) -> String {
    format!(
        "You are now {name} ({title}).\n\n\
         🎭 Identity: {identity}\n\n\
         🎯 Focus: {focus}\n\n\
         💼 Style: {style}\n\n\
         📋 Core responsibility: {role}\n\n\
         🔧 When to use: {when_to_use}\n\n\
         Handle the user's task in this role. Stay professional and consistent with the persona.",
        name = agent.name,
        title = agent.title,
        identity = agent.identity,
        focus = agent.focus,
        style = agent.style,
        role = agent.role,
        when_to_use = agent.when_to_use,
    )
}

#[derive(Debug, Clone, Serialize)]
pub struct ModeDescription {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModeInfo {
    pub current_mode: &'static str,
    pub current_description: &'static str,
    pub dispatcher: Option<String>,
    pub available_modes: Vec<ModeDescription>,
}

impl ModeInfo {
    pub fn new(current: DispatchMode, dispatcher: Option<String>) -> Self {
        Self {
            current_mode: current.label(),
            current_description: current.description(),
            dispatcher,
            available_modes: [DispatchMode::Builtin, DispatchMode::External]
                .into_iter()
                .map(|mode| ModeDescription {
                    name: mode.label(),
                    description: mode.description(),
                    usage: match mode {
                        DispatchMode::Builtin => "system.setMode {\"mode\": \"builtin\"}",
                        DispatchMode::External => "system.setMode {\"mode\": \"external\"}",
                    },
                })
                .collect(),
        }
    }
}
