use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStatus {
    Active,
    Completed,
}

impl WorkflowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStatus::Active => "active",
            WorkflowStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedStep {
    pub step_index: usize,
    pub step: serde_json::Value,
    pub completed_at: DateTime<Utc>,
    #[serde(default)]
    pub artifacts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskExecution {
    pub task_name: String,
    pub agent: String,
    pub executed_at: DateTime<Utc>,
    #[serde(default)]
    pub context: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Progress of the one active workflow. This is also the export format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowState {
    pub workflow_id: String,
    #[serde(default)]
    pub project_type: Option<String>,
    pub current_step: usize,
    #[serde(default)]
    pub completed_steps: Vec<CompletedStep>,
    #[serde(default)]
    pub created_artifacts: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub status: WorkflowStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_executions: Option<Vec<TaskExecution>>,
}

impl WorkflowState {
    pub fn new(workflow_id: impl Into<String>, project_type: Option<String>) -> Self {
        Self {
            workflow_id: workflow_id.into(),
            project_type,
            current_step: 0,
            completed_steps: Vec::new(),
            created_artifacts: Vec::new(),
            started_at: Utc::now(),
            status: WorkflowStatus::Active,
            completed_at: None,
            task_executions: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == WorkflowStatus::Completed
    }

    pub fn task_executions(&self) -> &[TaskExecution] {
        self.task_executions.as_deref().unwrap_or(&[])
    }
}
