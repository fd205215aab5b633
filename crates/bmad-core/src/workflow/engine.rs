//! Progression of the single active workflow.
//!
//! ```text
//!   Idle ──start──► Active ──advance × total──► Completed
//!    ▲                │                            │
//!    └────reset───────┴────────────reset───────────┘
//! ```
//!
//! `start` from any state replaces the current one. `import` replaces it
//! with a snapshot read from disk.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::report::render_report;
use super::state::{CompletedStep, TaskExecution, WorkflowState, WorkflowStatus};
use crate::catalog::{Catalog, WorkflowDescriptor};
use crate::error::CoreError;

/// `current / total` as a percentage rounded to two decimals. Zero for an
/// empty workflow, never above 100.
pub fn percentage(current: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = (current as f64 / total as f64 * 100.0).min(100.0);
    (raw * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Serialize)]
pub struct Progress {
    pub current_step: usize,
    pub total_steps: usize,
    pub percentage: f64,
}

impl Progress {
    fn new(current_step: usize, total_steps: usize) -> Self {
        Self {
            current_step,
            total_steps,
            percentage: percentage(current_step, total_steps),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkflowRef {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_steps: Option<usize>,
}

impl WorkflowRef {
    fn of(workflow: &WorkflowDescriptor) -> Self {
        Self {
            id: workflow.id.clone(),
            name: workflow.name.clone(),
            description: workflow.description.clone(),
            total_steps: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StartOutcome {
    pub message: String,
    pub workflow: WorkflowRef,
    pub next_step: Option<serde_json::Value>,
    pub state: WorkflowState,
}

#[derive(Debug, Clone, Serialize)]
pub struct DetailedProgress {
    #[serde(flatten)]
    pub progress: Progress,
    pub completed_steps: Vec<CompletedStep>,
    pub created_artifacts: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub workflow: WorkflowRef,
    pub progress: DetailedProgress,
    pub current_step: Option<serde_json::Value>,
    pub status: WorkflowStatus,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdvanceOutcome {
    pub message: String,
    pub completed_step: serde_json::Value,
    pub next_step: Option<serde_json::Value>,
    pub progress: Progress,
    pub status: WorkflowStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResetOutcome {
    pub reset: bool,
    pub message: String,
    pub previous_workflow: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportOutcome {
    pub message: String,
    pub file_path: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportOutcome {
    pub message: String,
    pub workflow_id: String,
    pub state: WorkflowState,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportOutcome {
    pub workflow_id: String,
    pub report: String,
    pub state: WorkflowState,
}

/// Owner of the (at most one) `WorkflowState`. Descriptors are looked up in
/// the catalog passed to each call; the engine never caches them.
#[derive(Debug, Default)]
pub struct WorkflowEngine {
    state: Option<WorkflowState>,
}

impl WorkflowEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> Option<&WorkflowState> {
        self.state.as_ref()
    }

    pub fn current_workflow(&self) -> Option<&str> {
        self.state.as_ref().map(|s| s.workflow_id.as_str())
    }

    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }

    fn active_state(&self) -> Result<&WorkflowState, CoreError> {
        self.state.as_ref().ok_or(CoreError::NoActiveWorkflow)
    }

    fn descriptor(
        catalog: &Catalog,
        workflow_id: &str,
    ) -> Result<std::sync::Arc<WorkflowDescriptor>, CoreError> {
        catalog
            .workflow(workflow_id)
            .ok_or_else(|| CoreError::NotFound(format!("workflow '{}'", workflow_id)))
    }

    /// Begin `workflow_id`, discarding any current progress. On error the
    /// current state is left untouched.
    pub fn start(
        &mut self,
        catalog: &Catalog,
        workflow_id: &str,
        project_type: Option<String>,
    ) -> Result<StartOutcome, CoreError> {
        let workflow = Self::descriptor(catalog, workflow_id)?;

        if let Some(project_type) = project_type.as_deref() {
            if !workflow.supports(project_type) {
                return Err(CoreError::UnsupportedProjectType {
                    workflow_id: workflow_id.to_string(),
                    project_type: project_type.to_string(),
                    supported: workflow.project_types.clone(),
                });
            }
        }

        let state = WorkflowState::new(workflow.id.clone(), project_type);
        self.state = Some(state.clone());
        tracing::info!(
            "Started workflow '{}' ({} steps)",
            workflow.id,
            workflow.total_steps()
        );

        Ok(StartOutcome {
            message: format!("Started workflow: {}", workflow.name),
            workflow: WorkflowRef {
                total_steps: Some(workflow.total_steps()),
                ..WorkflowRef::of(&workflow)
            },
            next_step: workflow.step(0).cloned(),
            state,
        })
    }

    pub fn status(&self, catalog: &Catalog) -> Result<StatusSnapshot, CoreError> {
        let state = self.active_state()?;
        let workflow = Self::descriptor(catalog, &state.workflow_id)?;

        Ok(StatusSnapshot {
            workflow: WorkflowRef::of(&workflow),
            progress: DetailedProgress {
                progress: Progress::new(state.current_step, workflow.total_steps()),
                completed_steps: state.completed_steps.clone(),
                created_artifacts: state.created_artifacts.clone(),
            },
            current_step: workflow.step(state.current_step).cloned(),
            status: state.status,
            started_at: state.started_at,
        })
    }

    /// Mark the current step done and move to the next one.
    pub fn advance(
        &mut self,
        catalog: &Catalog,
        artifacts: Vec<String>,
    ) -> Result<AdvanceOutcome, CoreError> {
        let workflow_id = self.active_state()?.workflow_id.clone();
        let workflow = Self::descriptor(catalog, &workflow_id)?;
        let total = workflow.total_steps();

        let state = self.state.as_mut().ok_or(CoreError::NoActiveWorkflow)?;
        let index = state.current_step;
        let Some(completed_step) = workflow.step(index).cloned() else {
            return Err(CoreError::AlreadyCompleted);
        };

        state.completed_steps.push(CompletedStep {
            step_index: index,
            step: completed_step.clone(),
            completed_at: Utc::now(),
            artifacts: artifacts.clone(),
        });
        state.created_artifacts.extend(artifacts);
        state.current_step = index + 1;

        let (next_step, message) = if state.current_step >= total {
            state.status = WorkflowStatus::Completed;
            state.completed_at = Some(Utc::now());
            tracing::info!("Workflow '{}' completed", workflow.id);
            (
                None,
                format!("Workflow '{}' completed successfully!", workflow.name),
            )
        } else {
            (
                workflow.step(state.current_step).cloned(),
                format!("Advanced to step {} of {}", state.current_step + 1, total),
            )
        };

        Ok(AdvanceOutcome {
            message,
            completed_step,
            next_step,
            progress: Progress::new(state.current_step, total),
            status: state.status,
        })
    }

    pub fn reset(&mut self) -> ResetOutcome {
        match self.state.take() {
            Some(previous) => {
                tracing::info!("Reset workflow '{}'", previous.workflow_id);
                ResetOutcome {
                    reset: true,
                    message: format!("Reset workflow '{}'", previous.workflow_id),
                    previous_workflow: Some(previous.workflow_id),
                }
            }
            None => ResetOutcome {
                reset: false,
                message: "No active workflow to reset".to_string(),
                previous_workflow: None,
            },
        }
    }

    /// Write the state to `path` as pretty JSON.
    pub fn export(&self, path: &Path) -> Result<ExportOutcome, CoreError> {
        let state = self.active_state()?;
        let json =
            serde_json::to_string_pretty(state).map_err(|source| CoreError::Encode { source })?;
        std::fs::write(path, json).map_err(|e| CoreError::io(path, e))?;

        let file_path = std::path::absolute(path).map_err(|e| CoreError::io(path, e))?;
        tracing::debug!("Exported workflow state to {}", file_path.display());
        Ok(ExportOutcome {
            message: format!("Workflow state exported to {}", path.display()),
            file_path,
        })
    }

    /// Replace the state with a snapshot from `path`. The referenced
    /// workflow is not checked against the catalog.
    pub fn import(&mut self, path: &Path) -> Result<ImportOutcome, CoreError> {
        if !path.exists() {
            return Err(CoreError::NotFound(format!(
                "state file '{}'",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::io(path, e))?;
        let state: WorkflowState =
            serde_json::from_str(&content).map_err(|source| CoreError::Decode {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::debug!(
            "Imported workflow state for '{}' from {}",
            state.workflow_id,
            path.display()
        );
        self.state = Some(state.clone());
        Ok(ImportOutcome {
            message: format!("Workflow state imported from {}", path.display()),
            workflow_id: state.workflow_id.clone(),
            state,
        })
    }

    /// Append a task execution to the active state. Returns `false` when no
    /// workflow is active.
    pub fn record_task_execution(
        &mut self,
        task_name: &str,
        agent: &str,
        context: Option<serde_json::Map<String, serde_json::Value>>,
    ) -> bool {
        let Some(state) = self.state.as_mut() else {
            return false;
        };
        state
            .task_executions
            .get_or_insert_with(Vec::new)
            .push(TaskExecution {
                task_name: task_name.to_string(),
                agent: agent.to_string(),
                executed_at: Utc::now(),
                context,
            });
        true
    }

    pub fn report(&self) -> Result<ReportOutcome, CoreError> {
        let state = self.active_state()?;
        Ok(ReportOutcome {
            workflow_id: state.workflow_id.clone(),
            report: render_report(state),
            state: state.clone(),
        })
    }
}
