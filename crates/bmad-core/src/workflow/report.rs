//! Markdown rendering of a workflow state.

use super::state::WorkflowState;

pub fn render_report(state: &WorkflowState) -> String {
    let mut out = String::from("# Workflow Execution Report\n\n");

    out.push_str("## Overview\n");
    out.push_str(&format!("- Workflow ID: {}\n", state.workflow_id));
    out.push_str(&format!(
        "- Project type: {}\n",
        state.project_type.as_deref().unwrap_or("N/A")
    ));
    out.push_str(&format!("- Started at: {}\n", state.started_at.to_rfc3339()));
    out.push_str(&format!("- Status: {}\n", state.status));
    if let Some(completed_at) = state.completed_at {
        out.push_str(&format!("- Completed at: {}\n", completed_at.to_rfc3339()));
    }
    out.push('\n');

    out.push_str("## Progress\n");
    out.push_str(&format!("- Current step: {}\n", state.current_step));
    out.push_str(&format!(
        "- Completed steps: {}\n\n",
        state.completed_steps.len()
    ));

    if !state.completed_steps.is_empty() {
        out.push_str("## Completed Steps\n");
        for (i, step) in state.completed_steps.iter().enumerate() {
            out.push_str(&format!("### Step {}\n", i + 1));
            out.push_str(&format!("- Completed at: {}\n", step.completed_at.to_rfc3339()));
            if !step.artifacts.is_empty() {
                out.push_str("- Artifacts:\n");
                for artifact in &step.artifacts {
                    out.push_str(&format!("  - {}\n", artifact));
                }
            }
            out.push('\n');
        }
    }

    if !state.created_artifacts.is_empty() {
        out.push_str("## Created Artifacts\n");
        for artifact in &state.created_artifacts {
            out.push_str(&format!("- {}\n", artifact));
        }
        out.push('\n');
    }

    let executions = state.task_executions();
    if !executions.is_empty() {
        out.push_str("## Task Execution History\n");
        for (i, execution) in executions.iter().enumerate() {
            out.push_str(&format!("### Task {}: {}\n", i + 1, execution.task_name));
            out.push_str(&format!("- Agent: {}\n", execution.agent));
            out.push_str(&format!(
                "- Executed at: {}\n",
                execution.executed_at.to_rfc3339()
            ));
            if let Some(context) = execution.context.as_ref().filter(|c| !c.is_empty()) {
                out.push_str("- Context:\n");
                for (key, value) in context {
                    let shown = match value.as_str() {
                        Some(text) => text.to_string(),
                        None => value.to_string(),
                    };
                    out.push_str(&format!("  - {}: {}\n", key, shown));
                }
            }
            out.push('\n');
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::state::{CompletedStep, TaskExecution};
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn test_fresh_state_report() {
        let state = WorkflowState::new("greenfield", None);
        let report = render_report(&state);
        assert!(report.starts_with("# Workflow Execution Report"));
        assert!(report.contains("- Workflow ID: greenfield"));
        assert!(report.contains("- Project type: N/A"));
        assert!(report.contains("- Status: active"));
        assert!(!report.contains("## Completed Steps"));
        assert!(!report.contains("## Task Execution History"));
    }

    #[test]
    fn test_report_sections() {
        let mut state = WorkflowState::new("greenfield", Some("web-app".into()));
        state.completed_steps.push(CompletedStep {
            step_index: 0,
            step: json!({"agent": "analyst"}),
            completed_at: Utc::now(),
            artifacts: vec!["brief.md".into()],
        });
        state.created_artifacts.push("brief.md".into());
        state.current_step = 1;

        let mut context = serde_json::Map::new();
        context.insert("section".into(), json!("goals"));
        context.insert("depth".into(), json!(2));
        state.task_executions = Some(vec![TaskExecution {
            task_name: "create-doc".into(),
            agent: "pm".into(),
            executed_at: Utc::now(),
            context: Some(context),
        }]);

        let report = render_report(&state);
        assert!(report.contains("- Project type: web-app"));
        assert!(report.contains("### Step 1"));
        assert!(report.contains("  - brief.md"));
        assert!(report.contains("## Created Artifacts\n- brief.md"));
        assert!(report.contains("### Task 1: create-doc"));
        assert!(report.contains("  - section: goals"));
        assert!(report.contains("  - depth: 2"));
    }
}
