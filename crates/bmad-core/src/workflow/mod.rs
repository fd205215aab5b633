//! Workflow progression: the state record, the engine that drives it and a
//! markdown report over it.

mod engine;
mod report;
mod state;

pub use engine::{
    percentage, AdvanceOutcome, DetailedProgress, ExportOutcome, ImportOutcome, Progress,
    ReportOutcome, ResetOutcome, StartOutcome, StatusSnapshot, WorkflowEngine, WorkflowRef,
};
pub use report::render_report;
pub use state::{CompletedStep, TaskExecution, WorkflowState, WorkflowStatus};
