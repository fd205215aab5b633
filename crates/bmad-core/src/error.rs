//! Core error type for the BMAD service.
//!
//! `CoreError` is returned by every `Context` operation. Per-file parse
//! failures never surface here; they are handled inside the catalog (see
//! [`crate::catalog::ParseFailure`]).

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Project type '{project_type}' not supported by workflow '{workflow_id}'")]
    UnsupportedProjectType {
        workflow_id: String,
        project_type: String,
        supported: Vec<String>,
    },

    #[error("No active workflow")]
    NoActiveWorkflow,

    #[error("Workflow already completed")]
    AlreadyCompleted,

    #[error("No agent activated. Please activate an agent first.")]
    NoActiveAgent,

    #[error("Invalid mode: {0}")]
    InvalidMode(String),

    #[error("No external dispatcher is configured for mode '{0}'")]
    DispatchUnavailable(String),

    #[error("Dispatch failed: {0}")]
    Dispatch(String),

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode workflow state: {source}")]
    Encode {
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid workflow state in {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl CoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CoreError::Io {
            path: path.into(),
            source,
        }
    }
}
