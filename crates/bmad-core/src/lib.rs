//! BMAD Core — transport-agnostic domain logic for the BMAD agent service.
//!
//! This crate owns the agent/workflow catalog loaded from a `.bmad-core`
//! directory, the progression state of the single active workflow, and a
//! JSON-RPC router over both. It has **no transport dependency**, making it
//! suitable for use in:
//!
//! - the `bmad` CLI (one-shot commands)
//! - a stdio JSON-RPC server (tool-calling hosts)
//! - any embedding that can hand it a JSON value
//!
//! # Layout
//!
//! ```text
//! .bmad-core/ ──► Catalog (EntityCache per kind) ──┐
//!                                                  ├─► Context ──► RpcRouter
//!                  WorkflowEngine (WorkflowState) ─┘
//! ```

pub mod cache;
pub mod catalog;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod rpc;
pub mod workflow;

// Convenience re-exports
pub use catalog::Catalog;
pub use config::Settings;
pub use context::{Context, SharedContext};
pub use error::CoreError;
pub use workflow::WorkflowEngine;
