//! Transport-agnostic JSON-RPC 2.0 layer for the BMAD service.
//!
//! Every `Context` operation is reachable as a method (`agents.*`,
//! `workflows.*`, `workflow.*`, `tasks.*`, `templates.*`, `system.*`) and
//! every `CoreError` maps to a structured JSON-RPC error code.
//!
//! # Example
//!
//! ```ignore
//! use bmad_core::rpc::RpcRouter;
//!
//! let router = RpcRouter::new(context.into_shared());
//! let response = router.handle_request(r#"{
//!     "jsonrpc": "2.0",
//!     "id": 1,
//!     "method": "workflow.start",
//!     "params": { "workflowId": "greenfield-fullstack" }
//! }"#).await;
//! ```

pub mod error;
pub mod methods;
pub mod router;
pub mod types;

pub use error::RpcError;
pub use router::RpcRouter;
pub use types::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
