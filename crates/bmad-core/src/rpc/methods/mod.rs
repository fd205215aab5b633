//! JSON-RPC method implementations, organized by domain.
//!
//! Each sub-module exposes typed param structs and a function per method
//! that takes the locked `Context` plus params and returns a serializable
//! result.

pub mod agents;
pub mod system;
pub mod tasks;
pub mod templates;
pub mod workflows;
