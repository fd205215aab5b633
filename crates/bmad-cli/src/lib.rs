//! Library half of the `bmad` binary, so integration tests can reach the
//! command implementations.

pub mod commands;
