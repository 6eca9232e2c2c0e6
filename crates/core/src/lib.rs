//! Shared domain types and the boundary validation layer for opsdeck.
//!
//! Everything that crosses the process boundary (execution updates,
//! execution requests, settings writes, session-state loads, protocol
//! URLs, generic IPC messages) is validated here before any other crate
//! is allowed to trust it.

pub mod boundary;
pub mod channels;
pub mod error;
pub mod status;
pub mod types;
