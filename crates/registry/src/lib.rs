//! Execution state reconciliation engine.
//!
//! Ingests execution-status events from two independent origins (direct
//! UI calls and externally triggered host notifications), merges them
//! into a single consistent timeline per execution, and exposes derived
//! active/recent views. All inbound payloads are assumed to have passed
//! the `opsdeck-core` boundary validators first.

pub mod bus;
pub mod config;
pub mod execution;
pub mod host;
pub mod registry;
pub mod service;

pub use execution::{Execution, SCRIPT_ID_UNKNOWN};
pub use registry::{ApplyOutcome, ExecutionRegistry};
pub use service::ExecutionService;
