//! The tracked execution record.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use opsdeck_core::status::ExecutionStatus;
use opsdeck_core::types::Timestamp;

/// Sentinel `script_id` for externally triggered executions whose first
/// event carried no script identifier.
pub const SCRIPT_ID_UNKNOWN: &str = "unknown";

/// One observed run of a script.
///
/// `start_time` is set once at creation and never mutated. `end_time` is
/// set exactly once, when the record reaches a terminal status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Execution {
    pub id: Uuid,
    pub script_id: String,
    pub script_name: String,
    pub status: ExecutionStatus,
    pub start_time: Timestamp,
    pub end_time: Option<Timestamp>,
    pub progress: Option<u8>,
    pub output: Option<String>,
    pub error: Option<String>,
}

impl Execution {
    /// `true` once the record has reached an absorbing status.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
