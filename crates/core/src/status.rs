//! Execution lifecycle status set.
//!
//! `success`, `error`, and `cancelled` are terminal (absorbing): once a
//! record reaches one of them, no later event may change its status.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Execution has been created but not yet started.
pub const STATUS_PENDING: &str = "pending";
/// Script process is currently running.
pub const STATUS_RUNNING: &str = "running";
/// Script finished successfully.
pub const STATUS_SUCCESS: &str = "success";
/// Script exited with a non-zero code or encountered an error.
pub const STATUS_ERROR: &str = "error";
/// Script was cancelled by the user or the host.
pub const STATUS_CANCELLED: &str = "cancelled";

/// All valid statuses.
pub const VALID_STATUSES: &[&str] = &[
    STATUS_PENDING,
    STATUS_RUNNING,
    STATUS_SUCCESS,
    STATUS_ERROR,
    STATUS_CANCELLED,
];

/// Statuses an inbound update event may carry. An update can never
/// declare `pending` — pending only exists at creation time.
pub const UPDATE_STATUSES: &[&str] =
    &[STATUS_RUNNING, STATUS_SUCCESS, STATUS_ERROR, STATUS_CANCELLED];

/// Lifecycle status of one tracked execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    Pending,
    Running,
    Success,
    Error,
    Cancelled,
}

impl ExecutionStatus {
    /// Return the wire string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => STATUS_PENDING,
            Self::Running => STATUS_RUNNING,
            Self::Success => STATUS_SUCCESS,
            Self::Error => STATUS_ERROR,
            Self::Cancelled => STATUS_CANCELLED,
        }
    }

    /// Parse from a wire string, rejecting anything outside the closed set.
    pub fn parse(field: &'static str, s: &str) -> Result<Self, ValidationError> {
        match s {
            STATUS_PENDING => Ok(Self::Pending),
            STATUS_RUNNING => Ok(Self::Running),
            STATUS_SUCCESS => Ok(Self::Success),
            STATUS_ERROR => Ok(Self::Error),
            STATUS_CANCELLED => Ok(Self::Cancelled),
            other => Err(ValidationError::InvalidEnumValue {
                field,
                value: other.to_string(),
            }),
        }
    }

    /// `true` for the absorbing statuses.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Error | Self::Cancelled)
    }
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
