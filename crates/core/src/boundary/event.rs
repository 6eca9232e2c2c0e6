//! Execution-update event validation.
//!
//! The execution host reports status over IPC as loose JSON. This module
//! turns that into a typed [`ExecutionUpdate`] or rejects it outright.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::boundary::fields::{
    as_object, check_param_key, check_range, check_text, optional_i64, optional_str,
    parse_execution_id, require_str, MAX_ERROR_LEN, MAX_OUTPUT_LEN, MAX_SCRIPT_NAME_LEN,
    PROGRESS_RANGE,
};
use crate::error::ValidationError;
use crate::status::ExecutionStatus;

/// A validated status update for one execution.
///
/// Optional fields use last-known-value semantics downstream: `None`
/// means "the event did not say", never "clear the field".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionUpdate {
    pub execution_id: Uuid,
    pub script_id: Option<String>,
    pub script_name: Option<String>,
    pub status: ExecutionStatus,
    pub progress: Option<u8>,
    pub output: Option<String>,
    pub error: Option<String>,
    pub duration_ms: Option<u64>,
    pub exit_code: Option<i32>,
}

impl ExecutionUpdate {
    /// A minimal update carrying only the required members.
    pub fn new(execution_id: Uuid, status: ExecutionStatus) -> Self {
        Self {
            execution_id,
            script_id: None,
            script_name: None,
            status,
            progress: None,
            output: None,
            error: None,
            duration_ms: None,
            exit_code: None,
        }
    }
}

/// Strict outer-boundary form: deserialize and validate an inbound event
/// in one all-or-nothing step.
///
/// Wire shape:
/// `{ executionId, scriptId?, scriptName?, status, progress?, output?,
/// error?, duration?, exitCode? }`
pub fn parse_execution_update(value: &serde_json::Value) -> Result<ExecutionUpdate, ValidationError> {
    let obj = as_object(value)?;

    let execution_id = parse_execution_id("executionId", require_str(obj, "executionId")?)?;

    let status = ExecutionStatus::parse("status", require_str(obj, "status")?)?;
    // An update can never declare `pending`.
    if status == ExecutionStatus::Pending {
        return Err(ValidationError::InvalidEnumValue {
            field: "status",
            value: status.as_str().to_string(),
        });
    }

    let script_id = match optional_str(obj, "scriptId")? {
        Some(s) => {
            check_param_key("scriptId", s)?;
            Some(s.to_string())
        }
        None => None,
    };

    let script_name = match optional_str(obj, "scriptName")? {
        Some(s) => {
            check_text("scriptName", s, MAX_SCRIPT_NAME_LEN)?;
            Some(s.to_string())
        }
        None => None,
    };

    let progress = match optional_i64(obj, "progress")? {
        Some(p) => {
            check_range("progress", p, PROGRESS_RANGE)?;
            Some(p as u8)
        }
        None => None,
    };

    let output = match optional_str(obj, "output")? {
        Some(s) => {
            check_text("output", s, MAX_OUTPUT_LEN)?;
            Some(s.to_string())
        }
        None => None,
    };

    let error = match optional_str(obj, "error")? {
        Some(s) => {
            check_text("error", s, MAX_ERROR_LEN)?;
            Some(s.to_string())
        }
        None => None,
    };

    let duration_ms = match optional_i64(obj, "duration")? {
        Some(d) => {
            check_range("duration", d, (0, i64::MAX))?;
            Some(d as u64)
        }
        None => None,
    };

    let exit_code = match optional_i64(obj, "exitCode")? {
        Some(c) => {
            check_range("exitCode", c, (i32::MIN as i64, i32::MAX as i64))?;
            Some(c as i32)
        }
        None => None,
    };

    Ok(ExecutionUpdate {
        execution_id,
        script_id,
        script_name,
        status,
        progress,
        output,
        error,
        duration_ms,
        exit_code,
    })
}

/// Recoverable form: re-check an already-typed update.
pub fn validate_execution_update(update: &ExecutionUpdate) -> Result<(), ValidationError> {
    if update.status == ExecutionStatus::Pending {
        return Err(ValidationError::InvalidEnumValue {
            field: "status",
            value: update.status.as_str().to_string(),
        });
    }
    if let Some(script_id) = &update.script_id {
        check_param_key("scriptId", script_id)?;
    }
    if let Some(name) = &update.script_name {
        check_text("scriptName", name, MAX_SCRIPT_NAME_LEN)?;
    }
    if let Some(progress) = update.progress {
        check_range("progress", progress as i64, PROGRESS_RANGE)?;
    }
    if let Some(output) = &update.output {
        check_text("output", output, MAX_OUTPUT_LEN)?;
    }
    if let Some(error) = &update.error {
        check_text("error", error, MAX_ERROR_LEN)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
