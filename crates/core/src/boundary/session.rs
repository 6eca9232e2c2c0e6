//! Persisted session-state validation.
//!
//! Session state is written to disk by the shell between runs and read
//! back at startup. The file lives in a user-writable location, so it is
//! re-validated in full on every load.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::boundary::fields::{as_object, check_range, optional_i64, SIDEBAR_WIDTH_RANGE};
use crate::boundary::settings::{parse_window_bounds, WindowBounds};
use crate::error::ValidationError;

/// A half-open filter over execution history, `start ≤ end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRangeFilter {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Validated UI session state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SessionState {
    pub window: Option<WindowBounds>,
    pub sidebar_width: Option<u32>,
    pub last_filter: Option<DateRangeFilter>,
}

/// Cross-field refinement: a date range must not be inverted.
pub fn validate_date_range(filter: &DateRangeFilter) -> Result<(), ValidationError> {
    if filter.start > filter.end {
        return Err(ValidationError::Constraint {
            field: "lastFilter",
            reason: "start must not be after end".to_string(),
        });
    }
    Ok(())
}

fn parse_timestamp(
    obj: &serde_json::Map<String, serde_json::Value>,
    member: &'static str,
    field: &'static str,
) -> Result<DateTime<Utc>, ValidationError> {
    let raw = obj
        .get(member)
        .and_then(|v| v.as_str())
        .ok_or_else(|| ValidationError::Malformed {
            reason: format!("missing or non-string member '{member}'"),
        })?;
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ValidationError::InvalidFormat { field })
}

/// Strict form: deserialize and validate a persisted session-state file.
///
/// Wire shape: `{ window?, sidebarWidth?, lastFilter?: { start, end } }`
/// with RFC 3339 timestamps.
pub fn parse_session_state(value: &serde_json::Value) -> Result<SessionState, ValidationError> {
    let obj = as_object(value)?;

    let window = match obj.get("window") {
        None | Some(serde_json::Value::Null) => None,
        Some(v) => Some(parse_window_bounds(v)?),
    };

    let sidebar_width = match optional_i64(obj, "sidebarWidth")? {
        Some(w) => {
            check_range("sidebarWidth", w, SIDEBAR_WIDTH_RANGE)?;
            Some(w as u32)
        }
        None => None,
    };

    let last_filter = match obj.get("lastFilter") {
        None | Some(serde_json::Value::Null) => None,
        Some(v) => {
            let filter_obj = as_object(v)?;
            let filter = DateRangeFilter {
                start: parse_timestamp(filter_obj, "start", "lastFilter.start")?,
                end: parse_timestamp(filter_obj, "end", "lastFilter.end")?,
            };
            validate_date_range(&filter)?;
            Some(filter)
        }
    };

    Ok(SessionState {
        window,
        sidebar_width,
        last_filter,
    })
}

/// Recoverable form: re-check a typed session state.
pub fn validate_session_state(state: &SessionState) -> Result<(), ValidationError> {
    if let Some(window) = &state.window {
        crate::boundary::settings::validate_window_bounds(window)?;
    }
    if let Some(width) = state.sidebar_width {
        check_range("sidebarWidth", width as i64, SIDEBAR_WIDTH_RANGE)?;
    }
    if let Some(filter) = &state.last_filter {
        validate_date_range(filter)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
