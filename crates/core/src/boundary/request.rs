//! Execution request validation.
//!
//! An execution request is the UI (or protocol handler) asking for a
//! named script to run. The registry consumes only the script id and
//! name; the parameter map and timeout are forwarded to the execution
//! host untouched, which is exactly why they must be validated here.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::boundary::fields::{
    as_object, check_param_key, check_range, check_text, optional_i64, optional_str, require_str,
    MAX_MESSAGE_LEN, MAX_SCRIPT_NAME_LEN, TIMEOUT_SECS_RANGE,
};
use crate::error::ValidationError;

/// Advisory risk level attached to a script definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    pub fn parse(field: &'static str, s: &str) -> Result<Self, ValidationError> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            other => Err(ValidationError::InvalidEnumValue {
                field,
                value: other.to_string(),
            }),
        }
    }
}

/// A validated request to run a script.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionRequest {
    pub script_id: String,
    pub script_name: String,
    pub params: BTreeMap<String, String>,
    pub timeout_secs: Option<u32>,
    pub risk: RiskLevel,
}

/// Strict form: deserialize and validate a request payload.
///
/// Wire shape:
/// `{ scriptId, scriptName, params?, timeoutSecs?, risk? }`
/// (`risk` defaults to `low` when omitted).
pub fn parse_execution_request(
    value: &serde_json::Value,
) -> Result<ExecutionRequest, ValidationError> {
    let obj = as_object(value)?;

    let script_id = require_str(obj, "scriptId")?;
    check_param_key("scriptId", script_id)?;

    let script_name = require_str(obj, "scriptName")?;
    check_text("scriptName", script_name, MAX_SCRIPT_NAME_LEN)?;

    let mut params = BTreeMap::new();
    match obj.get("params") {
        None | Some(serde_json::Value::Null) => {}
        Some(serde_json::Value::Object(map)) => {
            for (key, value) in map {
                check_param_key("params", key)?;
                let value = value.as_str().ok_or_else(|| ValidationError::Malformed {
                    reason: format!("parameter '{key}' must be a string"),
                })?;
                check_text("params", value, MAX_MESSAGE_LEN)?;
                params.insert(key.clone(), value.to_string());
            }
        }
        Some(_) => {
            return Err(ValidationError::Malformed {
                reason: "member 'params' must be an object".to_string(),
            })
        }
    }

    let timeout_secs = match optional_i64(obj, "timeoutSecs")? {
        Some(t) => {
            check_range("timeoutSecs", t, TIMEOUT_SECS_RANGE)?;
            Some(t as u32)
        }
        None => None,
    };

    let risk = match optional_str(obj, "risk")? {
        Some(s) => RiskLevel::parse("risk", s)?,
        None => RiskLevel::Low,
    };

    Ok(ExecutionRequest {
        script_id: script_id.to_string(),
        script_name: script_name.to_string(),
        params,
        timeout_secs,
        risk,
    })
}

/// Recoverable form: re-check an already-typed request.
pub fn validate_execution_request(request: &ExecutionRequest) -> Result<(), ValidationError> {
    check_param_key("scriptId", &request.script_id)?;
    check_text("scriptName", &request.script_name, MAX_SCRIPT_NAME_LEN)?;
    for (key, value) in &request.params {
        check_param_key("params", key)?;
        check_text("params", value, MAX_MESSAGE_LEN)?;
    }
    if let Some(timeout) = request.timeout_secs {
        check_range("timeoutSecs", timeout as i64, TIMEOUT_SECS_RANGE)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn minimal_request_accepted_with_defaults() {
        let request = parse_execution_request(&json!({
            "scriptId": "vacuum_db",
            "scriptName": "Vacuum database",
        }))
        .unwrap();
        assert_eq!(request.script_id, "vacuum_db");
        assert!(request.params.is_empty());
        assert!(request.timeout_secs.is_none());
        assert_eq!(request.risk, RiskLevel::Low);
    }

    #[test]
    fn full_request_accepted() {
        let request = parse_execution_request(&json!({
            "scriptId": "purge_cache",
            "scriptName": "Purge cache",
            "params": { "target": "thumbnails", "dry_run": "true" },
            "timeoutSecs": 120,
            "risk": "high",
        }))
        .unwrap();
        assert_eq!(request.params.len(), 2);
        assert_eq!(request.params["target"], "thumbnails");
        assert_eq!(request.timeout_secs, Some(120));
        assert_eq!(request.risk, RiskLevel::High);
    }

    #[test]
    fn param_key_with_space_rejected() {
        let err = parse_execution_request(&json!({
            "scriptId": "purge_cache",
            "scriptName": "Purge cache",
            "params": { "dry run": "true" },
        }))
        .unwrap_err();
        assert_matches!(err, ValidationError::Constraint { field: "params", .. });
    }

    #[test]
    fn non_string_param_value_rejected() {
        let err = parse_execution_request(&json!({
            "scriptId": "purge_cache",
            "scriptName": "Purge cache",
            "params": { "level": 3 },
        }))
        .unwrap_err();
        assert_matches!(err, ValidationError::Malformed { .. });
    }

    #[test]
    fn timeout_out_of_range_rejected() {
        let err = parse_execution_request(&json!({
            "scriptId": "purge_cache",
            "scriptName": "Purge cache",
            "timeoutSecs": 0,
        }))
        .unwrap_err();
        assert_matches!(err, ValidationError::OutOfRange { field: "timeoutSecs", .. });
    }

    #[test]
    fn unknown_risk_rejected() {
        let err = parse_execution_request(&json!({
            "scriptId": "purge_cache",
            "scriptName": "Purge cache",
            "risk": "extreme",
        }))
        .unwrap_err();
        assert_matches!(err, ValidationError::InvalidEnumValue { field: "risk", .. });
    }

    #[test]
    fn risk_levels_round_trip() {
        for level in [
            RiskLevel::Low,
            RiskLevel::Medium,
            RiskLevel::High,
            RiskLevel::Critical,
        ] {
            assert_eq!(RiskLevel::parse("risk", level.as_str()).unwrap(), level);
        }
    }

    #[test]
    fn validate_rejects_tampered_script_id() {
        let mut request = parse_execution_request(&json!({
            "scriptId": "vacuum_db",
            "scriptName": "Vacuum database",
        }))
        .unwrap();
        request.script_id = "vacuum db".to_string();
        assert!(validate_execution_request(&request).is_err());
    }
}
