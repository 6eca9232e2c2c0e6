//! Protocol-trigger URL validation.
//!
//! The operating system hands the shell a raw URL whenever a
//! `opsdeck://` link is opened. That string is attacker-craftable, so it
//! is the single most hostile input in the system: length-capped,
//! scheme-allow-listed, and shape-checked before anything acts on it.

use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::boundary::event::ExecutionUpdate;
use crate::boundary::fields::{check_param_key, check_text, MAX_SCRIPT_NAME_LEN};
use crate::error::ValidationError;
use crate::status::ExecutionStatus;

/// Primary custom scheme registered by the installed application.
pub const SCHEME_MAIN: &str = "opsdeck";

/// Secondary scheme registered by development builds.
pub const SCHEME_DEV: &str = "opsdeck-dev";

/// The only schemes a protocol trigger may use.
pub const ALLOWED_SCHEMES: &[&str] = &[SCHEME_MAIN, SCHEME_DEV];

/// Maximum total URL length.
pub const MAX_PROTOCOL_URL_LEN: usize = 2048;

/// A validated protocol trigger: "run this script".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolTrigger {
    pub script_id: String,
    pub script_name: Option<String>,
}

impl ProtocolTrigger {
    /// Convert the trigger into the synthetic `running` event the
    /// registry ingests, under a freshly minted execution id.
    ///
    /// Synthesizing a record requires a display name, so a trigger
    /// without a `name` query falls back to the script id.
    pub fn into_update(self, execution_id: Uuid) -> ExecutionUpdate {
        let mut update = ExecutionUpdate::new(execution_id, ExecutionStatus::Running);
        update.script_name = Some(self.script_name.unwrap_or_else(|| self.script_id.clone()));
        update.script_id = Some(self.script_id);
        update
    }
}

/// Strict form: parse and validate a protocol URL handed over by the OS.
///
/// Accepted shape: `scheme://run/<script_id>?name=<script_name>` where
/// `scheme` is one of [`ALLOWED_SCHEMES`], `<script_id>` matches the
/// restricted identifier pattern, and `name` is optional bounded text.
pub fn parse_protocol_url(raw: &str) -> Result<ProtocolTrigger, ValidationError> {
    if raw.chars().count() > MAX_PROTOCOL_URL_LEN {
        return Err(ValidationError::TooLong {
            field: "url",
            max: MAX_PROTOCOL_URL_LEN,
        });
    }

    let url = Url::parse(raw).map_err(|_| ValidationError::InvalidFormat { field: "url" })?;

    if !ALLOWED_SCHEMES
        .iter()
        .any(|s| s.eq_ignore_ascii_case(url.scheme()))
    {
        return Err(ValidationError::InvalidEnumValue {
            field: "scheme",
            value: url.scheme().to_string(),
        });
    }

    // Custom-scheme URLs parse with the action as host: opsdeck://run/<id>.
    if url.host_str() != Some("run") {
        return Err(ValidationError::Constraint {
            field: "url",
            reason: "expected action 'run'".to_string(),
        });
    }

    let script_id = url
        .path()
        .strip_prefix('/')
        .filter(|s| !s.is_empty() && !s.contains('/'))
        .ok_or_else(|| ValidationError::Constraint {
            field: "url",
            reason: "expected a single script id path segment".to_string(),
        })?;
    check_param_key("scriptId", script_id)?;

    let mut script_name = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "name" => {
                check_text("name", &value, MAX_SCRIPT_NAME_LEN)?;
                script_name = Some(value.into_owned());
            }
            other => {
                return Err(ValidationError::Constraint {
                    field: "url",
                    reason: format!("unexpected query parameter '{other}'"),
                })
            }
        }
    }

    Ok(ProtocolTrigger {
        script_id: script_id.to_string(),
        script_name,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
