//! Primitive per-field validators shared by every payload class.

use std::sync::OnceLock;

use regex::Regex;
use uuid::Uuid;

use crate::error::ValidationError;

// ---------------------------------------------------------------------------
// Field length limits
// ---------------------------------------------------------------------------

/// Maximum length of a script display name.
pub const MAX_SCRIPT_NAME_LEN: usize = 200;

/// Maximum length of a human-readable message or parameter value.
pub const MAX_MESSAGE_LEN: usize = 500;

/// Maximum length of a filesystem path crossing the boundary.
pub const MAX_PATH_LEN: usize = 500;

/// Maximum length of an error text blob.
pub const MAX_ERROR_LEN: usize = 10_000;

/// Maximum length of a captured output blob.
pub const MAX_OUTPUT_LEN: usize = 100_000;

// ---------------------------------------------------------------------------
// Numeric bounds (inclusive)
// ---------------------------------------------------------------------------

/// Progress percentage bounds.
pub const PROGRESS_RANGE: (i64, i64) = (0, 100);

/// Script timeout bounds in seconds.
pub const TIMEOUT_SECS_RANGE: (i64, i64) = (1, 3600);

/// Window origin coordinate bounds (multi-monitor layouts go negative).
pub const WINDOW_POS_RANGE: (i64, i64) = (-10_000, 10_000);

/// Window width bounds.
pub const WINDOW_WIDTH_RANGE: (i64, i64) = (400, 10_000);

/// Window height bounds.
pub const WINDOW_HEIGHT_RANGE: (i64, i64) = (300, 10_000);

/// Sidebar width bounds.
pub const SIDEBAR_WIDTH_RANGE: (i64, i64) = (100, 2_000);

// ---------------------------------------------------------------------------
// Identifier format
// ---------------------------------------------------------------------------

/// Parse an execution identifier: must be canonical UUID form.
pub fn parse_execution_id(field: &'static str, s: &str) -> Result<Uuid, ValidationError> {
    Uuid::try_parse(s).map_err(|_| ValidationError::InvalidFormat { field })
}

// ---------------------------------------------------------------------------
// Free text
// ---------------------------------------------------------------------------

/// Check a free-text field against the character allow-list and a
/// per-field maximum length.
///
/// The allow-list admits all printable characters plus tab and newline;
/// other control characters are rejected. Length is counted in `char`s.
pub fn check_text(field: &'static str, value: &str, max_len: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max_len {
        return Err(ValidationError::TooLong {
            field,
            max: max_len,
        });
    }
    let disallowed = |c: char| c.is_control() && c != '\t' && c != '\n' && c != '\r';
    if value.chars().any(disallowed) {
        return Err(ValidationError::InvalidCharacters { field });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Numerics
// ---------------------------------------------------------------------------

/// Check an integer field against inclusive bounds.
pub fn check_range(
    field: &'static str,
    value: i64,
    (min, max): (i64, i64),
) -> Result<(), ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Patterns
// ---------------------------------------------------------------------------

fn param_key_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,63}$").unwrap())
}

fn channel_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-z0-9-]+:[a-z0-9-]+$").unwrap())
}

/// Check a parameter-map key or script identifier against the restricted
/// identifier pattern.
pub fn check_param_key(field: &'static str, key: &str) -> Result<(), ValidationError> {
    if param_key_pattern().is_match(key) {
        Ok(())
    } else {
        Err(ValidationError::Constraint {
            field,
            reason: format!("'{key}' does not match the identifier pattern"),
        })
    }
}

/// Check an IPC channel name against the `namespace:action` pattern.
pub fn check_channel_name(field: &'static str, channel: &str) -> Result<(), ValidationError> {
    if channel_pattern().is_match(channel) {
        Ok(())
    } else {
        Err(ValidationError::Constraint {
            field,
            reason: format!("'{channel}' does not match namespace:action"),
        })
    }
}

// ---------------------------------------------------------------------------
// JSON member helpers
// ---------------------------------------------------------------------------

/// Read a required string member from a JSON object.
pub fn require_str<'a>(
    obj: &'a serde_json::Map<String, serde_json::Value>,
    member: &'static str,
) -> Result<&'a str, ValidationError> {
    obj.get(member)
        .and_then(|v| v.as_str())
        .ok_or_else(|| ValidationError::Malformed {
            reason: format!("missing or non-string member '{member}'"),
        })
}

/// Read an optional string member; present-but-non-string is malformed.
pub fn optional_str<'a>(
    obj: &'a serde_json::Map<String, serde_json::Value>,
    member: &'static str,
) -> Result<Option<&'a str>, ValidationError> {
    match obj.get(member) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(_) => Err(ValidationError::Malformed {
            reason: format!("member '{member}' must be a string"),
        }),
    }
}

/// Read an optional integer member; present-but-non-integer is malformed.
pub fn optional_i64(
    obj: &serde_json::Map<String, serde_json::Value>,
    member: &'static str,
) -> Result<Option<i64>, ValidationError> {
    match obj.get(member) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(v) => v
            .as_i64()
            .map(Some)
            .ok_or_else(|| ValidationError::Malformed {
                reason: format!("member '{member}' must be an integer"),
            }),
    }
}

/// View a JSON value as an object, or reject the payload as malformed.
pub fn as_object(
    value: &serde_json::Value,
) -> Result<&serde_json::Map<String, serde_json::Value>, ValidationError> {
    value.as_object().ok_or_else(|| ValidationError::Malformed {
        reason: "expected a JSON object".to_string(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
