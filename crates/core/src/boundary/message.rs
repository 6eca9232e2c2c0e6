//! Generic inter-process message envelope.
//!
//! Every IPC payload travels inside an [`IpcMessage`]. The channel name
//! is gated against the `namespace:action` pattern before any dispatch
//! happens; the `data` member is opaque here and validated by the
//! payload-class module the channel routes to.

use serde::{Deserialize, Serialize};

use crate::boundary::fields::{as_object, check_channel_name, optional_i64, require_str};
use crate::error::ValidationError;

/// A validated IPC envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpcMessage {
    pub channel: String,
    pub data: serde_json::Value,
    pub timestamp: Option<i64>,
}

impl IpcMessage {
    /// Build an envelope for a known channel constant.
    ///
    /// Panics in debug builds if the channel does not match the pattern;
    /// only the constants in [`crate::channels`] should be used here.
    pub fn new(channel: &str, data: serde_json::Value) -> Self {
        debug_assert!(check_channel_name("channel", channel).is_ok());
        Self {
            channel: channel.to_string(),
            data,
            timestamp: None,
        }
    }
}

/// Strict form: deserialize and validate an IPC envelope.
///
/// Wire shape: `{ channel, data, timestamp? }`.
pub fn parse_ipc_message(value: &serde_json::Value) -> Result<IpcMessage, ValidationError> {
    let obj = as_object(value)?;

    let channel = require_str(obj, "channel")?;
    check_channel_name("channel", channel)?;

    let data = obj.get("data").cloned().ok_or_else(|| ValidationError::Malformed {
        reason: "missing member 'data'".to_string(),
    })?;

    let timestamp = match optional_i64(obj, "timestamp")? {
        Some(ts) if ts < 0 => {
            return Err(ValidationError::OutOfRange {
                field: "timestamp",
                value: ts,
                min: 0,
                max: i64::MAX,
            })
        }
        other => other,
    };

    Ok(IpcMessage {
        channel: channel.to_string(),
        data,
        timestamp,
    })
}

/// Recoverable form: re-check a typed envelope before dispatch.
pub fn validate_ipc_message(message: &IpcMessage) -> Result<(), ValidationError> {
    check_channel_name("channel", &message.channel)?;
    if let Some(ts) = message.timestamp {
        if ts < 0 {
            return Err(ValidationError::OutOfRange {
                field: "timestamp",
                value: ts,
                min: 0,
                max: i64::MAX,
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
