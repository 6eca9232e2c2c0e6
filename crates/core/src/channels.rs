//! Well-known IPC channel name constants.
//!
//! Every channel follows the `namespace:action` pattern enforced by
//! [`crate::boundary::message`]. These must match the channel names the
//! desktop shell and the execution host publish on.

/// Status update for a tracked execution, published by the execution host.
pub const CHANNEL_EXECUTION_UPDATE: &str = "execution:update";

/// Request to start a named script, sent by the UI.
pub const CHANNEL_EXECUTION_REQUEST: &str = "execution:request";

/// Best-effort cancellation request forwarded to the execution host.
pub const CHANNEL_EXECUTION_CANCEL: &str = "execution:cancel";

/// Settings write from the preferences surface.
pub const CHANNEL_SETTINGS_WRITE: &str = "settings:write";

/// Persisted session state loaded at startup.
pub const CHANNEL_SESSION_LOAD: &str = "session:load";

/// Protocol URL handed over by the operating system.
pub const CHANNEL_PROTOCOL_OPEN: &str = "protocol:open";
