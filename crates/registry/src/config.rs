//! Registry configuration loaded from environment variables.

use crate::registry::DEFAULT_RECENT_LIMIT;

/// Runtime configuration for the registry service.
///
/// All fields have sensible defaults; override via environment variables.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Cap on the `recent` projection (default: `10`, valid 1–100).
    pub recent_limit: usize,
    /// Event bus buffer capacity (default: `1024`).
    pub bus_capacity: usize,
}

impl RegistryConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default |
    /// |------------------------|---------|
    /// | `OPSDECK_RECENT_LIMIT` | `10`    |
    /// | `OPSDECK_BUS_CAPACITY` | `1024`  |
    ///
    /// Unparseable or out-of-range values fall back to the default with
    /// a warning rather than failing startup.
    pub fn from_env() -> Self {
        let recent_limit = read_env("OPSDECK_RECENT_LIMIT", DEFAULT_RECENT_LIMIT, 1, 100);
        let bus_capacity = read_env("OPSDECK_BUS_CAPACITY", 1024, 16, 65_536);
        Self {
            recent_limit,
            bus_capacity,
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            recent_limit: DEFAULT_RECENT_LIMIT,
            bus_capacity: 1024,
        }
    }
}

fn read_env(var: &str, default: usize, min: usize, max: usize) -> usize {
    match std::env::var(var) {
        Err(_) => default,
        Ok(raw) => match raw.parse::<usize>() {
            Ok(value) if (min..=max).contains(&value) => value,
            _ => {
                tracing::warn!(var, raw, default, "ignoring invalid value");
                default
            }
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
