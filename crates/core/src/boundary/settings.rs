//! Settings payload validation.
//!
//! Settings writes arrive from the preferences surface over IPC and are
//! persisted by the shell; a tampered settings file comes back through
//! the same validators at load time.

use serde::{Deserialize, Serialize};

use crate::boundary::fields::{
    as_object, check_range, optional_i64, require_str, WINDOW_HEIGHT_RANGE, WINDOW_POS_RANGE,
    WINDOW_WIDTH_RANGE,
};
use crate::error::ValidationError;

// ---------------------------------------------------------------------------
// Closed sets
// ---------------------------------------------------------------------------

/// UI color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    System,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }

    pub fn parse(field: &'static str, s: &str) -> Result<Self, ValidationError> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "system" => Ok(Self::System),
            other => Err(ValidationError::InvalidEnumValue {
                field,
                value: other.to_string(),
            }),
        }
    }
}

/// Which execution outcomes raise a desktop notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationMode {
    All,
    Failures,
    None,
}

impl NotificationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Failures => "failures",
            Self::None => "none",
        }
    }

    pub fn parse(field: &'static str, s: &str) -> Result<Self, ValidationError> {
        match s {
            "all" => Ok(Self::All),
            "failures" => Ok(Self::Failures),
            "none" => Ok(Self::None),
            other => Err(ValidationError::InvalidEnumValue {
                field,
                value: other.to_string(),
            }),
        }
    }
}

/// Host platform as reported across the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Windows,
    Macos,
    Linux,
}

impl Platform {
    pub fn parse(field: &'static str, s: &str) -> Result<Self, ValidationError> {
        match s {
            "windows" => Ok(Self::Windows),
            "macos" => Ok(Self::Macos),
            "linux" => Ok(Self::Linux),
            other => Err(ValidationError::InvalidEnumValue {
                field,
                value: other.to_string(),
            }),
        }
    }
}

/// Host architecture as reported across the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    X64,
    Arm64,
}

impl Arch {
    pub fn parse(field: &'static str, s: &str) -> Result<Self, ValidationError> {
        match s {
            "x64" => Ok(Self::X64),
            "arm64" => Ok(Self::Arm64),
            other => Err(ValidationError::InvalidEnumValue {
                field,
                value: other.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Window bounds
// ---------------------------------------------------------------------------

/// Persisted window geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowBounds {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Strict form for a window-bounds object.
pub fn parse_window_bounds(value: &serde_json::Value) -> Result<WindowBounds, ValidationError> {
    let obj = as_object(value)?;

    let member = |name: &'static str| -> Result<i64, ValidationError> {
        optional_i64(obj, name)?.ok_or_else(|| ValidationError::Malformed {
            reason: format!("missing or non-integer member '{name}'"),
        })
    };

    let x = member("x")?;
    check_range("x", x, WINDOW_POS_RANGE)?;
    let y = member("y")?;
    check_range("y", y, WINDOW_POS_RANGE)?;
    let width = member("width")?;
    check_range("width", width, WINDOW_WIDTH_RANGE)?;
    let height = member("height")?;
    check_range("height", height, WINDOW_HEIGHT_RANGE)?;

    Ok(WindowBounds {
        x: x as i32,
        y: y as i32,
        width: width as u32,
        height: height as u32,
    })
}

/// Recoverable form for typed window bounds.
pub fn validate_window_bounds(bounds: &WindowBounds) -> Result<(), ValidationError> {
    check_range("x", bounds.x as i64, WINDOW_POS_RANGE)?;
    check_range("y", bounds.y as i64, WINDOW_POS_RANGE)?;
    check_range("width", bounds.width as i64, WINDOW_WIDTH_RANGE)?;
    check_range("height", bounds.height as i64, WINDOW_HEIGHT_RANGE)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Validated user settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub theme: Theme,
    pub notification_mode: NotificationMode,
    /// Require an explicit confirmation before running high/critical
    /// risk scripts.
    pub confirm_high_risk: bool,
    pub window: Option<WindowBounds>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::System,
            notification_mode: NotificationMode::Failures,
            confirm_high_risk: true,
            window: None,
        }
    }
}

/// Strict form: deserialize and validate a settings write.
///
/// Wire shape: `{ theme, notifications, confirmHighRisk?, window? }`
/// (`confirmHighRisk` defaults to `true` when omitted).
pub fn parse_settings(value: &serde_json::Value) -> Result<Settings, ValidationError> {
    let obj = as_object(value)?;

    let theme = Theme::parse("theme", require_str(obj, "theme")?)?;
    let notification_mode = NotificationMode::parse("notifications", require_str(obj, "notifications")?)?;

    let confirm_high_risk = match obj.get("confirmHighRisk") {
        None | Some(serde_json::Value::Null) => true,
        Some(serde_json::Value::Bool(b)) => *b,
        Some(_) => {
            return Err(ValidationError::Malformed {
                reason: "member 'confirmHighRisk' must be a boolean".to_string(),
            })
        }
    };

    let window = match obj.get("window") {
        None | Some(serde_json::Value::Null) => None,
        Some(v) => Some(parse_window_bounds(v)?),
    };

    Ok(Settings {
        theme,
        notification_mode,
        confirm_high_risk,
        window,
    })
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
    fn minimal_settings_accepted_with_defaults() {
        let settings = parse_settings(&json!({
            "theme": "dark",
            "notifications": "all",
        }))
        .unwrap();
        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(settings.notification_mode, NotificationMode::All);
        assert!(settings.confirm_high_risk);
        assert!(settings.window.is_none());
    }

    #[test]
    fn unknown_theme_rejected() {
        let err = parse_settings(&json!({
            "theme": "solarized",
            "notifications": "all",
        }))
        .unwrap_err();
        assert_matches!(err, ValidationError::InvalidEnumValue { field: "theme", .. });
    }

    #[test]
    fn unknown_notification_mode_rejected() {
        let err = parse_settings(&json!({
            "theme": "dark",
            "notifications": "loud",
        }))
        .unwrap_err();
        assert_matches!(
            err,
            ValidationError::InvalidEnumValue {
                field: "notifications",
                ..
            }
        );
    }

    #[test]
    fn window_bounds_validated_inside_settings() {
        let err = parse_settings(&json!({
            "theme": "dark",
            "notifications": "all",
            "window": { "x": 0, "y": 0, "width": 100, "height": 600 },
        }))
        .unwrap_err();
        assert_matches!(err, ValidationError::OutOfRange { field: "width", .. });
    }

    #[test]
    fn valid_window_bounds_accepted() {
        let bounds =
            parse_window_bounds(&json!({ "x": -100, "y": 50, "width": 1280, "height": 800 }))
                .unwrap();
        assert_eq!(bounds.width, 1280);
        assert!(validate_window_bounds(&bounds).is_ok());
    }

    #[test]
    fn window_width_of_100_is_below_minimum() {
        let err = parse_window_bounds(&json!({ "x": 0, "y": 0, "width": 100, "height": 600 }))
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::OutOfRange {
                field: "width",
                value: 100,
                min: 400,
                max: 10_000
            }
        );
    }

    #[test]
    fn missing_window_member_is_malformed() {
        let err = parse_window_bounds(&json!({ "x": 0, "y": 0, "width": 800 })).unwrap_err();
        assert_matches!(err, ValidationError::Malformed { .. });
    }

    #[test]
    fn platform_and_arch_closed_sets() {
        assert_eq!(Platform::parse("platform", "linux").unwrap(), Platform::Linux);
        assert!(Platform::parse("platform", "win32").is_err());
        assert_eq!(Arch::parse("arch", "arm64").unwrap(), Arch::Arm64);
        assert!(Arch::parse("arch", "ia32").is_err());
    }

    #[test]
    fn default_settings_are_safe() {
        let settings = Settings::default();
        assert_eq!(settings.theme, Theme::System);
        assert!(settings.confirm_high_risk);
    }
}
