//! Boundary rejection taxonomy.
//!
//! Every validator in [`crate::boundary`] returns a [`ValidationError`]
//! naming the offending field and the precise rule that failed. A payload
//! is either accepted whole or rejected whole; there is no partial
//! acceptance and no best-effort coercion.

/// A structured rejection produced at the process boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The field does not match its required canonical format
    /// (e.g. an execution id that is not a UUID).
    #[error("{field}: invalid format")]
    InvalidFormat { field: &'static str },

    /// A text or URL field exceeds its per-field maximum length.
    #[error("{field}: exceeds maximum length of {max}")]
    TooLong { field: &'static str, max: usize },

    /// A text field contains characters outside the allow-list.
    #[error("{field}: contains disallowed characters")]
    InvalidCharacters { field: &'static str },

    /// An enumerated field carries a value outside its closed set.
    #[error("{field}: '{value}' is not a valid value")]
    InvalidEnumValue { field: &'static str, value: String },

    /// An integer field falls outside its inclusive bounds.
    #[error("{field}: {value} is outside {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// A named cross-field refinement failed (e.g. date range start after
    /// end, channel name not matching `namespace:action`).
    #[error("{field}: {reason}")]
    Constraint { field: &'static str, reason: String },

    /// The payload is not the expected JSON shape at all (wrong type,
    /// missing required member).
    #[error("malformed payload: {reason}")]
    Malformed { reason: String },
}

impl ValidationError {
    /// Name the field this rejection concerns, where one exists.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::InvalidFormat { field }
            | Self::TooLong { field, .. }
            | Self::InvalidCharacters { field }
            | Self::InvalidEnumValue { field, .. }
            | Self::OutOfRange { field, .. }
            | Self::Constraint { field, .. } => Some(field),
            Self::Malformed { .. } => None,
        }
    }
}
