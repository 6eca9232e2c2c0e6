//! Boundary validation layer.
//!
//! Every payload crossing the process boundary passes through exactly one
//! of these modules before it is trusted. Each payload class exposes two
//! entry points:
//!
//! - `parse_*(&serde_json::Value)` — the strict outer-boundary form:
//!   deserialize and validate in one all-or-nothing step.
//! - `validate_*(&T)` — the recoverable form over an already-typed value,
//!   for callers that want to re-check and report (e.g. form input).
//!
//! Validation is total and synchronous. A payload either comes back as a
//! fully typed value or as a [`ValidationError`](crate::error::ValidationError)
//! naming the offending field; nothing is ever partially accepted.

pub mod event;
pub mod fields;
pub mod message;
pub mod protocol;
pub mod request;
pub mod session;
pub mod settings;
