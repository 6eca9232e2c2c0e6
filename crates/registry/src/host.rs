//! Seam to the privileged execution host.
//!
//! Script execution itself happens out-of-process; this crate only ever
//! talks back to the host to request cancellation. Delivery is
//! best-effort: the registry has already marked the record cancelled by
//! the time the request is sent.

use async_trait::async_trait;
use uuid::Uuid;

/// Errors the host can report for a cancellation request.
#[derive(Debug, Clone, thiserror::Error)]
pub enum HostError {
    /// The host process could not be reached.
    #[error("execution host unreachable: {0}")]
    Unreachable(String),

    /// The host was reached but refused the request.
    #[error("execution host rejected the request: {0}")]
    Rejected(String),
}

/// The out-of-process execution host, as seen from this core.
#[async_trait]
pub trait ExecutionHost: Send + Sync {
    /// Request cancellation of a running script. The caller treats any
    /// error as non-fatal.
    async fn cancel(&self, execution_id: Uuid) -> Result<(), HostError>;
}
