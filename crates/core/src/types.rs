/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Executions are identified by an opaque UUID, minted by whichever path
/// first observes the execution.
pub type ExecutionId = uuid::Uuid;
