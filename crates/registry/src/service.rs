//! Registry service: ties the registry to the event bus and the host.
//!
//! [`ExecutionService`] is the explicitly constructed instance the shell
//! holds (as `Arc<ExecutionService>`) for the lifetime of the window. It
//! owns the registry behind a mutex, consumes execution-update traffic
//! from the bus while activated, and forwards cancellation requests to
//! the execution host.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::task::JoinHandle;
use uuid::Uuid;

use opsdeck_core::boundary::event::{parse_execution_update, ExecutionUpdate};
use opsdeck_core::boundary::protocol::parse_protocol_url;
use opsdeck_core::channels::CHANNEL_EXECUTION_UPDATE;
use opsdeck_core::error::ValidationError;

use crate::bus::EventBus;
use crate::config::RegistryConfig;
use crate::execution::Execution;
use crate::host::ExecutionHost;
use crate::registry::{ApplyOutcome, ExecutionRegistry};

/// The public operation surface the UI consumes.
pub struct ExecutionService {
    registry: Mutex<ExecutionRegistry>,
    host: Arc<dyn ExecutionHost>,
    subscription: Mutex<Option<JoinHandle<()>>>,
    updates_applied: AtomicU64,
}

impl ExecutionService {
    pub fn new(config: &RegistryConfig, host: Arc<dyn ExecutionHost>) -> Self {
        Self {
            registry: Mutex::new(ExecutionRegistry::new(config.recent_limit)),
            host,
            subscription: Mutex::new(None),
            updates_applied: AtomicU64::new(0),
        }
    }

    // The lock is only ever held for synchronous in-memory work, never
    // across an await.
    fn registry(&self) -> MutexGuard<'_, ExecutionRegistry> {
        self.registry.lock().expect("registry mutex poisoned")
    }

    // -----------------------------------------------------------------------
    // Subscription lifecycle
    // -----------------------------------------------------------------------

    /// Start consuming execution-update traffic from the bus.
    ///
    /// At most one subscription is active per service instance: a second
    /// activation first tears down the prior one, so re-activating never
    /// causes duplicate delivery.
    pub fn activate(self: Arc<Self>, bus: &EventBus) {
        let mut slot = self.subscription.lock().expect("subscription mutex poisoned");
        if let Some(previous) = slot.take() {
            previous.abort();
        }

        let mut rx = bus.subscribe();
        // The task holds only a weak handle so an abandoned service can
        // still drop while its subscription is parked on the bus.
        let service = Arc::downgrade(&self);
        *slot = Some(tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(message) => {
                        if message.channel != CHANNEL_EXECUTION_UPDATE {
                            continue;
                        }
                        let Some(service) = service.upgrade() else { break };
                        match parse_execution_update(&message.data) {
                            Ok(update) => {
                                service.update_execution(update);
                            }
                            Err(err) => {
                                tracing::warn!(error = %err, "rejected execution update");
                            }
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(missed)) => {
                        tracing::warn!(missed, "execution update subscription lagged");
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
            }
        }));
    }

    /// Tear down the subscription. Safe to call when not activated.
    pub fn deactivate(&self) {
        let mut slot = self.subscription.lock().expect("subscription mutex poisoned");
        if let Some(handle) = slot.take() {
            handle.abort();
        }
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Start a user-initiated execution; returns the tracked id.
    pub fn start_execution(&self, script_id: &str, script_name: &str) -> Uuid {
        self.registry().start_execution(script_id, script_name)
    }

    /// Apply a validated update to the collection.
    pub fn update_execution(&self, update: ExecutionUpdate) -> ApplyOutcome {
        let outcome = self.registry().apply_update(update);
        if !matches!(outcome, ApplyOutcome::Dropped) {
            self.updates_applied.fetch_add(1, Ordering::Relaxed);
        }
        outcome
    }

    /// Ingest a protocol-trigger URL as a synthetic running execution.
    ///
    /// Returns the id of the record now tracking the trigger: an
    /// existing in-flight record for the same script when the update
    /// merged into one, otherwise a freshly created record. Validation
    /// failures surface to the caller; the OS-facing handler decides
    /// how loudly to report.
    pub fn trigger_from_protocol(&self, raw_url: &str) -> Result<Uuid, ValidationError> {
        let trigger = parse_protocol_url(raw_url)?;
        let minted = Uuid::now_v7();
        let id = match self.update_execution(trigger.into_update(minted)) {
            ApplyOutcome::Updated(id) | ApplyOutcome::Created(id) => id,
            // A running update always carries a script name, so the
            // registry either merges it or synthesizes a record.
            ApplyOutcome::Dropped => minted,
        };
        Ok(id)
    }

    /// Cancel a tracked execution.
    ///
    /// The record is marked cancelled immediately (optimistically);
    /// delivery to the host is best-effort and fire-and-forget, with
    /// failures logged rather than propagated.
    pub fn cancel_execution(&self, execution_id: Uuid) -> bool {
        let cancelled = self.registry().cancel(execution_id);
        if cancelled {
            let host = Arc::clone(&self.host);
            tokio::spawn(async move {
                if let Err(err) = host.cancel(execution_id).await {
                    tracing::warn!(
                        execution_id = %execution_id,
                        error = %err,
                        "cancel delivery to execution host failed"
                    );
                }
            });
        }
        cancelled
    }

    /// Remove a single record regardless of status.
    pub fn clear_execution(&self, execution_id: Uuid) -> bool {
        self.registry().clear(execution_id)
    }

    /// Remove every terminal record.
    pub fn clear_all_completed(&self) {
        self.registry().clear_completed();
    }

    // -----------------------------------------------------------------------
    // Read-only views
    // -----------------------------------------------------------------------

    /// Snapshot of all records, newest first.
    pub fn executions(&self) -> Vec<Execution> {
        self.registry().executions().to_vec()
    }

    /// Snapshot of the in-flight records.
    pub fn active_executions(&self) -> Vec<Execution> {
        self.registry().active()
    }

    /// Snapshot of the terminal records, capped at the recent limit.
    pub fn recent_executions(&self) -> Vec<Execution> {
        self.registry().recent()
    }

    /// Total updates that changed the collection since construction
    /// (direct and bus-driven); dropped updates do not count.
    pub fn updates_applied(&self) -> u64 {
        self.updates_applied.load(Ordering::Relaxed)
    }
}

impl Drop for ExecutionService {
    fn drop(&mut self) {
        self.deactivate();
    }
}
