//! In-memory execution registry and reconciliation algorithm.
//!
//! The registry is the single owner of the execution collection. It is
//! pure synchronous computation over in-memory state; nothing here
//! blocks, suspends, or returns an error — every inbound case, including
//! the unresolvable one, is enumerated.

use chrono::Utc;
use uuid::Uuid;

use opsdeck_core::boundary::event::ExecutionUpdate;
use opsdeck_core::status::ExecutionStatus;

use crate::execution::{Execution, SCRIPT_ID_UNKNOWN};

/// Default cap on the `recent` projection.
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// How an ingested update was reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The update merged into an existing record.
    Updated(Uuid),
    /// The update synthesized a new, externally triggered record.
    Created(Uuid),
    /// The update matched no reconciliation rule and was dropped.
    Dropped,
}

/// Ordered collection of execution records, newest first.
#[derive(Debug)]
pub struct ExecutionRegistry {
    records: Vec<Execution>,
    recent_limit: usize,
}

impl ExecutionRegistry {
    pub fn new(recent_limit: usize) -> Self {
        Self {
            records: Vec::new(),
            recent_limit,
        }
    }

    // -----------------------------------------------------------------------
    // Create path (user-initiated)
    // -----------------------------------------------------------------------

    /// Start tracking a user-initiated execution.
    ///
    /// Mints a fresh id, inserts a `running` record at the head, and
    /// returns the id so the caller can correlate later cancellation.
    ///
    /// If a non-terminal record for the same `script_id` already exists,
    /// its id is returned instead and nothing is inserted: at most one
    /// non-terminal record may exist per script.
    pub fn start_execution(&mut self, script_id: &str, script_name: &str) -> Uuid {
        if let Some(existing) = self
            .records
            .iter()
            .find(|r| !r.is_terminal() && r.script_id == script_id)
        {
            tracing::debug!(
                script_id,
                execution_id = %existing.id,
                "start requested for a script that is already running"
            );
            return existing.id;
        }

        let id = Uuid::now_v7();
        self.records.insert(
            0,
            Execution {
                id,
                script_id: script_id.to_string(),
                script_name: script_name.to_string(),
                status: ExecutionStatus::Running,
                start_time: Utc::now(),
                end_time: None,
                progress: None,
                output: None,
                error: None,
            },
        );
        id
    }

    // -----------------------------------------------------------------------
    // Ingest path (event-driven, origin-agnostic)
    // -----------------------------------------------------------------------

    /// Reconcile a validated update against the collection.
    ///
    /// Resolution order:
    /// 1. Exact `execution_id` match → merge in place.
    /// 2. `script_id` match against a `running` record → merge in place
    ///    (absorbs the race where the UI-initiated run and an external
    ///    event carry different ids for the same logical execution).
    /// 3. Incoming `running` with a script name → synthesize a new record
    ///    under the event's own id.
    /// 4. Otherwise drop the event.
    pub fn apply_update(&mut self, update: ExecutionUpdate) -> ApplyOutcome {
        if let Some(index) = self.records.iter().position(|r| r.id == update.execution_id) {
            let id = self.records[index].id;
            self.merge(index, &update);
            return ApplyOutcome::Updated(id);
        }

        if let Some(index) = self.records.iter().position(|r| {
            r.status == ExecutionStatus::Running
                && update.script_id.as_deref() == Some(r.script_id.as_str())
        }) {
            let id = self.records[index].id;
            self.merge(index, &update);
            return ApplyOutcome::Updated(id);
        }

        if update.status == ExecutionStatus::Running {
            if let Some(script_name) = &update.script_name {
                let id = update.execution_id;
                self.records.insert(
                    0,
                    Execution {
                        id,
                        script_id: update
                            .script_id
                            .clone()
                            .unwrap_or_else(|| SCRIPT_ID_UNKNOWN.to_string()),
                        script_name: script_name.clone(),
                        status: ExecutionStatus::Running,
                        start_time: Utc::now(),
                        end_time: None,
                        progress: update.progress,
                        output: update.output,
                        error: update.error,
                    },
                );
                return ApplyOutcome::Created(id);
            }
        }

        tracing::debug!(
            execution_id = %update.execution_id,
            status = %update.status,
            "dropping update that matched no execution"
        );
        ApplyOutcome::Dropped
    }

    /// Field-merge rule. Terminal records are frozen: an update resolving
    /// to one is ignored as a whole, which keeps terminal states
    /// absorbing and the ingest path order-tolerant.
    fn merge(&mut self, index: usize, update: &ExecutionUpdate) {
        let record = &mut self.records[index];
        if record.is_terminal() {
            tracing::debug!(
                execution_id = %record.id,
                status = %record.status,
                "ignoring update for a terminal execution"
            );
            return;
        }

        record.status = update.status;

        if let Some(script_id) = &update.script_id {
            record.script_id = script_id.clone();
        }
        if let Some(script_name) = &update.script_name {
            record.script_name = script_name.clone();
        }
        if let Some(progress) = update.progress {
            record.progress = Some(progress);
        }
        if let Some(output) = &update.output {
            record.output = Some(output.clone());
        }
        if let Some(error) = &update.error {
            record.error = Some(error.clone());
        }

        // The record was non-terminal on entry, so reaching a terminal
        // status here is always the first (and only) transition into it.
        if record.is_terminal() {
            record.end_time = Some(Utc::now());
        }
    }

    // -----------------------------------------------------------------------
    // Direct transitions
    // -----------------------------------------------------------------------

    /// Mark a record cancelled. Returns `false` when no non-terminal
    /// record with that id exists (already ended, or never tracked).
    pub fn cancel(&mut self, execution_id: Uuid) -> bool {
        match self.records.iter().position(|r| r.id == execution_id) {
            Some(index) if !self.records[index].is_terminal() => {
                let update = ExecutionUpdate::new(execution_id, ExecutionStatus::Cancelled);
                self.merge(index, &update);
                true
            }
            _ => false,
        }
    }

    // -----------------------------------------------------------------------
    // Removal
    // -----------------------------------------------------------------------

    /// Remove a single record regardless of status. Returns whether a
    /// record was removed.
    pub fn clear(&mut self, execution_id: Uuid) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != execution_id);
        self.records.len() < before
    }

    /// Remove every terminal record, retaining only pending/running ones.
    pub fn clear_completed(&mut self) {
        self.records.retain(|r| !r.is_terminal());
    }

    // -----------------------------------------------------------------------
    // Derived views (recomputed, never cached)
    // -----------------------------------------------------------------------

    /// All records, newest first.
    pub fn executions(&self) -> &[Execution] {
        &self.records
    }

    /// Records still in flight, in current sequence order.
    pub fn active(&self) -> Vec<Execution> {
        self.records
            .iter()
            .filter(|r| !r.is_terminal())
            .cloned()
            .collect()
    }

    /// Terminal records, capped at the configured recent limit. Recency
    /// is insertion-order only; no elapsed-time window is applied.
    pub fn recent(&self) -> Vec<Execution> {
        self.records
            .iter()
            .filter(|r| r.is_terminal())
            .take(self.recent_limit)
            .cloned()
            .collect()
    }
}

impl Default for ExecutionRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_RECENT_LIMIT)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn running_update(id: Uuid, script_id: &str, name: &str) -> ExecutionUpdate {
        let mut update = ExecutionUpdate::new(id, ExecutionStatus::Running);
        update.script_id = Some(script_id.to_string());
        update.script_name = Some(name.to_string());
        update
    }

    // -- create path ----------------------------------------------------------

    #[test]
    fn start_inserts_running_record_at_head() {
        let mut registry = ExecutionRegistry::default();
        registry.start_execution("s1", "One");
        let id2 = registry.start_execution("s2", "Two");

        let records = registry.executions();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, id2);
        assert_eq!(records[0].status, ExecutionStatus::Running);
        assert!(records[0].end_time.is_none());
    }

    #[test]
    fn start_while_script_already_running_returns_existing_id() {
        let mut registry = ExecutionRegistry::default();
        let first = registry.start_execution("s1", "One");
        let second = registry.start_execution("s1", "One again");

        assert_eq!(first, second);
        assert_eq!(registry.executions().len(), 1);
    }

    #[test]
    fn start_after_terminal_creates_a_new_record() {
        let mut registry = ExecutionRegistry::default();
        let first = registry.start_execution("s1", "One");
        registry.apply_update(ExecutionUpdate::new(first, ExecutionStatus::Success));

        let second = registry.start_execution("s1", "One");
        assert_ne!(first, second);
        assert_eq!(registry.executions().len(), 2);
    }

    // -- reconciliation -------------------------------------------------------

    #[test]
    fn update_matches_by_execution_id() {
        let mut registry = ExecutionRegistry::default();
        let id = registry.start_execution("s1", "One");

        let mut update = ExecutionUpdate::new(id, ExecutionStatus::Running);
        update.progress = Some(40);
        assert_eq!(registry.apply_update(update), ApplyOutcome::Updated(id));
        assert_eq!(registry.executions()[0].progress, Some(40));
    }

    #[test]
    fn dedup_by_id_never_creates_a_second_record() {
        let mut registry = ExecutionRegistry::default();
        let id = Uuid::now_v7();
        registry.apply_update(running_update(id, "s1", "One"));

        // Same id, different script identity: still the same record.
        let out = registry.apply_update(running_update(id, "s9", "Renamed"));
        assert_eq!(out, ApplyOutcome::Updated(id));
        assert_eq!(registry.executions().len(), 1);
        assert_eq!(registry.executions()[0].script_id, "s9");
        assert_eq!(registry.executions()[0].script_name, "Renamed");
    }

    #[test]
    fn dedup_by_running_script_absorbs_foreign_id() {
        let mut registry = ExecutionRegistry::default();
        let ui_id = registry.start_execution("s1", "Foo");

        let external = running_update(Uuid::now_v7(), "s1", "Foo");
        let out = registry.apply_update(external);

        assert_eq!(out, ApplyOutcome::Updated(ui_id));
        assert_eq!(registry.executions().len(), 1);
    }

    #[test]
    fn terminal_update_with_script_id_match_completes_ui_record() {
        let mut registry = ExecutionRegistry::default();
        let ui_id = registry.start_execution("s1", "Foo");

        let mut done = ExecutionUpdate::new(Uuid::now_v7(), ExecutionStatus::Success);
        done.script_id = Some("s1".to_string());
        assert_eq!(registry.apply_update(done), ApplyOutcome::Updated(ui_id));
        assert_eq!(registry.executions()[0].status, ExecutionStatus::Success);
    }

    #[test]
    fn synthesis_creates_exactly_one_record_with_event_id() {
        let mut registry = ExecutionRegistry::default();
        let id = Uuid::now_v7();
        let out = registry.apply_update(running_update(id, "s2", "Bar"));

        assert_eq!(out, ApplyOutcome::Created(id));
        let records = registry.executions();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, id);
        assert_eq!(records[0].script_id, "s2");
        assert!(records[0].end_time.is_none());
    }

    #[test]
    fn synthesis_defaults_missing_script_id_to_sentinel() {
        let mut registry = ExecutionRegistry::default();
        let mut update = ExecutionUpdate::new(Uuid::now_v7(), ExecutionStatus::Running);
        update.script_name = Some("Bar".to_string());

        assert_matches!(registry.apply_update(update), ApplyOutcome::Created(_));
        assert_eq!(registry.executions()[0].script_id, SCRIPT_ID_UNKNOWN);
    }

    #[test]
    fn unmatched_terminal_update_is_dropped() {
        let mut registry = ExecutionRegistry::default();
        let out = registry.apply_update(ExecutionUpdate::new(
            Uuid::now_v7(),
            ExecutionStatus::Success,
        ));
        assert_eq!(out, ApplyOutcome::Dropped);
        assert!(registry.executions().is_empty());
    }

    #[test]
    fn running_update_without_name_is_dropped() {
        let mut registry = ExecutionRegistry::default();
        let mut update = ExecutionUpdate::new(Uuid::now_v7(), ExecutionStatus::Running);
        update.script_id = Some("s1".to_string());
        assert_eq!(registry.apply_update(update), ApplyOutcome::Dropped);
    }

    // -- merge rule -----------------------------------------------------------

    #[test]
    fn optional_fields_keep_last_known_value() {
        let mut registry = ExecutionRegistry::default();
        let id = registry.start_execution("s1", "One");

        let mut first = ExecutionUpdate::new(id, ExecutionStatus::Running);
        first.progress = Some(30);
        first.output = Some("thirty".to_string());
        registry.apply_update(first);

        // Second update supplies no optionals; prior values are retained.
        registry.apply_update(ExecutionUpdate::new(id, ExecutionStatus::Running));
        let record = &registry.executions()[0];
        assert_eq!(record.progress, Some(30));
        assert_eq!(record.output.as_deref(), Some("thirty"));
    }

    #[test]
    fn end_time_stamped_exactly_on_terminal_transition() {
        let mut registry = ExecutionRegistry::default();
        let id = registry.start_execution("s1", "One");
        assert!(registry.executions()[0].end_time.is_none());

        registry.apply_update(ExecutionUpdate::new(id, ExecutionStatus::Error));
        let stamped = registry.executions()[0].end_time;
        assert!(stamped.is_some());

        // Terminal-to-terminal never restamps.
        registry.apply_update(ExecutionUpdate::new(id, ExecutionStatus::Success));
        assert_eq!(registry.executions()[0].end_time, stamped);
    }

    #[test]
    fn terminal_status_is_absorbing() {
        let mut registry = ExecutionRegistry::default();
        let id = registry.start_execution("s1", "One");
        registry.apply_update(ExecutionUpdate::new(id, ExecutionStatus::Success));

        let mut late = ExecutionUpdate::new(id, ExecutionStatus::Running);
        late.progress = Some(10);
        registry.apply_update(late);

        let record = &registry.executions()[0];
        assert_eq!(record.status, ExecutionStatus::Success);
        // Terminal records are frozen entirely.
        assert!(record.progress.is_none());
    }

    #[test]
    fn applying_the_same_terminal_update_twice_is_idempotent() {
        let mut registry = ExecutionRegistry::default();
        let id = registry.start_execution("s1", "One");

        let done = ExecutionUpdate::new(id, ExecutionStatus::Success);
        registry.apply_update(done.clone());
        let snapshot = registry.executions()[0].clone();
        registry.apply_update(done);

        let record = &registry.executions()[0];
        assert_eq!(record.status, snapshot.status);
        assert_eq!(record.end_time, snapshot.end_time);
    }

    #[test]
    fn at_most_one_non_terminal_record_per_script() {
        let mut registry = ExecutionRegistry::default();
        registry.start_execution("s1", "One");
        registry.apply_update(running_update(Uuid::now_v7(), "s1", "One"));
        registry.start_execution("s1", "One");

        let in_flight = registry
            .executions()
            .iter()
            .filter(|r| !r.is_terminal() && r.script_id == "s1")
            .count();
        assert_eq!(in_flight, 1);
    }

    // -- cancel ---------------------------------------------------------------

    #[test]
    fn cancel_marks_terminal_and_stamps_end_time() {
        let mut registry = ExecutionRegistry::default();
        let id = registry.start_execution("s1", "One");

        assert!(registry.cancel(id));
        let record = &registry.executions()[0];
        assert_eq!(record.status, ExecutionStatus::Cancelled);
        assert!(record.end_time.is_some());
    }

    #[test]
    fn cancel_of_terminal_or_unknown_record_is_refused() {
        let mut registry = ExecutionRegistry::default();
        let id = registry.start_execution("s1", "One");
        registry.apply_update(ExecutionUpdate::new(id, ExecutionStatus::Success));

        assert!(!registry.cancel(id));
        assert!(!registry.cancel(Uuid::now_v7()));
        assert_eq!(registry.executions()[0].status, ExecutionStatus::Success);
    }

    // -- removal --------------------------------------------------------------

    #[test]
    fn clear_removes_regardless_of_status() {
        let mut registry = ExecutionRegistry::default();
        let running = registry.start_execution("s1", "One");
        let done = registry.start_execution("s2", "Two");
        registry.apply_update(ExecutionUpdate::new(done, ExecutionStatus::Success));

        assert!(registry.clear(running));
        assert!(registry.clear(done));
        assert!(!registry.clear(done));
        assert!(registry.executions().is_empty());
    }

    #[test]
    fn clear_completed_retains_only_in_flight() {
        let mut registry = ExecutionRegistry::default();
        let keep = registry.start_execution("s1", "One");
        let drop1 = registry.start_execution("s2", "Two");
        let drop2 = registry.start_execution("s3", "Three");
        registry.apply_update(ExecutionUpdate::new(drop1, ExecutionStatus::Success));
        registry.apply_update(ExecutionUpdate::new(drop2, ExecutionStatus::Cancelled));

        registry.clear_completed();
        let records = registry.executions();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, keep);
    }

    // -- derived views --------------------------------------------------------

    #[test]
    fn active_and_recent_are_disjoint_and_cover_the_collection() {
        let mut registry = ExecutionRegistry::default();
        for i in 0..6 {
            let id = registry.start_execution(&format!("s{i}"), "Script");
            if i % 2 == 0 {
                registry.apply_update(ExecutionUpdate::new(id, ExecutionStatus::Success));
            }
        }

        let active = registry.active();
        let recent = registry.recent();
        assert_eq!(active.len() + recent.len(), registry.executions().len());
        for record in &active {
            assert!(!record.is_terminal());
            assert!(recent.iter().all(|r| r.id != record.id));
        }
        for record in &recent {
            assert!(record.is_terminal());
        }
    }

    #[test]
    fn recent_is_capped_by_count_not_time() {
        let mut registry = ExecutionRegistry::new(10);
        for i in 0..15 {
            let id = registry.start_execution(&format!("s{i}"), "Script");
            registry.apply_update(ExecutionUpdate::new(id, ExecutionStatus::Success));
        }

        let recent = registry.recent();
        assert_eq!(recent.len(), 10);
        // Newest first: the cap keeps the most recently added records.
        assert_eq!(recent[0].script_id, "s14");
        assert_eq!(registry.executions().len(), 15);
    }

    #[test]
    fn recent_limit_is_configurable() {
        let mut registry = ExecutionRegistry::new(3);
        for i in 0..5 {
            let id = registry.start_execution(&format!("s{i}"), "Script");
            registry.apply_update(ExecutionUpdate::new(id, ExecutionStatus::Error));
        }
        assert_eq!(registry.recent().len(), 3);
    }
}
