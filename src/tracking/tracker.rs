use crate::core::{OriginalValue, TrackedValue};
use log::trace;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Snapshot of recorded baselines, ordered by property identifier.
pub type OriginalValues = BTreeMap<String, OriginalValue>;

static NEXT_TRACKER_ID: AtomicU64 = AtomicU64::new(1);

/// Per-entity record of diverged properties and their original values.
///
/// A property is present in the tracker exactly while its current value
/// differs from the recorded baseline. Writing the baseline value back
/// removes the entry again, so a property never carries more than one
/// baseline between two accept/rollback boundaries.
///
/// Mutating operations take `&mut self`: one entity, one writer. The
/// enabled flag is atomic so that collections and readers holding a shared
/// reference can switch tracking on without exclusive access.
pub struct ChangeTracker {
    id: u64,
    enabled: AtomicBool,
    original_values: HashMap<String, OriginalValue>,
}

impl ChangeTracker {
    /// Creates a disabled tracker with no recorded state.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_enabled(enabled: bool) -> Self {
        Self {
            id: NEXT_TRACKER_ID.fetch_add(1, Ordering::Relaxed),
            enabled: AtomicBool::new(enabled),
            original_values: HashMap::new(),
        }
    }

    /// Process-unique identity of this tracker, and so of the entity it
    /// belongs to. Never reused.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Switches recording on or off. Disabling keeps everything recorded so far.
    pub fn enable(&self, enabled: bool) -> &Self {
        self.enabled.store(enabled, Ordering::Release);
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Records a property write.
    ///
    /// `old` is the value being overwritten, `new` the value being written.
    /// The first divergence stores `old` as the baseline; a later write that
    /// lands back on the baseline drops the entry.
    pub fn record_change<V: TrackedValue>(&mut self, old: &V, new: &V, property: &str) {
        if !self.is_enabled() || old.eq_value(new) {
            return;
        }

        match self.original_values.get(property) {
            Some(original) => {
                if original.matches(new) {
                    self.original_values.remove(property);
                    trace!("property '{}' returned to its baseline", property);
                }
            }
            None => {
                self.original_values
                    .insert(property.to_string(), OriginalValue::from_boxed(old.clone_value()));
                trace!("captured baseline for property '{}'", property);
            }
        }
    }

    /// Returns `true` when any property diverged from its baseline.
    ///
    /// Nested entities are not consulted here; use the entity's
    /// [`DirtyCheck`](super::DirtyCheck) implementation for deep checks.
    pub fn has_changes(&self) -> bool {
        !self.original_values.is_empty()
    }

    pub fn has_changed(&self, property: &str) -> bool {
        self.original_values.contains_key(property)
    }

    pub fn change_count(&self) -> usize {
        self.original_values.len()
    }

    /// Identifiers of all diverged properties, sorted.
    pub fn changed_properties(&self) -> Vec<&str> {
        let mut properties: Vec<&str> = self.original_values.keys().map(String::as_str).collect();
        properties.sort_unstable();
        properties
    }

    /// Read-only copy of every recorded baseline; empty when nothing changed.
    pub fn original_values(&self) -> OriginalValues {
        self.original_values
            .iter()
            .map(|(property, value)| (property.clone(), value.clone()))
            .collect()
    }

    pub fn original_value(&self, property: &str) -> Option<&OriginalValue> {
        self.original_values.get(property)
    }

    /// Typed variant of [`original_value`](Self::original_value).
    pub fn original_value_as<V: 'static>(&self, property: &str) -> Option<&V> {
        self.original_values
            .get(property)
            .and_then(OriginalValue::downcast_ref::<V>)
    }

    /// Makes every current value the new baseline. No-op while disabled.
    pub fn accept_changes(&mut self) {
        if !self.is_enabled() {
            return;
        }
        self.original_values.clear();
    }

    /// Makes the current value of one property its new baseline. No-op while disabled.
    pub fn accept_change(&mut self, property: &str) {
        if !self.is_enabled() {
            return;
        }
        self.original_values.remove(property);
    }

    pub(crate) fn take_original_values(&mut self) -> HashMap<String, OriginalValue> {
        std::mem::take(&mut self.original_values)
    }

    pub(crate) fn take_original_value(&mut self, property: &str) -> Option<OriginalValue> {
        self.original_values.remove(property)
    }
}

impl Default for ChangeTracker {
    fn default() -> Self {
        Self::with_enabled(false)
    }
}

impl std::fmt::Debug for ChangeTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeTracker")
            .field("id", &self.id)
            .field("enabled", &self.is_enabled())
            .field("original_values", &self.original_values)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled_tracker() -> ChangeTracker {
        let tracker = ChangeTracker::new();
        tracker.enable(true);
        tracker
    }

    #[test]
    fn test_every_tracker_has_its_own_id() {
        let first = ChangeTracker::new();
        let second = ChangeTracker::default();
        assert_ne!(first.id(), second.id());
    }

    #[test]
    fn test_disabled_tracker_records_nothing() {
        let mut tracker = ChangeTracker::new();
        tracker.record_change(&1_i64, &2_i64, "count");

        assert!(!tracker.is_enabled());
        assert!(!tracker.has_changes());
        assert!(tracker.original_values().is_empty());
    }

    #[test]
    fn test_equal_write_is_ignored() {
        let mut tracker = enabled_tracker();
        tracker.record_change(&"A".to_string(), &"A".to_string(), "id");
        assert!(!tracker.has_changed("id"));
    }

    #[test]
    fn test_earliest_baseline_is_kept() {
        let mut tracker = enabled_tracker();
        tracker.record_change(&1_i64, &2_i64, "count");
        tracker.record_change(&2_i64, &3_i64, "count");

        assert!(tracker.has_changed("count"));
        assert_eq!(tracker.original_value_as::<i64>("count"), Some(&1));
        assert_eq!(tracker.change_count(), 1);
    }

    #[test]
    fn test_round_trip_collapses_entry() {
        let mut tracker = enabled_tracker();
        tracker.record_change(&1_i64, &2_i64, "count");
        tracker.record_change(&2_i64, &3_i64, "count");
        tracker.record_change(&3_i64, &1_i64, "count");

        assert!(!tracker.has_changed("count"));
        assert!(tracker.original_value("count").is_none());
    }

    #[test]
    fn test_accept_changes_resets_baseline() {
        let mut tracker = enabled_tracker();
        tracker.record_change(&1_i64, &2_i64, "count");
        tracker.record_change(&"a".to_string(), &"b".to_string(), "name");
        assert_eq!(tracker.changed_properties(), vec!["count", "name"]);

        tracker.accept_change("name");
        assert_eq!(tracker.changed_properties(), vec!["count"]);

        tracker.accept_changes();
        assert!(!tracker.has_changes());
        assert!(tracker.original_values().is_empty());

        tracker.record_change(&2_i64, &1_i64, "count");
        assert_eq!(tracker.original_value_as::<i64>("count"), Some(&2));
    }

    #[test]
    fn test_disabling_keeps_recorded_state_and_blocks_accept() {
        let mut tracker = enabled_tracker();
        tracker.record_change(&1_i64, &2_i64, "count");

        tracker.enable(false);
        tracker.accept_changes();
        tracker.record_change(&2_i64, &1_i64, "count");

        assert!(tracker.has_changed("count"));
        assert_eq!(tracker.original_value_as::<i64>("count"), Some(&1));
    }

    #[test]
    fn test_original_values_snapshot_is_detached() {
        let mut tracker = enabled_tracker();
        tracker.record_change(&1_i64, &2_i64, "count");

        let snapshot = tracker.original_values();
        tracker.accept_changes();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot["count"].downcast_ref::<i64>(), Some(&1));
    }
}
