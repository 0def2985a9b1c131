use super::{ChangeTracker, DeepRegistry, OriginalValues, Property, PropertyBindings, Trackable};
use crate::core::{OriginalValue, Result, TrackError};
use tracing::{Level, debug_span, event};

/// Shallow-or-deep dirty check shared by every [`Trackable`] entity.
///
/// An entity that was never tracked has no changes of its own, but nested
/// handles are still consulted when `deep` is requested.
pub fn entity_is_dirty<T: Trackable>(entity: &T, deep: bool) -> bool {
    let own_changes = entity
        .tracker_slot()
        .get()
        .is_some_and(ChangeTracker::has_changes);

    own_changes || (deep && DeepRegistry::has_deep_changes(entity))
}

/// Entity-level tracking API, available on every [`Trackable`] type.
pub trait ChangeTracking: Trackable + Sized {
    /// Activates tracking: creates the tracker if needed and enables it.
    fn track(&self) -> &ChangeTracker {
        self.tracker_slot().get_or_create().enable(true)
    }

    /// Returns the tracker, creating a disabled one on first use.
    fn tracker_or_create(&self) -> &ChangeTracker {
        self.tracker_slot().get_or_create()
    }

    fn try_tracker(&self) -> Option<&ChangeTracker> {
        self.tracker_slot().get()
    }

    /// Returns the tracker, failing when tracking was never activated.
    fn tracker(&self) -> Result<&ChangeTracker> {
        self.tracker_slot()
            .get()
            .ok_or(TrackError::NotTracked(std::any::type_name::<Self>()))
    }

    fn has_changed(&self, property: &str) -> bool {
        self.try_tracker()
            .is_some_and(|tracker| tracker.has_changed(property))
    }

    fn has_changed_property<V>(&self, property: Property<Self, V>) -> bool {
        self.has_changed(property.name())
    }

    fn original_value(&self, property: &str) -> Option<&OriginalValue> {
        self.try_tracker()?.original_value(property)
    }

    fn original_value_of<V: 'static>(&self, property: Property<Self, V>) -> Option<&V> {
        self.try_tracker()?.original_value_as::<V>(property.name())
    }

    fn original_values(&self) -> OriginalValues {
        self.try_tracker()
            .map(ChangeTracker::original_values)
            .unwrap_or_default()
    }

    fn changed_properties(&self) -> Vec<&str> {
        self.try_tracker()
            .map(ChangeTracker::changed_properties)
            .unwrap_or_default()
    }

    fn is_dirty_deep(&self) -> bool {
        self.is_dirty(true)
    }

    /// Restores every changed property to its baseline and clears the tracker.
    fn rollback_changes(&mut self) {
        let originals = match self.tracker_slot_mut().get_mut() {
            Some(tracker) if tracker.is_enabled() => tracker.take_original_values(),
            _ => return,
        };
        if originals.is_empty() {
            return;
        }

        let span = debug_span!(
            "rollback",
            entity = std::any::type_name::<Self>(),
            properties = originals.len()
        );
        let _guard = span.enter();
        restore_baselines(self, originals);
    }

    /// Restores one property to its baseline.
    fn rollback_property(&mut self, property: &str) {
        let original = match self.tracker_slot_mut().get_mut() {
            Some(tracker) if tracker.is_enabled() => tracker.take_original_value(property),
            _ => return,
        };

        if let Some(original) = original {
            restore_baselines(self, [(property.to_string(), original)]);
        }
    }

    fn rollback_property_of<V>(&mut self, property: Property<Self, V>) {
        self.rollback_property(property.name());
    }

    /// Makes the current values the new baseline. No-op while disabled.
    fn accept_changes(&mut self) {
        let tracker = match self.tracker_slot_mut().get_mut() {
            Some(tracker) if tracker.is_enabled() => tracker,
            _ => return,
        };

        event!(
            Level::DEBUG,
            entity = std::any::type_name::<Self>(),
            properties = tracker.change_count(),
            "accepting changes"
        );
        tracker.accept_changes();
    }

    fn accept_change(&mut self, property: &str) {
        if let Some(tracker) = self.tracker_slot_mut().get_mut() {
            tracker.accept_change(property);
        }
    }

    fn accept_change_of<V>(&mut self, property: Property<Self, V>) {
        self.accept_change(property.name());
    }
}

impl<T: Trackable> ChangeTracking for T {}

/// Writes baselines back through the type's bindings with recording
/// suppressed, so the restoring writes are not captured as new changes.
fn restore_baselines<T, I>(entity: &mut T, originals: I)
where
    T: Trackable,
    I: IntoIterator<Item = (String, OriginalValue)>,
{
    let bindings = PropertyBindings::<T>::for_type();

    if let Some(tracker) = entity.tracker_slot().get() {
        tracker.enable(false);
    }

    for (property, original) in originals {
        if !bindings.apply(entity, &property, original) {
            event!(
                Level::DEBUG,
                property = %property,
                "rollback skipped property without a matching binding"
            );
        }
    }

    if let Some(tracker) = entity.tracker_slot().get() {
        tracker.enable(true);
    }
}
