//! Change tracking engine.
//!
//! - [`ChangeTracker`] records original values per property.
//! - [`TrackerSlot`] attaches at most one tracker to an entity.
//! - [`PropertyBindings`] writes baselines back on rollback.
//! - [`DeepRegistry`] answers "is anything reachable from this entity dirty?".
//! - [`ChangeTracking`] is the entity-level API over all of the above.

use crate::core::TrackedValue;

pub mod association;
pub mod bindings;
pub mod deep;
pub mod entity;
pub mod property;
pub mod tracker;

pub use association::TrackerSlot;
pub use bindings::PropertyBindings;
pub use deep::{DeepAccessor, DeepRegistry};
pub use entity::{ChangeTracking, entity_is_dirty};
pub use property::Property;
pub use tracker::{ChangeTracker, OriginalValues};

/// Anything that can report whether it changed since its baseline.
///
/// `deep` asks the implementor to also consult what it owns: nested
/// entities for an entity, elements for a collection.
pub trait DirtyCheck {
    fn is_dirty(&self, deep: bool) -> bool;
}

impl<T: DirtyCheck> DirtyCheck for Option<T> {
    fn is_dirty(&self, deep: bool) -> bool {
        self.as_ref().is_some_and(|inner| inner.is_dirty(deep))
    }
}

impl<T: DirtyCheck + ?Sized> DirtyCheck for Box<T> {
    fn is_dirty(&self, deep: bool) -> bool {
        self.as_ref().is_dirty(deep)
    }
}

/// An entity whose property writes can be recorded.
///
/// Implementors own a [`TrackerSlot`] and describe how each tracked property
/// is written back. `tracked_struct!` generates all of this; a hand-written
/// implementation looks like:
///
/// ```
/// use memotrack::tracking::{DirtyCheck, PropertyBindings, Trackable, TrackerSlot, entity_is_dirty, set_tracked};
///
/// struct Counter {
///     value: i64,
///     tracker: TrackerSlot,
/// }
///
/// impl Counter {
///     fn set_value(&mut self, value: i64) {
///         set_tracked(&mut self.tracker, &mut self.value, value, "value");
///     }
/// }
///
/// impl DirtyCheck for Counter {
///     fn is_dirty(&self, deep: bool) -> bool {
///         entity_is_dirty(self, deep)
///     }
/// }
///
/// impl Trackable for Counter {
///     fn tracker_slot(&self) -> &TrackerSlot {
///         &self.tracker
///     }
///
///     fn tracker_slot_mut(&mut self) -> &mut TrackerSlot {
///         &mut self.tracker
///     }
///
///     fn bind_properties(bindings: &mut PropertyBindings<Self>) {
///         bindings.bind("value", Counter::set_value);
///     }
/// }
/// ```
pub trait Trackable: DirtyCheck + Send + Sync + 'static {
    fn tracker_slot(&self) -> &TrackerSlot;

    fn tracker_slot_mut(&mut self) -> &mut TrackerSlot;

    /// Declares the setter of every tracked property, keyed by identifier.
    fn bind_properties(bindings: &mut PropertyBindings<Self>)
    where
        Self: Sized;
}

/// Setter body for a tracked field: records the write, then stores `value`.
///
/// Takes the slot and the field separately so callers can pass two disjoint
/// borrows of the same entity.
pub fn set_tracked<V: TrackedValue>(slot: &mut TrackerSlot, field: &mut V, value: V, property: &str) {
    if let Some(tracker) = slot.get_mut() {
        tracker.record_change(&*field, &value, property);
    }
    *field = value;
}
