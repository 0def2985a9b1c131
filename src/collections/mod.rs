//! Collection wrappers that track structural change and delegate element
//! dirtiness to the elements' own trackers.
//!
//! A wrapper is dirty on its own once anything was inserted, removed,
//! replaced or cleared. `is_dirty(false)` reports only that structural flag;
//! `is_dirty(true)` additionally asks every element for a deep check. The flag
//! is never reset: replace the wrapper to start from a clean baseline.
//!
//! Mutable element access goes through [`ElementMut`], so writing a different
//! element into a slot counts as a replacement just like `set` or `insert`.

use crate::tracking::{ChangeTracker, Trackable};
use log::trace;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicBool, Ordering};

pub mod list;
pub mod map;

pub use list::TrackableList;
pub use map::TrackableMap;

/// Element callbacks of a wrapper holding trackable entities. Wrappers over
/// plain values carry none.
pub(crate) struct ElementHooks<T> {
    pub(crate) register: fn(&T, bool),
    pub(crate) is_dirty: fn(&T) -> bool,
    pub(crate) identity: fn(&T) -> Option<u64>,
}

impl<T: Trackable> ElementHooks<T> {
    pub(crate) fn for_entities() -> Self {
        Self {
            register: register_element::<T>,
            is_dirty: element_is_dirty::<T>,
            identity: element_identity::<T>,
        }
    }
}

impl<T> Clone for ElementHooks<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ElementHooks<T> {}

fn register_element<T: Trackable>(element: &T, enabled: bool) {
    if !element.tracker_slot().is_attached() {
        trace!(
            "registering collection element of type '{}'",
            std::any::type_name::<T>()
        );
    }
    element.tracker_slot().get_or_create_with(enabled);
}

fn element_is_dirty<T: Trackable>(element: &T) -> bool {
    element.is_dirty(true)
}

fn element_identity<T: Trackable>(element: &T) -> Option<u64> {
    element.tracker_slot().get().map(ChangeTracker::id)
}

/// Exclusive access to one element of a trackable collection.
///
/// Entity elements are registered on entry. Edits made through the entity's
/// own setters stay with its tracker; if a different entity sits in the slot
/// when the handle is dropped, the collection is flagged as structurally
/// changed and the newcomer is registered. For plain values every mutable
/// dereference counts as a structural change.
pub struct ElementMut<'a, T> {
    element: &'a mut T,
    hooks: Option<ElementHooks<T>>,
    identity: Option<u64>,
    enabled: bool,
    structural: &'a AtomicBool,
}

impl<'a, T> ElementMut<'a, T> {
    pub(crate) fn new(
        element: &'a mut T,
        hooks: Option<ElementHooks<T>>,
        enabled: bool,
        structural: &'a AtomicBool,
    ) -> Self {
        let identity = match hooks {
            Some(hooks) => {
                (hooks.register)(&*element, enabled);
                (hooks.identity)(&*element)
            }
            None => None,
        };

        Self {
            element,
            hooks,
            identity,
            enabled,
            structural,
        }
    }
}

impl<T> Deref for ElementMut<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &*self.element
    }
}

impl<T> DerefMut for ElementMut<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        if self.hooks.is_none() {
            self.structural.store(true, Ordering::Relaxed);
        }
        &mut *self.element
    }
}

impl<T> Drop for ElementMut<'_, T> {
    fn drop(&mut self) {
        let Some(hooks) = self.hooks else {
            return;
        };
        if (hooks.identity)(&*self.element) != self.identity {
            trace!(
                "collection element of type '{}' replaced in place",
                std::any::type_name::<T>()
            );
            self.structural.store(true, Ordering::Relaxed);
            (hooks.register)(&*self.element, self.enabled);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ElementMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ElementMut").field(&self.element).finish()
    }
}
