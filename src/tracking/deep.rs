//! Deep tracking registry.
//!
//! A type that owns nested trackable entities or collections registers one
//! accessor per nested handle. Registration is one-time static configuration:
//! the first list registered for a type is kept, later attempts are ignored.

use super::DirtyCheck;
use lazy_static::lazy_static;
use log::debug;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, PoisonError, RwLock};

/// Exposes one nested dirty-capable handle of an entity, if present.
pub type DeepAccessor<T> = fn(&T) -> Option<&dyn DirtyCheck>;

lazy_static! {
    static ref ACCESSORS_BY_TYPE: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>> =
        RwLock::new(HashMap::new());
}

pub struct DeepRegistry;

impl DeepRegistry {
    /// Registers the accessors of `T`. Returns `false` when `T` already had a
    /// list; the earlier list stays in effect.
    pub fn set_accessors<T: 'static>(accessors: Vec<DeepAccessor<T>>) -> bool {
        let mut registry = ACCESSORS_BY_TYPE
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        match registry.entry(TypeId::of::<T>()) {
            Entry::Occupied(_) => {
                debug!(
                    "deep accessors for '{}' already registered, ignoring {} new accessor(s)",
                    std::any::type_name::<T>(),
                    accessors.len()
                );
                false
            }
            Entry::Vacant(slot) => {
                debug!(
                    "registered {} deep accessor(s) for '{}'",
                    accessors.len(),
                    std::any::type_name::<T>()
                );
                slot.insert(Arc::new(accessors));
                true
            }
        }
    }

    /// Like [`set_accessors`](Self::set_accessors), but builds the list only
    /// when `T` has none yet.
    pub fn register_once<T, F>(build: F) -> bool
    where
        T: 'static,
        F: FnOnce() -> Vec<DeepAccessor<T>>,
    {
        if Self::is_registered::<T>() {
            return false;
        }
        Self::set_accessors(build())
    }

    pub fn is_registered<T: 'static>() -> bool {
        ACCESSORS_BY_TYPE
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&TypeId::of::<T>())
    }

    pub fn accessors<T: 'static>() -> Option<Arc<Vec<DeepAccessor<T>>>> {
        let erased = ACCESSORS_BY_TYPE
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&TypeId::of::<T>())
            .cloned()?;
        erased.downcast::<Vec<DeepAccessor<T>>>().ok()
    }

    /// Returns `true` as soon as one registered handle of `entity` reports
    /// itself dirty, checking each handle deeply.
    pub fn has_deep_changes<T: 'static>(entity: &T) -> bool {
        let Some(accessors) = Self::accessors::<T>() else {
            return false;
        };

        accessors
            .iter()
            .filter_map(|accessor| accessor(entity))
            .any(|nested| nested.is_dirty(true))
    }
}
