//! Property mutator bindings used by rollback.
//!
//! Each trackable type declares, once, how to write a value back into each of
//! its tracked properties. The declaration is turned into a map keyed by
//! property identifier the first time an entity of that type rolls back, and
//! the same map serves every later rollback of that type.

use super::Trackable;
use crate::core::{OriginalValue, TrackedValue};
use lazy_static::lazy_static;
use log::debug;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

type Mutator<T> = Box<dyn Fn(&mut T, OriginalValue) -> bool + Send + Sync>;

lazy_static! {
    static ref BINDINGS_BY_TYPE: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>> =
        RwLock::new(HashMap::new());
}

pub struct PropertyBindings<T> {
    mutators: HashMap<&'static str, Mutator<T>>,
}

impl<T: 'static> PropertyBindings<T> {
    pub fn new() -> Self {
        Self {
            mutators: HashMap::new(),
        }
    }

    /// Binds `property` to a setter taking the property's value type.
    pub fn bind<V: TrackedValue>(&mut self, property: &'static str, setter: fn(&mut T, V)) -> &mut Self {
        self.mutators.insert(
            property,
            Box::new(move |entity: &mut T, value: OriginalValue| match value.into_value::<V>() {
                Some(value) => {
                    setter(entity, value);
                    true
                }
                None => false,
            }),
        );
        self
    }

    /// Writes `value` into `property`. Returns `false` when the property is
    /// unknown or the value has a different type than the binding.
    pub fn apply(&self, entity: &mut T, property: &str, value: OriginalValue) -> bool {
        match self.mutators.get(property) {
            Some(mutator) => mutator(entity, value),
            None => false,
        }
    }

    pub fn contains(&self, property: &str) -> bool {
        self.mutators.contains_key(property)
    }

    pub fn len(&self) -> usize {
        self.mutators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mutators.is_empty()
    }
}

impl<T: Trackable> PropertyBindings<T> {
    /// Returns the bindings of `T`, building them on first request.
    pub fn for_type() -> Arc<Self> {
        let type_id = TypeId::of::<T>();

        let cached = BINDINGS_BY_TYPE
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .cloned();
        if let Some(bindings) = cached.and_then(|erased| erased.downcast::<Self>().ok()) {
            return bindings;
        }

        let mut bindings = Self::new();
        T::bind_properties(&mut bindings);
        debug!(
            "built {} property bindings for '{}'",
            bindings.len(),
            std::any::type_name::<T>()
        );

        let erased = BINDINGS_BY_TYPE
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(type_id)
            .or_insert_with(|| Arc::new(bindings) as Arc<dyn Any + Send + Sync>)
            .clone();

        match erased.downcast::<Self>() {
            Ok(bindings) => bindings,
            Err(_) => {
                let mut bindings = Self::new();
                T::bind_properties(&mut bindings);
                Arc::new(bindings)
            }
        }
    }
}

impl<T: 'static> Default for PropertyBindings<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Point {
        x: i64,
        label: String,
    }

    fn set_x(point: &mut Point, x: i64) {
        point.x = x;
    }

    fn set_label(point: &mut Point, label: String) {
        point.label = label;
    }

    fn point_bindings() -> PropertyBindings<Point> {
        let mut bindings = PropertyBindings::new();
        bindings.bind("x", set_x).bind("label", set_label);
        bindings
    }

    #[test]
    fn test_apply_writes_known_property() {
        let bindings = point_bindings();
        let mut point = Point {
            x: 1,
            label: "a".to_string(),
        };

        assert!(bindings.apply(&mut point, "x", OriginalValue::new(7_i64)));
        assert!(bindings.apply(&mut point, "label", OriginalValue::new("b".to_string())));
        assert_eq!(point.x, 7);
        assert_eq!(point.label, "b");
    }

    #[test]
    fn test_unknown_property_and_wrong_type_are_skipped() {
        let bindings = point_bindings();
        let mut point = Point {
            x: 1,
            label: "a".to_string(),
        };

        assert!(!bindings.apply(&mut point, "y", OriginalValue::new(7_i64)));
        assert!(!bindings.apply(&mut point, "x", OriginalValue::new("7".to_string())));
        assert_eq!(point.x, 1);
        assert_eq!(point.label, "a");
        assert_eq!(bindings.len(), 2);
        assert!(bindings.contains("label"));
    }
}
