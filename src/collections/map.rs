use super::{ElementHooks, ElementMut};
use crate::config::TrackingConfig;
use crate::core::{Result, TrackError};
use crate::tracking::{DirtyCheck, Trackable};
use std::any::Any;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, Ordering};

/// Keyed collection that records structural mutation.
///
/// Values are the tracked elements; keys are plain data.
pub struct TrackableMap<K, V> {
    items: HashMap<K, V>,
    has_structural_change: AtomicBool,
    hooks: Option<ElementHooks<V>>,
    config: TrackingConfig,
}

impl<K: Eq + Hash, V: Trackable> TrackableMap<K, V> {
    pub fn new() -> Self {
        Self::from_map(HashMap::new())
    }

    /// Wraps existing entries, registering every value.
    pub fn from_map(items: HashMap<K, V>) -> Self {
        Self::build(items, Some(ElementHooks::for_entities()), TrackingConfig::default())
    }

    pub fn with_config(items: HashMap<K, V>, config: TrackingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(items, Some(ElementHooks::for_entities()), config))
    }
}

impl<K: Eq + Hash, V> TrackableMap<K, V> {
    /// Wraps plain values; only structural change is tracked.
    pub fn of_values(items: HashMap<K, V>) -> Self {
        Self::build(items, None, TrackingConfig::default())
    }

    fn build(items: HashMap<K, V>, hooks: Option<ElementHooks<V>>, config: TrackingConfig) -> Self {
        let map = Self {
            items,
            has_structural_change: AtomicBool::new(false),
            hooks,
            config,
        };
        map.items.values().for_each(|value| map.register(value));
        map
    }

    fn register(&self, value: &V) {
        if let Some(hooks) = self.hooks {
            (hooks.register)(value, self.config.enable_element_trackers);
        }
    }

    fn register_read(&self, value: &V) {
        if self.config.register_on_read {
            self.register(value);
        }
    }

    fn mark_structural(&mut self) {
        *self.has_structural_change.get_mut() = true;
    }

    pub fn config(&self) -> TrackingConfig {
        self.config
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Inserts or replaces the value under `key`, returning the previous one.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.register(&value);
        self.mark_structural();
        self.items.insert(key, value)
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let value = self.items.remove(key)?;
        self.mark_structural();
        Some(value)
    }

    /// Keeps the entries `keep` accepts. Values are only inspected here;
    /// use [`get_mut`](Self::get_mut) to change them.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        let before = self.items.len();
        self.items.retain(|key, value| keep(key, &*value));
        if self.items.len() != before {
            self.mark_structural();
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.mark_structural();
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.items.contains_key(key)
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let value = self.items.get(key)?;
        self.register_read(value);
        Some(value)
    }

    /// Mutable access to one value, registered whatever `register_on_read`
    /// says. Writing a different value into the entry counts as a
    /// replacement; see [`ElementMut`].
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<ElementMut<'_, V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let value = self.items.get_mut(key)?;
        Some(ElementMut::new(
            value,
            self.hooks,
            self.config.enable_element_trackers,
            &self.has_structural_change,
        ))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.items
            .iter()
            .inspect(move |(_, value)| self.register_read(value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.items.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.items
            .values()
            .inspect(move |value| self.register_read(value))
    }

    pub fn into_inner(self) -> HashMap<K, V> {
        self.items
    }

    /// Borrows a dynamically typed value as a tracked map, failing when it
    /// is anything else, a plain `HashMap<K, V>` included.
    pub fn downcast(value: &dyn Any) -> Result<&Self>
    where
        K: 'static,
        V: 'static,
    {
        if let Some(map) = value.downcast_ref::<Self>() {
            return Ok(map);
        }

        let received = if value.is::<HashMap<K, V>>() {
            std::any::type_name::<HashMap<K, V>>()
        } else {
            "a value of another type"
        };
        Err(TrackError::NotTrackedCollection {
            expected: std::any::type_name::<Self>(),
            received,
        })
    }
}

impl<K, V> TrackableMap<K, V> {
    pub fn has_structural_change(&self) -> bool {
        self.has_structural_change.load(Ordering::Relaxed)
    }
}

impl<K, V> DirtyCheck for TrackableMap<K, V> {
    fn is_dirty(&self, deep: bool) -> bool {
        if self.has_structural_change() {
            return true;
        }
        match self.hooks {
            Some(hooks) if deep => self.items.values().any(hooks.is_dirty),
            _ => false,
        }
    }
}

impl<K: Eq + Hash, V: Trackable> Default for TrackableMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash, V: Trackable> FromIterator<(K, V)> for TrackableMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_map(iter.into_iter().collect())
    }
}

impl<K: Clone, V: Clone> Clone for TrackableMap<K, V> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            has_structural_change: AtomicBool::new(self.has_structural_change()),
            hooks: self.hooks,
            config: self.config,
        }
    }
}

impl<K: Eq + Hash, V: PartialEq> PartialEq for TrackableMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for TrackableMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackableMap")
            .field("items", &self.items)
            .field("has_structural_change", &self.has_structural_change())
            .finish()
    }
}
