use super::{ElementHooks, ElementMut};
use crate::config::TrackingConfig;
use crate::core::{Result, TrackError};
use crate::tracking::{DirtyCheck, Trackable};
use std::any::Any;
use std::fmt;
use std::ops::Index;
use std::sync::atomic::{AtomicBool, Ordering};

/// Ordered collection that records structural mutation.
pub struct TrackableList<T> {
    items: Vec<T>,
    has_structural_change: AtomicBool,
    hooks: Option<ElementHooks<T>>,
    config: TrackingConfig,
}

impl<T: Trackable> TrackableList<T> {
    /// Creates an empty list of trackable entities.
    pub fn new() -> Self {
        Self::from_vec(Vec::new())
    }

    /// Wraps existing entities. Every element is registered; the wrapper
    /// starts without structural change.
    pub fn from_vec(items: Vec<T>) -> Self {
        Self::build(items, Some(ElementHooks::for_entities()), TrackingConfig::default())
    }

    pub fn with_config(items: Vec<T>, config: TrackingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(items, Some(ElementHooks::for_entities()), config))
    }
}

impl<T> TrackableList<T> {
    /// Wraps plain values that carry no tracker of their own. Only
    /// structural change is tracked.
    pub fn of_values(items: Vec<T>) -> Self {
        Self::build(items, None, TrackingConfig::default())
    }

    fn build(items: Vec<T>, hooks: Option<ElementHooks<T>>, config: TrackingConfig) -> Self {
        let list = Self {
            items,
            has_structural_change: AtomicBool::new(false),
            hooks,
            config,
        };
        list.items.iter().for_each(|item| list.register(item));
        list
    }

    fn register(&self, item: &T) {
        if let Some(hooks) = self.hooks {
            (hooks.register)(item, self.config.enable_element_trackers);
        }
    }

    fn register_read(&self, item: &T) {
        if self.config.register_on_read {
            self.register(item);
        }
    }

    fn mark_structural(&mut self) {
        *self.has_structural_change.get_mut() = true;
    }

    pub fn has_structural_change(&self) -> bool {
        self.has_structural_change.load(Ordering::Relaxed)
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

    pub fn push(&mut self, item: T) {
        self.register(&item);
        self.items.push(item);
        self.mark_structural();
    }

    /// # Panics
    ///
    /// Panics if `index > len`, like [`Vec::insert`].
    pub fn insert(&mut self, index: usize, item: T) {
        self.register(&item);
        self.items.insert(index, item);
        self.mark_structural();
    }

    /// Replaces the element at `index` and returns the previous one.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn set(&mut self, index: usize, item: T) -> T {
        self.register(&item);
        let previous = std::mem::replace(&mut self.items[index], item);
        self.mark_structural();
        previous
    }

    /// # Panics
    ///
    /// Panics if `index` is out of bounds, like [`Vec::remove`].
    pub fn remove(&mut self, index: usize) -> T {
        let item = self.items.remove(index);
        self.mark_structural();
        item
    }

    pub fn pop(&mut self) -> Option<T> {
        let item = self.items.pop()?;
        self.mark_structural();
        Some(item)
    }

    /// Removes the first element equal to `item`.
    pub fn remove_item(&mut self, item: &T) -> bool
    where
        T: PartialEq,
    {
        match self.items.iter().position(|candidate| candidate == item) {
            Some(index) => {
                self.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&T) -> bool,
    {
        let before = self.items.len();
        self.items.retain(keep);
        if self.items.len() != before {
            self.mark_structural();
        }
    }

    pub fn extend<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        for item in items {
            self.push(item);
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.mark_structural();
    }

    pub fn contains(&self, item: &T) -> bool
    where
        T: PartialEq,
    {
        self.items.contains(item)
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        let item = self.items.get(index)?;
        self.register_read(item);
        Some(item)
    }

    /// Mutable access to one element. The element is registered whatever
    /// `register_on_read` says; see [`ElementMut`] for how replacement is
    /// detected.
    pub fn get_mut(&mut self, index: usize) -> Option<ElementMut<'_, T>> {
        let item = self.items.get_mut(index)?;
        Some(ElementMut::new(
            item,
            self.hooks,
            self.config.enable_element_trackers,
            &self.has_structural_change,
        ))
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.items.iter().inspect(move |item| self.register_read(item))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = ElementMut<'_, T>> + '_ {
        let hooks = self.hooks;
        let enabled = self.config.enable_element_trackers;
        let structural = &self.has_structural_change;

        self.items
            .iter_mut()
            .map(move |item| ElementMut::new(item, hooks, enabled, structural))
    }

    pub fn into_inner(self) -> Vec<T> {
        self.items
    }

    /// Borrows a dynamically typed value as a tracked list, failing when it
    /// is anything else, a plain `Vec<T>` included.
    pub fn downcast(value: &dyn Any) -> Result<&Self>
    where
        T: 'static,
    {
        if let Some(list) = value.downcast_ref::<Self>() {
            return Ok(list);
        }

        let received = if value.is::<Vec<T>>() {
            std::any::type_name::<Vec<T>>()
        } else {
            "a value of another type"
        };
        Err(TrackError::NotTrackedCollection {
            expected: std::any::type_name::<Self>(),
            received,
        })
    }
}

impl<T> DirtyCheck for TrackableList<T> {
    fn is_dirty(&self, deep: bool) -> bool {
        if self.has_structural_change() {
            return true;
        }
        match self.hooks {
            Some(hooks) if deep => self.items.iter().any(hooks.is_dirty),
            _ => false,
        }
    }
}

impl<T> Index<usize> for TrackableList<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        let item = &self.items[index];
        self.register_read(item);
        item
    }
}

impl<T: Trackable> Default for TrackableList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Trackable> FromIterator<T> for TrackableList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<T: Clone> Clone for TrackableList<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            has_structural_change: AtomicBool::new(self.has_structural_change()),
            hooks: self.hooks,
            config: self.config,
        }
    }
}

/// Compares elements only; structural state is not part of the value.
impl<T: PartialEq> PartialEq for TrackableList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: fmt::Debug> fmt::Debug for TrackableList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackableList")
            .field("items", &self.items)
            .field("has_structural_change", &self.has_structural_change())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_values_track_structure_only() {
        let mut list = TrackableList::of_values(vec![1, 2, 3]);
        assert!(!list.is_dirty(false));
        assert!(!list.is_dirty(true));

        assert_eq!(list[1], 2);
        assert_eq!(list.iter().sum::<i32>(), 6);
        assert!(!list.has_structural_change());

        list.push(4);
        assert!(list.has_structural_change());
        assert!(list.is_dirty(false));
    }

    fn assert_marks_structure(mutate: fn(&mut TrackableList<i32>)) {
        let mut list = TrackableList::of_values(vec![1, 2]);
        mutate(&mut list);
        assert!(list.has_structural_change());
        assert!(list.is_dirty(false));
    }

    #[test]
    fn test_every_structural_mutator_sets_flag() {
        assert_marks_structure(|list| list.push(9));
        assert_marks_structure(|list| list.insert(0, 9));
        assert_marks_structure(|list| {
            list.set(0, 9);
        });
        assert_marks_structure(|list| {
            list.remove(0);
        });
        assert_marks_structure(|list| {
            list.pop();
        });
        assert_marks_structure(|list| {
            list.remove_item(&2);
        });
        assert_marks_structure(|list| list.retain(|value| *value != 1));
        assert_marks_structure(|list| list.extend([7, 8]));
        assert_marks_structure(|list| list.clear());
    }

    #[test]
    fn test_writing_plain_value_through_handle_is_structural() {
        let mut list = TrackableList::of_values(vec![1, 2]);
        assert_eq!(list.get_mut(0).map(|value| *value), Some(1));
        assert!(!list.has_structural_change());

        if let Some(mut value) = list.get_mut(1) {
            *value = 5;
        }
        assert!(list.has_structural_change());
        assert_eq!(list[1], 5);

        let mut list = TrackableList::of_values(vec![1, 2]);
        list.iter_mut().for_each(|mut value| *value += 1);
        assert!(list.is_dirty(false));
    }

    #[test]
    fn test_noop_removals_keep_list_clean() {
        let mut list = TrackableList::of_values(vec![1, 2]);
        list.retain(|_| true);
        assert!(!list.remove_item(&5));
        assert!(!list.has_structural_change());

        let mut empty: TrackableList<i32> = TrackableList::of_values(Vec::new());
        assert_eq!(empty.pop(), None);
        assert!(!empty.has_structural_change());
    }

    #[test]
    fn test_downcast_names_expected_wrapper() {
        let tracked: Box<dyn Any> = Box::new(TrackableList::of_values(vec![1_i64]));
        assert_eq!(TrackableList::<i64>::downcast(tracked.as_ref()).map(|l| l.len()), Ok(1));

        let plain: Box<dyn Any> = Box::new(vec![1_i64]);
        match TrackableList::<i64>::downcast(plain.as_ref()) {
            Err(TrackError::NotTrackedCollection { expected, received }) => {
                assert!(expected.contains("TrackableList"));
                assert!(received.contains("Vec"));
            }
            other => panic!("expected NotTrackedCollection, got {:?}", other.map(|l| l.len())),
        }
    }
}
