//! Type-erased storage for recorded baselines.
//!
//! A tracker keeps the original value of every diverged property in one map,
//! whatever the property types are. [`TrackedValue`] is the capability a value
//! must provide to live in that map: equality against another erased value,
//! cloning, and downcasting back to the concrete type.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Object-safe view of a value that can be recorded as a baseline.
///
/// Implemented for every `PartialEq + Clone + Debug + Send + Sync` type.
/// Values without a meaningful `PartialEq` can be wrapped in [`ByIdentity`].
pub trait TrackedValue: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync>;
    fn eq_value(&self, other: &dyn TrackedValue) -> bool;
    fn clone_value(&self) -> Box<dyn TrackedValue>;
    fn fmt_value(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
    fn type_name(&self) -> &'static str;
}

impl<T> TrackedValue for T
where
    T: PartialEq + Clone + fmt::Debug + Send + Sync + 'static,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync> {
        self
    }

    fn eq_value(&self, other: &dyn TrackedValue) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }

    fn clone_value(&self) -> Box<dyn TrackedValue> {
        Box::new(self.clone())
    }

    fn fmt_value(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// A recorded baseline value.
pub struct OriginalValue(Box<dyn TrackedValue>);

impl OriginalValue {
    pub fn new<V: TrackedValue>(value: V) -> Self {
        Self(Box::new(value))
    }

    pub(crate) fn from_boxed(value: Box<dyn TrackedValue>) -> Self {
        Self(value)
    }

    /// Returns the baseline as `V`, or `None` when it was recorded with another type.
    pub fn downcast_ref<V: 'static>(&self) -> Option<&V> {
        self.0.as_ref().as_any().downcast_ref::<V>()
    }

    pub fn is<V: 'static>(&self) -> bool {
        self.0.as_ref().as_any().is::<V>()
    }

    /// Consumes the baseline as `V`; `None` when it was recorded with another type.
    pub fn into_value<V: 'static>(self) -> Option<V> {
        self.0.into_any().downcast::<V>().ok().map(|value| *value)
    }

    /// Compares the baseline with a live value of any tracked type.
    pub fn matches<V: TrackedValue>(&self, value: &V) -> bool {
        self.0.as_ref().eq_value(value)
    }

    pub fn type_name(&self) -> &'static str {
        self.0.as_ref().type_name()
    }
}

impl Clone for OriginalValue {
    fn clone(&self) -> Self {
        Self(self.0.as_ref().clone_value())
    }
}

impl PartialEq for OriginalValue {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_ref().eq_value(other.0.as_ref())
    }
}

impl fmt::Debug for OriginalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.as_ref().fmt_value(f)
    }
}

/// Wraps a shared value so that it compares by identity instead of by content.
pub struct ByIdentity<T: ?Sized>(pub Arc<T>);

impl<T: ?Sized> ByIdentity<T> {
    pub fn new(value: Arc<T>) -> Self {
        Self(value)
    }

    pub fn get(&self) -> &Arc<T> {
        &self.0
    }
}

impl<T: ?Sized> Clone for ByIdentity<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: ?Sized> PartialEq for ByIdentity<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<T: ?Sized> Eq for ByIdentity<T> {}

impl<T: ?Sized> fmt::Debug for ByIdentity<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ByIdentity({:p})", Arc::as_ptr(&self.0))
    }
}
