use std::fmt;
use std::marker::PhantomData;

/// Typed accessor for a tracked property of `T` holding values of type `V`.
///
/// Carries the same identifier the property's setter records under, so
/// queries made through it read back typed baselines.
pub struct Property<T, V> {
    name: &'static str,
    _marker: PhantomData<fn(&T) -> V>,
}

impl<T, V> Property<T, V> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<T, V> Clone for Property<T, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, V> Copy for Property<T, V> {}

impl<T, V> fmt::Debug for Property<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Property<{}, {}>({})",
            std::any::type_name::<T>(),
            std::any::type_name::<V>(),
            self.name
        )
    }
}
