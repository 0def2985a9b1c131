/// Declares a trackable entity.
///
/// Every field gets a getter, a `set_<field>` setter that records the write,
/// and an upper-case [`Property`](crate::tracking::Property) constant. Fields
/// marked `#[track(deep)]` must implement
/// [`DirtyCheck`](crate::tracking::DirtyCheck); they also get a `<field>_mut`
/// accessor and take part in deep dirty checks.
///
/// ```
/// use memotrack::{ChangeTracking, DirtyCheck, tracked_struct};
///
/// tracked_struct! {
///     pub struct Customer {
///         name: String,
///     }
/// }
///
/// tracked_struct! {
///     pub struct Order {
///         id: String,
///         #[track(deep)]
///         customer: Customer,
///     }
/// }
///
/// let mut order = Order::new("A".to_string(), Customer::new("Ann".to_string()));
/// order.track();
/// order.customer().track();
///
/// order.customer_mut().set_name("Bob".to_string());
/// assert!(order.is_dirty(true));
/// assert!(!order.is_dirty(false));
/// ```
#[macro_export]
macro_rules! tracked_struct {
    ($(#[$struct_meta:meta])* $vis:vis struct $name:ident { $($(#[$($field_meta:tt)*])* $field:ident : $field_ty:ty),* $(,)? }) => {
        $crate::tracked_struct!(
            @impl
            [$(#[$struct_meta])*]
            $vis
            $name;
            $($(#[$($field_meta)*])* $field : $field_ty),*
        );
    };
    (@impl [$($struct_meta:tt)*] $vis:vis $name:ident; $($(#[$($field_meta:tt)*])* $field:ident : $field_ty:ty),*) => {
        $crate::__tracked_struct_def!(
            [$($struct_meta)*] $vis $name [];
            $($(#[$($field_meta)*])* $field : $field_ty,)*
        );

        impl $name {
            /// Creates an untracked entity. Call `track()` to start recording.
            #[allow(clippy::too_many_arguments)]
            pub fn new($($field: $field_ty),*) -> Self {
                Self {
                    $( $field, )*
                    __tracker: $crate::tracking::TrackerSlot::new(),
                }
            }

            $crate::paste::paste! {
                $(
                    /// Typed accessor for this property.
                    pub const [<$field:upper>]: $crate::tracking::Property<$name, $field_ty> =
                        $crate::tracking::Property::new(stringify!($field));

                    pub fn $field(&self) -> &$field_ty {
                        &self.$field
                    }

                    /// Generated tracked setter for this field.
                    pub fn [<set_ $field>](&mut self, value: $field_ty) {
                        $crate::tracking::set_tracked(
                            &mut self.__tracker,
                            &mut self.$field,
                            value,
                            stringify!($field),
                        );
                    }
                )*
            }

            $( $crate::__track_deep_field_mut!($field, $field_ty; $(#[$($field_meta)*])*); )*

            fn __register_deep_accessors() {
                $crate::tracking::DeepRegistry::register_once::<$name, _>(|| {
                    #[allow(unused_mut)]
                    let mut accessors: Vec<$crate::tracking::DeepAccessor<$name>> = Vec::new();
                    $( $crate::__track_deep_accessor!(accessors, $name, $field; $(#[$($field_meta)*])*); )*
                    accessors
                });
            }
        }

        impl $crate::tracking::Trackable for $name {
            fn tracker_slot(&self) -> &$crate::tracking::TrackerSlot {
                &self.__tracker
            }

            fn tracker_slot_mut(&mut self) -> &mut $crate::tracking::TrackerSlot {
                &mut self.__tracker
            }

            #[allow(unused_variables)]
            fn bind_properties(bindings: &mut $crate::tracking::PropertyBindings<Self>) {
                $crate::paste::paste! {
                    $( bindings.bind(stringify!($field), $name::[<set_ $field>]); )*
                }
            }
        }

        impl $crate::tracking::DirtyCheck for $name {
            fn is_dirty(&self, deep: bool) -> bool {
                if deep {
                    Self::__register_deep_accessors();
                }
                $crate::tracking::entity_is_dirty(self, deep)
            }
        }

        impl Clone for $name {
            fn clone(&self) -> Self {
                Self {
                    $( $field: self.$field.clone(), )*
                    __tracker: $crate::tracking::TrackerSlot::new(),
                }
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                true $( && self.$field == other.$field )*
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.debug_struct(stringify!($name))
                    $( .field(stringify!($field), &self.$field) )*
                    .finish()
            }
        }
    };
}
