#[macro_export]
#[doc(hidden)]
macro_rules! __track_deep_accessor {
    ($accessors:ident, $owner:ident, $field:ident;) => {};
    ($accessors:ident, $owner:ident, $field:ident; #[track(deep)] $($rest:tt)*) => {
        $accessors.push({
            fn accessor(entity: &$owner) -> Option<&dyn $crate::tracking::DirtyCheck> {
                let nested: &dyn $crate::tracking::DirtyCheck = &entity.$field;
                Some(nested)
            }
            accessor as $crate::tracking::DeepAccessor<$owner>
        });
    };
    ($accessors:ident, $owner:ident, $field:ident; #[$($_other:tt)*] $($rest:tt)*) => {
        $crate::__track_deep_accessor!($accessors, $owner, $field; $($rest)*);
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! __track_deep_field_mut {
    ($field:ident, $field_ty:ty;) => {};
    ($field:ident, $field_ty:ty; #[track(deep)] $($rest:tt)*) => {
        $crate::paste::paste! {
            /// Mutable access to a deep-tracked field. Changes made inside are
            /// recorded by the nested value's own trackers.
            pub fn [<$field _mut>](&mut self) -> &mut $field_ty {
                &mut self.$field
            }
        }
    };
    ($field:ident, $field_ty:ty; #[$($_other:tt)*] $($rest:tt)*) => {
        $crate::__track_deep_field_mut!($field, $field_ty; $($rest)*);
    };
}

/// Emits the entity struct itself. `#[track(..)]` markers are consumed here;
/// every other field attribute, doc comments included, is kept.
#[macro_export]
#[doc(hidden)]
macro_rules! __tracked_struct_def {
    ([$($struct_meta:tt)*] $vis:vis $name:ident [$($done:tt)*];) => {
        $($struct_meta)*
        $vis struct $name {
            $($done)*
            __tracker: $crate::tracking::TrackerSlot,
        }
    };
    ([$($struct_meta:tt)*] $vis:vis $name:ident [$($done:tt)*]; $(#[$($field_meta:tt)*])* $field:ident : $field_ty:ty, $($rest:tt)*) => {
        $crate::__tracked_struct_def!(
            @attrs [$($struct_meta)*] $vis $name [$($done)*] [] [$(#[$($field_meta)*])*] $field : $field_ty; $($rest)*
        );
    };
    (@attrs [$($struct_meta:tt)*] $vis:vis $name:ident [$($done:tt)*] [$($kept:tt)*] [] $field:ident : $field_ty:ty; $($rest:tt)*) => {
        $crate::__tracked_struct_def!(
            [$($struct_meta)*] $vis $name [$($done)* $($kept)* $field: $field_ty,]; $($rest)*
        );
    };
    (@attrs [$($struct_meta:tt)*] $vis:vis $name:ident [$($done:tt)*] [$($kept:tt)*] [#[track $($_args:tt)*] $($attrs:tt)*] $field:ident : $field_ty:ty; $($rest:tt)*) => {
        $crate::__tracked_struct_def!(
            @attrs [$($struct_meta)*] $vis $name [$($done)*] [$($kept)*] [$($attrs)*] $field : $field_ty; $($rest)*
        );
    };
    (@attrs [$($struct_meta:tt)*] $vis:vis $name:ident [$($done:tt)*] [$($kept:tt)*] [#[$($meta:tt)*] $($attrs:tt)*] $field:ident : $field_ty:ty; $($rest:tt)*) => {
        $crate::__tracked_struct_def!(
            @attrs [$($struct_meta)*] $vis $name [$($done)*] [$($kept)* #[$($meta)*]] [$($attrs)*] $field : $field_ty; $($rest)*
        );
    };
}
