// ============================================================================
// memotrack Library
// ============================================================================

//! Runtime change tracking for in-memory object graphs.
//!
//! Ask any tracked entity whether a property changed since its baseline, read
//! the original value, roll changes back, or accept them as the new baseline.
//! Nested entities and [`TrackableList`] / [`TrackableMap`] collections take
//! part in deep dirty checks through the [`DeepRegistry`].
//!
//! # Examples
//!
//! ```
//! use memotrack::prelude::*;
//!
//! tracked_struct! {
//!     pub struct Order {
//!         id: String,
//!     }
//! }
//!
//! let mut order = Order::new("A".to_string());
//! order.track();
//!
//! order.set_id("B".to_string());
//! assert!(order.has_changed_property(Order::ID));
//! assert_eq!(order.original_value_of(Order::ID), Some(&"A".to_string()));
//!
//! order.set_id("A".to_string());
//! assert!(!order.has_changed("id"));
//!
//! order.set_id("C".to_string());
//! order.accept_changes();
//! order.set_id("D".to_string());
//! assert_eq!(order.original_value_of(Order::ID), Some(&"C".to_string()));
//!
//! order.rollback_changes();
//! assert_eq!(order.id(), "C");
//! assert!(!order.is_dirty(false));
//! ```

pub mod collections;
pub mod config;
pub mod core;
pub mod prelude;
pub mod tracking;
mod macros;

#[doc(hidden)]
pub use paste;

// Re-export main types for convenience
pub use crate::collections::{ElementMut, TrackableList, TrackableMap};
pub use crate::config::TrackingConfig;
pub use crate::core::{ByIdentity, OriginalValue, Result, TrackError, TrackedValue};
pub use crate::tracking::{
    ChangeTracker, ChangeTracking, DeepAccessor, DeepRegistry, DirtyCheck, OriginalValues,
    Property, PropertyBindings, Trackable, TrackerSlot,
};
