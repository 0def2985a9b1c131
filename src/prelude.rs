//! Everything an application needs to declare and query tracked entities.

pub use crate::collections::{TrackableList, TrackableMap};
pub use crate::config::TrackingConfig;
pub use crate::core::{ByIdentity, TrackError};
pub use crate::tracked_struct;
pub use crate::tracking::{ChangeTracking, DirtyCheck, Property, Trackable};
