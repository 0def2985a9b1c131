pub mod error;
pub mod value;

pub use error::{Result, TrackError};
pub use value::{ByIdentity, OriginalValue, TrackedValue};
