//! Macro definitions for tracked entities.
//!
//! `tracked_struct!` turns a plain struct declaration into a [`Trackable`](crate::tracking::Trackable)
//! entity. Field attribute helpers live in their own file.

#[path = "macros/attr_helpers.rs"]
mod attr_helpers;
#[path = "macros/tracked_struct.rs"]
mod tracked_struct;
