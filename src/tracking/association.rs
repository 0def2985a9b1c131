//! Entity-to-tracker association.
//!
//! Every trackable entity carries a [`TrackerSlot`] as an ordinary field. The
//! slot starts empty and holds at most one [`ChangeTracker`] for the rest of
//! the entity's life. Because the tracker is owned by the entity it belongs
//! to, it is dropped in the same moment as the entity: nothing outside keeps
//! the entity alive, and nothing is left behind once it is gone.

use super::ChangeTracker;
use log::debug;
use std::fmt;
use std::sync::OnceLock;

pub struct TrackerSlot {
    cell: OnceLock<ChangeTracker>,
}

impl TrackerSlot {
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    /// Returns the tracker if one was ever created. Never creates.
    pub fn get(&self) -> Option<&ChangeTracker> {
        self.cell.get()
    }

    pub fn get_mut(&mut self) -> Option<&mut ChangeTracker> {
        self.cell.get_mut()
    }

    /// Returns the tracker, creating a disabled one on first use.
    pub fn get_or_create(&self) -> &ChangeTracker {
        self.get_or_create_with(false)
    }

    /// Returns the tracker, creating one with the given enabled flag on first use.
    ///
    /// Threads racing on the first call all observe the same tracker; the
    /// flag of the losing callers is not applied.
    pub fn get_or_create_with(&self, enabled: bool) -> &ChangeTracker {
        self.cell.get_or_init(|| {
            debug!("created change tracker (enabled: {})", enabled);
            ChangeTracker::with_enabled(enabled)
        })
    }

    pub fn is_attached(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl Default for TrackerSlot {
    fn default() -> Self {
        Self::new()
    }
}

/// A clone is a different entity and starts untracked.
impl Clone for TrackerSlot {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl fmt::Debug for TrackerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cell.get() {
            Some(tracker) => f.debug_tuple("TrackerSlot").field(tracker).finish(),
            None => f.write_str("TrackerSlot(<untracked>)"),
        }
    }
}
