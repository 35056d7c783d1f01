//! Entity trait: identity + continuity across state changes.

use chrono::{DateTime, Utc};

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

/// Tombstone-based deletion.
///
/// Soft-deleted records stay in storage but are invisible to every query that
/// returns current state. Stores filter with [`SoftDelete::is_active`] and
/// nothing else.
pub trait SoftDelete {
    /// Deletion timestamp, `None` while the record is live.
    fn deleted_at(&self) -> Option<DateTime<Utc>>;

    /// Set the tombstone. Deleting twice keeps the first timestamp.
    fn mark_deleted(&mut self, at: DateTime<Utc>);

    fn is_active(&self) -> bool {
        self.deleted_at().is_none()
    }
}
