//! Ownership guard.
//!
//! A failed [`check`] is reported to clients exactly like a missing row, so
//! callers must not branch on it to produce a different response.

use crate::domain::User;

/// A stored row that may belong to a user.
pub trait Owned {
    /// Owning user, or `None` when the owner column is empty.
    fn owner_id(&self) -> Option<i64>;

    /// Whether the row type has an owner column at all.
    fn has_owner_column(&self) -> bool {
        true
    }
}

/// A draft whose owner can be assigned before insertion.
pub trait Stampable {
    fn set_owner(&mut self, user_id: i64);
}

/// Whether `user` may mutate `entity`.
///
/// Rows without an owner column are open to any authenticated user. A row
/// whose owner column is empty belongs to nobody and is never mutable.
pub fn check<E: Owned + ?Sized>(user: &User, entity: &E) -> bool {
    !entity.has_owner_column() || entity.owner_id() == Some(user.id)
}

/// Assign `user` as the owner of `draft`, overriding whatever the caller sent.
pub fn stamp<D: Stampable>(user: &User, mut draft: D) -> D {
    draft.set_owner(user.id);
    draft
}
