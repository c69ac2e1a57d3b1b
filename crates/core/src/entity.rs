//! Entity trait: identity + continuity across refetches.

/// A record the backend identifies by a stable id.
///
/// Cached snapshots are replaced wholesale on every fetch, so identity is the
/// only thing that links a record before and after a refresh.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

/// Index of the record with `id` in `items`.
pub fn position<E: Entity>(items: &[E], id: &E::Id) -> Option<usize> {
    items.iter().position(|item| item.id() == id)
}

/// Mutable access to the record with `id` in `items`.
pub fn find_mut<'a, E: Entity>(items: &'a mut [E], id: &E::Id) -> Option<&'a mut E> {
    items.iter_mut().find(|item| item.id() == id)
}
