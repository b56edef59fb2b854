pub mod bloom;
pub mod hash_set;

/// Approximate (or exact) set membership over byte-like items.
pub trait SetMembership {
    /// Returns `false` only if `item` was never inserted.
    fn contains<T: AsRef<[u8]> + ?Sized>(&self, item: &T) -> bool;

    /// Inserts `item`, returning `true` if it was certainly not present before.
    fn insert<T: AsRef<[u8]> + ?Sized>(&mut self, item: &T) -> bool;
}
