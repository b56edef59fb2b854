pub mod hash_set;
pub mod hll;

/// Distinct-count estimation over byte-like items.
pub trait Cardinality {
    fn estimate(&self) -> f64;
    fn insert<T: AsRef<[u8]> + ?Sized>(&mut self, item: &T);
}

/// Linear counting estimate for `m` buckets of which `zeros` are still empty.
pub(crate) fn linear_count(m: f64, zeros: usize) -> f64 {
    m * (m / zeros as f64).ln()
}
