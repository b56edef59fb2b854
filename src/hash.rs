/// A family of hash functions indexed by a small integer seed.
///
/// Different seeds must behave as statistically independent functions over the
/// same input, so a single implementation can stand in for the `k` hash
/// functions of a Bloom filter.
pub trait SeededHash {
    fn hash(&self, seed: u32, item: &[u8]) -> u32;
}

/// MurmurHash3, x86 32-bit variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Murmur3;

impl SeededHash for Murmur3 {
    fn hash(&self, seed: u32, item: &[u8]) -> u32 {
        let mut reader = item;
        murmur3::murmur3_32(&mut reader, seed).unwrap_or_default()
    }
}

pub(crate) fn iter_hashes<'a, H>(item: &'a [u8], hasher: &'a H) -> impl Iterator<Item = u32> + 'a
where
    H: SeededHash + ?Sized,
{
    (0..u32::MAX).map(move |seed| hasher.hash(seed, item))
}
