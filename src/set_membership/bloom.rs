use crate::error::ConfigurationError;
use crate::hash::{iter_hashes, Murmur3, SeededHash};
use crate::set_membership::SetMembership;
use fixedbitset::FixedBitSet;
use std::f64::consts::LN_2;
use std::fmt::{Debug, Formatter};

/// Bloom filter over a fixed bit vector with `num_hashes` seeded hash functions.
///
/// Bits only ever go from 0 to 1, so an inserted item is always reported as
/// present. Items that were never inserted may still be reported as present;
/// see [`BloomFilter::false_positive_rate`].
#[derive(Clone)]
pub struct BloomFilter<H = Murmur3> {
    bits: FixedBitSet,
    num_hashes: usize,
    hasher: H,
}

impl BloomFilter {
    pub fn new(size: usize, num_hashes: usize) -> Result<Self, ConfigurationError> {
        Self::with_hasher(size, num_hashes, Murmur3)
    }

    /// Sizes the filter for `num_items` insertions at the given false positive
    /// probability.
    pub fn with_probability(
        num_items: usize,
        probability: f64,
    ) -> Result<Self, ConfigurationError> {
        let (size, num_hashes) = optimal_parameters(num_items, probability)?;
        Self::new(size, num_hashes)
    }
}

impl<H> BloomFilter<H> {
    pub fn with_hasher(
        size: usize,
        num_hashes: usize,
        hasher: H,
    ) -> Result<Self, ConfigurationError> {
        if size == 0 {
            return Err(ConfigurationError::InvalidSize);
        }
        if num_hashes == 0 {
            return Err(ConfigurationError::InvalidNumHashes);
        }
        tracing::debug!(size, num_hashes, "created bloom filter");
        Ok(Self {
            bits: FixedBitSet::with_capacity(size),
            num_hashes,
            hasher,
        })
    }

    pub fn bits(&self) -> usize {
        self.bits.len()
    }

    pub fn num_hashes(&self) -> usize {
        self.num_hashes
    }

    pub fn count_ones(&self) -> usize {
        self.bits.count_ones(..)
    }

    /// Estimates the number of distinct items inserted from the fill ratio.
    pub fn estimated_len(&self) -> usize {
        estimated_len(self.bits.len(), self.num_hashes, self.count_ones())
    }

    /// Expected false positive probability after `num_items` distinct insertions.
    pub fn false_positive_rate(&self, num_items: usize) -> f64 {
        false_positive_rate(self.bits.len(), self.num_hashes, num_items)
    }
}

impl<H: SeededHash> SetMembership for BloomFilter<H> {
    fn contains<T: AsRef<[u8]> + ?Sized>(&self, item: &T) -> bool {
        let m = self.bits.len();
        iter_hashes(item.as_ref(), &self.hasher)
            .take(self.num_hashes)
            .all(|h| self.bits.contains(h as usize % m))
    }

    fn insert<T: AsRef<[u8]> + ?Sized>(&mut self, item: &T) -> bool {
        let m = self.bits.len();
        !iter_hashes(item.as_ref(), &self.hasher)
            .take(self.num_hashes)
            .fold(true, |acc, h| acc & self.bits.put(h as usize % m))
    }
}

impl<H> Debug for BloomFilter<H> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BloomFilter {{ size: {}, num_hashes: {} }}",
            self.bits.len(),
            self.num_hashes
        )
    }
}

pub(crate) fn optimal_parameters(
    num_items: usize,
    probability: f64,
) -> Result<(usize, usize), ConfigurationError> {
    if num_items == 0 {
        return Err(ConfigurationError::InvalidNumItems);
    }
    if !(0. < probability && probability < 1.) {
        return Err(ConfigurationError::InvalidProbability(probability));
    }
    let n = num_items as f64;
    let size = (-n * probability.ln() / (LN_2 * LN_2)).ceil() as usize;
    let num_hashes = ((size as f64 / n * LN_2).round() as usize).max(1);
    Ok((size, num_hashes))
}

pub(crate) fn estimated_len(size: usize, num_hashes: usize, ones: usize) -> usize {
    let m = size as f64;
    let k = num_hashes as f64;
    (-m / k * (1. - ones as f64 / m).ln()) as usize
}

pub(crate) fn false_positive_rate(size: usize, num_hashes: usize, num_items: usize) -> f64 {
    let k = num_hashes as f64;
    (1. - (-k * num_items as f64 / size as f64).exp()).powf(k)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_invalid_parameters() {
        assert_eq!(
            BloomFilter::new(0, 3).unwrap_err(),
            ConfigurationError::InvalidSize
        );
        assert_eq!(
            BloomFilter::new(1000, 0).unwrap_err(),
            ConfigurationError::InvalidNumHashes
        );
        assert_eq!(
            BloomFilter::with_probability(0, 0.01).unwrap_err(),
            ConfigurationError::InvalidNumItems
        );
        assert!(matches!(
            BloomFilter::with_probability(100, 1.),
            Err(ConfigurationError::InvalidProbability(_))
        ));
    }

    #[test]
    fn test_with_probability() {
        let bf = BloomFilter::with_probability(1000, 0.01).unwrap();

        assert_eq!(bf.bits(), 9586);
        assert_eq!(bf.num_hashes(), 7);
    }

    #[test]
    fn test_contains_empty() {
        let bf = BloomFilter::new(1000, 3).unwrap();

        for i in 0..100 {
            assert!(!bf.contains(format!("item-{i}").as_str()));
        }
    }

    #[test]
    fn test_scenario_admin_password() {
        let mut bf = BloomFilter::new(1000, 3).unwrap();

        bf.insert("admin123");

        assert!(bf.contains("admin123"));
        assert!(!bf.contains("never-inserted"));
    }

    #[test]
    fn test_no_false_negatives() {
        let mut bf = BloomFilter::new(512, 4).unwrap();
        let items: Vec<String> = (0..400)
            .map(|i| format!("10.0.{}.{}", i / 256, i % 256))
            .collect();

        for (i, item) in items.iter().enumerate() {
            bf.insert(item.as_str());
            for earlier in &items[..=i] {
                assert!(bf.contains(earlier.as_str()));
            }
        }
    }

    #[test]
    fn test_insert_idempotent() {
        let mut bf = BloomFilter::new(1000, 3).unwrap();

        assert!(bf.insert("password123"));
        let ones = bf.count_ones();
        assert!(!bf.insert("password123"));

        assert_eq!(bf.count_ones(), ones);
        assert!(bf.contains("password123"));
    }

    #[test]
    fn test_false_positive_rate() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut bf = BloomFilter::new(10_000, 3).unwrap();
        let n = 1000;

        for _ in 0..n {
            let item: u64 = rng.gen::<u64>() | 1;
            bf.insert(&item.to_le_bytes());
        }

        let trials = 10_000;
        let false_positives = (0..trials)
            .filter(|_| {
                // Even values are never inserted.
                let item: u64 = rng.gen::<u64>() & !1;
                bf.contains(&item.to_le_bytes())
            })
            .count();
        let observed = false_positives as f64 / trials as f64;
        let expected = bf.false_positive_rate(n);

        assert!((expected - 0.0174).abs() < 0.001);
        assert!(
            (observed - expected).abs() < 0.01,
            "observed {observed}, expected {expected}"
        );
    }

    #[test]
    fn test_estimated_len() {
        let mut bf = BloomFilter::new(10_000, 3).unwrap();

        assert_eq!(bf.estimated_len(), 0);
        for i in 0..500 {
            bf.insert(format!("user-{i}").as_str());
        }

        let len = bf.estimated_len() as f64;
        assert!((len - 500.).abs() < 50., "estimated {len}");
    }

    #[test]
    fn test_debug() {
        let bf = BloomFilter::new(1000, 3).unwrap();

        assert_eq!(format!("{bf:?}"), "BloomFilter { size: 1000, num_hashes: 3 }");
    }
}
