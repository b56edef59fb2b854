//! Lock-free variants of the sketches for inserting from several threads.
//!
//! Both structures only ever move their cells upwards (bits are OR-ed in,
//! registers are max-ed in), so concurrent inserts commute and the final state
//! equals that of the single-threaded type fed the same items.

use crate::cardinality::hll::{bucket_and_rank, check_precision, estimate, standard_error};
use crate::cardinality::Cardinality;
use crate::error::ConfigurationError;
use crate::hash::{iter_hashes, Murmur3, SeededHash};
use crate::set_membership::bloom::{estimated_len, false_positive_rate};
use crate::set_membership::SetMembership;
use std::fmt::{Debug, Formatter};
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};

const WORD_BITS: usize = u64::BITS as usize;

/// Bloom filter whose bit vector is a slice of atomic words.
pub struct AtomicBloomFilter<H = Murmur3> {
    words: Box<[AtomicU64]>,
    size: usize,
    num_hashes: usize,
    hasher: H,
}

impl AtomicBloomFilter {
    pub fn new(size: usize, num_hashes: usize) -> Result<Self, ConfigurationError> {
        Self::with_hasher(size, num_hashes, Murmur3)
    }
}

impl<H> AtomicBloomFilter<H> {
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
        tracing::debug!(size, num_hashes, "created atomic bloom filter");
        Ok(Self {
            words: (0..size.div_ceil(WORD_BITS)).map(|_| AtomicU64::new(0)).collect(),
            size,
            num_hashes,
            hasher,
        })
    }

    pub fn bits(&self) -> usize {
        self.size
    }

    pub fn num_hashes(&self) -> usize {
        self.num_hashes
    }

    pub fn count_ones(&self) -> usize {
        self.words
            .iter()
            .map(|word| word.load(Ordering::Relaxed).count_ones() as usize)
            .sum()
    }

    pub fn estimated_len(&self) -> usize {
        estimated_len(self.size, self.num_hashes, self.count_ones())
    }

    pub fn false_positive_rate(&self, num_items: usize) -> f64 {
        false_positive_rate(self.size, self.num_hashes, num_items)
    }

    fn word_and_mask(&self, hash: u32) -> (&AtomicU64, u64) {
        let bit = hash as usize % self.size;
        (&self.words[bit / WORD_BITS], 1 << (bit % WORD_BITS))
    }
}

impl<H: SeededHash> AtomicBloomFilter<H> {
    pub fn contains<T: AsRef<[u8]> + ?Sized>(&self, item: &T) -> bool {
        iter_hashes(item.as_ref(), &self.hasher)
            .take(self.num_hashes)
            .all(|h| {
                let (word, mask) = self.word_and_mask(h);
                word.load(Ordering::Relaxed) & mask != 0
            })
    }

    /// Inserts `item`, returning `true` if this call set at least one bit.
    pub fn insert<T: AsRef<[u8]> + ?Sized>(&self, item: &T) -> bool {
        iter_hashes(item.as_ref(), &self.hasher)
            .take(self.num_hashes)
            .fold(false, |changed, h| {
                let (word, mask) = self.word_and_mask(h);
                let previous = word.fetch_or(mask, Ordering::Relaxed);
                changed | (previous & mask == 0)
            })
    }
}

impl<H: SeededHash> SetMembership for AtomicBloomFilter<H> {
    fn contains<T: AsRef<[u8]> + ?Sized>(&self, item: &T) -> bool {
        AtomicBloomFilter::contains(self, item)
    }

    fn insert<T: AsRef<[u8]> + ?Sized>(&mut self, item: &T) -> bool {
        AtomicBloomFilter::insert(self, item)
    }
}

impl<H> Debug for AtomicBloomFilter<H> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "AtomicBloomFilter {{ size: {}, num_hashes: {} }}",
            self.size, self.num_hashes
        )
    }
}

/// HyperLogLog with one atomic byte per register.
pub struct AtomicHyperLogLog<H = Murmur3> {
    registers: Box<[AtomicU8]>,
    precision: u8,
    hasher: H,
}

impl AtomicHyperLogLog {
    pub fn new(precision: u8) -> Result<Self, ConfigurationError> {
        Self::with_hasher(precision, Murmur3)
    }
}

impl<H> AtomicHyperLogLog<H> {
    pub fn with_hasher(precision: u8, hasher: H) -> Result<Self, ConfigurationError> {
        check_precision(precision)?;
        tracing::debug!(precision, "created atomic hyperloglog");
        Ok(Self {
            registers: (0..1usize << precision).map(|_| AtomicU8::new(0)).collect(),
            precision,
            hasher,
        })
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }

    pub fn num_registers(&self) -> usize {
        self.registers.len()
    }

    pub fn standard_error(&self) -> f64 {
        standard_error(self.registers.len())
    }

    /// Copies out the current register values.
    pub fn registers(&self) -> Vec<u8> {
        self.register_values().collect()
    }

    pub fn estimate(&self) -> f64 {
        estimate(self.register_values(), self.registers.len())
    }

    fn register_values(&self) -> impl Iterator<Item = u8> + '_ {
        self.registers.iter().map(|r| r.load(Ordering::Relaxed))
    }
}

impl<H: SeededHash> AtomicHyperLogLog<H> {
    pub fn insert<T: AsRef<[u8]> + ?Sized>(&self, item: &T) {
        let hash = self.hasher.hash(0, item.as_ref());
        let (index, rank) = bucket_and_rank(hash, self.precision);
        self.registers[index].fetch_max(rank, Ordering::Relaxed);
    }
}

impl<H: SeededHash> Cardinality for AtomicHyperLogLog<H> {
    fn estimate(&self) -> f64 {
        AtomicHyperLogLog::estimate(self)
    }

    fn insert<T: AsRef<[u8]> + ?Sized>(&mut self, item: &T) {
        AtomicHyperLogLog::insert(self, item)
    }
}

impl<H> Debug for AtomicHyperLogLog<H> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "AtomicHyperLogLog {{ precision: {} }}", self.precision)
    }
}
