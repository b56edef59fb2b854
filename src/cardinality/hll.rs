use crate::cardinality::{linear_count, Cardinality};
use crate::error::ConfigurationError;
use crate::hash::{Murmur3, SeededHash};
use std::fmt::{Debug, Formatter};

pub const MIN_PRECISION: u8 = 4;
pub const MAX_PRECISION: u8 = 16;

/// HyperLogLog over a 32-bit hash.
///
/// The low `precision` bits of the hash select a register; the remaining
/// `32 - precision` bits determine the rank. Only the small-range (linear
/// counting) correction is applied, so estimates close to 2^32 distinct items
/// are not reliable.
pub struct HyperLogLog<H = Murmur3> {
    registers: Registers,
    precision: u8,
    hasher: H,
}

impl HyperLogLog {
    pub fn new(precision: u8) -> Result<Self, ConfigurationError> {
        Self::with_hasher(precision, Murmur3)
    }

    /// Picks the smallest precision whose standard error is at most `epsilon`.
    pub fn with_error(epsilon: f64) -> Result<Self, ConfigurationError> {
        Self::new(precision_for_error(epsilon)?)
    }
}

impl<H> HyperLogLog<H> {
    pub fn with_hasher(precision: u8, hasher: H) -> Result<Self, ConfigurationError> {
        check_precision(precision)?;
        tracing::debug!(precision, registers = 1usize << precision, "created hyperloglog");
        Ok(Self {
            registers: Registers::new(1 << precision),
            precision,
            hasher,
        })
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }

    pub fn num_registers(&self) -> usize {
        self.registers.count()
    }

    pub fn registers(&self) -> &[u8] {
        self.registers.as_slice()
    }

    pub fn standard_error(&self) -> f64 {
        standard_error(self.registers.count())
    }
}

impl<H: SeededHash> Cardinality for HyperLogLog<H> {
    fn estimate(&self) -> f64 {
        estimate(self.registers.iter(), self.registers.count())
    }

    fn insert<T: AsRef<[u8]> + ?Sized>(&mut self, item: &T) {
        let hash = self.hasher.hash(0, item.as_ref());
        let (index, rank) = bucket_and_rank(hash, self.precision);
        self.registers.update_max(index, rank);
    }
}

impl<H> Debug for HyperLogLog<H> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "HyperLogLog {{ precision: {} }}", self.precision)
    }
}

pub(crate) fn check_precision(precision: u8) -> Result<(), ConfigurationError> {
    if (MIN_PRECISION..=MAX_PRECISION).contains(&precision) {
        Ok(())
    } else {
        Err(ConfigurationError::PrecisionOutOfRange {
            precision,
            min: MIN_PRECISION,
            max: MAX_PRECISION,
        })
    }
}

pub(crate) fn precision_for_error(epsilon: f64) -> Result<u8, ConfigurationError> {
    if !(0. < epsilon && epsilon < 1.) {
        return Err(ConfigurationError::InvalidError(epsilon));
    }
    let m = (1.04 / epsilon).powi(2);
    let precision = m.log2().ceil().max(f64::from(MIN_PRECISION));
    // Saturating cast; anything above the bound is rejected below.
    let precision = precision.min(f64::from(u8::MAX)) as u8;
    check_precision(precision)?;
    Ok(precision)
}

pub(crate) fn standard_error(m: usize) -> f64 {
    1.04 / (m as f64).sqrt()
}

pub(crate) fn alpha(m: usize) -> f64 {
    match m {
        16 => 0.673,
        32 => 0.697,
        64 => 0.709,
        _ => 0.7213 / (1. + 1.079 / m as f64),
    }
}

/// Splits a hash into its register index and the rank of the remainder.
///
/// The rank is the number of leading zeros within the `32 - precision` bit
/// remainder plus one, capped at the remainder width.
pub(crate) fn bucket_and_rank(hash: u32, precision: u8) -> (usize, u8) {
    let p = u32::from(precision);
    let index = (hash & ((1 << p) - 1)) as usize;
    let remainder = hash >> p;
    let width = u32::BITS - p;
    let zeros = remainder.leading_zeros() - p;
    (index, (zeros + 1).min(width) as u8)
}

pub(crate) fn estimate(registers: impl Iterator<Item = u8>, m: usize) -> f64 {
    let (zeros, z) = registers.fold((0, 0.), |(v, z), register| {
        (
            v + usize::from(register == 0),
            z + 2f64.powi(-i32::from(register)),
        )
    });
    let m_f = m as f64;
    let raw = alpha(m) * m_f * m_f / z;

    if raw <= 2.5 * m_f && zeros > 0 {
        linear_count(m_f, zeros)
    } else {
        raw
    }
}

struct Registers {
    buf: Box<[u8]>,
}

impl Registers {
    fn new(count: usize) -> Self {
        Self {
            buf: vec![0; count].into_boxed_slice(),
        }
    }

    fn count(&self) -> usize {
        self.buf.len()
    }

    fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.buf.iter().copied()
    }

    fn update_max(&mut self, index: usize, value: u8) {
        let current = &mut self.buf[index];
        if value > *current {
            *current = value;
        }
    }
}
