//! Approximate membership and distinct counting over byte-like items.
//!
//! [`BloomFilter`] answers "was this item seen?" with no false negatives and a
//! tunable false positive rate. [`HyperLogLog`] estimates how many distinct
//! items were seen in a fixed number of small registers.
//!
//! ```
//! use probably::{BloomFilter, Cardinality, HyperLogLog, SetMembership};
//!
//! let mut filter = BloomFilter::new(1000, 3)?;
//! filter.insert("admin123");
//! assert!(filter.contains("admin123"));
//!
//! let mut hll = HyperLogLog::new(10)?;
//! assert_eq!(hll.estimate(), 0.);
//! hll.insert("10.0.0.1");
//! # Ok::<(), probably::ConfigurationError>(())
//! ```

pub mod cardinality;
pub mod concurrent;
pub mod error;
pub mod hash;
pub mod ips;
pub mod passwords;
pub mod set_membership;

pub use cardinality::hll::HyperLogLog;
pub use cardinality::Cardinality;
pub use concurrent::{AtomicBloomFilter, AtomicHyperLogLog};
pub use error::{ConfigurationError, InvalidInputError};
pub use hash::{Murmur3, SeededHash};
pub use set_membership::bloom::BloomFilter;
pub use set_membership::SetMembership;
