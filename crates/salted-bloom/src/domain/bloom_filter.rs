//! Core Bloom filter implementation
//!
//! INVARIANTS:
//! - No false negatives: after `add(k)`, `contains(k)` is true until `clear`
//! - `flipped_bits <= capacity`, and a set bit is only unset by `clear`
//! - `capacity` and `num_hashes` never change after construction

use bitvec::prelude::*;
use tracing::{debug, trace, warn};

use super::config::{BloomConfig, DEFAULT_REBUILD_THRESHOLD};
use super::hash_functions::{bit_index, compute_hash_positions, salted_hash};
use super::parameters::{
    calculate_optimal_parameters, fill_false_positive_rate, fill_ratio, BloomFilterParams,
};
use crate::error::FilterError;
use crate::stats::FilterStats;

/// Bloom filter for probabilistic membership testing
///
/// Keys are strings. Each key is hashed with `num_hashes` salted MD5 rounds;
/// every round selects one bit of the store. False positives are possible,
/// false negatives are not.
#[derive(Clone, Debug)]
pub struct BloomFilter {
    /// Bit array storing the filter state
    bits: BitVec<u8, Lsb0>,
    /// Size in bits (m)
    capacity: usize,
    /// Number of hash rounds (k)
    num_hashes: usize,
    /// Number of `add` calls, duplicates included
    size: usize,
    /// Bits flipped from unset to set
    flipped_bits: usize,
    /// Fill ratio at which the filter should be rebuilt
    rebuild_threshold: f64,
    /// Whether the current fill cycle already logged crossing the threshold
    rebuild_warned: bool,
}

impl BloomFilter {
    /// Create a filter with explicit parameters
    ///
    /// # Arguments
    /// * `capacity` - Size in bits, must be positive
    /// * `num_hashes` - Number of hash rounds, must be positive
    pub fn new(capacity: usize, num_hashes: usize) -> Result<Self, FilterError> {
        let params = BloomFilterParams::explicit(capacity, num_hashes)?;
        Ok(Self::with_params(params, DEFAULT_REBUILD_THRESHOLD))
    }

    /// Create a filter sized for `expected_items` keys at `false_positive_rate`
    ///
    /// ```
    /// use salted_bloom::BloomFilter;
    ///
    /// let filter = BloomFilter::new_with_fpr(10_000, 0.01).unwrap();
    /// assert_eq!(filter.capacity(), 95_850);
    /// assert_eq!(filter.num_hashes(), 6);
    /// ```
    pub fn new_with_fpr(expected_items: usize, false_positive_rate: f64) -> Result<Self, FilterError> {
        let params = calculate_optimal_parameters(expected_items, false_positive_rate)?;
        Ok(Self::with_params(params, DEFAULT_REBUILD_THRESHOLD))
    }

    /// Create a filter from a configuration, validating it first
    pub fn from_config(config: &BloomConfig) -> Result<Self, FilterError> {
        config.validate()?;
        let params = config.resolve()?;
        Ok(Self::with_params(params, config.rebuild_threshold))
    }

    fn with_params(params: BloomFilterParams, rebuild_threshold: f64) -> Self {
        debug!(
            capacity = params.capacity,
            num_hashes = params.num_hashes,
            "Created bloom filter"
        );
        Self {
            bits: bitvec![u8, Lsb0; 0; params.capacity],
            capacity: params.capacity,
            num_hashes: params.num_hashes,
            size: 0,
            flipped_bits: 0,
            rebuild_threshold,
            rebuild_warned: false,
        }
    }

    /// Assemble a filter from an existing bit store and counters
    pub(crate) fn from_parts(
        bits: BitVec<u8, Lsb0>,
        num_hashes: usize,
        size: usize,
        flipped_bits: usize,
        rebuild_threshold: f64,
    ) -> Self {
        let capacity = bits.len();
        let mut filter = Self {
            bits,
            capacity,
            num_hashes,
            size,
            flipped_bits,
            rebuild_threshold,
            rebuild_warned: false,
        };
        filter.rebuild_warned = filter.needs_rebuild();
        filter
    }

    /// Raw hash of every round for `key`, before reduction by capacity
    pub fn hash_positions(&self, key: &str) -> Vec<u32> {
        compute_hash_positions(key, self.num_hashes)
    }

    /// Add a key to the filter
    ///
    /// Always increments `size`. Each bit this call flips from unset to set
    /// increments `flipped_bits` once.
    pub fn add(&mut self, key: &str) {
        self.size += 1;
        for hash in compute_hash_positions(key, self.num_hashes) {
            let was_set = self.bits.replace(bit_index(hash, self.capacity), true);
            if !was_set {
                self.flipped_bits += 1;
            }
        }

        if !self.rebuild_warned && self.needs_rebuild() {
            self.rebuild_warned = true;
            warn!(
                capacity = self.capacity,
                flipped_bits = self.flipped_bits,
                threshold = self.rebuild_threshold,
                "Bloom filter fill passed rebuild threshold"
            );
        }
    }

    /// Test whether a key might have been added
    ///
    /// Returns:
    /// - `true` if the key might be in the set (could be a false positive)
    /// - `false` if the key was definitely never added since the last `clear`
    pub fn contains(&self, key: &str) -> bool {
        (0..self.num_hashes).all(|round| {
            let hash = salted_hash(key.as_bytes(), round);
            self.bits[bit_index(hash, self.capacity)]
        })
    }

    /// Add every key, in iteration order
    pub fn add_all<I>(&mut self, keys: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for key in keys {
            self.add(key.as_ref());
        }
    }

    /// True if every key might have been added; true for an empty input
    pub fn contains_all<I>(&self, keys: I) -> bool
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        keys.into_iter().all(|key| self.contains(key.as_ref()))
    }

    /// Reset every bit and both counters
    pub fn clear(&mut self) {
        trace!(
            size = self.size,
            flipped_bits = self.flipped_bits,
            "Clearing bloom filter"
        );
        self.bits.fill(false);
        self.size = 0;
        self.flipped_bits = 0;
        self.rebuild_warned = false;
    }

    /// Get the filter size in bits
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get the number of hash rounds
    pub fn num_hashes(&self) -> usize {
        self.num_hashes
    }

    /// Get the number of `add` calls, duplicates included
    pub fn size(&self) -> usize {
        self.size
    }

    /// True if no key was added since construction or the last `clear`
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Get the number of bits flipped from unset to set
    ///
    /// Tracks how full the filter is; compare it with `capacity` to decide
    /// when to rebuild with a larger one.
    pub fn flipped_bits(&self) -> usize {
        self.flipped_bits
    }

    /// Get the fill ratio at which `needs_rebuild` turns true
    pub fn rebuild_threshold(&self) -> f64 {
        self.rebuild_threshold
    }

    /// Fraction of bits set
    pub fn fill_ratio(&self) -> f64 {
        fill_ratio(self.capacity, self.flipped_bits)
    }

    /// False positive rate implied by the current fill
    pub fn estimated_false_positive_rate(&self) -> f64 {
        fill_false_positive_rate(self.capacity, self.num_hashes, self.flipped_bits)
    }

    /// Whether the fill ratio has reached the rebuild threshold
    pub fn needs_rebuild(&self) -> bool {
        self.fill_ratio() >= self.rebuild_threshold
    }

    /// Snapshot of counters and fill level
    pub fn stats(&self) -> FilterStats {
        FilterStats::new(
            self.capacity,
            self.num_hashes,
            self.size,
            self.flipped_bits,
            self.bits.as_raw_slice().len(),
        )
    }

    /// Number of bits currently set, counted from the store
    pub fn count_ones(&self) -> usize {
        self.bits.count_ones()
    }
}
