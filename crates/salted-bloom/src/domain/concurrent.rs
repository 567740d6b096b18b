//! Lock-free Bloom filter for concurrent writers
//!
//! Same sizing, hashing and counters as [`BloomFilter`], with the bit store
//! held in `AtomicU64` words so `add` and `contains` work through `&self`.
//!
//! ## Concurrency contract
//!
//! - `add` sets each bit with `fetch_or` and reads the previous word from the
//!   same instruction, so when two threads race on one unset bit exactly one
//!   of them observes the transition and bumps `flipped_bits`.
//! - `size` is an independent counter.
//! - `contains` only loads; it never blocks.
//! - `clear` takes `&mut self`. Callers sharing the filter through an `Arc`
//!   need a lock around it to reset.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use bitvec::prelude::*;
use tracing::{debug, trace, warn};

use super::bloom_filter::BloomFilter;
use super::config::{BloomConfig, DEFAULT_REBUILD_THRESHOLD};
use super::hash_functions::{bit_index, compute_hash_positions, salted_hash};
use super::parameters::{
    calculate_optimal_parameters, fill_false_positive_rate, fill_ratio, BloomFilterParams,
};
use crate::error::FilterError;
use crate::stats::FilterStats;

const WORD_BITS: usize = 64;

#[inline]
fn locate(index: usize) -> (usize, u64) {
    (index / WORD_BITS, 1u64 << (index % WORD_BITS))
}

/// Thread-safe Bloom filter
#[derive(Debug)]
pub struct ConcurrentBloomFilter {
    words: Box<[AtomicU64]>,
    capacity: usize,
    num_hashes: usize,
    size: AtomicUsize,
    flipped_bits: AtomicUsize,
    rebuild_threshold: f64,
    rebuild_warned: AtomicBool,
}

impl ConcurrentBloomFilter {
    /// Create a filter with explicit parameters
    pub fn new(capacity: usize, num_hashes: usize) -> Result<Self, FilterError> {
        let params = BloomFilterParams::explicit(capacity, num_hashes)?;
        Ok(Self::with_params(params, DEFAULT_REBUILD_THRESHOLD))
    }

    /// Create a filter sized for `expected_items` keys at `false_positive_rate`
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
            "Created concurrent bloom filter"
        );
        let words: Vec<AtomicU64> = (0..params.capacity.div_ceil(WORD_BITS))
            .map(|_| AtomicU64::new(0))
            .collect();
        Self {
            words: words.into_boxed_slice(),
            capacity: params.capacity,
            num_hashes: params.num_hashes,
            size: AtomicUsize::new(0),
            flipped_bits: AtomicUsize::new(0),
            rebuild_threshold,
            rebuild_warned: AtomicBool::new(false),
        }
    }

    /// Raw hash of every round for `key`, before reduction by capacity
    pub fn hash_positions(&self, key: &str) -> Vec<u32> {
        compute_hash_positions(key, self.num_hashes)
    }

    /// Add a key to the filter
    pub fn add(&self, key: &str) {
        self.size.fetch_add(1, Ordering::Relaxed);
        for hash in compute_hash_positions(key, self.num_hashes) {
            let (word, mask) = locate(bit_index(hash, self.capacity));
            let previous = self.words[word].fetch_or(mask, Ordering::AcqRel);
            if previous & mask == 0 {
                self.flipped_bits.fetch_add(1, Ordering::Relaxed);
            }
        }

        if self.needs_rebuild() && !self.rebuild_warned.swap(true, Ordering::Relaxed) {
            warn!(
                capacity = self.capacity,
                flipped_bits = self.flipped_bits(),
                threshold = self.rebuild_threshold,
                "Concurrent bloom filter fill passed rebuild threshold"
            );
        }
    }

    /// Test whether a key might have been added
    pub fn contains(&self, key: &str) -> bool {
        (0..self.num_hashes).all(|round| {
            let hash = salted_hash(key.as_bytes(), round);
            let (word, mask) = locate(bit_index(hash, self.capacity));
            self.words[word].load(Ordering::Acquire) & mask != 0
        })
    }

    /// Add every key, in iteration order
    pub fn add_all<I>(&self, keys: I)
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
            size = *self.size.get_mut(),
            flipped_bits = *self.flipped_bits.get_mut(),
            "Clearing concurrent bloom filter"
        );
        for word in self.words.iter_mut() {
            *word.get_mut() = 0;
        }
        *self.size.get_mut() = 0;
        *self.flipped_bits.get_mut() = 0;
        *self.rebuild_warned.get_mut() = false;
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
        self.size.load(Ordering::Relaxed)
    }

    /// True if no key was added since construction or the last `clear`
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Get the number of bits flipped from unset to set
    pub fn flipped_bits(&self) -> usize {
        self.flipped_bits.load(Ordering::Relaxed)
    }

    /// Get the fill ratio at which `needs_rebuild` turns true
    pub fn rebuild_threshold(&self) -> f64 {
        self.rebuild_threshold
    }

    /// Fraction of bits set
    pub fn fill_ratio(&self) -> f64 {
        fill_ratio(self.capacity, self.flipped_bits())
    }

    /// False positive rate implied by the current fill
    pub fn estimated_false_positive_rate(&self) -> f64 {
        fill_false_positive_rate(self.capacity, self.num_hashes, self.flipped_bits())
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
            self.size(),
            self.flipped_bits(),
            self.words.len() * std::mem::size_of::<AtomicU64>(),
        )
    }

    /// Number of bits currently set, counted from the store
    pub fn count_ones(&self) -> usize {
        self.words
            .iter()
            .map(|word| word.load(Ordering::Acquire).count_ones() as usize)
            .sum()
    }

    /// Copy the current state into a single-threaded filter
    ///
    /// Concurrent `add`s during the copy may or may not be reflected.
    pub fn snapshot(&self) -> BloomFilter {
        // Little-endian bytes of each word keep bit i at byte i / 8, bit i % 8
        let mut bytes = Vec::with_capacity(self.words.len() * 8);
        for word in self.words.iter() {
            bytes.extend_from_slice(&word.load(Ordering::Acquire).to_le_bytes());
        }
        let mut bits = BitVec::<u8, Lsb0>::from_vec(bytes);
        bits.truncate(self.capacity);
        BloomFilter::from_parts(
            bits,
            self.num_hashes,
            self.size(),
            self.flipped_bits(),
            self.rebuild_threshold,
        )
    }
}
