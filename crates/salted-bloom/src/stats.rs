//! Fill-level statistics for filters
//!
//! A [`FilterStats`] is a point-in-time copy of a filter's counters plus the
//! values derived from them. Callers use it to decide when a filter has
//! filled up and should be rebuilt with a larger capacity.

use std::fmt;

use crate::domain::parameters::{fill_false_positive_rate, fill_ratio};

/// Point-in-time filter statistics
#[derive(Clone, Debug, PartialEq)]
pub struct FilterStats {
    /// Number of bits in the filter
    pub capacity: usize,
    /// Hash rounds per key
    pub num_hashes: usize,
    /// Number of `add` calls since construction or the last `clear`
    pub size: usize,
    /// Number of bits flipped from unset to set
    pub flipped_bits: usize,
    /// `flipped_bits / capacity`
    pub fill_ratio: f64,
    /// `fill_ratio ^ num_hashes`
    pub estimated_false_positive_rate: f64,
    /// Bytes held by the bit store
    pub memory_bytes: usize,
}

impl FilterStats {
    pub(crate) fn new(
        capacity: usize,
        num_hashes: usize,
        size: usize,
        flipped_bits: usize,
        memory_bytes: usize,
    ) -> Self {
        Self {
            capacity,
            num_hashes,
            size,
            flipped_bits,
            fill_ratio: fill_ratio(capacity, flipped_bits),
            estimated_false_positive_rate: fill_false_positive_rate(
                capacity,
                num_hashes,
                flipped_bits,
            ),
            memory_bytes,
        }
    }
}

impl fmt::Display for FilterStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "m={} k={} n={} flipped={} fill={:.2}% est_fpr={:.4}% bytes={}",
            self.capacity,
            self.num_hashes,
            self.size,
            self.flipped_bits,
            self.fill_ratio * 100.0,
            self.estimated_false_positive_rate * 100.0,
            self.memory_bytes
        )
    }
}
