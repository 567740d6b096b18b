//! Filter parameter derivation
//!
//! Formulas (both truncated toward zero):
//! - m = -n*ln(p) / (ln(2)^2)  -- capacity in bits
//! - k = -ln(p) / ln(2)        -- hash rounds

use std::f64::consts::LN_2;

use crate::error::FilterError;

/// Largest useful capacity in bits
///
/// Raw hashes are magnitudes of an `i32`, so they never exceed 2^31 and bit
/// indices above 2^31 are unreachable.
pub const MAX_CAPACITY: usize = (1usize << 31) + 1;

/// Capacity and hash count for a filter
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BloomFilterParams {
    /// Number of bits in the filter (m)
    pub capacity: usize,
    /// Number of hash rounds per key (k)
    pub num_hashes: usize,
}

impl BloomFilterParams {
    /// Validate explicit parameters
    pub fn explicit(capacity: usize, num_hashes: usize) -> Result<Self, FilterError> {
        if capacity == 0 {
            return Err(FilterError::ZeroCapacity);
        }
        if capacity > MAX_CAPACITY {
            return Err(FilterError::CapacityTooLarge {
                capacity,
                max: MAX_CAPACITY,
            });
        }
        if num_hashes == 0 {
            return Err(FilterError::ZeroHashCount);
        }
        Ok(Self {
            capacity,
            num_hashes,
        })
    }
}

/// Derive capacity and hash count from an expected item count and a target
/// false positive rate.
///
/// Rejects rates outside (0, 1), a zero item count, any combination that
/// truncates to a zero capacity or zero hash rounds, and capacities above
/// [`MAX_CAPACITY`]. Rates above 0.5 always derive zero hash rounds since
/// `-log2(p) < 1` there.
pub fn calculate_optimal_parameters(
    expected_items: usize,
    false_positive_rate: f64,
) -> Result<BloomFilterParams, FilterError> {
    validate_rate(false_positive_rate)?;
    if expected_items == 0 {
        return Err(FilterError::InvalidExpectedItems);
    }

    let n = expected_items as f64;
    let ln_p = false_positive_rate.ln();

    let capacity = (-n * ln_p / (LN_2 * LN_2)) as usize;
    let num_hashes = (-ln_p / LN_2) as usize;

    BloomFilterParams::explicit(capacity, num_hashes)
}

/// Probability that an absent key tests positive after `n` distinct inserts
///
/// Formula: FPR = (1 - e^(-kn/m))^k
pub fn expected_false_positive_rate(capacity: usize, num_hashes: usize, n: usize) -> f64 {
    if capacity == 0 {
        return 1.0;
    }
    let exponent = -(num_hashes as f64) * (n as f64) / (capacity as f64);
    (1.0 - exponent.exp()).powi(num_hashes as i32)
}

/// Probability that an absent key tests positive given the observed fill
///
/// Each probe lands on a set bit with probability `flipped / capacity`.
pub fn fill_false_positive_rate(capacity: usize, num_hashes: usize, flipped_bits: usize) -> f64 {
    fill_ratio(capacity, flipped_bits).powi(num_hashes as i32)
}

pub(crate) fn fill_ratio(capacity: usize, flipped_bits: usize) -> f64 {
    if capacity == 0 {
        return 1.0;
    }
    flipped_bits as f64 / capacity as f64
}

fn validate_rate(rate: f64) -> Result<(), FilterError> {
    // NaN fails both comparisons
    if rate > 0.0 && rate < 1.0 {
        Ok(())
    } else {
        Err(FilterError::InvalidFalsePositiveRate { rate })
    }
}
