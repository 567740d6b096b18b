//! Filter configuration and validation
//!
//! # Example
//!
//! ```
//! use salted_bloom::{BloomConfigBuilder, BloomFilter};
//!
//! let config = BloomConfigBuilder::new()
//!     .expected_items(10_000)
//!     .false_positive_rate(0.01)
//!     .rebuild_threshold(0.6)
//!     .build()
//!     .expect("valid config");
//!
//! let filter = BloomFilter::from_config(&config).expect("valid filter");
//! assert_eq!(filter.capacity(), 95_850);
//! ```

use serde::{Deserialize, Serialize};

use super::parameters::{calculate_optimal_parameters, BloomFilterParams};
use crate::error::FilterError;

/// Default expected item count for the builder
pub const DEFAULT_EXPECTED_ITEMS: usize = 10_000;
/// Default target false positive rate for the builder
pub const DEFAULT_FALSE_POSITIVE_RATE: f64 = 0.01;
/// Default fill ratio at which a filter reports it should be rebuilt
pub const DEFAULT_REBUILD_THRESHOLD: f64 = 0.5;

/// How a filter is sized
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Sizing {
    /// Derive capacity and hash count from a target accuracy
    Accuracy {
        expected_items: usize,
        false_positive_rate: f64,
    },
    /// Use capacity and hash count as given
    Explicit { capacity: usize, num_hashes: usize },
}

/// Bloom filter configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BloomConfig {
    /// Sizing mode
    pub sizing: Sizing,
    /// Fill ratio (flipped bits / capacity) at which `needs_rebuild` turns true
    #[serde(default = "default_rebuild_threshold")]
    pub rebuild_threshold: f64,
}

fn default_rebuild_threshold() -> f64 {
    DEFAULT_REBUILD_THRESHOLD
}

impl Default for BloomConfig {
    fn default() -> Self {
        Self {
            sizing: Sizing::Accuracy {
                expected_items: DEFAULT_EXPECTED_ITEMS,
                false_positive_rate: DEFAULT_FALSE_POSITIVE_RATE,
            },
            rebuild_threshold: DEFAULT_REBUILD_THRESHOLD,
        }
    }
}

impl BloomConfig {
    /// Accuracy-sized configuration with validation
    pub fn with_accuracy(expected_items: usize, false_positive_rate: f64) -> Result<Self, FilterError> {
        let config = Self {
            sizing: Sizing::Accuracy {
                expected_items,
                false_positive_rate,
            },
            rebuild_threshold: DEFAULT_REBUILD_THRESHOLD,
        };
        config.validate()?;
        Ok(config)
    }

    /// Explicitly sized configuration with validation
    pub fn with_size(capacity: usize, num_hashes: usize) -> Result<Self, FilterError> {
        let config = Self {
            sizing: Sizing::Explicit {
                capacity,
                num_hashes,
            },
            rebuild_threshold: DEFAULT_REBUILD_THRESHOLD,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate sizing and threshold
    pub fn validate(&self) -> Result<(), FilterError> {
        if !(self.rebuild_threshold > 0.0 && self.rebuild_threshold <= 1.0) {
            return Err(FilterError::InvalidRebuildThreshold {
                threshold: self.rebuild_threshold,
            });
        }
        self.resolve().map(|_| ())
    }

    /// Resolve the sizing into concrete filter parameters
    pub fn resolve(&self) -> Result<BloomFilterParams, FilterError> {
        match self.sizing {
            Sizing::Accuracy {
                expected_items,
                false_positive_rate,
            } => calculate_optimal_parameters(expected_items, false_positive_rate),
            Sizing::Explicit {
                capacity,
                num_hashes,
            } => BloomFilterParams::explicit(capacity, num_hashes),
        }
    }

    /// Builder-style method to set the rebuild threshold
    pub fn with_rebuild_threshold(mut self, threshold: f64) -> Self {
        self.rebuild_threshold = threshold;
        self
    }
}

/// Builder for BloomConfig with validation
///
/// Setting `capacity` or `num_hashes` switches to explicit sizing; any value
/// left unset falls back to the parameters derived from the accuracy fields.
#[derive(Default)]
pub struct BloomConfigBuilder {
    expected_items: Option<usize>,
    false_positive_rate: Option<f64>,
    capacity: Option<usize>,
    num_hashes: Option<usize>,
    rebuild_threshold: Option<f64>,
}

impl BloomConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of distinct items the filter should hold
    pub fn expected_items(mut self, items: usize) -> Self {
        self.expected_items = Some(items);
        self
    }

    /// Set the target false positive rate, in (0, 1)
    pub fn false_positive_rate(mut self, rate: f64) -> Self {
        self.false_positive_rate = Some(rate);
        self
    }

    /// Set the filter capacity in bits
    pub fn capacity(mut self, bits: usize) -> Self {
        self.capacity = Some(bits);
        self
    }

    /// Set the number of hash rounds
    pub fn num_hashes(mut self, rounds: usize) -> Self {
        self.num_hashes = Some(rounds);
        self
    }

    /// Set the fill ratio at which the filter reports it needs a rebuild
    pub fn rebuild_threshold(mut self, threshold: f64) -> Self {
        self.rebuild_threshold = Some(threshold);
        self
    }

    /// Build the BloomConfig, validating all parameters
    pub fn build(self) -> Result<BloomConfig, FilterError> {
        let accuracy = Sizing::Accuracy {
            expected_items: self.expected_items.unwrap_or(DEFAULT_EXPECTED_ITEMS),
            false_positive_rate: self
                .false_positive_rate
                .unwrap_or(DEFAULT_FALSE_POSITIVE_RATE),
        };

        let sizing = match (self.capacity, self.num_hashes) {
            (None, None) => accuracy,
            (Some(capacity), Some(num_hashes)) => Sizing::Explicit {
                capacity,
                num_hashes,
            },
            (capacity, num_hashes) => {
                let derived = BloomConfig {
                    sizing: accuracy,
                    rebuild_threshold: DEFAULT_REBUILD_THRESHOLD,
                }
                .resolve()?;
                Sizing::Explicit {
                    capacity: capacity.unwrap_or(derived.capacity),
                    num_hashes: num_hashes.unwrap_or(derived.num_hashes),
                }
            }
        };

        let config = BloomConfig {
            sizing,
            rebuild_threshold: self.rebuild_threshold.unwrap_or(DEFAULT_REBUILD_THRESHOLD),
        };
        config.validate()?;
        Ok(config)
    }
}
