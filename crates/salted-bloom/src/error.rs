//! Error types for filter construction and configuration

use thiserror::Error;

/// Errors raised while constructing or configuring a filter.
///
/// Only construction is fallible. Once a filter exists, `add`, `contains`
/// and `clear` are total over every input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    #[error("Invalid false positive rate: {rate} (must be strictly between 0 and 1)")]
    InvalidFalsePositiveRate { rate: f64 },

    #[error("Expected item count must be greater than 0")]
    InvalidExpectedItems,

    #[error("Filter capacity must be greater than 0 bits")]
    ZeroCapacity,

    #[error("Filter capacity too large: {capacity} > {max} bits reachable by hash rounds")]
    CapacityTooLarge { capacity: usize, max: usize },

    #[error("Filter must use at least one hash round")]
    ZeroHashCount,

    #[error("Invalid rebuild threshold: {threshold} (must be in (0, 1])")]
    InvalidRebuildThreshold { threshold: f64 },
}
