//! # Salted Bloom
//!
//! Space-efficient probabilistic set membership for string keys.
//!
//! A filter answers "has this key possibly been added?" with no false
//! negatives and a tunable false positive rate. Each key is hashed with
//! `num_hashes` rounds of MD5 over `key ++ "magicsalt" ++ round`; each round
//! picks one bit of a fixed-size, bit-packed store.
//!
//! ## Layout
//!
//! - **Domain Layer** (`domain/`): Pure filter logic, no I/O
//!   - `BloomFilter`: Single-threaded filter
//!   - `ConcurrentBloomFilter`: Lock-free filter over atomic words
//!   - `BloomConfig`: Configuration with validation
//!   - `BloomConfigBuilder`: Fluent builder for configuration
//! - **Stats** (`stats`): Fill-level snapshots for rebuild decisions
//! - **Errors** (`error`): Construction failures
//!
//! ## Invariants
//!
//! - No false negatives: if added and not cleared since, `contains()` is true
//! - `flipped_bits() <= capacity()`
//! - `size()` counts `add` calls, not distinct keys
//!
//! ## Not supported
//!
//! Removal, automatic resizing, persistence, exact cardinality.
//!
//! ## Usage Example
//!
//! ```
//! use salted_bloom::BloomFilter;
//!
//! let mut filter = BloomFilter::new_with_fpr(10_000, 0.01)?;
//! filter.add("test");
//!
//! assert!(filter.contains("test"));
//! assert_eq!(filter.size(), 1);
//! assert_eq!(filter.flipped_bits(), filter.num_hashes());
//!
//! if filter.needs_rebuild() {
//!     // allocate a larger filter and re-add the source keys
//! }
//! # Ok::<(), salted_bloom::FilterError>(())
//! ```

pub mod domain;
pub mod error;
pub mod stats;

// Re-exports for convenience
pub use domain::{
    BloomConfig, BloomConfigBuilder, BloomFilter, BloomFilterParams, ConcurrentBloomFilter, Sizing,
};
pub use error::FilterError;
pub use stats::FilterStats;
