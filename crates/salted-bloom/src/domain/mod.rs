//! Domain Layer - Pure filter logic
//!
//! This layer contains:
//! - Single-threaded Bloom filter
//! - Lock-free concurrent Bloom filter
//! - Salted MD5 hash rounds
//! - Parameter derivation
//! - Configuration
//!
//! RULES:
//! - No I/O operations
//! - No async code

pub mod bloom_filter;
pub mod concurrent;
pub mod config;
pub mod hash_functions;
pub mod parameters;

pub use bloom_filter::BloomFilter;
pub use concurrent::ConcurrentBloomFilter;
pub use config::{BloomConfig, BloomConfigBuilder, Sizing};
pub use hash_functions::compute_hash_positions;
pub use parameters::{calculate_optimal_parameters, expected_false_positive_rate, BloomFilterParams};
