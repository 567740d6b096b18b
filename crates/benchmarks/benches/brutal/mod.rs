//! # Brutal Modular Benchmarks
//!
//! - `bloom_filter` - add/contains cost per hash round, derivation, clear
//! - `concurrent` - atomic adds under thread contention

pub mod bloom_filter;
pub mod concurrent;
