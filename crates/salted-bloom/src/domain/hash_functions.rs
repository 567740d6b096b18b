//! Hash functions for the Bloom filter
//!
//! Each round digests `key ++ "magicsalt" ++ decimal(round)` with MD5 and
//! keeps the magnitude of the first four digest bytes read as a big-endian
//! `i32`. MD5 is used for spread, not for collision resistance.

use md5::{Digest, Md5};

/// Salt appended to every key before the round number
pub const SALT: &[u8] = b"magicsalt";

/// Raw hash for a single round
///
/// Capacity-independent; callers reduce it with `% capacity`.
pub fn salted_hash(key: &[u8], round: usize) -> u32 {
    let mut hasher = Md5::new();
    hasher.update(key);
    hasher.update(SALT);
    hasher.update(round.to_string().as_bytes());
    let digest = hasher.finalize();

    let packed = i32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]);
    // i32::MIN has no positive i32 counterpart; its magnitude is 2^31
    packed.unsigned_abs()
}

/// Compute the raw hash of every round for a key
pub fn compute_hash_positions(key: &str, num_hashes: usize) -> Vec<u32> {
    (0..num_hashes)
        .map(|round| salted_hash(key.as_bytes(), round))
        .collect()
}

/// Reduce a raw hash to a bit index
#[inline]
pub fn bit_index(raw_hash: u32, capacity: usize) -> usize {
    raw_hash as usize % capacity
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_hashes_for_test_key() {
        let hashes = compute_hash_positions("test", 6);
        assert_eq!(
            hashes,
            vec![1439939190, 306943062, 709286657, 1887997860, 180374904, 1486623261],
            "Raw hashes must stay stable across releases"
        );
    }

    #[test]
    fn test_hash_deterministic() {
        let first = compute_hash_positions("test_address_0xABCD", 7);
        let second = compute_hash_positions("test_address_0xABCD", 7);
        assert_eq!(first, second, "Same key must produce the same hashes");
    }

    #[test]
    fn test_prefix_of_longer_round_count() {
        let short = compute_hash_positions("prefix", 3);
        let long = compute_hash_positions("prefix", 8);
        assert_eq!(short[..], long[..3], "Round i does not depend on k");
    }

    #[test]
    fn test_rounds_produce_varied_hashes() {
        let hashes = compute_hash_positions("test_address_0xABCD", 7);
        let unique: std::collections::HashSet<_> = hashes.iter().collect();
        assert!(
            unique.len() >= 6,
            "Salted rounds should produce distinct hashes"
        );
    }

    #[test]
    fn test_empty_key_hashes() {
        let hashes = compute_hash_positions("", 4);
        assert_eq!(hashes.len(), 4);
    }

    #[test]
    fn test_zero_rounds() {
        assert!(compute_hash_positions("anything", 0).is_empty());
    }

    #[test]
    fn test_raw_hash_fits_signed_magnitude() {
        for i in 0..1000 {
            let key = format!("key_{}", i);
            for hash in compute_hash_positions(&key, 4) {
                assert!(hash <= 1 << 31, "Magnitude of an i32 is at most 2^31");
            }
        }
    }

    #[test]
    fn test_hash_uniformity() {
        let capacity = 1000;
        let mut counts = vec![0usize; 10];

        for i in 0..1000 {
            let key = format!("element_{}", i);
            for hash in compute_hash_positions(&key, 7) {
                counts[bit_index(hash, capacity) / 100] += 1;
            }
        }

        // ~700 per bucket, allow 50% variance
        for (i, count) in counts.iter().enumerate() {
            assert!(
                *count >= 350 && *count <= 1050,
                "Bucket {} has {} entries, expected ~700",
                i,
                count
            );
        }
    }

    #[test]
    fn test_bit_index_in_range() {
        assert_eq!(bit_index(1 << 31, 7), (1usize << 31) % 7);
        assert_eq!(bit_index(12, 5), 2);
        assert_eq!(bit_index(0, 1), 0);
    }
}
