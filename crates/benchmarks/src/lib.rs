//! Benchmark utilities for salted-bloom filters
pub mod utils {
    use rand::Rng;

    /// Random hex keys, 32 characters each
    pub fn generate_random_keys(count: usize) -> Vec<String> {
        let mut rng = rand::thread_rng();
        (0..count)
            .map(|_| format!("{:032x}", rng.gen::<u128>()))
            .collect()
    }

    /// Sequential decimal keys, the worst case for prefix-similar input
    pub fn generate_sequential_keys(count: usize) -> Vec<String> {
        (0..count).map(|i| i.to_string()).collect()
    }
}
