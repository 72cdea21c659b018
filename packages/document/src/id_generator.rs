use rand::Rng;

/// Sequential ID generator for blocks
///
/// Ids look like `blk_<seed>_<n>`. The seed is the creation timestamp plus
/// a random suffix, so two generators never share a prefix in practice,
/// and `n` counts up within one generator.
#[derive(Debug, Clone)]
pub struct BlockIdGenerator {
    seed: String,
    count: u64,
}

impl BlockIdGenerator {
    pub fn new() -> Self {
        let millis = chrono::Utc::now().timestamp_millis().max(0) as u64;
        let suffix: u32 = rand::thread_rng().gen();
        Self::from_seed(format!("{:x}{:08x}", millis, suffix))
    }

    /// Fixed seed, for reproducible ids
    pub fn from_seed(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            count: 0,
        }
    }

    /// Generate next sequential ID
    pub fn new_id(&mut self) -> String {
        self.count += 1;
        format!("blk_{}_{}", self.seed, self.count)
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}

impl Default for BlockIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids() {
        let mut gen = BlockIdGenerator::from_seed("test");

        assert_eq!(gen.new_id(), "blk_test_1");
        assert_eq!(gen.new_id(), "blk_test_2");
        assert_eq!(gen.new_id(), "blk_test_3");
    }

    #[test]
    fn test_random_seeds_differ() {
        let a = BlockIdGenerator::new();
        let b = BlockIdGenerator::new();

        assert_ne!(a.seed(), b.seed());
        assert!(a.seed().len() > 8);
    }
}
