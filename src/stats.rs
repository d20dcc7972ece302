use crate::algorithms::{Algorithm, ALGORITHM_COUNT};
use crate::chain::ChainResult;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatsError {
    #[error("percentage requested on an aggregate with zero recorded rounds")]
    EmptyAggregate,
}

/// Invocation count per algorithm
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlgorithmCounts([u64; ALGORITHM_COUNT]);

impl AlgorithmCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, algo: Algorithm) {
        self.0[algo.index() as usize] += 1;
    }

    pub fn get(&self, algo: Algorithm) -> u64 {
        self.0[algo.index() as usize]
    }

    pub fn total(&self) -> u64 {
        self.0.iter().sum()
    }

    /// Elementwise sum
    pub fn add(&mut self, other: &AlgorithmCounts) {
        for (mine, theirs) in self.0.iter_mut().zip(other.0.iter()) {
            *mine += theirs;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Algorithm, u64)> + '_ {
        Algorithm::ALL.iter().map(move |&algo| (algo, self.get(algo)))
    }

    /// Plain index -> count mapping covering all 16 algorithms
    pub fn to_index_map(&self) -> BTreeMap<u8, u64> {
        self.iter().map(|(algo, count)| (algo.index(), count)).collect()
    }

    pub fn as_array(&self) -> &[u64; ALGORITHM_COUNT] {
        &self.0
    }
}

impl From<[u64; ALGORITHM_COUNT]> for AlgorithmCounts {
    fn from(counts: [u64; ALGORITHM_COUNT]) -> Self {
        Self(counts)
    }
}

/// Usage statistics accumulated over many blocks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageAggregate {
    pub counts: AlgorithmCounts,
    pub processed_blocks: u64,
}

impl UsageAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one block's chain result in
    pub fn merge(mut self, result: &ChainResult) -> Self {
        self.absorb(result);
        self
    }

    pub fn absorb(&mut self, result: &ChainResult) {
        self.counts.add(&result.counts);
        self.processed_blocks += 1;
    }

    /// Fold a partial aggregate in
    pub fn combine(mut self, other: &UsageAggregate) -> Self {
        self.counts.add(&other.counts);
        self.processed_blocks += other.processed_blocks;
        self
    }

    pub fn total_rounds(&self) -> u64 {
        self.counts.total()
    }

    pub fn percentage(&self, algo: Algorithm) -> Result<f64, StatsError> {
        let total = self.total_rounds();
        if total == 0 {
            return Err(StatsError::EmptyAggregate);
        }
        Ok(self.counts.get(algo) as f64 * 100.0 / total as f64)
    }

    pub fn percentage_or_zero(&self, algo: Algorithm) -> f64 {
        self.percentage(algo).unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(pairs: &[(Algorithm, u64)]) -> ChainResult {
        let mut counts = AlgorithmCounts::new();
        for &(algo, n) in pairs {
            for _ in 0..n {
                counts.increment(algo);
            }
        }
        ChainResult { digest: [0u8; 32], counts }
    }

    #[test]
    fn test_merge_adds_counts_and_blocks() {
        let agg = UsageAggregate::new()
            .merge(&result(&[(Algorithm::Blake, 2), (Algorithm::Echo, 1)]))
            .merge(&result(&[(Algorithm::Echo, 3)]));

        assert_eq!(agg.processed_blocks, 2);
        assert_eq!(agg.counts.get(Algorithm::Blake), 2);
        assert_eq!(agg.counts.get(Algorithm::Echo), 4);
        assert_eq!(agg.total_rounds(), 6);
    }

    #[test]
    fn test_merge_order_does_not_matter() {
        let results = vec![
            result(&[(Algorithm::Jh, 1), (Algorithm::Simd, 2)]),
            result(&[(Algorithm::Sha512, 5)]),
            result(&[(Algorithm::Jh, 3), (Algorithm::Fugue, 1)]),
            result(&[(Algorithm::Hamsi, 16)]),
        ];

        let forward = results.iter().fold(UsageAggregate::new(), |a, r| a.merge(r));
        let backward = results.iter().rev().fold(UsageAggregate::new(), |a, r| a.merge(r));
        assert_eq!(forward, backward);

        // Partition into two groups, aggregate each, then combine
        let left = results[..1].iter().fold(UsageAggregate::new(), |a, r| a.merge(r));
        let right = results[1..].iter().fold(UsageAggregate::new(), |a, r| a.merge(r));
        assert_eq!(right.clone().combine(&left), forward);
        assert_eq!(left.combine(&right), forward);
    }

    #[test]
    fn test_percentage() {
        let agg = UsageAggregate::new()
            .merge(&result(&[(Algorithm::Blake, 1), (Algorithm::Bmw, 3)]));
        assert_eq!(agg.percentage(Algorithm::Blake), Ok(25.0));
        assert_eq!(agg.percentage(Algorithm::Bmw), Ok(75.0));
        assert_eq!(agg.percentage(Algorithm::Keccak), Ok(0.0));
    }

    #[test]
    fn test_percentage_on_empty_aggregate() {
        let agg = UsageAggregate::new();
        assert_eq!(agg.percentage(Algorithm::Blake), Err(StatsError::EmptyAggregate));
        assert_eq!(agg.percentage_or_zero(Algorithm::Blake), 0.0);
    }

    #[test]
    fn test_index_map_covers_all_algorithms() {
        let mut counts = AlgorithmCounts::new();
        counts.increment(Algorithm::Whirlpool);
        let map = counts.to_index_map();
        assert_eq!(map.len(), 16);
        assert_eq!(map[&14], 1);
        assert_eq!(map[&0], 0);
    }
}
