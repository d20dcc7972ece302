use crate::algorithms::{Algorithm, Digest, HashPrimitiveRegistry, DIGEST_LEN};
use crate::stats::AlgorithmCounts;

/// Upper bound on rounds per block
pub const MAX_REPEAT: usize = 16;

/// Block heights per additional round
pub const REPEAT_HEIGHT_STEP: u32 = 50_000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainError {
    #[error("invalid round count {0}: at least one round is required")]
    InvalidRoundCount(usize),
}

/// Final digest plus per-algorithm invocation counts of one chain run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainResult {
    pub digest: Digest,
    pub counts: AlgorithmCounts,
}

/// One step of a traced run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundRecord {
    pub round: usize,
    pub algorithm: Algorithm,
    /// Digest produced by this round
    pub digest: Digest,
}

/// Number of chained rounds the network applies at `height`
pub fn repeat_for_height(height: u32) -> usize {
    let repeat = (height / REPEAT_HEIGHT_STEP) as usize + 1;
    repeat.min(MAX_REPEAT)
}

/// Algorithm chosen at `round` given the digest entering that round.
///
/// Reads byte `round % 32` of the running digest and keeps its low nibble.
pub fn select(digest: &Digest, round: usize) -> Algorithm {
    Algorithm::from_nibble(digest[round % DIGEST_LEN])
}

/// Runs the x16rs chain over a registry of primitives.
///
/// The engine keeps nothing between calls; each run owns its running digest
/// and counters, so one engine can be shared across threads.
#[derive(Debug, Clone, Copy)]
pub struct ChainEngine<'a> {
    registry: &'a HashPrimitiveRegistry,
}

impl<'a> ChainEngine<'a> {
    pub fn new(registry: &'a HashPrimitiveRegistry) -> Self {
        Self { registry }
    }

    pub fn run(&self, repeat: usize, seed: &Digest) -> Result<ChainResult, ChainError> {
        self.walk(repeat, seed, |_| {})
    }

    /// Same as [`run`](Self::run), also returning every round in order
    pub fn run_traced(
        &self,
        repeat: usize,
        seed: &Digest,
    ) -> Result<(ChainResult, Vec<RoundRecord>), ChainError> {
        let mut rounds = Vec::with_capacity(repeat);
        let result = self.walk(repeat, seed, |record| rounds.push(record))?;
        Ok((result, rounds))
    }

    fn walk(
        &self,
        repeat: usize,
        seed: &Digest,
        mut on_round: impl FnMut(RoundRecord),
    ) -> Result<ChainResult, ChainError> {
        if repeat < 1 {
            return Err(ChainError::InvalidRoundCount(repeat));
        }

        let mut current = *seed;
        let mut counts = AlgorithmCounts::new();

        for round in 0..repeat {
            let algorithm = select(&current, round);
            counts.increment(algorithm);
            current = (self.registry.get(algorithm))(&current);
            on_round(RoundRecord { round, algorithm, digest: current });
        }

        Ok(ChainResult { digest: current, counts })
    }
}
