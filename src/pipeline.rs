//! Block range analysis: fetch -> encode -> seed -> chain -> aggregate
//!
//! A fixed pool of worker tasks walks disjoint strides of the height range and
//! reports each block to a single reducer over a bounded channel. Only the
//! reducer touches the aggregate.

use crate::algorithms::{Digest, HashPrimitiveRegistry};
use crate::chain::{repeat_for_height, ChainEngine, ChainError, ChainResult, RoundRecord};
use crate::header::{self, EncodingError};
use crate::node::{BlockIntro, FetchError, HeaderSource};
use crate::stats::UsageAggregate;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Why a single block could not be analyzed
#[derive(Debug, thiserror::Error)]
pub enum BlockError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("encoding failed: {0}")]
    Encoding(#[from] EncodingError),

    #[error("node returned height {got} when asked for {requested}")]
    HeightMismatch { requested: u32, got: u64 },

    #[error("chain error: {0}")]
    Chain(#[from] ChainError),
}

impl BlockError {
    /// Chain errors mean a broken invariant, everything else is bad input
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Chain(_))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("invalid height range: start {start} is after end {end}")]
    InvalidRange { start: u32, end: u32 },

    #[error("block {height} failed: {source}")]
    Fatal {
        height: u32,
        #[source]
        source: BlockError,
    },

    #[error("worker task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Number of concurrent worker tasks (bounds in-flight node requests)
    pub concurrency: usize,
    /// Log progress every N heights
    pub progress_interval: u32,
    /// Log every chain round at debug level
    pub trace_rounds: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            concurrency: 8,
            progress_interval: 200,
            trace_rounds: false,
        }
    }
}

/// A height that was not merged into the aggregate
#[derive(Debug)]
pub struct SkippedBlock {
    pub height: u32,
    pub reason: BlockError,
}

/// Result of analyzing `[start, end]`
#[derive(Debug)]
pub struct RangeReport {
    pub start: u32,
    pub end: u32,
    pub aggregate: UsageAggregate,
    /// Sorted by height
    pub skipped: Vec<SkippedBlock>,
    /// Shutdown was requested before every height was visited
    pub aborted: bool,
}

impl RangeReport {
    pub fn requested_blocks(&self) -> u64 {
        u64::from(self.end - self.start) + 1
    }

    pub fn processed_blocks(&self) -> u64 {
        self.aggregate.processed_blocks
    }

    pub fn skipped_blocks(&self) -> u64 {
        self.skipped.len() as u64
    }

    /// Heights never attempted because the run was aborted
    pub fn unvisited_blocks(&self) -> u64 {
        self.requested_blocks() - self.processed_blocks() - self.skipped_blocks()
    }
}

/// Seed digest and round count for a fetched block
fn prepare(height: u32, intro: &BlockIntro) -> Result<(usize, Digest), BlockError> {
    if intro.height != u64::from(height) {
        return Err(BlockError::HeightMismatch {
            requested: height,
            got: intro.height,
        });
    }
    let record = intro.to_record()?;
    let preimage = record.encode()?;
    Ok((repeat_for_height(height), header::seed_digest(&preimage)))
}

/// Analyze one fetched block
pub fn analyze_block(
    registry: &HashPrimitiveRegistry,
    height: u32,
    intro: &BlockIntro,
) -> Result<ChainResult, BlockError> {
    let (repeat, seed) = prepare(height, intro)?;
    Ok(ChainEngine::new(registry).run(repeat, &seed)?)
}

/// Like [`analyze_block`], also returning the rounds
pub fn analyze_block_traced(
    registry: &HashPrimitiveRegistry,
    height: u32,
    intro: &BlockIntro,
) -> Result<(ChainResult, Vec<RoundRecord>), BlockError> {
    let (repeat, seed) = prepare(height, intro)?;
    Ok(ChainEngine::new(registry).run_traced(repeat, &seed)?)
}

/// Message from a worker to the reducer
#[derive(Debug)]
enum BlockOutcome {
    Processed { height: u32, result: ChainResult },
    Failed(SkippedBlock),
}

pub struct BlockAnalysisPipeline<S> {
    source: Arc<S>,
    registry: Arc<HashPrimitiveRegistry>,
    config: PipelineConfig,
    shutdown: Arc<AtomicBool>,
}

impl<S: HeaderSource> BlockAnalysisPipeline<S> {
    pub fn new(source: S, registry: HashPrimitiveRegistry, config: PipelineConfig) -> Self {
        Self {
            source: Arc::new(source),
            registry: Arc::new(registry),
            config,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag that stops workers from starting new heights once set.
    /// It stays set; later ranges on this pipeline abort immediately.
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        self.shutdown.clone()
    }

    /// Analyze every height in `[start, end]`.
    ///
    /// Per-block failures are recorded in [`RangeReport::skipped`]; only a
    /// chain error or a crashed worker fails the whole run.
    pub async fn analyze_range(&self, start: u32, end: u32) -> Result<RangeReport, PipelineError> {
        if start > end {
            return Err(PipelineError::InvalidRange { start, end });
        }

        let span = u64::from(end - start) + 1;
        let workers = (self.config.concurrency.max(1) as u64).min(span) as usize;
        tracing::info!(
            "Analyzing blocks {}..={} ({} blocks) with {} worker(s)",
            start,
            end,
            span,
            workers
        );

        let (outcome_tx, mut outcome_rx) = mpsc::channel::<BlockOutcome>(32);
        let mut tasks = Vec::with_capacity(workers);
        for worker in 0..workers {
            let job = WorkerJob {
                first: u64::from(start) + worker as u64,
                last: u64::from(end),
                stride: workers as u64,
                progress_interval: self.config.progress_interval.max(1),
                trace_rounds: self.config.trace_rounds,
            };
            tasks.push(tokio::spawn(block_worker(
                job,
                self.source.clone(),
                self.registry.clone(),
                self.shutdown.clone(),
                outcome_tx.clone(),
            )));
        }
        drop(outcome_tx);

        let mut aggregate = UsageAggregate::new();
        let mut skipped = Vec::new();
        let mut fatal = None;

        while let Some(outcome) = outcome_rx.recv().await {
            match outcome {
                BlockOutcome::Processed { height, result } => {
                    tracing::trace!("block {} merged ({} rounds)", height, result.counts.total());
                    aggregate.absorb(&result);
                }
                BlockOutcome::Failed(block) if block.reason.is_fatal() => {
                    tracing::error!("Block {} failed: {}", block.height, block.reason);
                    self.shutdown.store(true, Ordering::SeqCst);
                    fatal = Some(PipelineError::Fatal {
                        height: block.height,
                        source: block.reason,
                    });
                    break;
                }
                BlockOutcome::Failed(block) => {
                    tracing::warn!("Skipping block {}: {}", block.height, block.reason);
                    skipped.push(block);
                }
            }
        }
        // Unblocks any worker still waiting to send after a fatal break
        drop(outcome_rx);

        for task in tasks {
            task.await?;
        }
        if let Some(err) = fatal {
            return Err(err);
        }

        skipped.sort_by_key(|block: &SkippedBlock| block.height);
        let visited = aggregate.processed_blocks + skipped.len() as u64;
        let aborted = visited < span;
        if aborted {
            tracing::warn!("Run aborted after {} of {} blocks", visited, span);
        }

        Ok(RangeReport {
            start,
            end,
            aggregate,
            skipped,
            aborted,
        })
    }
}

/// Heights one worker is responsible for: `first, first + stride, ...` up to `last`
struct WorkerJob {
    first: u64,
    last: u64,
    stride: u64,
    progress_interval: u32,
    trace_rounds: bool,
}

async fn block_worker<S: HeaderSource>(
    job: WorkerJob,
    source: Arc<S>,
    registry: Arc<HashPrimitiveRegistry>,
    shutdown: Arc<AtomicBool>,
    outcome_tx: mpsc::Sender<BlockOutcome>,
) {
    let mut next = job.first;
    while next <= job.last {
        if shutdown.load(Ordering::SeqCst) {
            tracing::debug!("worker stopping before block {}", next);
            break;
        }

        // `next <= last <= u32::MAX`
        let height = next as u32;
        if height % job.progress_interval == 0 {
            tracing::info!("Processing block {}...", height);
        }

        let analyzed = match source.fetch(height).await {
            Ok(intro) if job.trace_rounds => {
                analyze_block_traced(&registry, height, &intro).map(|(result, rounds)| {
                    for round in &rounds {
                        tracing::debug!(
                            "block {} round {:>2}: {:<9} -> {}",
                            height,
                            round.round,
                            round.algorithm.name(),
                            hex::encode(round.digest)
                        );
                    }
                    result
                })
            }
            Ok(intro) => analyze_block(&registry, height, &intro),
            Err(e) => Err(BlockError::Fetch(e)),
        };

        let outcome = match analyzed {
            Ok(result) => BlockOutcome::Processed { height, result },
            Err(reason) => BlockOutcome::Failed(SkippedBlock { height, reason }),
        };
        if outcome_tx.send(outcome).await.is_err() {
            // Reducer gone
            break;
        }

        next += job.stride;
    }
}
