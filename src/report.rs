use crate::algorithms::{Algorithm, ALGORITHM_COUNT};
use crate::pipeline::RangeReport;
use crate::stats::{AlgorithmCounts, UsageAggregate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Width of the longest bar in the console chart
const BAR_WIDTH: usize = 40;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persisted summary of one analyzed range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsReport {
    pub start_height: u32,
    pub end_height: u32,
    pub requested_blocks: u64,
    pub total_blocks: u64,
    pub skipped_blocks: Vec<u32>,
    pub aborted: bool,
    /// Algorithm index (as a string key) -> invocation count
    pub algo_stats: BTreeMap<String, u64>,
    pub timestamp: String,
}

impl StatsReport {
    pub fn from_range(report: &RangeReport, timestamp: String) -> Self {
        Self {
            start_height: report.start,
            end_height: report.end,
            requested_blocks: report.requested_blocks(),
            total_blocks: report.processed_blocks(),
            skipped_blocks: report.skipped.iter().map(|b| b.height).collect(),
            aborted: report.aborted,
            algo_stats: report
                .aggregate
                .counts
                .to_index_map()
                .into_iter()
                .map(|(index, count)| (index.to_string(), count))
                .collect(),
            timestamp,
        }
    }

    /// Rebuild the aggregate; unknown or out-of-range keys are ignored
    pub fn aggregate(&self) -> UsageAggregate {
        let mut counts = [0u64; ALGORITHM_COUNT];
        for (key, &count) in &self.algo_stats {
            if let Some(algo) = key.parse().ok().and_then(Algorithm::from_index) {
                counts[algo.index() as usize] = count;
            }
        }
        UsageAggregate {
            counts: AlgorithmCounts::from(counts),
            processed_blocks: self.total_blocks,
        }
    }

    pub fn file_name(&self) -> String {
        format!(
            "stats_{}_to_{}_{}.json",
            self.start_height, self.end_height, self.timestamp
        )
    }
}

/// Local time formatted for file names
pub fn timestamp_now() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Write `report` as pretty JSON under `dir`, creating it if needed
pub fn save_stats_to_file(dir: &Path, report: &StatsReport) -> Result<PathBuf, ReportError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(report.file_name());
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(&path, json)?;
    tracing::debug!("wrote {}", path.display());
    Ok(path)
}

pub fn load_stats_file(path: &Path) -> Result<StatsReport, ReportError> {
    let data = std::fs::read(path)?;
    Ok(serde_json::from_slice(&data)?)
}

/// Console table: one row per algorithm that was used, with a bar chart
pub fn render_statistics(aggregate: &UsageAggregate) -> String {
    let mut buf = String::new();
    let total_rounds = aggregate.total_rounds();
    let max = aggregate.counts.iter().map(|(_, c)| c).max().unwrap_or(0);

    writeln!(buf, "Total blocks: {}", aggregate.processed_blocks).ok();
    writeln!(buf, "Total rounds: {}", total_rounds).ok();
    writeln!(buf, "----------------------------------------------------------------------------").ok();
    writeln!(buf, " ID Algorithm      Count  Share  Usage").ok();
    writeln!(buf, "----------------------------------------------------------------------------").ok();

    if total_rounds == 0 {
        writeln!(buf, " (no rounds recorded)").ok();
        return buf;
    }

    for (algo, count) in aggregate.counts.iter().filter(|(_, c)| *c > 0) {
        writeln!(
            buf,
            " {:>2} {:<10} {:>9} {:>5.1}%  {}",
            algo.index(),
            algo.name(),
            count,
            aggregate.percentage_or_zero(algo),
            bar(count, max)
        )
        .ok();
    }

    buf
}

fn bar(count: u64, max: u64) -> String {
    if max == 0 {
        return String::new();
    }
    let len = ((count as f64 / max as f64) * BAR_WIDTH as f64).round() as usize;
    "#".repeat(len.max(1))
}

/// Algorithms sorted by descending use
pub fn ranking(aggregate: &UsageAggregate) -> Vec<(Algorithm, u64)> {
    let mut ranked: Vec<_> = aggregate.counts.iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked
}
