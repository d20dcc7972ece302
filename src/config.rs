use crate::cli::Args;
use crate::node::NodeConfig;
use crate::pipeline::PipelineConfig;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("--start and --end are required")]
    MissingRange,

    #[error("--start ({start}) must not be greater than --end ({end})")]
    InvalidRange { start: u32, end: u32 },

    #[error("--concurrency must be at least 1")]
    ZeroConcurrency,

    #[error("--timeout must be at least 1 second")]
    ZeroTimeout,

    #[error("--node-url must not be empty")]
    EmptyNodeUrl,
}

/// Where block intros come from
#[derive(Debug, Clone)]
pub enum SourceConfig {
    Node(NodeConfig),
    File(PathBuf),
}

/// Validated settings for one analysis run
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub start: u32,
    pub end: u32,
    pub source: SourceConfig,
    pub pipeline: PipelineConfig,
    /// `None` when saving is disabled
    pub stats_dir: Option<PathBuf>,
}

impl AnalyzerConfig {
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let (start, end) = match (args.start, args.end) {
            (Some(start), Some(end)) => (start, end),
            _ => return Err(ConfigError::MissingRange),
        };
        if start > end {
            return Err(ConfigError::InvalidRange { start, end });
        }
        if args.concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }

        let source = match &args.headers {
            Some(path) => SourceConfig::File(path.clone()),
            None => {
                if args.node_url.trim().is_empty() {
                    return Err(ConfigError::EmptyNodeUrl);
                }
                if args.timeout == 0 {
                    return Err(ConfigError::ZeroTimeout);
                }
                SourceConfig::Node(NodeConfig::new(args.node_url.clone()).with_timeout(args.timeout))
            }
        };

        Ok(Self {
            start,
            end,
            source,
            pipeline: PipelineConfig {
                concurrency: args.concurrency,
                trace_rounds: args.trace,
                ..PipelineConfig::default()
            },
            stats_dir: (!args.no_save).then(|| args.stats_dir.clone()),
        })
    }

    pub fn requested_blocks(&self) -> u64 {
        u64::from(self.end - self.start) + 1
    }
}
