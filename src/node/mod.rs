pub mod client;
pub mod protocol;

pub use client::{NodeClient, NodeConfig, DEFAULT_NODE_URL};
pub use protocol::{BlockIntro, FetchError, FetchResult};

use std::collections::HashMap;
use std::future::Future;
use std::path::Path;

/// Anything that can produce the block intro at a given height
pub trait HeaderSource: Send + Sync + 'static {
    fn fetch(&self, height: u32) -> impl Future<Output = FetchResult<BlockIntro>> + Send;
}

/// Fixed set of intros held in memory; missing heights are unavailable
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    blocks: HashMap<u32, BlockIntro>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON array of block intros, e.g. a dump of earlier node responses
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let data = std::fs::read(path)?;
        let intros: Vec<BlockIntro> = serde_json::from_slice(&data)?;
        Ok(intros.into_iter().collect())
    }

    /// Store `intro` under its height. Heights beyond `u32` cannot be
    /// requested and are dropped.
    pub fn insert(&mut self, intro: BlockIntro) -> Option<BlockIntro> {
        match u32::try_from(intro.height) {
            Ok(height) => self.blocks.insert(height, intro),
            Err(_) => {
                tracing::warn!("Ignoring block intro with out-of-range height {}", intro.height);
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl FromIterator<BlockIntro> for MemorySource {
    fn from_iter<I: IntoIterator<Item = BlockIntro>>(iter: I) -> Self {
        let mut source = Self::new();
        for intro in iter {
            source.insert(intro);
        }
        source
    }
}

impl HeaderSource for MemorySource {
    async fn fetch(&self, height: u32) -> FetchResult<BlockIntro> {
        self.blocks
            .get(&height)
            .cloned()
            .ok_or(FetchError::Unavailable(height))
    }
}
