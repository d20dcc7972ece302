use crate::header::{decode_hash, BlockHeaderRecord, EncodingError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Errors fetching a header from the node
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("node returned HTTP {status} for height {height}")]
    Status {
        status: reqwest::StatusCode,
        height: u32,
    },

    #[error("node rejected query for height {height}: {message}")]
    Rejected { height: u32, message: String },

    #[error("malformed block intro for height {height}: {source}")]
    Malformed {
        height: u32,
        #[source]
        source: serde_json::Error,
    },

    #[error("block {0} not available")]
    Unavailable(u32),
}

pub type FetchResult<T> = Result<T, FetchError>;

/// Response of `GET /query/block/intro?height=H`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockIntro {
    pub version: u64,
    pub height: u64,
    pub timestamp: u64,
    pub prevhash: String,
    pub mrklroot: String,
    /// Declared transaction count
    pub transaction: u64,
    pub nonce: u64,
    pub difficulty: u64,
}

fn narrow<T: TryFrom<u64>>(field: &'static str, value: u64, bits: u32) -> Result<T, EncodingError> {
    T::try_from(value).map_err(|_| EncodingError::FieldOverflow { field, value, bits })
}

impl BlockIntro {
    /// Range-check every field into a header record
    pub fn to_record(&self) -> Result<BlockHeaderRecord, EncodingError> {
        Ok(BlockHeaderRecord {
            version: narrow("version", self.version, 16)?,
            height: narrow("height", self.height, 32)?,
            timestamp: narrow("timestamp", self.timestamp, 32)?,
            prev_hash: decode_hash("prevhash", &self.prevhash)?,
            merkle_root: decode_hash("mrklroot", &self.mrklroot)?,
            transaction_count: narrow("transaction", self.transaction, 32)?,
            nonce: narrow("nonce", self.nonce, 32)?,
            difficulty: narrow("difficulty", self.difficulty, 32)?,
        })
    }

    /// Parse a node response body.
    ///
    /// The node flags failures with a non-zero `ret` and an `err` message;
    /// successful bodies may carry `ret: 0` and extra fields, which are ignored.
    pub fn from_response(height: u32, body: Value) -> FetchResult<Self> {
        if let Some(ret) = body.get("ret").and_then(Value::as_i64) {
            if ret != 0 {
                let message = body
                    .get("err")
                    .or_else(|| body.get("message"))
                    .and_then(Value::as_str)
                    .unwrap_or("unknown error")
                    .to_string();
                return Err(FetchError::Rejected { height, message });
            }
        }

        serde_json::from_value(body).map_err(|source| FetchError::Malformed { height, source })
    }
}
