use crate::algorithms::{Digest, DIGEST_LEN};
use sha3::{Digest as _, Sha3_256};

/// Size of the canonical preimage:
/// version(2) height(4) pad(1) timestamp(4) prevhash(32) mrklroot(32)
/// transaction+1(4) nonce(4) difficulty(4) pad(2)
pub const PREIMAGE_LEN: usize = 2 + 4 + 1 + 4 + 32 + 32 + 4 + 4 + 4 + 2;

/// Canonical bytes hashed into the seed digest
pub type CanonicalPreimage = [u8; PREIMAGE_LEN];

#[derive(Debug, thiserror::Error)]
pub enum EncodingError {
    #[error("field `{field}` value {value} does not fit in {bits} bits")]
    FieldOverflow {
        field: &'static str,
        value: u64,
        bits: u32,
    },

    #[error("field `{field}` is not valid hex: {source}")]
    InvalidHex {
        field: &'static str,
        #[source]
        source: hex::FromHexError,
    },

    #[error("field `{field}` must be {expected} bytes, got {got}")]
    InvalidLength {
        field: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("preimage length error: expected {expected} bytes, got {got}")]
    PreimageLength { expected: usize, got: usize },
}

/// Block header fields that feed the proof-of-work preimage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockHeaderRecord {
    pub version: u16,
    pub height: u32,
    pub timestamp: u32,
    pub prev_hash: [u8; 32],
    pub merkle_root: [u8; 32],
    /// Declared transaction count; the preimage stores this plus one
    pub transaction_count: u32,
    pub nonce: u32,
    pub difficulty: u32,
}

impl BlockHeaderRecord {
    pub fn encode(&self) -> Result<CanonicalPreimage, EncodingError> {
        encode(self)
    }
}

/// Serialize a header into its canonical preimage.
///
/// Version is little-endian, every other integer big-endian.
pub fn encode(header: &BlockHeaderRecord) -> Result<CanonicalPreimage, EncodingError> {
    let transaction_field =
        header
            .transaction_count
            .checked_add(1)
            .ok_or(EncodingError::FieldOverflow {
                field: "transaction",
                value: header.transaction_count as u64 + 1,
                bits: 32,
            })?;

    let mut data = Vec::with_capacity(PREIMAGE_LEN);
    data.extend_from_slice(&header.version.to_le_bytes());
    data.extend_from_slice(&header.height.to_be_bytes());
    data.push(0x00);
    data.extend_from_slice(&header.timestamp.to_be_bytes());
    data.extend_from_slice(&header.prev_hash);
    data.extend_from_slice(&header.merkle_root);
    data.extend_from_slice(&transaction_field.to_be_bytes());
    data.extend_from_slice(&header.nonce.to_be_bytes());
    data.extend_from_slice(&header.difficulty.to_be_bytes());
    data.extend_from_slice(&[0x00, 0x00]);

    let got = data.len();
    data.try_into().map_err(|_| EncodingError::PreimageLength {
        expected: PREIMAGE_LEN,
        got,
    })
}

/// SHA3-256 of the preimage, the chain's starting digest
pub fn seed_digest(preimage: &CanonicalPreimage) -> Digest {
    Sha3_256::digest(preimage).into()
}

/// Decode a 32-byte hash from hex (an optional `0x` prefix is accepted)
pub fn decode_hash(field: &'static str, hex_str: &str) -> Result<[u8; DIGEST_LEN], EncodingError> {
    let bytes = hex::decode(hex_str.trim_start_matches("0x"))
        .map_err(|source| EncodingError::InvalidHex { field, source })?;
    let got = bytes.len();
    bytes.try_into().map_err(|_| EncodingError::InvalidLength {
        field,
        expected: DIGEST_LEN,
        got,
    })
}
