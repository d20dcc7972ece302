//! Primitives implemented in Rust crates, always compiled in.
//!
//! [`wide`] holds the full 512-bit functions over arbitrary bytes. The
//! top-level functions are the chain primitives: the same functions over a
//! 32-byte digest, keeping the leading 32 bytes of the output.

use super::{truncate, Digest};

pub mod wide {
    use crate::algorithms::{widen, WideDigest};
    use sha3::digest::{consts::U64, OutputSizeUser};

    /// RustCrypto hashers, restricted to 64-byte outputs
    fn rustcrypto<D>(data: &[u8]) -> WideDigest
    where
        D: sha3::Digest + OutputSizeUser<OutputSize = U64>,
    {
        widen(&D::digest(data))
    }

    /// Round-3 BLAKE-512 (16 rounds)
    pub fn blake(data: &[u8]) -> WideDigest {
        // blake-hash is on the digest 0.9 line
        widen(&<blake_hash::Blake512 as blake_hash::Digest>::digest(data))
    }

    /// CubeHash16/32-512: revision 2, 160 initialization and finalization rounds
    pub fn cubehash(data: &[u8]) -> WideDigest {
        let mut hasher = ::cubehash::CubeHashAuto::new(::cubehash::CubeHashParams {
            revision: 2,
            hash_len_bits: 512,
        });
        hasher.update(data);
        widen(&hasher.finalize())
    }

    pub fn groestl(data: &[u8]) -> WideDigest {
        rustcrypto::<::groestl::Groestl512>(data)
    }

    pub fn jh(data: &[u8]) -> WideDigest {
        rustcrypto::<::jh::Jh512>(data)
    }

    /// Original Keccak padding, not SHA3-512
    pub fn keccak(data: &[u8]) -> WideDigest {
        rustcrypto::<sha3::Keccak512>(data)
    }

    /// Skein-512 with a 512-bit output
    pub fn skein(data: &[u8]) -> WideDigest {
        rustcrypto::<::skein::Skein512<U64>>(data)
    }

    pub fn shabal(data: &[u8]) -> WideDigest {
        rustcrypto::<::shabal::Shabal512>(data)
    }

    pub fn whirlpool(data: &[u8]) -> WideDigest {
        rustcrypto::<::whirlpool::Whirlpool>(data)
    }

    pub fn sha512(data: &[u8]) -> WideDigest {
        rustcrypto::<sha2::Sha512>(data)
    }
}

chain_primitives! {
    blake => wide::blake,
    cubehash => wide::cubehash,
    groestl => wide::groestl,
    jh => wide::jh,
    keccak => wide::keccak,
    skein => wide::skein,
    shabal => wide::shabal,
    whirlpool => wide::whirlpool,
    sha512 => wide::sha512,
}
