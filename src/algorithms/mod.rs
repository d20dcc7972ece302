//! Hash primitives used by the x16rs chain

/// Define `name(&Digest) -> Digest` as the truncation of a wide function
macro_rules! chain_primitives {
    ($($name:ident => $wide:path),* $(,)?) => {
        $(
            pub fn $name(input: &Digest) -> Digest {
                truncate(&$wide(input))
            }
        )*
    };
}

pub mod portable;
pub mod registry;
#[cfg(feature = "sphlib")]
pub mod sphlib;

pub use registry::{HashPrimitiveRegistry, RegistryBuilder, RegistryError};

use std::fmt;

/// Length of every digest flowing through the chain
pub const DIGEST_LEN: usize = 32;

/// A 32-byte digest (seed or round output)
pub type Digest = [u8; DIGEST_LEN];

/// Full output of a 512-bit primitive
pub type WideDigest = [u8; WIDE_DIGEST_LEN];

/// Length of a 512-bit primitive's output
pub const WIDE_DIGEST_LEN: usize = 64;

/// A hash primitive: 32-byte digest in, 32-byte digest out
pub type HashFn = fn(&Digest) -> Digest;

/// Number of primitives the selector can choose from
pub const ALGORITHM_COUNT: usize = 16;

/// The 16 primitives, in consensus order.
///
/// The discriminant is the selector value. Reordering these variants changes
/// which primitive a nibble selects and therefore every chained digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Algorithm {
    Blake = 0,
    Bmw = 1,
    Groestl = 2,
    Jh = 3,
    Keccak = 4,
    Skein = 5,
    Luffa = 6,
    Cubehash = 7,
    Shavite = 8,
    Simd = 9,
    Echo = 10,
    Hamsi = 11,
    Fugue = 12,
    Shabal = 13,
    Whirlpool = 14,
    Sha512 = 15,
}

impl Algorithm {
    /// All algorithms, indexed by selector value
    pub const ALL: [Algorithm; ALGORITHM_COUNT] = [
        Self::Blake,
        Self::Bmw,
        Self::Groestl,
        Self::Jh,
        Self::Keccak,
        Self::Skein,
        Self::Luffa,
        Self::Cubehash,
        Self::Shavite,
        Self::Simd,
        Self::Echo,
        Self::Hamsi,
        Self::Fugue,
        Self::Shabal,
        Self::Whirlpool,
        Self::Sha512,
    ];

    /// Look up an algorithm by index, `None` outside 0..16
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// Select an algorithm from the low 4 bits of `byte`
    pub fn from_nibble(byte: u8) -> Self {
        Self::ALL[(byte & 0x0F) as usize]
    }

    /// Selector value of this algorithm
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Blake => "BLAKE",
            Self::Bmw => "BMW",
            Self::Groestl => "GROESTL",
            Self::Jh => "JH",
            Self::Keccak => "KECCAK",
            Self::Skein => "SKEIN",
            Self::Luffa => "LUFFA",
            Self::Cubehash => "CUBEHASH",
            Self::Shavite => "SHAVITE",
            Self::Simd => "SIMD",
            Self::Echo => "ECHO",
            Self::Hamsi => "HAMSI",
            Self::Fugue => "FUGUE",
            Self::Shabal => "SHABAL",
            Self::Whirlpool => "WHIRLPOOL",
            Self::Sha512 => "SHA512",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Truncate a wide primitive output to the leading 32 bytes
pub(crate) fn truncate(wide: &[u8]) -> Digest {
    let mut out = [0u8; DIGEST_LEN];
    out.copy_from_slice(&wide[..DIGEST_LEN]);
    out
}

/// Copy a 64-byte primitive output into a fixed array
pub(crate) fn widen(output: &[u8]) -> WideDigest {
    let mut out = [0u8; WIDE_DIGEST_LEN];
    out.copy_from_slice(&output[..WIDE_DIGEST_LEN]);
    out
}

/// Stand-in primitives for tests: SHA-512 over `[tag] || input`, truncated.
#[cfg(test)]
pub(crate) mod testing {
    use super::{truncate, Algorithm, Digest, HashFn, HashPrimitiveRegistry};
    use sha2::{Digest as _, Sha512};

    fn tagged<const TAG: u8>(input: &Digest) -> Digest {
        let mut hasher = Sha512::new();
        hasher.update([TAG]);
        hasher.update(input);
        truncate(&hasher.finalize())
    }

    const TAGGED: [HashFn; 16] = [
        tagged::<0>,
        tagged::<1>,
        tagged::<2>,
        tagged::<3>,
        tagged::<4>,
        tagged::<5>,
        tagged::<6>,
        tagged::<7>,
        tagged::<8>,
        tagged::<9>,
        tagged::<10>,
        tagged::<11>,
        tagged::<12>,
        tagged::<13>,
        tagged::<14>,
        tagged::<15>,
    ];

    pub(crate) fn tagged_registry() -> HashPrimitiveRegistry {
        Algorithm::ALL
            .iter()
            .fold(HashPrimitiveRegistry::builder(), |builder, &algo| {
                builder.with(algo, TAGGED[algo.index() as usize])
            })
            .build()
            .expect("all 16 slots filled")
    }
}
