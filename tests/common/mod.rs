#![allow(dead_code)]

use sha2::{Digest as _, Sha512};
use x16rs_stats::algorithms::{Algorithm, Digest, HashFn, HashPrimitiveRegistry};
use x16rs_stats::node::BlockIntro;

// SHA-512 over `[TAG] || input`, first 32 bytes. Distinct per slot so the
// selection sequence is observable without the real primitives.
fn tagged<const TAG: u8>(input: &Digest) -> Digest {
    let mut hasher = Sha512::new();
    hasher.update([TAG]);
    hasher.update(input);
    let wide = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&wide[..32]);
    out
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

pub fn tagged_registry() -> HashPrimitiveRegistry {
    let mut builder = HashPrimitiveRegistry::builder();
    for algo in Algorithm::ALL {
        builder = builder.with(algo, TAGGED[algo.index() as usize]);
    }
    builder.build().unwrap()
}

/// Block intro with the fixed sample fields used across the tests
pub fn sample_intro(height: u64) -> BlockIntro {
    BlockIntro {
        version: 1,
        height,
        timestamp: 1_613_433_600,
        prevhash: "00".repeat(32),
        mrklroot: "00".repeat(32),
        transaction: 0,
        nonce: 123_456_789,
        difficulty: 0x1a02_0bcf,
    }
}
