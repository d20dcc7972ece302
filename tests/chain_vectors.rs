mod common;

use common::{sample_intro, tagged_registry};
use x16rs_stats::algorithms::{portable, Algorithm, HashPrimitiveRegistry};
use x16rs_stats::chain::{repeat_for_height, ChainEngine};
use x16rs_stats::header::{seed_digest, PREIMAGE_LEN};

#[test]
fn test_sample_header_preimage() {
    let record = sample_intro(591_819).to_record().unwrap();
    let preimage = record.encode().unwrap();
    assert_eq!(preimage.len(), PREIMAGE_LEN);

    let expected = format!(
        "{}{}{}",
        "0100000907cb00602b0b00",
        "0".repeat(128),
        "00000001075bcd151a020bcf0000"
    );
    assert_eq!(hex::encode(preimage), expected);
    assert_eq!(
        hex::encode(seed_digest(&preimage)),
        "498427730d277be2ad172db32658e186d7f833dae8c8eedccfcf88f915eb0fe4"
    );
}

#[test]
fn test_sample_header_chain() {
    let registry = tagged_registry();
    let preimage = sample_intro(591_819).to_record().unwrap().encode().unwrap();
    let repeat = repeat_for_height(591_819);
    assert_eq!(repeat, 12);

    let (result, rounds) = ChainEngine::new(&registry)
        .run_traced(repeat, &seed_digest(&preimage))
        .unwrap();
    assert_eq!(
        hex::encode(result.digest),
        "72b701510beabb8e815c1745e1507c6dcb2248c7e71e41cdfa2d12d7c0ffdf16"
    );
    let selected: Vec<u8> = rounds.iter().map(|r| r.algorithm.index()).collect();
    assert_eq!(selected, vec![9, 8, 0, 4, 14, 4, 6, 1, 15, 0, 1, 12]);
}

#[test]
fn test_portable_primitive_fills_every_slot() {
    // Every slot maps to SHA-512, so the chain is iterated truncated SHA-512
    let mut builder = HashPrimitiveRegistry::builder();
    for algo in Algorithm::ALL {
        builder = builder.with(algo, portable::sha512);
    }
    let registry = builder.build().unwrap();

    let result = ChainEngine::new(&registry).run(1, &[0u8; 32]).unwrap();
    assert_eq!(
        hex::encode(result.digest),
        "5046adc1dba838867b2bbbfdd0c3423e58b57970b5267a90f57960924a87f196"
    );
    assert_eq!(result.counts.get(Algorithm::Blake), 1);
}
