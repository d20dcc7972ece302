use super::{portable, Algorithm, HashFn, ALGORITHM_COUNT};
use std::fmt;

/// Errors raised while assembling a registry
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("no implementation registered for: {}", join_names(.0))]
    MissingPrimitives(Vec<Algorithm>),
}

fn join_names(algos: &[Algorithm]) -> String {
    algos.iter().map(|a| a.name()).collect::<Vec<_>>().join(", ")
}

/// Complete dispatch table from selector value to primitive.
///
/// A registry can only be obtained through [`RegistryBuilder::build`], so every
/// one of the 16 slots is filled and lookups by [`Algorithm`] cannot fail.
#[derive(Clone)]
pub struct HashPrimitiveRegistry {
    table: [HashFn; ALGORITHM_COUNT],
}

impl HashPrimitiveRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Rust-crate primitives plus, when the `sphlib` feature is enabled, the
    /// ones compiled from sphlib.
    pub fn standard() -> Result<Self, RegistryError> {
        let builder = Self::builder().with_portable();
        #[cfg(feature = "sphlib")]
        let builder = builder.with_sphlib();
        builder.build()
    }

    pub fn get(&self, algo: Algorithm) -> HashFn {
        self.table[algo.index() as usize]
    }

    /// Lookup by raw index.
    ///
    /// # Panics
    /// If `index >= 16`. Selector values are masked to 4 bits, so this only
    /// happens on a caller bug.
    pub fn get_index(&self, index: u8) -> HashFn {
        match Algorithm::from_index(index) {
            Some(algo) => self.get(algo),
            None => panic!("algorithm index {} out of range 0..{}", index, ALGORITHM_COUNT),
        }
    }
}

impl fmt::Debug for HashPrimitiveRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashPrimitiveRegistry")
            .field("algorithms", &ALGORITHM_COUNT)
            .finish()
    }
}

/// Collects primitives slot by slot
#[derive(Clone, Default)]
pub struct RegistryBuilder {
    slots: [Option<HashFn>; ALGORITHM_COUNT],
}

impl RegistryBuilder {
    /// Register `f` for `algo`, replacing any previous entry
    pub fn with(mut self, algo: Algorithm, f: HashFn) -> Self {
        self.slots[algo.index() as usize] = Some(f);
        self
    }

    pub fn with_portable(self) -> Self {
        self.with(Algorithm::Blake, portable::blake)
            .with(Algorithm::Groestl, portable::groestl)
            .with(Algorithm::Jh, portable::jh)
            .with(Algorithm::Keccak, portable::keccak)
            .with(Algorithm::Skein, portable::skein)
            .with(Algorithm::Cubehash, portable::cubehash)
            .with(Algorithm::Shabal, portable::shabal)
            .with(Algorithm::Whirlpool, portable::whirlpool)
            .with(Algorithm::Sha512, portable::sha512)
    }

    #[cfg(feature = "sphlib")]
    pub fn with_sphlib(self) -> Self {
        use super::sphlib;

        self.with(Algorithm::Bmw, sphlib::bmw)
            .with(Algorithm::Luffa, sphlib::luffa)
            .with(Algorithm::Shavite, sphlib::shavite)
            .with(Algorithm::Simd, sphlib::simd)
            .with(Algorithm::Echo, sphlib::echo)
            .with(Algorithm::Hamsi, sphlib::hamsi)
            .with(Algorithm::Fugue, sphlib::fugue)
    }

    /// Algorithms that still have no implementation
    pub fn missing(&self) -> Vec<Algorithm> {
        Algorithm::ALL
            .iter()
            .copied()
            .filter(|algo| self.slots[algo.index() as usize].is_none())
            .collect()
    }

    pub fn build(self) -> Result<HashPrimitiveRegistry, RegistryError> {
        let missing = self.missing();
        if !missing.is_empty() {
            return Err(RegistryError::MissingPrimitives(missing));
        }

        let mut table: [HashFn; ALGORITHM_COUNT] = [portable::sha512; ALGORITHM_COUNT];
        for (slot, f) in table.iter_mut().zip(self.slots) {
            if let Some(f) = f {
                *slot = f;
            }
        }
        Ok(HashPrimitiveRegistry { table })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::testing::tagged_registry;
    use crate::algorithms::Digest;

    fn constant(_: &Digest) -> Digest {
        [0xAA; 32]
    }

    #[test]
    fn test_build_reports_every_missing_slot() {
        let err = HashPrimitiveRegistry::builder()
            .with_portable()
            .build()
            .unwrap_err();
        let RegistryError::MissingPrimitives(missing) = err;
        assert_eq!(
            missing,
            vec![
                Algorithm::Bmw,
                Algorithm::Luffa,
                Algorithm::Shavite,
                Algorithm::Simd,
                Algorithm::Echo,
                Algorithm::Hamsi,
                Algorithm::Fugue,
            ]
        );
    }

    #[test]
    fn test_missing_message_names_algorithms() {
        let err = HashPrimitiveRegistry::builder()
            .with_portable()
            .with(Algorithm::Bmw, constant)
            .with(Algorithm::Luffa, constant)
            .with(Algorithm::Shavite, constant)
            .with(Algorithm::Simd, constant)
            .with(Algorithm::Echo, constant)
            .build()
            .unwrap_err();
        assert_eq!(err.to_string(), "no implementation registered for: HAMSI, FUGUE");
    }

    #[test]
    fn test_with_replaces_slot() {
        let registry = HashPrimitiveRegistry::builder()
            .with_portable()
            .with(Algorithm::Sha512, constant)
            .with(Algorithm::Blake, constant)
            .with(Algorithm::Bmw, constant)
            .with(Algorithm::Luffa, constant)
            .with(Algorithm::Cubehash, constant)
            .with(Algorithm::Shavite, constant)
            .with(Algorithm::Simd, constant)
            .with(Algorithm::Echo, constant)
            .with(Algorithm::Hamsi, constant)
            .with(Algorithm::Fugue, constant)
            .build()
            .unwrap();
        assert_eq!(registry.get(Algorithm::Sha512)(&[0u8; 32]), [0xAA; 32]);
        assert_ne!(registry.get(Algorithm::Keccak)(&[0u8; 32]), [0xAA; 32]);
    }

    #[test]
    fn test_get_index_matches_get() {
        let registry = tagged_registry();
        let input = [7u8; 32];
        for algo in Algorithm::ALL {
            assert_eq!(registry.get_index(algo.index())(&input), registry.get(algo)(&input));
        }
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_get_index_out_of_range_panics() {
        tagged_registry().get_index(16);
    }

    #[cfg(not(feature = "sphlib"))]
    #[test]
    fn test_standard_requires_sphlib() {
        assert!(HashPrimitiveRegistry::standard().is_err());
    }

    #[cfg(feature = "sphlib")]
    #[test]
    fn test_standard_is_complete_with_sphlib() {
        let registry = HashPrimitiveRegistry::standard().unwrap();
        let input = [0u8; 32];
        assert_eq!(registry.get(Algorithm::Bmw)(&input), crate::algorithms::sphlib::bmw(&input));
        assert_eq!(registry.get(Algorithm::Blake)(&input), portable::blake(&input));
    }
}
