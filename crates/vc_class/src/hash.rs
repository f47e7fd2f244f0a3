//! Hash states for the registry tables.
//!
//! `KeyHashState` passes the bits of a `TypeId` straight through,
//! `FixedHashState` is `foldhash` with a fixed seed.

use core::hash::{BuildHasher, Hasher};

use foldhash::fast::{FixedState, FoldHasher};

pub(crate) type HashMap<K, V, S = FixedHashState> = hashbrown::HashMap<K, V, S>;
pub(crate) type HashSet<K, S = FixedHashState> = hashbrown::HashSet<K, S>;

// -----------------------------------------------------------------------------
// FixedHashState

const FIXED_HASH_SEED: FixedState = FixedState::with_seed(0x6C62_272E_07BB_0142);

/// Hash state for names and other non-`TypeId` keys.
#[derive(Copy, Clone, Default, Debug)]
pub(crate) struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FoldHasher<'static>;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        FIXED_HASH_SEED.build_hasher()
    }
}

// -----------------------------------------------------------------------------
// KeyHashState

/// Hash state for `TypeId` keys, which are already well distributed.
#[derive(Copy, Clone, Default, Debug)]
pub(crate) struct KeyHashState;

#[derive(Copy, Clone, Default, Debug)]
pub(crate) struct KeyHasher {
    hash: u64,
}

impl Hasher for KeyHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.hash
    }

    fn write(&mut self, bytes: &[u8]) {
        // `TypeId` may hash as a byte slice on some targets.
        for byte in bytes.iter().rev() {
            self.hash = self.hash.rotate_left(8).wrapping_add(*byte as u64);
        }
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.hash = i;
    }

    #[inline]
    fn write_u128(&mut self, i: u128) {
        self.hash = (i as u64) ^ ((i >> 64) as u64);
    }
}

impl BuildHasher for KeyHashState {
    type Hasher = KeyHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        KeyHasher::default()
    }
}
