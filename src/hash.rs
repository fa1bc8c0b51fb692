//! Deterministic identity hashing for texture descriptors
//!
//! `IdentityHasher` folds each written field into a running 64-bit seed with
//! a golden-ratio combine step and finishes with a 64-bit mixer. It is fast
//! and deterministic, but not collision-free: any map keyed on it must fall
//! back to `Eq` to tell descriptors apart, which `HashMap` does.

use std::hash::{BuildHasherDefault, Hash, Hasher};

use crate::texture::TextureDescriptor;

const GOLDEN_RATIO: u64 = 0x9e37_79b9_7f4a_7c15;

/// Per-field hash combiner
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityHasher {
    seed: u64,
}

/// `BuildHasher` for maps keyed by `TextureDescriptor`
pub type BuildIdentityHasher = BuildHasherDefault<IdentityHasher>;

impl IdentityHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one field value into the seed
    #[inline]
    pub fn combine(&mut self, value: u64) {
        self.seed ^= value
            .wrapping_add(GOLDEN_RATIO)
            .wrapping_add(self.seed << 6)
            .wrapping_add(self.seed >> 2);
    }
}

impl Hasher for IdentityHasher {
    fn write(&mut self, bytes: &[u8]) {
        for chunk in bytes.chunks(8) {
            let mut word = [0u8; 8];
            word[..chunk.len()].copy_from_slice(chunk);
            self.combine(u64::from_le_bytes(word));
        }
    }

    fn write_u8(&mut self, value: u8) {
        self.combine(value as u64);
    }

    fn write_u16(&mut self, value: u16) {
        self.combine(value as u64);
    }

    fn write_u32(&mut self, value: u32) {
        self.combine(value as u64);
    }

    fn write_u64(&mut self, value: u64) {
        self.combine(value);
    }

    fn write_usize(&mut self, value: usize) {
        self.combine(value as u64);
    }

    fn finish(&self) -> u64 {
        // splitmix64 finalizer
        let mut z = self.seed;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }
}

/// Hash of a descriptor, suitable as a pooling or cache key
pub fn identity_hash(desc: &TextureDescriptor) -> u64 {
    let mut hasher = IdentityHasher::new();
    desc.hash(&mut hasher);
    hasher.finish()
}
