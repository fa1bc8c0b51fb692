//! Reuse pool for backend texture resources
//!
//! Released textures are kept in free lists keyed by their descriptor, so a
//! later request for an identical texture skips backend allocation. Keys are
//! hashed with `IdentityHasher` by default and resolved by structural
//! equality, so hash collisions never hand out the wrong resource.

use std::hash::BuildHasher;

use hashbrown::hash_map::Entry;
use hashbrown::HashMap;
use parking_lot::RwLock;

use crate::error::Result;
use crate::hash::BuildIdentityHasher;
use crate::texture::TextureDescriptor;

/// Tunables for a `TexturePool`
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Free resources kept per distinct descriptor; extra releases are dropped
    pub max_free_per_descriptor: usize,
    /// Name used in log output
    pub label: String,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_free_per_descriptor: 4,
            label: "texture pool".to_string(),
        }
    }
}

/// Pool statistics for monitoring effectiveness
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    /// Acquisitions served from a free list
    pub hits: usize,
    /// Acquisitions that had to create a resource
    pub misses: usize,
    /// Resources returned to a free list
    pub releases: usize,
    /// Released resources dropped because their free list was full
    pub evictions: usize,
}

/// Descriptor-keyed pool of backend resources
pub struct TexturePool<T, S = BuildIdentityHasher> {
    config: PoolConfig,
    free: RwLock<HashMap<TextureDescriptor, Vec<T>, S>>,
    stats: RwLock<PoolStats>,
}

impl<T> TexturePool<T> {
    /// Create a pool hashing descriptors with `IdentityHasher`
    pub fn new(config: PoolConfig) -> Self {
        Self::with_hasher(config, BuildIdentityHasher::default())
    }
}

impl<T, S: BuildHasher> TexturePool<T, S> {
    /// Create a pool with a custom descriptor hasher
    pub fn with_hasher(config: PoolConfig, hasher: S) -> Self {
        Self {
            config,
            free: RwLock::new(HashMap::with_hasher(hasher)),
            stats: RwLock::new(PoolStats::default()),
        }
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Get a free resource matching `desc`, or create one
    ///
    /// `create` runs without the pool lock held, and its error is returned
    /// unchanged.
    pub fn acquire<F>(&self, desc: &TextureDescriptor, create: F) -> Result<T>
    where
        F: FnOnce(&TextureDescriptor) -> Result<T>,
    {
        desc.validate()?;

        // Check free list
        let hash = {
            let mut free = self.free.write();
            let hash = free.hasher().hash_one(desc);
            if let Entry::Occupied(mut bucket) = free.entry(*desc) {
                let resource = bucket.get_mut().pop();
                if bucket.get().is_empty() {
                    bucket.remove();
                }
                if let Some(resource) = resource {
                    log::debug!(
                        "Texture pool '{}' HIT: {} (hash: {:x})",
                        self.config.label,
                        desc,
                        hash
                    );
                    self.stats.write().hits += 1;
                    return Ok(resource);
                }
            }
            hash
        };

        log::debug!(
            "Texture pool '{}' MISS: {} (hash: {:x})",
            self.config.label,
            desc,
            hash
        );
        self.stats.write().misses += 1;

        create(desc)
    }

    /// Return a resource created for `desc` to the pool
    pub fn release(&self, desc: TextureDescriptor, resource: T) {
        let mut free = self.free.write();
        let held = free.get(&desc).map_or(0, Vec::len);

        if held >= self.config.max_free_per_descriptor {
            log::warn!(
                "Texture pool '{}' full for {}, dropping released texture",
                self.config.label,
                desc
            );
            self.stats.write().evictions += 1;
            return;
        }

        free.entry(desc).or_default().push(resource);
        self.stats.write().releases += 1;
    }

    /// Total number of free resources
    pub fn free_count(&self) -> usize {
        self.free.read().values().map(Vec::len).sum()
    }

    /// Number of free resources matching `desc`
    pub fn free_count_for(&self, desc: &TextureDescriptor) -> usize {
        self.free.read().get(desc).map_or(0, Vec::len)
    }

    /// Get pool statistics
    pub fn stats(&self) -> PoolStats {
        *self.stats.read()
    }

    /// Drop every free resource and reset statistics
    pub fn clear(&self) {
        let mut free = self.free.write();
        let count: usize = free.values().map(Vec::len).sum();
        free.clear();
        *self.stats.write() = PoolStats::default();
        log::info!(
            "Cleared texture pool '{}': {} resources released",
            self.config.label,
            count
        );
    }
}

impl<T> Default for TexturePool<T> {
    fn default() -> Self {
        Self::new(PoolConfig::default())
    }
}
