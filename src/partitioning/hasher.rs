//! Pluggable 64-bit hashing.
//!
//! Every position in the ring (virtual nodes, partition keys, member names)
//! and every key lookup goes through a single [`KeyHasher`]. Any
//! `Fn(&[u8]) -> u64` closure that is `Send + Sync` can be used; the default
//! is xxHash64 with seed 0.

use std::fmt;
use std::hash::Hasher;
use twox_hash::XxHash64;

/// Produces an unsigned 64-bit digest of a byte slice.
///
/// Implementations must be deterministic and should minimize collisions.
/// Fast non-cryptographic functions are preferable.
pub trait KeyHasher: Send + Sync {
    /// Hash `data` to a 64-bit value.
    fn hash(&self, data: &[u8]) -> u64;
}

impl<F> KeyHasher for F
where
    F: Fn(&[u8]) -> u64 + Send + Sync,
{
    fn hash(&self, data: &[u8]) -> u64 {
        self(data)
    }
}

/// xxHash64 over the raw bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct XxHasher {
    seed: u64,
}

impl XxHasher {
    /// Create a hasher with a custom seed.
    pub fn with_seed(seed: u64) -> Self {
        Self { seed }
    }
}

impl KeyHasher for XxHasher {
    fn hash(&self, data: &[u8]) -> u64 {
        let mut hasher = XxHash64::with_seed(self.seed);
        hasher.write(data);
        hasher.finish()
    }
}

impl fmt::Display for XxHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "xxhash64(seed={})", self.seed)
    }
}
