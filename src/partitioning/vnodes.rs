//! Sorted virtual-node ring.
//!
//! Each member is represented by `replication_factor` virtual nodes placed at
//! `hash(le_bytes(i as u64) ++ name)` for `i` in `0..replication_factor`. The
//! index is fixed width, so distinct `(i, name)` pairs never share a key.
//! Positions are kept in a strictly ascending vector so the bounded-load walk
//! can address them by index and wrap around cheaply.

use crate::error::{Error, Result};
use crate::partitioning::hasher::KeyHasher;
use crate::types::Member;
use std::collections::{HashMap, HashSet};

/// Virtual nodes mapped to their owning members.
#[derive(Debug, Clone, Default)]
pub(crate) struct VirtualRing {
    /// Strictly ascending virtual-node positions.
    sorted: Vec<u64>,

    /// Position -> owning member.
    owners: HashMap<u64, Member>,
}

impl VirtualRing {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Number of virtual nodes on the ring.
    pub(crate) fn len(&self) -> usize {
        self.sorted.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    /// Insert all virtual nodes of `member`.
    ///
    /// Fails without modifying the ring if any position is already taken,
    /// either by another member or by another replica of the same member.
    pub(crate) fn insert(
        &mut self,
        hasher: &dyn KeyHasher,
        member: &Member,
        replication_factor: usize,
    ) -> Result<()> {
        let positions = positions(hasher, member.name(), replication_factor);

        let mut seen = HashSet::with_capacity(positions.len());
        for &hash in &positions {
            if let Some(existing) = self.owners.get(&hash) {
                return Err(Error::VirtualNodeCollision {
                    member: member.name().to_string(),
                    existing: existing.name().to_string(),
                    hash,
                });
            }
            if !seen.insert(hash) {
                return Err(Error::VirtualNodeCollision {
                    member: member.name().to_string(),
                    existing: member.name().to_string(),
                    hash,
                });
            }
        }

        for hash in positions {
            self.owners.insert(hash, member.clone());
            self.sorted.push(hash);
        }
        self.sorted.sort_unstable();
        Ok(())
    }

    /// Remove all virtual nodes of the member called `name`.
    ///
    /// Only positions actually owned by that member are removed.
    pub(crate) fn remove(&mut self, hasher: &dyn KeyHasher, name: &str, replication_factor: usize) {
        for hash in positions(hasher, name, replication_factor) {
            let owned = self
                .owners
                .get(&hash)
                .is_some_and(|owner| owner.name() == name);
            if !owned {
                continue;
            }
            self.owners.remove(&hash);
            if let Ok(idx) = self.sorted.binary_search(&hash) {
                self.sorted.remove(idx);
            }
        }
    }

    /// Index of the first position `>= key`, wrapping to 0 past the end.
    ///
    /// Must not be called on an empty ring.
    pub(crate) fn successor(&self, key: u64) -> usize {
        let idx = self.sorted.partition_point(|&hash| hash < key);
        if idx >= self.sorted.len() {
            0
        } else {
            idx
        }
    }

    /// Member owning the virtual node at `idx`.
    pub(crate) fn owner_at(&self, idx: usize) -> Option<&Member> {
        self.sorted.get(idx).and_then(|hash| self.owners.get(hash))
    }

    #[cfg(test)]
    pub(crate) fn positions(&self) -> &[u64] {
        &self.sorted
    }
}

/// Ring positions for the virtual nodes of a member.
fn positions(hasher: &dyn KeyHasher, name: &str, replication_factor: usize) -> Vec<u64> {
    (0..replication_factor)
        .map(|i| hasher.hash(&vnode_key(i, name)))
        .collect()
}

/// Hash input for replica `i` of `name`.
fn vnode_key(i: usize, name: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(8 + name.len());
    key.extend_from_slice(&(i as u64).to_le_bytes());
    key.extend_from_slice(name.as_bytes());
    key
}
