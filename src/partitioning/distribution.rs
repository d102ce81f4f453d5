//! Bounded-load partition assignment.
//!
//! Implements consistent hashing with bounded loads on top of a fixed
//! partition table. Each partition is hashed onto the ring and assigned to
//! the first virtual node, walking clockwise, whose member still has room
//! under the load ceiling:
//!
//! ```text
//! avg_load = ceil((partition_count / member_count) * load)
//! ```
//!
//! The walk is bounded by one full traversal of the ring. If no member has
//! room the whole distribution fails; a partial table is never returned.

use crate::config::RingConfig;
use crate::error::{Error, Result};
use crate::partitioning::vnodes::VirtualRing;
use crate::types::{Member, PartitionId, PartitionMove};
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, warn};

/// Load ceiling per member for the given membership size.
///
/// Returns 0 when there are no members.
pub(crate) fn average_load(partition_count: usize, member_count: usize, load: f64) -> f64 {
    if member_count == 0 {
        return 0.0;
    }
    ((partition_count as f64 / member_count as f64) * load).ceil()
}

/// A complete partition table together with the per-member load counts.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct PartitionTable {
    /// Partition id -> owner. Either empty or exactly `partition_count` long.
    owners: Vec<Member>,

    /// Member name -> number of partitions owned.
    loads: BTreeMap<String, usize>,
}

impl PartitionTable {
    /// The table of a ring without members.
    pub(crate) fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    pub(crate) fn owner(&self, partition: PartitionId) -> Option<&Member> {
        self.owners.get(partition)
    }

    pub(crate) fn owners(&self) -> &[Member] {
        &self.owners
    }

    pub(crate) fn loads(&self) -> &BTreeMap<String, usize> {
        &self.loads
    }

    /// Partitions owned by the member called `name`, in ascending order.
    pub(crate) fn owned_by(&self, name: &str) -> Vec<PartitionId> {
        self.owners
            .iter()
            .enumerate()
            .filter(|(_, owner)| owner.name() == name)
            .map(|(partition, _)| partition)
            .collect()
    }

    /// Partitions whose owner differs between `self` and `next`.
    pub(crate) fn moves_to(&self, next: &PartitionTable) -> Vec<PartitionMove> {
        let len = self.owners.len().max(next.owners.len());
        (0..len)
            .filter_map(|partition| {
                let from = self.owners.get(partition);
                let to = next.owners.get(partition);
                if from == to {
                    return None;
                }
                Some(PartitionMove {
                    partition,
                    from: from.cloned(),
                    to: to.cloned(),
                })
            })
            .collect()
    }
}

/// Assign every partition to a member of `ring`.
///
/// `member_count` must be the number of distinct members on the ring and
/// must be at least 1.
pub(crate) fn distribute(
    ring: &VirtualRing,
    member_count: usize,
    config: &RingConfig,
) -> Result<PartitionTable> {
    let started = Instant::now();
    let avg_load = average_load(config.partition_count, member_count, config.load);

    let mut owners = Vec::with_capacity(config.partition_count);
    let mut loads: BTreeMap<String, usize> = BTreeMap::new();

    for partition in 0..config.partition_count {
        let key = config.hasher.hash(&(partition as u64).to_le_bytes());
        let start = if ring.is_empty() { 0 } else { ring.successor(key) };

        match place(ring, start, avg_load, &loads) {
            Some(member) => {
                *loads.entry(member.name().to_string()).or_insert(0) += 1;
                owners.push(member.clone());
            }
            None => {
                warn!(
                    partition,
                    members = member_count,
                    partition_count = config.partition_count,
                    replication_factor = config.replication_factor,
                    load = config.load,
                    "Not enough room to distribute partitions"
                );
                return Err(Error::ConfigurationExhausted {
                    partition,
                    members: member_count,
                    partition_count: config.partition_count,
                    replication_factor: config.replication_factor,
                    load: config.load,
                });
            }
        }
    }

    debug!(
        partitions = config.partition_count,
        members = member_count,
        avg_load,
        elapsed_us = started.elapsed().as_micros() as u64,
        "Distributed partitions"
    );

    Ok(PartitionTable { owners, loads })
}

/// Walk the ring from `start` and return the first member with spare load.
fn place<'a>(
    ring: &'a VirtualRing,
    start: usize,
    avg_load: f64,
    loads: &BTreeMap<String, usize>,
) -> Option<&'a Member> {
    let len = ring.len();
    (0..len)
        .map(|step| (start + step) % len)
        .filter_map(|idx| ring.owner_at(idx))
        .find(|member| {
            let load = loads.get(member.name()).copied().unwrap_or(0);
            (load + 1) as f64 <= avg_load
        })
}
