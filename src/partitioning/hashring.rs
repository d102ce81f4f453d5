//! Thread-safe bounded-load hash ring.
//!
//! [`HashRing`] owns the virtual-node ring, the partition table, the load
//! counts and the member roster, and guards all four with a single
//! read/write lock. Membership changes rebuild the table on a working copy
//! and only commit it when the rebuild succeeds, so readers always see a
//! complete, mutually consistent state.

use crate::config::RingConfig;
use crate::error::Result;
use crate::partitioning::distribution::{self, PartitionTable};
use crate::partitioning::replicas;
use crate::partitioning::vnodes::VirtualRing;
use crate::types::{Member, PartitionId, PartitionMove};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// A consistent hash ring with bounded loads.
///
/// Keys are hashed into one of `partition_count` partitions; partitions are
/// assigned to members with [consistent hashing with bounded loads], so no
/// member owns more than `ceil(partition_count / members * load)`
/// partitions.
///
/// The ring is an ordinary owned value. Share it between threads with an
/// `Arc`.
///
/// [consistent hashing with bounded loads]: https://research.googleblog.com/2017/04/consistent-hashing-with-bounded-loads.html
pub struct HashRing {
    /// Immutable configuration.
    config: RingConfig,

    /// Ring, table, loads and roster, always mutated together.
    state: RwLock<RingState>,
}

/// Everything guarded by the ring lock.
#[derive(Debug, Clone)]
struct RingState {
    vnodes: VirtualRing,
    members: BTreeMap<String, Member>,
    table: PartitionTable,
    version: u64,
}

impl RingState {
    fn empty() -> Self {
        Self {
            vnodes: VirtualRing::new(),
            members: BTreeMap::new(),
            table: PartitionTable::empty(),
            version: 1,
        }
    }

    fn average_load(&self, config: &RingConfig) -> f64 {
        distribution::average_load(config.partition_count, self.members.len(), config.load)
    }

    fn owner(&self, partition: PartitionId) -> Option<&Member> {
        self.table.owner(partition)
    }

    /// Put a new member on the ring and rebuild the table.
    fn admit(&mut self, config: &RingConfig, member: Member) -> Result<()> {
        self.vnodes
            .insert(config.hasher.as_ref(), &member, config.replication_factor)?;
        self.members.insert(member.name().to_string(), member);
        self.redistribute(config)
    }

    /// Take a member off the ring and rebuild the table.
    fn evict(&mut self, config: &RingConfig, name: &str) -> Result<()> {
        self.vnodes
            .remove(config.hasher.as_ref(), name, config.replication_factor);
        self.members.remove(name);
        self.redistribute(config)
    }

    /// Rebuild the table for the current roster, or clear it if empty.
    fn redistribute(&mut self, config: &RingConfig) -> Result<()> {
        self.table = if self.members.is_empty() {
            PartitionTable::empty()
        } else {
            distribution::distribute(&self.vnodes, self.members.len(), config)?
        };
        Ok(())
    }
}

impl HashRing {
    /// Create a ring with the given initial members.
    ///
    /// Duplicate names in `members` are ignored after the first occurrence.
    pub fn new<I>(members: I, config: RingConfig) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<Member>,
    {
        config.validate()?;

        let mut state = RingState::empty();
        for member in members {
            let member = member.into();
            if state.members.contains_key(member.name()) {
                continue;
            }
            state
                .vnodes
                .insert(config.hasher.as_ref(), &member, config.replication_factor)?;
            state.members.insert(member.name().to_string(), member);
        }
        state.redistribute(&config)?;

        info!(
            members = state.members.len(),
            partitions = config.partition_count,
            replication_factor = config.replication_factor,
            load = config.load,
            "Created hash ring"
        );

        Ok(Self {
            config,
            state: RwLock::new(state),
        })
    }

    /// Create a ring with the default configuration.
    pub fn with_defaults<I>(members: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<Member>,
    {
        Self::new(members, RingConfig::default())
    }

    /// The configuration this ring was built with.
    pub fn config(&self) -> &RingConfig {
        &self.config
    }

    /// Number of partitions.
    pub fn partition_count(&self) -> usize {
        self.config.partition_count
    }

    /// Add a member and redistribute partitions.
    ///
    /// Adding a member that is already present is a no-op. On error the
    /// ring is left exactly as it was before the call.
    ///
    /// Returns the partitions whose owner changed.
    pub fn add(&self, member: impl Into<Member>) -> Result<Vec<PartitionMove>> {
        let member = member.into();
        let mut state = self.state.write();

        if state.members.contains_key(member.name()) {
            debug!(member = %member, "Member already on ring");
            return Ok(Vec::new());
        }

        let mut next = state.clone();
        if let Err(e) = next.admit(&self.config, member.clone()) {
            warn!(member = %member, error = %e, "Rejected member add");
            return Err(e);
        }

        next.version += 1;
        let moves = state.table.moves_to(&next.table);
        *state = next;

        info!(
            member = %member,
            members = state.members.len(),
            moved = moves.len(),
            version = state.version,
            "Added member to ring"
        );
        Ok(moves)
    }

    /// Remove a member by name and redistribute partitions.
    ///
    /// Removing an unknown member is a no-op. Removing the last member
    /// clears the partition table. On error the ring is left exactly as it
    /// was before the call.
    ///
    /// Returns the partitions whose owner changed.
    pub fn remove(&self, name: &str) -> Result<Vec<PartitionMove>> {
        let mut state = self.state.write();

        if !state.members.contains_key(name) {
            debug!(member = name, "Member not on ring");
            return Ok(Vec::new());
        }

        let mut next = state.clone();
        if let Err(e) = next.evict(&self.config, name) {
            warn!(member = name, error = %e, "Rejected member removal");
            return Err(e);
        }

        next.version += 1;
        let moves = state.table.moves_to(&next.table);
        *state = next;

        info!(
            member = name,
            members = state.members.len(),
            moved = moves.len(),
            version = state.version,
            "Removed member from ring"
        );
        Ok(moves)
    }

    /// Snapshot of the current members, sorted by name.
    pub fn get_members(&self) -> Vec<Member> {
        self.state.read().members.values().cloned().collect()
    }

    /// Check if a member is on the ring.
    pub fn contains_member(&self, name: &str) -> bool {
        self.state.read().members.contains_key(name)
    }

    /// Number of members on the ring.
    pub fn member_count(&self) -> usize {
        self.state.read().members.len()
    }

    /// Number of virtual nodes on the ring.
    pub fn vnode_count(&self) -> usize {
        self.state.read().vnodes.len()
    }

    /// Monotonic counter bumped on every committed membership change.
    pub fn version(&self) -> u64 {
        self.state.read().version
    }

    /// Partition for a key: `hash(key) mod partition_count`.
    pub fn find_partition_id(&self, key: &[u8]) -> PartitionId {
        (self.config.hasher.hash(key) % self.config.partition_count as u64) as PartitionId
    }

    /// Owner of a partition.
    ///
    /// Returns `None` when the ring has no members or `partition` is out of
    /// range.
    pub fn get_partition_owner(&self, partition: PartitionId) -> Option<Member> {
        self.state.read().owner(partition).cloned()
    }

    /// Member responsible for a key.
    pub fn locate_key(&self, key: &[u8]) -> Option<Member> {
        self.get_partition_owner(self.find_partition_id(key))
    }

    /// `count` distinct members for replicating a key, owner first.
    ///
    /// Replicas are picked on the member-name hash ring, not on the virtual
    /// node ring, so they are independent of the partition layout.
    pub fn get_closest_n(&self, key: &[u8], count: usize) -> Result<Vec<Member>> {
        self.get_closest_n_for_partition(self.find_partition_id(key), count)
    }

    /// `count` distinct members for replicating a partition, owner first.
    pub fn get_closest_n_for_partition(
        &self,
        partition: PartitionId,
        count: usize,
    ) -> Result<Vec<Member>> {
        let state = self.state.read();
        replicas::closest_n(
            self.config.hasher.as_ref(),
            state.members.values(),
            state.owner(partition),
            count,
        )
    }

    /// Current per-member ceiling: `ceil(partition_count / members * load)`,
    /// or 0 without members.
    pub fn average_load(&self) -> f64 {
        self.state.read().average_load(&self.config)
    }

    /// Snapshot of partitions owned per member name.
    ///
    /// Every member is listed, including those that currently own nothing
    /// (possible when there are more members than partitions).
    pub fn load_distribution(&self) -> BTreeMap<String, f64> {
        let state = self.state.read();
        let loads = state.table.loads();
        state
            .members
            .keys()
            .map(|name| {
                let load = loads.get(name).copied().unwrap_or(0);
                (name.clone(), load as f64)
            })
            .collect()
    }

    /// Snapshot of the whole partition table, indexed by partition id.
    ///
    /// Empty when the ring has no members.
    pub fn partition_table(&self) -> Vec<Member> {
        self.state.read().table.owners().to_vec()
    }

    /// Partitions currently owned by a member, in ascending order.
    pub fn partitions_owned_by(&self, name: &str) -> Vec<PartitionId> {
        self.state.read().table.owned_by(name)
    }

    /// Check that every partition is owned when members exist.
    pub fn is_fully_assigned(&self) -> bool {
        let state = self.state.read();
        if state.members.is_empty() {
            return state.table.is_empty();
        }
        state.table.owners().len() == self.config.partition_count
    }
}

impl std::fmt::Debug for HashRing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("HashRing")
            .field("config", &self.config)
            .field("member_count", &state.members.len())
            .field("vnode_count", &state.vnodes.len())
            .field("version", &state.version)
            .finish()
    }
}
