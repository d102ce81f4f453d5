//! Core types used throughout the ring.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a partition in `[0, partition_count)`.
pub type PartitionId = usize;

/// A named participant eligible to own partitions.
///
/// Members are plain values compared by name. Services that need to attach
/// addresses or capacities keep that data in their own maps keyed by
/// [`Member::name`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Member {
    name: String,
}

impl Member {
    /// Create a member with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The unique name of this member.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<&str> for Member {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Member {
    fn from(name: String) -> Self {
        Self { name }
    }
}

/// A partition whose owner changed as the result of a membership change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionMove {
    /// The partition that changed hands.
    pub partition: PartitionId,

    /// Owner before the change (`None` if the table was empty).
    pub from: Option<Member>,

    /// Owner after the change (`None` if the table is now empty).
    pub to: Option<Member>,
}

impl fmt::Display for PartitionMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let from = self.from.as_ref().map(Member::name).unwrap_or("-");
        let to = self.to.as_ref().map(Member::name).unwrap_or("-");
        write!(f, "partition {}: {} -> {}", self.partition, from, to)
    }
}
