//! Error types for the partitioning ring.

use thiserror::Error;

/// Result type alias for ring operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the partitioning ring.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A replica request asked for more distinct members than exist.
    ///
    /// Recoverable: retry with a smaller count or wait for more members.
    #[error("insufficient member count: requested {requested}, available {available}")]
    InsufficientMemberCount { requested: usize, available: usize },

    /// The bounded-load walk could not place a partition within one full
    /// traversal of the ring.
    ///
    /// The mutation that triggered the rebuild is rejected and the previous
    /// partition table stays in effect.
    #[error(
        "not enough room to distribute partition {partition} across {members} members \
         (partition_count={partition_count}, replication_factor={replication_factor}, load={load})"
    )]
    ConfigurationExhausted {
        partition: usize,
        members: usize,
        partition_count: usize,
        replication_factor: usize,
        load: f64,
    },

    /// A virtual node of the member being added hashed onto an occupied slot.
    #[error("virtual node collision at {hash:#018x}: {member} collides with {existing}")]
    VirtualNodeCollision {
        member: String,
        existing: String,
        hash: u64,
    },

    /// Configuration errors.
    #[error("config error: {0}")]
    Config(String),
}

impl Error {
    /// Whether the caller can reasonably retry the same operation later.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::InsufficientMemberCount { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_member_count_is_recoverable() {
        let err = Error::InsufficientMemberCount {
            requested: 4,
            available: 2,
        };
        assert!(err.is_recoverable());
        assert_eq!(
            err.to_string(),
            "insufficient member count: requested 4, available 2"
        );
    }

    #[test]
    fn test_exhaustion_is_not_recoverable() {
        let err = Error::ConfigurationExhausted {
            partition: 3,
            members: 2,
            partition_count: 7,
            replication_factor: 1,
            load: 1.0,
        };
        assert!(!err.is_recoverable());
        assert!(err.to_string().contains("partition 3"));
    }

    #[test]
    fn test_collision_message_names_both_members() {
        let err = Error::VirtualNodeCollision {
            member: "b".into(),
            existing: "a".into(),
            hash: 42,
        };
        let msg = err.to_string();
        assert!(msg.contains("b collides with a"));
        assert!(msg.contains("0x000000000000002a"));
    }
}
