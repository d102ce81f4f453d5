//! Configuration types for the partitioning ring.

use crate::error::{Error, Result};
use crate::partitioning::{KeyHasher, XxHasher};
use std::fmt;
use std::sync::Arc;

/// Default number of partitions. A prime spreads keys more uniformly.
pub const DEFAULT_PARTITION_COUNT: usize = 271;

/// Default number of virtual nodes per member.
pub const DEFAULT_REPLICATION_FACTOR: usize = 20;

/// Default load factor.
pub const DEFAULT_LOAD: f64 = 1.25;

/// Main configuration for a [`HashRing`](crate::HashRing).
///
/// Immutable once the ring is constructed.
#[derive(Clone)]
pub struct RingConfig {
    /// Hash function used for virtual nodes, partitions, keys and member names.
    pub hasher: Arc<dyn KeyHasher>,

    /// Number of partitions keys are bucketed into.
    /// Pick a larger value if you expect many keys.
    pub partition_count: usize,

    /// Number of virtual nodes each member places on the ring.
    pub replication_factor: usize,

    /// Multiplier (>= 1.0) over the perfectly even share that a member may
    /// own before it is skipped during partition assignment.
    pub load: f64,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            hasher: Arc::new(XxHasher::default()),
            partition_count: DEFAULT_PARTITION_COUNT,
            replication_factor: DEFAULT_REPLICATION_FACTOR,
            load: DEFAULT_LOAD,
        }
    }
}

impl RingConfig {
    /// Create a configuration with the given partition count and defaults
    /// for everything else.
    pub fn new(partition_count: usize) -> Self {
        Self {
            partition_count,
            ..Default::default()
        }
    }

    /// Set the hash function.
    pub fn with_hasher(mut self, hasher: impl KeyHasher + 'static) -> Self {
        self.hasher = Arc::new(hasher);
        self
    }

    /// Set the partition count.
    pub fn with_partition_count(mut self, partition_count: usize) -> Self {
        self.partition_count = partition_count;
        self
    }

    /// Set the number of virtual nodes per member.
    pub fn with_replication_factor(mut self, replication_factor: usize) -> Self {
        self.replication_factor = replication_factor;
        self
    }

    /// Set the load factor.
    pub fn with_load(mut self, load: f64) -> Self {
        self.load = load;
        self
    }

    /// Check that the configuration can produce a partition table.
    pub fn validate(&self) -> Result<()> {
        if self.partition_count == 0 {
            return Err(Error::Config("partition_count must be greater than 0".into()));
        }
        if self.replication_factor == 0 {
            return Err(Error::Config(
                "replication_factor must be greater than 0".into(),
            ));
        }
        if !self.load.is_finite() || self.load < 1.0 {
            return Err(Error::Config(format!(
                "load must be a finite value >= 1.0, got {}",
                self.load
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for RingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingConfig")
            .field("partition_count", &self.partition_count)
            .field("replication_factor", &self.replication_factor)
            .field("load", &self.load)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RingConfig::default();
        assert_eq!(config.partition_count, 271);
        assert_eq!(config.replication_factor, 20);
        assert_eq!(config.load, 1.25);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = RingConfig::new(7)
            .with_replication_factor(3)
            .with_load(1.5)
            .with_hasher(|data: &[u8]| data.len() as u64);

        assert_eq!(config.partition_count, 7);
        assert_eq!(config.replication_factor, 3);
        assert_eq!(config.load, 1.5);
        assert_eq!(config.hasher.hash(b"abc"), 3);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(matches!(
            RingConfig::new(0).validate(),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            RingConfig::default().with_replication_factor(0).validate(),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            RingConfig::default().with_load(0.9).validate(),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            RingConfig::default().with_load(f64::NAN).validate(),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_debug_omits_hasher() {
        let rendered = format!("{:?}", RingConfig::default());
        assert!(rendered.starts_with("RingConfig {"));
        assert!(rendered.contains("partition_count: 271"));
        assert!(!rendered.contains("hasher"));
    }
}
