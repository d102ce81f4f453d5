//! Consistent hashing with bounded loads over a fixed partition table.
//!
//! This crate provides an in-memory placement ring that maps arbitrary keys
//! to members of a dynamic set (cache servers, shards, workers):
//! - **Partitioning**: keys hash into a fixed number of partitions
//! - **Bounded loads**: partitions are assigned with consistent hashing, but
//!   no member may own more than `ceil(partitions / members * load)`
//! - **Replica selection**: pick N distinct members for a key
//!
//! Membership changes are local calls. Propagating them between processes
//! is left to the embedding service.
//!
//! # Example
//!
//! ```rust
//! use loadring::{HashRing, RingConfig};
//!
//! fn main() -> loadring::Result<()> {
//!     let config = RingConfig::new(71)
//!         .with_replication_factor(20)
//!         .with_load(1.25);
//!
//!     let ring = HashRing::new(["node-1", "node-2"], config)?;
//!
//!     // Returns the partitions that changed hands.
//!     let moves = ring.add("node-3")?;
//!     println!("{} partitions moved", moves.len());
//!
//!     if let Some(member) = ring.locate_key(b"my-key") {
//!         println!("my-key lives on {}", member);
//!     }
//!
//!     ring.remove("node-1")?;
//!     Ok(())
//! }
//! ```
//!
//! # Concurrency Model
//!
//! - **Reads**: shared lock, any number of concurrent readers
//! - **Add/Remove**: exclusive lock for the whole update and rebuild
//! - **Failed rebuilds**: rejected; the previous table stays in effect

pub mod config;
pub mod error;
pub mod partitioning;
pub mod testing;
pub mod types;

// Re-export main types for convenience
pub use config::{RingConfig, DEFAULT_LOAD, DEFAULT_PARTITION_COUNT, DEFAULT_REPLICATION_FACTOR};
pub use error::{Error, Result};
pub use partitioning::{HashRing, KeyHasher, XxHasher};
pub use types::{Member, PartitionId, PartitionMove};
