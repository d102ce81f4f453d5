//! Partitioning module for distributing keys across ring members.
//!
//! Keys are first hashed into a fixed number of partitions; partitions are
//! then assigned to members with consistent hashing with bounded loads,
//! ensuring:
//! - Minimal partition movement when members join/leave
//! - No member owns more than `ceil(partitions / members * load)` partitions
//! - Deterministic placement: the table depends only on the current roster
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         HashRing                             │
//! │                  (one RwLock over the state)                 │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │                    VirtualRing                         │  │
//! │  │  ┌─────┐ ┌─────┐ ┌─────┐ ┌─────┐ ┌─────┐ ┌─────┐       │  │
//! │  │  │ 0a  │→│ 1b  │→│ 0c  │→│ 2a  │→│ 1c  │→│ 2b  │ → …   │  │
//! │  │  └─────┘ └─────┘ └─────┘ └─────┘ └─────┘ └─────┘       │  │
//! │  │        replication_factor virtual nodes per member     │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! │                            │ bounded-load walk               │
//! │                            ▼                                 │
//! │  PartitionTable: [p0 → a, p1 → c, p2 → b, …] + load counts   │
//! │                                                              │
//! │  Key "user:123" → hash mod partitions → p2 → member b        │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use loadring::partitioning::HashRing;
//! use loadring::RingConfig;
//!
//! let ring = HashRing::new(["cache-1", "cache-2", "cache-3"], RingConfig::default()).unwrap();
//!
//! let owner = ring.locate_key(b"user:123").unwrap();
//! let replicas = ring.get_closest_n(b"user:123", 2).unwrap();
//! assert_eq!(replicas[0], owner);
//! ```

mod distribution;
mod hasher;
mod hashring;
mod replicas;
mod vnodes;

pub use hasher::{KeyHasher, XxHasher};
pub use hashring::HashRing;
