//! Testing utilities for the partitioning ring.
//!
//! This module provides helpers for checking ring invariants from tests in
//! this crate and in embedding services:
//! - [`RingAssertions`] verifies that table, loads and roster agree
//! - [`member_names`] generates predictable member names
//!
//! # Example
//!
//! ```rust
//! use loadring::testing::{member_names, RingAssertions};
//! use loadring::HashRing;
//!
//! let ring = HashRing::with_defaults(member_names("cache", 4)).unwrap();
//! ring.remove("cache-2").unwrap();
//! RingAssertions::assert_consistent(&ring);
//! ```

use crate::partitioning::HashRing;
use std::collections::{BTreeMap, BTreeSet};

#[cfg(test)]
mod ring_properties_tests;

/// Generate `count` names of the form `"{prefix}-{i}"`.
pub fn member_names(prefix: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{}-{}", prefix, i)).collect()
}

/// Invariant checks over a [`HashRing`].
///
/// The checks read several snapshots one after another, so they must not
/// race with concurrent membership changes.
pub struct RingAssertions;

impl RingAssertions {
    /// Assert that roster, partition table and load counts are consistent.
    pub fn assert_consistent(ring: &HashRing) {
        let members: BTreeSet<String> = ring
            .get_members()
            .into_iter()
            .map(|member| member.name().to_string())
            .collect();
        let table = ring.partition_table();
        let loads = ring.load_distribution();

        if members.is_empty() {
            assert!(table.is_empty(), "empty ring must have an empty table");
            assert!(loads.is_empty(), "empty ring must have no loads");
            assert_eq!(ring.average_load(), 0.0);
            return;
        }

        assert_eq!(
            table.len(),
            ring.partition_count(),
            "every partition must be assigned"
        );

        let mut counted: BTreeMap<String, f64> =
            members.iter().map(|name| (name.clone(), 0.0)).collect();
        for owner in &table {
            assert!(
                members.contains(owner.name()),
                "owner {} is not a member",
                owner
            );
            *counted.entry(owner.name().to_string()).or_insert(0.0) += 1.0;
        }
        assert_eq!(counted, loads, "load counts must match the table");

        Self::assert_load_bound(ring);
    }

    /// Assert that no member exceeds the current load ceiling.
    pub fn assert_load_bound(ring: &HashRing) {
        let ceiling = ring.average_load();
        for (name, load) in ring.load_distribution() {
            assert!(
                load <= ceiling,
                "member {} owns {} partitions, ceiling is {}",
                name,
                load,
                ceiling
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_names() {
        assert_eq!(member_names("n", 3), vec!["n-0", "n-1", "n-2"]);
        assert!(member_names("n", 0).is_empty());
    }

    #[test]
    fn test_assertions_accept_valid_rings() {
        let ring = HashRing::with_defaults(member_names("n", 3)).unwrap();
        RingAssertions::assert_consistent(&ring);

        let empty = HashRing::with_defaults(Vec::<String>::new()).unwrap();
        RingAssertions::assert_consistent(&empty);
    }
}
