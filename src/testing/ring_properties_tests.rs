//! Scenario tests over whole membership histories.

use crate::testing::{member_names, RingAssertions};
use crate::{Error, HashRing, Member, RingConfig};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("loadring=debug")
        .with_test_writer()
        .try_init();
}

#[test]
fn test_table_depends_only_on_membership() {
    init_tracing();
    let config = RingConfig::default();

    let ring = HashRing::new(["A", "B", "C"], config.clone()).unwrap();
    ring.remove("B").unwrap();
    ring.add("B").unwrap();

    let fresh = HashRing::new(["A", "B", "C"], config.clone()).unwrap();
    let reordered = HashRing::new(["C", "A", "B"], config).unwrap();

    assert_eq!(ring.partition_table(), fresh.partition_table());
    assert_eq!(ring.partition_table(), reordered.partition_table());
    assert_eq!(ring.load_distribution(), fresh.load_distribution());
}

#[test]
fn test_incremental_build_equals_bulk_build() {
    init_tracing();
    let names = member_names("node", 6);

    let incremental = HashRing::with_defaults(Vec::<Member>::new()).unwrap();
    for name in &names {
        incremental.add(name.as_str()).unwrap();
    }
    let bulk = HashRing::with_defaults(names).unwrap();

    assert_eq!(incremental.partition_table(), bulk.partition_table());
}

#[test]
fn test_load_bound_through_membership_churn() {
    init_tracing();
    let ring = HashRing::with_defaults(Vec::<Member>::new()).unwrap();
    let names = member_names("cache", 12);

    // Grow, shrink and regrow in an interleaved order.
    for name in &names {
        ring.add(name.as_str()).unwrap();
        RingAssertions::assert_consistent(&ring);
    }
    for name in names.iter().step_by(3) {
        ring.remove(name).unwrap();
        RingAssertions::assert_consistent(&ring);
    }
    for name in names.iter().step_by(3) {
        ring.add(name.as_str()).unwrap();
        RingAssertions::assert_consistent(&ring);
    }
    for name in names.iter().rev() {
        ring.remove(name).unwrap();
        RingAssertions::assert_consistent(&ring);
    }

    assert_eq!(ring.member_count(), 0);
}

#[test]
fn test_tight_load_factor_still_balances() {
    init_tracing();
    // load = 1.0 with 271 partitions and 10 members caps everyone at 28.
    let config = RingConfig::default().with_load(1.0);
    let ring = HashRing::new(member_names("n", 10), config).unwrap();

    assert_eq!(ring.average_load(), 28.0);
    RingAssertions::assert_consistent(&ring);
}

#[test]
fn test_small_configuration_scenario() {
    init_tracing();
    let config = RingConfig::new(7).with_replication_factor(3).with_load(1.25);
    let ring = HashRing::new(["A", "B"], config).unwrap();

    assert_eq!(ring.average_load(), 5.0);
    let loads = ring.load_distribution();
    assert!(loads.values().all(|&load| load <= 5.0));
    assert_eq!(loads.values().sum::<f64>(), 7.0);
    RingAssertions::assert_consistent(&ring);
}

#[test]
fn test_empty_roster_reset() {
    init_tracing();
    let ring = HashRing::with_defaults(member_names("n", 3)).unwrap();
    for name in member_names("n", 3) {
        ring.remove(&name).unwrap();
    }

    for partition in 0..ring.partition_count() {
        assert!(ring.get_partition_owner(partition).is_none());
    }
    assert!(ring.locate_key(b"anything").is_none());
    assert_eq!(ring.average_load(), 0.0);
    assert!(matches!(
        ring.get_closest_n(b"anything", 1),
        Err(Error::InsufficientMemberCount { requested: 1, available: 0 })
    ));
}

#[test]
fn test_adding_member_keeps_most_placements() {
    init_tracing();
    let ring = HashRing::with_defaults(member_names("n", 4)).unwrap();

    let moves = ring.add("n-4").unwrap();

    assert!(!moves.is_empty());
    assert!(moves.len() < ring.partition_count());
    assert!(!ring.partitions_owned_by("n-4").is_empty());
    assert!(moves
        .iter()
        .all(|mv| mv.from.is_some() && mv.to.is_some()));
}

#[test]
fn test_replica_counts() {
    init_tracing();
    let ring = HashRing::with_defaults(member_names("n", 5)).unwrap();

    for n in 0..=5 {
        for i in 0..20 {
            let key = format!("key-{}", i);
            let replicas = ring.get_closest_n(key.as_bytes(), n).unwrap();
            assert_eq!(replicas.len(), n);

            let mut unique = replicas.clone();
            unique.sort();
            unique.dedup();
            assert_eq!(unique.len(), n, "replicas for {} not distinct", key);
        }
    }

    assert!(matches!(
        ring.get_closest_n(b"key", 6),
        Err(Error::InsufficientMemberCount { requested: 6, available: 5 })
    ));
}

fn polynomial(data: &[u8]) -> u64 {
    data.iter()
        .fold(0u64, |acc, &b| acc.wrapping_mul(31).wrapping_add(b as u64))
}

#[test]
fn test_custom_hasher_is_used_for_partitions() {
    init_tracing();
    let config = RingConfig::new(13).with_hasher(polynomial);
    let ring = HashRing::new(["a", "b"], config).unwrap();

    assert_eq!(ring.find_partition_id(b"abc"), (polynomial(b"abc") % 13) as usize);
    assert_eq!(ring.find_partition_id(b""), 0);
    RingAssertions::assert_consistent(&ring);
}

#[test]
fn test_numeric_member_names() {
    init_tracing();
    let names: Vec<String> = (1..=20).map(|i| i.to_string()).collect();

    let ring = HashRing::with_defaults(names.clone()).unwrap();

    assert_eq!(ring.member_count(), 20);
    assert_eq!(ring.vnode_count(), 400);
    RingAssertions::assert_consistent(&ring);

    // Adding one at a time reaches the same table.
    let incremental = HashRing::with_defaults(Vec::<Member>::new()).unwrap();
    for name in names.iter().rev() {
        incremental.add(name.as_str()).unwrap();
    }
    assert_eq!(incremental.partition_table(), ring.partition_table());
}
