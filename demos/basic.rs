//! Basic example of using the bounded-load hash ring.
//!
//! This example shows how to:
//! - Build a ring with an initial set of members
//! - Route keys to members and pick replicas
//! - Add and remove members and inspect which partitions moved
//! - Inspect the load distribution
//!
//! Run with:
//!   RUST_LOG=loadring=debug cargo run --example basic

use loadring::{HashRing, RingConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "loadring=info".to_string()),
        )
        .init();

    let config = RingConfig::new(71)
        .with_replication_factor(20)
        .with_load(1.25);

    println!("Building ring with 3 members...");
    let ring = HashRing::new(["cache-1", "cache-2", "cache-3"], config)?;

    println!("\n--- Routing ---");
    for key in ["user:1", "user:2", "session:abc", "cart:42"] {
        let partition = ring.find_partition_id(key.as_bytes());
        let replicas = ring.get_closest_n(key.as_bytes(), 2)?;
        let names: Vec<&str> = replicas.iter().map(|m| m.name()).collect();
        println!("  {:<12} -> partition {:>2}, replicas {:?}", key, partition, names);
    }

    print_loads(&ring);

    println!("\n--- Adding cache-4 ---");
    let moves = ring.add("cache-4")?;
    println!("  {} partitions moved", moves.len());
    for mv in moves.iter().take(5) {
        println!("    {}", mv);
    }
    print_loads(&ring);

    println!("\n--- Removing cache-2 ---");
    let moves = ring.remove("cache-2")?;
    println!("  {} partitions moved", moves.len());
    print_loads(&ring);

    match ring.get_closest_n(b"user:1", 5) {
        Ok(replicas) => println!("\nGot {} replicas", replicas.len()),
        Err(e) => println!("\nCannot pick 5 replicas: {}", e),
    }

    Ok(())
}

fn print_loads(ring: &HashRing) {
    println!("\nLoad distribution (ceiling {}):", ring.average_load());
    for (name, load) in ring.load_distribution() {
        println!("  {:<8} {}", name, load);
    }
}
