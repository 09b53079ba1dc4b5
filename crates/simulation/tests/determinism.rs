//! Tests for deterministic simulation.
//!
//! The same topology, configuration and seed must reproduce identical
//! metrics, which is what makes runs comparable and replayable.

use floodsim_simulation::{run_with_config, ForwardingSchedule, SimulationConfig};
use floodsim_types::{NodeId, Role, Topology};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Ring of `n` nodes with a hub sink connected to every third node.
fn ring_with_hub(n: u32) -> Topology {
    let mut topology = Topology::new();
    topology.add_node(NodeId(0), Role::Sink).unwrap();
    for id in 1..=n {
        topology.add_node(NodeId(id), Role::Sensor).unwrap();
    }
    for id in 1..=n {
        let next = if id == n { 1 } else { id + 1 };
        topology.add_edge(NodeId(id), NodeId(next)).unwrap();
        if id % 3 == 0 {
            topology.add_edge(NodeId(0), NodeId(id)).unwrap();
        }
    }
    topology
}

#[test]
fn test_determinism_same_seed() {
    let topology = ring_with_hub(12);
    let config = SimulationConfig::new(250.0);

    let first = run_with_config(&topology, &config, ChaCha8Rng::seed_from_u64(12345)).unwrap();
    let second = run_with_config(&topology, &config, ChaCha8Rng::seed_from_u64(12345)).unwrap();

    assert_eq!(first.metrics, second.metrics, "Same seed should produce same metrics");
    assert_eq!(first.stats, second.stats, "Same seed should produce same stats");
}

#[test]
fn test_determinism_sequential_schedule() {
    let topology = ring_with_hub(9);
    let config = SimulationConfig::new(150.0).with_forwarding(ForwardingSchedule::Sequential);

    let first = run_with_config(&topology, &config, ChaCha8Rng::seed_from_u64(7)).unwrap();
    let second = run_with_config(&topology, &config, ChaCha8Rng::seed_from_u64(7)).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_different_seeds_diverge() {
    let topology = ring_with_hub(12);
    let config = SimulationConfig::new(250.0);

    let first = run_with_config(&topology, &config, ChaCha8Rng::seed_from_u64(111)).unwrap();
    let second = run_with_config(&topology, &config, ChaCha8Rng::seed_from_u64(222)).unwrap();

    assert_ne!(
        first.metrics, second.metrics,
        "Different seeds should produce different arrival patterns"
    );
}
