//! End-to-end betweenness runs across device counts and configurations.

mod common;

use std::sync::Arc;

use centra_common::Error;
use centra_common::types::VertexId;
use centra_core::graph::Graph;
use centra_core::traversal::bfs;
use centra_engine::{
    BetweennessConfig, Engine, LocalDevices, PartitionStrategy, betweenness_centrality,
};

use common::{
    EPSILON, barbell, compare_scores, directed_rmat, reference_betweenness, undirected_rmat,
    with_small_weights,
};

const SEED: u64 = 42;

fn engine(devices: usize) -> (Engine, Arc<LocalDevices>) {
    let provider = Arc::new(LocalDevices::new(devices));
    (Engine::new(provider.clone()), provider)
}

fn run(engine: &Engine, graph: &Graph, config: &BetweennessConfig) -> Vec<f64> {
    engine
        .betweenness_centrality(graph, config)
        .unwrap()
        .into_vec()
}

#[test]
fn test_matches_reference_directed() {
    let graph = directed_rmat(6, 3);
    let (engine, _) = engine(1);
    let config = BetweennessConfig::new().with_normalized(false);

    let scores = run(&engine, &graph, &config);
    let reference = reference_betweenness(&graph);
    assert_eq!(compare_scores(&scores, &reference, EPSILON), 0);
}

#[test]
fn test_matches_reference_undirected() {
    let graph = undirected_rmat(6, 5);
    let (engine, _) = engine(1);
    let config = BetweennessConfig::new().with_normalized(false);

    let scores = run(&engine, &graph, &config);
    let reference: Vec<f64> = reference_betweenness(&graph)
        .into_iter()
        .map(|x| x * 0.5)
        .collect();
    assert_eq!(compare_scores(&scores, &reference, EPSILON), 0);
}

#[test]
fn test_device_count_invariance() {
    let (engine, _) = engine(4);
    let unweighted = [undirected_rmat(6, 1), directed_rmat(6, 2)];
    let weighted = [
        with_small_weights(&undirected_rmat(6, 3)),
        with_small_weights(&directed_rmat(6, 4)),
    ];
    let cases = unweighted
        .iter()
        .map(|g| (g, false))
        .chain(weighted.iter().map(|g| (g, true)));

    for (graph, use_weights) in cases {
        for subset_size in [Some(4), None] {
            for normalized in [false, true] {
                for endpoints in [false, true] {
                    let mut base = BetweennessConfig::new()
                        .with_normalized(normalized)
                        .with_endpoints(endpoints)
                        .with_weights(use_weights)
                        .with_seed(SEED);
                    base.subset_size = subset_size;

                    let single = run(&engine, graph, &base);
                    for devices in 2..=4 {
                        let multi = run(&engine, graph, &base.clone().with_devices(devices));
                        assert_eq!(
                            compare_scores(&single, &multi, EPSILON),
                            0,
                            "devices={devices} weights={use_weights} subset={subset_size:?} normalized={normalized} endpoints={endpoints}"
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn test_partition_strategy_does_not_change_scores() {
    let graph = undirected_rmat(6, 8);
    let (engine, _) = engine(3);
    let config = BetweennessConfig::new().with_devices(3).with_subset_size(20).with_seed(SEED);

    let contiguous = run(&engine, &graph, &config);
    let round_robin = run(
        &engine,
        &graph,
        &config.clone().with_partition(PartitionStrategy::RoundRobin),
    );
    assert_eq!(compare_scores(&contiguous, &round_robin, EPSILON), 0);
}

#[test]
fn test_full_subset_equals_exact() {
    let graph = directed_rmat(5, 4);
    let (engine, _) = engine(2);
    let exact = BetweennessConfig::new().with_devices(2);
    let full = exact.clone().with_subset_size(graph.vertex_count()).with_seed(SEED);

    assert_eq!(run(&engine, &graph, &exact), run(&engine, &graph, &full));
}

#[test]
fn test_sampling_is_deterministic() {
    let graph = undirected_rmat(7, 6);
    let (engine, _) = engine(4);
    let config = BetweennessConfig::new()
        .with_subset_size(16)
        .with_seed(SEED)
        .with_devices(3);

    let first = run(&engine, &graph, &config);
    let second = run(&engine, &graph, &config);
    assert_eq!(first, second);

    let other_seed = run(&engine, &graph, &config.clone().with_seed(SEED + 1));
    assert_ne!(first, other_seed);
}

#[test]
fn test_normalized_scores_within_unit_interval() {
    let graph = undirected_rmat(6, 9);
    let (engine, _) = engine(2);
    let scores = run(&engine, &graph, &BetweennessConfig::new().with_devices(2));

    assert!(scores.iter().all(|&x| (0.0..=1.0 + 1e-12).contains(&x)));
}

#[test]
fn test_endpoints_never_decrease_raw_scores() {
    let graph = directed_rmat(6, 10);
    let (engine, _) = engine(2);
    let without = BetweennessConfig::new().with_normalized(false).with_devices(2);
    let with = without.clone().with_endpoints(true);

    let a = run(&engine, &graph, &without);
    let b = run(&engine, &graph, &with);
    assert!(a.iter().zip(&b).all(|(x, y)| y + 1e-12 >= *x));
}

#[test]
fn test_directed_chain() {
    let graph = Graph::from_edges(5, &[(0, 1), (1, 2), (2, 3), (3, 4)], true).unwrap();
    let (engine, _) = engine(1);
    let scores = run(&engine, &graph, &BetweennessConfig::new().with_normalized(false));

    let expected = [0.0, 3.0, 4.0, 3.0, 0.0];
    assert_eq!(compare_scores(&scores, &expected, 1e-6), 0);
}

#[test]
fn test_bridge_vertices_rank_highest() {
    let graph = barbell();
    let (engine, _) = engine(2);
    let scores = engine
        .betweenness_centrality(&graph, &BetweennessConfig::new().with_devices(2))
        .unwrap();

    let mut top: Vec<VertexId> = scores.top_k(2).into_iter().map(|(v, _)| v).collect();
    top.sort();
    assert_eq!(top, vec![VertexId::new(4), VertexId::new(5)]);
}

#[test]
fn test_insufficient_devices_returns_no_scores() {
    let (engine, provider) = engine(2);
    let graph = undirected_rmat(5, 1);
    let result = engine.betweenness_centrality(&graph, &BetweennessConfig::new().with_devices(8));

    assert_eq!(
        result,
        Err(Error::InsufficientDevices {
            requested: 8,
            available: 2
        })
    );
    assert_eq!(provider.free_count(), 2);
    assert_eq!(provider.active_groups(), 0);
}

#[test]
fn test_peer_access_unavailable() {
    let provider = Arc::new(LocalDevices::new(4).without_peer_access());
    let engine = Engine::new(provider.clone());
    let graph = undirected_rmat(4, 1);
    let config = BetweennessConfig::new().with_devices(2).with_peer_to_peer(true);

    assert_eq!(
        engine.betweenness_centrality(&graph, &config),
        Err(Error::PeerAccessUnavailable(2))
    );
    assert_eq!(provider.free_count(), 4);

    // Without peer links the same provider runs fine.
    assert!(engine
        .betweenness_centrality(&graph, &config.with_peer_to_peer(false))
        .is_ok());
}

#[test]
fn test_shard_failure_tears_down() {
    // Layers of two vertices fully linked to the next layer: path counts
    // from the first layers overflow f64.
    let layers = 1030u32;
    let mut edges = Vec::new();
    for layer in 0..layers - 1 {
        for a in 0..2 {
            for b in 0..2 {
                edges.push((layer * 2 + a, (layer + 1) * 2 + b));
            }
        }
    }
    let graph = Graph::from_edges((layers * 2) as usize, &edges, true).unwrap();
    let (engine, provider) = engine(2);

    let result = engine.betweenness_centrality(&graph, &BetweennessConfig::new().with_devices(2));

    match result {
        Err(Error::DeviceComputationFailure { device, reason }) => {
            assert_eq!(device, 0);
            assert!(reason.contains("overflow"), "{reason}");
        }
        other => panic!("expected a device failure, got {other:?}"),
    }
    assert_eq!(provider.free_count(), 2);
    assert_eq!(provider.active_groups(), 0);
}

#[test]
fn test_concurrent_runs_use_distinct_devices() {
    let provider = Arc::new(LocalDevices::new(4));
    let engine = Engine::new(provider.clone());
    let graph = undirected_rmat(6, 12);
    let config = BetweennessConfig::new().with_devices(2);

    let (a, b) = std::thread::scope(|s| {
        let a = s.spawn(|| run(&engine, &graph, &config));
        let b = s.spawn(|| run(&engine, &graph, &config));
        (a.join().unwrap(), b.join().unwrap())
    });

    assert_eq!(a, b);
    assert_eq!(provider.free_count(), 4);
}

#[test]
fn test_weighted_prefers_light_paths() {
    // Square 0-1-2-3-0 with heavy sides 2-3 and 3-0.
    let graph = Graph::from_weighted_edges(
        4,
        &[(0, 1, 1.0), (1, 2, 1.0), (2, 3, 5.0), (3, 0, 5.0)],
        false,
    )
    .unwrap();
    let (engine, _) = engine(2);
    let config = BetweennessConfig::new()
        .with_normalized(false)
        .with_weights(true)
        .with_devices(2);
    let weighted = run(&engine, &graph, &config);
    let hops = run(&engine, &graph, &config.clone().with_weights(false));

    // Hop counts see a symmetric 4-cycle.
    assert_eq!(compare_scores(&hops, &[0.5, 0.5, 0.5, 0.5], 1e-9), 0);
    // Weighted: 0-2 runs through 1; 1-3 splits between 1-0-3 and 1-2-3.
    assert_eq!(compare_scores(&weighted, &[0.5, 1.0, 0.5, 0.0], 1e-9), 0);
}

#[test]
fn test_unit_weights_match_unweighted() {
    let base = undirected_rmat(5, 7);
    let edges: Vec<(u32, u32, f64)> = base
        .arc_list()
        .filter(|(s, t, _)| s <= t)
        .map(|(s, t, _)| (s.as_u32(), t.as_u32(), 1.0))
        .collect();
    let weighted = Graph::from_weighted_edges(base.vertex_count(), &edges, false).unwrap();
    let (engine, _) = engine(2);
    let config = BetweennessConfig::new().with_devices(2);

    let a = run(&engine, &base, &config);
    let b = run(&engine, &weighted, &config.clone().with_weights(true));
    assert_eq!(compare_scores(&a, &b, EPSILON), 0);
}

#[test]
fn test_edge_scores_sum_to_total_distance() {
    // Every shortest path of length d crosses d edges, so raw directed edge
    // betweenness sums to the sum of all pairwise hop distances.
    let graph = directed_rmat(6, 11);
    let (engine, _) = engine(3);
    let config = BetweennessConfig::new().with_normalized(false).with_devices(3);
    let edges = engine.edge_betweenness_centrality(&graph, &config).unwrap();

    let total: f64 = edges.as_slice().iter().map(|e| e.score).sum();
    let distances: u64 = graph
        .vertices()
        .map(|s| {
            bfs(&graph, s, None)
                .unwrap()
                .distances
                .iter()
                .flatten()
                .map(|&d| u64::from(d))
                .sum::<u64>()
        })
        .sum();

    assert!((total - distances as f64).abs() < 1e-6 * total.max(1.0));
    assert_eq!(edges.len(), graph.edge_count());
}

#[test]
fn test_edge_scores_device_invariant() {
    let graph = undirected_rmat(6, 13);
    let (engine, _) = engine(4);
    let config = BetweennessConfig::new().with_subset_size(10).with_seed(SEED);

    let single = engine.edge_betweenness_centrality(&graph, &config).unwrap();
    let multi = engine
        .edge_betweenness_centrality(&graph, &config.clone().with_devices(4))
        .unwrap();

    let a: Vec<f64> = single.as_slice().iter().map(|e| e.score).collect();
    let b: Vec<f64> = multi.as_slice().iter().map(|e| e.score).collect();
    assert_eq!(compare_scores(&a, &b, EPSILON), 0);
}

#[test]
fn test_free_function_runs_locally() {
    let graph = Graph::from_edges(3, &[(0, 1), (1, 2)], false).unwrap();
    let scores = betweenness_centrality(&graph, &BetweennessConfig::new()).unwrap();

    assert_eq!(scores.as_slice(), &[0.0, 1.0, 0.0]);
}
