//! Integration tests for grafcolor-graph.

use rand::rngs::StdRng;
use rand::SeedableRng;

use grafcolor_graph::generators::{complete_graph, cycle_graph, path_graph, random_graph};
use grafcolor_graph::{
    get_bit, marshall, marshall_groups, AdjacencyMatrix, BitMatrix, Graph, NonAdjacencyGroups,
};
use grafcolor_types::{GrafcolorError, VertexId};

fn abc_path() -> Graph {
    let mut graph = Graph::new();
    let a = graph.add_vertex("A");
    let b = graph.add_vertex("B");
    let c = graph.add_vertex("C");
    graph.add_edge(a, b);
    graph.add_edge(b, c);
    graph
}

// ─── Graph Tests ──────────────────────────────────────────────

#[test]
fn add_vertex_is_idempotent() {
    let mut graph = Graph::new();
    let a = graph.add_vertex("A");
    let b = graph.add_vertex("B");
    assert_eq!(graph.add_vertex("A"), a);
    assert_eq!(a, VertexId(0));
    assert_eq!(b, VertexId(1));
    assert_eq!(graph.vertex_count(), 2);
}

#[test]
fn name_id_mapping() {
    let graph = abc_path();
    assert_eq!(graph.id_of("B"), Some(VertexId(1)));
    assert_eq!(graph.name_of(VertexId(2)), Some("C"));
    assert_eq!(graph.id_of("Z"), None);
    assert_eq!(graph.name_of(VertexId(3)), None);
}

#[test]
fn edges_are_symmetric() {
    let graph = abc_path();
    assert!(graph.is_edge(VertexId(0), VertexId(1)));
    assert!(graph.is_edge(VertexId(1), VertexId(0)));
    assert!(!graph.is_edge(VertexId(0), VertexId(2)));
}

#[test]
fn duplicate_edge_recorded_once() {
    let mut graph = abc_path();
    assert!(graph.add_edge(VertexId(1), VertexId(0)));
    assert!(graph.add_edge(VertexId(0), VertexId(1)));
    assert_eq!(graph.edge_count(), 2);
    assert_eq!(graph.edges(), &[(VertexId(0), VertexId(1)), (VertexId(1), VertexId(2))]);
}

#[test]
fn out_of_range_edge_rejected() {
    let mut graph = abc_path();
    assert!(!graph.add_edge(VertexId(0), VertexId(3)));
    assert!(!graph.add_edge(VertexId(7), VertexId(1)));
    assert_eq!(graph.edge_count(), 2);
}

#[test]
fn self_loop_not_stored() {
    let mut graph = abc_path();
    assert!(!graph.add_edge(VertexId(1), VertexId(1)));
    assert!(!graph.is_edge(VertexId(1), VertexId(1)));
    assert_eq!(graph.degree(VertexId(1)).unwrap(), 2);
}

#[test]
fn degree_of_invalid_id() {
    let graph = abc_path();
    match graph.degree(VertexId(5)) {
        Err(GrafcolorError::InvalidVertexId { id, size }) => {
            assert_eq!(id, 5);
            assert_eq!(size, 3);
        }
        other => panic!("expected InvalidVertexId, got {other:?}"),
    }
}

#[test]
fn handshake_invariant() {
    let mut rng = StdRng::seed_from_u64(11);
    let graph = random_graph(30, 0.4, &mut rng).unwrap();
    let degree_sum: usize = graph.degrees().iter().sum();
    assert_eq!(degree_sum, 2 * graph.edge_count());
}

#[test]
fn vertex_names_sorted() {
    let mut graph = Graph::new();
    graph.add_vertex("b");
    graph.add_vertex("c");
    graph.add_vertex("a");
    assert_eq!(graph.vertex_names(), vec!["a", "b", "c"]);
}

#[test]
fn max_degree() {
    assert_eq!(abc_path().max_degree(), 2);
    assert_eq!(complete_graph(5).max_degree(), 4);
    assert_eq!(Graph::new().max_degree(), 0);
}

// ─── Matrix Tests ─────────────────────────────────────────────

#[test]
fn dense_matrix_matches_is_edge() {
    let mut rng = StdRng::seed_from_u64(3);
    let graph = random_graph(12, 0.5, &mut rng).unwrap();
    let matrix = graph.adjacency_matrix().unwrap();
    let n = graph.vertex_count();
    assert_eq!(matrix.len(), n * n);

    for i in 0..n {
        for j in 0..n {
            let edge = graph.is_edge(VertexId(i as u32), VertexId(j as u32));
            assert_eq!(matrix.get(i, j) == 1, edge, "cell ({i}, {j})");
        }
    }
}

#[test]
fn bit_matrix_matches_dense_matrix() {
    let mut rng = StdRng::seed_from_u64(5);
    let graph = random_graph(13, 0.3, &mut rng).unwrap();
    let dense = graph.adjacency_matrix().unwrap();
    let bits = graph.adjacency_bit_matrix().unwrap();
    let n = graph.vertex_count();

    assert_eq!(bits.bit_count(), n * n);
    assert_eq!(bits.byte_len(), (n * n).div_ceil(8));
    for k in 0..n * n {
        assert_eq!(get_bit(bits.as_bytes(), k), dense.as_slice()[k] == 1);
    }
}

#[test]
fn path_bit_matrix_bytes() {
    // A-B, B-C: cells (0,1) (1,0) (1,2) (2,1) → offsets 1, 3, 5, 7
    let bits = abc_path().adjacency_bit_matrix().unwrap();
    assert_eq!(bits.as_bytes(), &[0b0101_0101, 0b0000_0000]);
}

#[test]
fn bit_matrix_from_bytes_checks_length() {
    assert!(BitMatrix::from_bytes(vec![0; 2], 3, 3).is_ok());
    assert!(BitMatrix::from_bytes(vec![0; 3], 3, 3).is_err());
}

#[test]
fn bit_matrix_row_copy() {
    let mut full = BitMatrix::zeroed(4, 4);
    let mut batch = BitMatrix::zeroed(2, 4);
    batch.set(0, 1, true);
    batch.set(1, 3, true);
    full.copy_rows_from(2, &batch);
    assert_eq!(full.row_members(2), vec![1]);
    assert_eq!(full.row_members(3), vec![3]);
    assert!(full.row_members(0).is_empty());
}

#[test]
fn empty_graph_reports_failure() {
    let graph = Graph::new();
    assert!(matches!(graph.adjacency_matrix(), Err(GrafcolorError::EmptyGraph)));
    assert!(matches!(graph.adjacency_bit_matrix(), Err(GrafcolorError::EmptyGraph)));
    assert!(matches!(graph.non_adjacency_matrix(), Err(GrafcolorError::EmptyGraph)));
    assert!(matches!(graph.non_adjacency_groups(), Err(GrafcolorError::EmptyGraph)));
    assert!(AdjacencyMatrix::build(&graph).is_err());
}

// ─── Non-Adjacency Tests ──────────────────────────────────────

#[test]
fn non_adjacency_excludes_self_and_neighbors() {
    let mut rng = StdRng::seed_from_u64(17);
    let graph = random_graph(20, 0.35, &mut rng).unwrap();
    let matrix = graph.non_adjacency_matrix().unwrap();
    let n = graph.vertex_count();

    for v in 0..n {
        let id = VertexId(v as u32);
        let degree = graph.degree(id).unwrap();
        assert_eq!(matrix.count(v), n - 1 - degree);

        let neighbors = graph.neighbors(id).unwrap();
        for &u in matrix.members(v) {
            assert_ne!(u as usize, v);
            assert!(!neighbors.contains(&u));
        }
    }
}

#[test]
fn non_adjacency_sorted_by_degree() {
    // Star center 0 with leaves 1..=3, plus edge 4-5 and isolated 6.
    let mut graph = Graph::new();
    for name in ["0", "1", "2", "3", "4", "5", "6"] {
        graph.add_vertex(name);
    }
    for leaf in 1..=3 {
        graph.add_edge(VertexId(0), VertexId(leaf));
    }
    graph.add_edge(VertexId(4), VertexId(5));

    let groups = graph.non_adjacency_groups().unwrap();
    // Group of 1: {2, 3, 4, 5, 6} with degrees 1, 1, 1, 1, 0
    assert_eq!(groups.group(1), &[6, 2, 3, 4, 5]);
}

#[test]
fn non_adjacency_matrix_row_layout() {
    let graph = abc_path();
    let matrix = graph.non_adjacency_matrix().unwrap();
    assert_eq!(matrix.row_width(), 4);
    // Row A: [1, C, 0, 0]; row B: all-adjacent, stays zero; row C: [1, A, 0, 0]
    assert_eq!(matrix.as_slice(), &[1, 2, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0]);
}

#[test]
fn complete_graph_has_empty_groups() {
    let groups = complete_graph(4).non_adjacency_groups().unwrap();
    assert_eq!(groups.len(), 4);
    assert_eq!(groups.total_members(), 0);
}

// ─── Marshalling Tests ────────────────────────────────────────

#[test]
fn marshall_offsets_are_prefix_sums() {
    let mut rng = StdRng::seed_from_u64(23);
    let graph = random_graph(15, 0.5, &mut rng).unwrap();
    let groups = graph.non_adjacency_groups().unwrap();
    let stream = marshall(&groups);

    assert_eq!(stream.vertex_count(), groups.len());
    assert_eq!(stream.total_size(), groups.total_members());
    assert_eq!(stream.offsets()[0], 0);

    let counts = groups.counts();
    for i in 0..groups.len() - 1 {
        let width = stream.offsets()[i + 1] - stream.offsets()[i];
        assert_eq!(width as usize, counts[i]);
    }

    let rebuilt: Vec<u32> = (0..groups.len()).flat_map(|i| stream.group(i).to_vec()).collect();
    assert_eq!(rebuilt, stream.flat());
    for i in 0..groups.len() {
        assert_eq!(stream.group(i), groups.group(i));
    }
}

#[test]
fn marshall_handles_empty_groups() {
    let groups = vec![vec![], vec![4, 2], vec![], vec![1], vec![]];
    let stream = marshall_groups(&groups, 5).unwrap();
    assert_eq!(stream.offsets(), &[0, 0, 2, 2, 3]);
    assert_eq!(stream.flat(), &[4, 2, 1]);
    assert_eq!(stream.count(0), 0);
    assert_eq!(stream.count(4), 0);
    assert!(stream.group(4).is_empty());
}

#[test]
fn marshall_rejects_wrong_group_count() {
    let groups = vec![vec![1], vec![0]];
    assert!(marshall_groups(&groups, 3).is_err());
}

#[test]
fn marshall_from_groups_wrapper() {
    let groups = NonAdjacencyGroups::from_groups(vec![vec![2], vec![], vec![0]]);
    let stream = marshall(&groups);
    assert_eq!(stream.offsets(), &[0, 1, 1]);
    assert_eq!(stream.group(2), &[0]);
}

// ─── Generator Tests ──────────────────────────────────────────

#[test]
fn random_graph_edge_count() {
    let mut rng = StdRng::seed_from_u64(1);
    let graph = random_graph(10, 1.0, &mut rng).unwrap();
    assert_eq!(graph.edge_count(), 45);

    let sparse = random_graph(10, 0.0, &mut rng).unwrap();
    assert_eq!(sparse.edge_count(), 0);
    assert_eq!(sparse.vertex_count(), 10);
}

#[test]
fn random_graph_rejects_bad_completeness() {
    let mut rng = StdRng::seed_from_u64(1);
    assert!(random_graph(10, 1.5, &mut rng).is_err());
    assert!(random_graph(10, -0.1, &mut rng).is_err());
}

#[test]
fn canonical_generators() {
    assert_eq!(path_graph(5).edge_count(), 4);
    assert_eq!(cycle_graph(5).edge_count(), 5);
    assert_eq!(cycle_graph(2).edge_count(), 1);
    assert_eq!(complete_graph(6).edge_count(), 15);
    assert_eq!(path_graph(3).id_of("2"), Some(VertexId(2)));
}
