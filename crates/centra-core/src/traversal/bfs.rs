//! Level-synchronous breadth-first search.

use centra_common::types::VertexId;
use centra_common::utils::error::Result;

use crate::graph::Graph;

/// Output of [`bfs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BfsResult {
    /// Hop distance from the source, `None` when not reached.
    pub distances: Vec<Option<u32>>,
    /// Vertex that first discovered each vertex; `None` for the source and
    /// unreached vertices.
    pub predecessors: Vec<Option<VertexId>>,
}

impl BfsResult {
    /// Returns the number of vertices reached, including the source.
    #[must_use]
    pub fn reached(&self) -> usize {
        self.distances.iter().filter(|d| d.is_some()).count()
    }
}

/// Breadth-first search from `source`.
///
/// Frontiers are expanded in vertex order and neighbors in adjacency order,
/// so the predecessor of each vertex is the lowest-positioned frontier vertex
/// that reaches it. With `depth_limit = Some(d)` vertices further than `d`
/// hops stay unreached.
pub fn bfs(graph: &Graph, source: VertexId, depth_limit: Option<u32>) -> Result<BfsResult> {
    graph.check_vertex(source)?;

    let n = graph.vertex_count();
    let mut distances = vec![None; n];
    let mut predecessors = vec![None; n];
    distances[source.index()] = Some(0);

    let limit = depth_limit.unwrap_or(u32::MAX);
    let mut depth = 0u32;
    let mut frontier = vec![source];
    let mut next = Vec::new();

    while !frontier.is_empty() && depth < limit {
        for &row in &frontier {
            for &nbr in graph.neighbors(row) {
                if distances[nbr.index()].is_none() {
                    distances[nbr.index()] = Some(depth + 1);
                    predecessors[nbr.index()] = Some(row);
                    next.push(nbr);
                }
            }
        }
        std::mem::swap(&mut frontier, &mut next);
        next.clear();
        depth += 1;
    }

    Ok(BfsResult {
        distances,
        predecessors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use centra_common::Error;

    fn v(id: u32) -> VertexId {
        VertexId::new(id)
    }

    #[test]
    fn test_bfs_chain() {
        let graph = Graph::from_edges(4, &[(0, 1), (1, 2), (2, 3)], true).unwrap();
        let result = bfs(&graph, v(0), None).unwrap();

        assert_eq!(result.distances, vec![Some(0), Some(1), Some(2), Some(3)]);
        assert_eq!(result.predecessors, vec![None, Some(v(0)), Some(v(1)), Some(v(2))]);
    }

    #[test]
    fn test_bfs_directed_does_not_walk_backwards() {
        let graph = Graph::from_edges(3, &[(0, 1), (1, 2)], true).unwrap();
        let result = bfs(&graph, v(1), None).unwrap();

        assert_eq!(result.distances, vec![None, Some(0), Some(1)]);
        assert_eq!(result.reached(), 2);
    }

    #[test]
    fn test_bfs_depth_limit() {
        let graph = Graph::from_edges(4, &[(0, 1), (1, 2), (2, 3)], false).unwrap();
        let result = bfs(&graph, v(0), Some(2)).unwrap();

        assert_eq!(result.distances, vec![Some(0), Some(1), Some(2), None]);
    }

    #[test]
    fn test_bfs_first_discovery_predecessor() {
        // 0 -> {1, 2} -> 3: vertex 1 is expanded first and claims 3.
        let graph = Graph::from_edges(4, &[(0, 1), (0, 2), (1, 3), (2, 3)], true).unwrap();
        let result = bfs(&graph, v(0), None).unwrap();

        assert_eq!(result.predecessors[3], Some(v(1)));
        assert_eq!(result.distances[3], Some(2));
    }

    #[test]
    fn test_bfs_invalid_source() {
        let graph = Graph::from_edges(2, &[(0, 1)], true).unwrap();
        assert!(matches!(
            bfs(&graph, v(5), None),
            Err(Error::InvalidVertex { vertex: 5, .. })
        ));
    }
}
