use std::fmt;

use tracing::{debug, warn};

use crate::error::{LinkError, Result};

/// Vertex identifier. Vertices are numbered from 1.
pub type VertexId = usize;

/// Sorted neighbor list of a single vertex.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdjacencyList {
    vertex: VertexId,
    neighbors: Vec<VertexId>,
}

impl AdjacencyList {
    pub(crate) fn new(vertex: VertexId) -> Self {
        Self {
            vertex,
            neighbors: Vec::new(),
        }
    }

    /// The vertex owning this list.
    pub fn vertex(&self) -> VertexId {
        self.vertex
    }

    /// Number of neighbors.
    pub fn degree(&self) -> usize {
        self.neighbors.len()
    }

    /// Neighbor ids in strictly increasing order.
    pub fn neighbors(&self) -> &[VertexId] {
        &self.neighbors
    }

    /// Returns `true` when `other` is a neighbor of this vertex.
    pub fn contains(&self, other: VertexId) -> bool {
        self.neighbors.binary_search(&other).is_ok()
    }

    fn push(&mut self, neighbor: VertexId) {
        self.neighbors.push(neighbor);
    }
}

/// Immutable undirected graph stored as one adjacency list per vertex.
///
/// Lists are indexed by `vertex - 1`, so every id in `1..=vertex_count` has a
/// list even when it has no incident edges.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    lists: Vec<AdjacencyList>,
    edge_count: usize,
}

impl Graph {
    /// Creates a graph with no vertices.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a graph from edges sorted ascending by `(v, u)` with `u < v`.
    ///
    /// Runs in O(V + E): a `v` cursor only moves forward, creating the lists of
    /// vertices it passes, and a `u` cursor restarts from vertex 1 whenever the
    /// `v` cursor moves and otherwise only moves forward. Each edge appends `v`
    /// to `u`'s list and `u` to `v`'s list, which keeps both lists sorted.
    ///
    /// Self-loops and repeated edges are skipped. Any other edge that breaks the
    /// ordering is rejected with [`LinkError::UnsortedEdges`].
    pub fn from_sorted_edges(edges: &[(VertexId, VertexId)]) -> Result<Self> {
        let mut vertex_count = 0;
        for (index, &(u, v)) in edges.iter().enumerate() {
            if u == 0 || v == 0 {
                return Err(LinkError::InvalidVertex { index });
            }
            vertex_count = vertex_count.max(u).max(v);
        }
        if vertex_count == 0 {
            return Ok(Self::empty());
        }

        let mut lists = Vec::with_capacity(vertex_count);
        lists.push(AdjacencyList::new(1));
        let mut list_u = 0usize;
        let mut list_v = 0usize;
        let mut previous: Option<(VertexId, VertexId)> = None;
        let mut edge_count = 0usize;
        let mut skipped = 0usize;

        for (index, &(u, v)) in edges.iter().enumerate() {
            if u == v {
                warn!(index, vertex = u, "graph.build.self_loop_skipped");
                skipped += 1;
                continue;
            }
            if u > v {
                return Err(LinkError::UnsortedEdges { index, u, v });
            }
            if let Some((prev_u, prev_v)) = previous {
                if (u, v) == (prev_u, prev_v) {
                    warn!(index, u, v, "graph.build.duplicate_skipped");
                    skipped += 1;
                    continue;
                }
                if (v, u) < (prev_v, prev_u) {
                    return Err(LinkError::UnsortedEdges { index, u, v });
                }
            }
            previous = Some((u, v));

            while v > lists[list_v].vertex {
                let next = lists[list_v].vertex + 1;
                lists.push(AdjacencyList::new(next));
                list_v += 1;
                list_u = 0;
            }
            while u > lists[list_u].vertex {
                list_u += 1;
            }

            lists[list_u].push(v);
            lists[list_v].push(u);
            edge_count += 1;
        }

        // Vertices only seen on skipped self-loops still belong to the graph.
        while lists.len() < vertex_count {
            let next = lists.len() + 1;
            lists.push(AdjacencyList::new(next));
        }

        debug!(
            vertices = vertex_count,
            edges = edge_count,
            skipped,
            "graph.build.complete"
        );
        Ok(Self { lists, edge_count })
    }

    /// Builds a graph from edges in any order.
    ///
    /// Endpoints are swapped so that `u < v`, the edges are sorted by `(v, u)`
    /// and deduplicated, then handed to [`Graph::from_sorted_edges`].
    pub fn from_edges(edges: &[(VertexId, VertexId)]) -> Result<Self> {
        let mut canonical: Vec<(VertexId, VertexId)> = edges
            .iter()
            .map(|&(a, b)| if a <= b { (a, b) } else { (b, a) })
            .collect();
        canonical.sort_unstable_by_key(|&(u, v)| (v, u));
        canonical.dedup();
        Self::from_sorted_edges(&canonical)
    }

    /// Number of vertices; ids run from 1 to this value.
    pub fn vertex_count(&self) -> usize {
        self.lists.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Adjacency lists ordered by vertex id.
    pub fn lists(&self) -> &[AdjacencyList] {
        &self.lists
    }

    /// Adjacency list of `vertex`, if it exists.
    pub fn adjacency(&self, vertex: VertexId) -> Option<&AdjacencyList> {
        vertex.checked_sub(1).and_then(|idx| self.lists.get(idx))
    }

    /// Sorted neighbors of `vertex`; empty for unknown ids.
    pub fn neighbors(&self, vertex: VertexId) -> &[VertexId] {
        self.adjacency(vertex)
            .map(AdjacencyList::neighbors)
            .unwrap_or(&[])
    }

    /// Degree of `vertex`; zero for unknown ids.
    pub fn degree(&self, vertex: VertexId) -> usize {
        self.neighbors(vertex).len()
    }

    /// Returns `true` when `u` and `v` are adjacent.
    pub fn has_edge(&self, u: VertexId, v: VertexId) -> bool {
        self.adjacency(u).is_some_and(|list| list.contains(v))
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for list in &self.lists {
            write!(f, "Adj[{}]: ", list.vertex)?;
            for neighbor in &list.neighbors {
                write!(f, "{neighbor}, ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_graph() -> Graph {
        Graph::from_sorted_edges(&[(1, 2), (2, 3), (3, 4)]).expect("path graph")
    }

    #[test]
    fn builds_symmetric_lists() {
        let g = path_graph();
        assert_eq!(g.vertex_count(), 4);
        assert_eq!(g.edge_count(), 3);
        assert_eq!(g.neighbors(1), &[2]);
        assert_eq!(g.neighbors(2), &[1, 3]);
        assert_eq!(g.neighbors(3), &[2, 4]);
        assert_eq!(g.neighbors(4), &[3]);
        assert_eq!(g.degree(2), 2);
        assert!(g.has_edge(3, 2));
        assert!(!g.has_edge(1, 3));
    }

    #[test]
    fn creates_lists_for_isolated_vertices() {
        // Sorted by (v, u): v = 3 then v = 6.
        let g = Graph::from_sorted_edges(&[(1, 3), (2, 3), (1, 6)]).unwrap();
        assert_eq!(g.vertex_count(), 6);
        assert_eq!(g.neighbors(1), &[3, 6]);
        assert_eq!(g.neighbors(3), &[1, 2]);
        assert!(g.neighbors(4).is_empty());
        assert!(g.neighbors(5).is_empty());
        assert_eq!(g.neighbors(6), &[1]);
        assert_eq!(g.adjacency(5).map(AdjacencyList::vertex), Some(5));
    }

    #[test]
    fn unknown_vertices_have_no_neighbors() {
        let g = path_graph();
        assert!(g.neighbors(0).is_empty());
        assert!(g.neighbors(99).is_empty());
        assert_eq!(g.degree(99), 0);
    }

    #[test]
    fn rejects_out_of_order_edges() {
        let err = Graph::from_sorted_edges(&[(1, 5), (2, 3)]).unwrap_err();
        assert!(matches!(err, LinkError::UnsortedEdges { index: 1, .. }));

        let err = Graph::from_sorted_edges(&[(3, 2)]).unwrap_err();
        assert!(matches!(err, LinkError::UnsortedEdges { index: 0, .. }));
    }

    #[test]
    fn rejects_vertex_zero() {
        let err = Graph::from_sorted_edges(&[(0, 2)]).unwrap_err();
        assert!(matches!(err, LinkError::InvalidVertex { index: 0 }));
    }

    #[test]
    fn skips_self_loops_and_duplicates() {
        let g = Graph::from_sorted_edges(&[(1, 1), (1, 2), (1, 2), (2, 3), (4, 4)]).unwrap();
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.vertex_count(), 4);
        assert_eq!(g.neighbors(1), &[2]);
        assert!(g.neighbors(4).is_empty());
    }

    #[test]
    fn from_edges_accepts_any_order() {
        let g = Graph::from_edges(&[(4, 3), (2, 1), (3, 2), (1, 2)]).unwrap();
        assert_eq!(g.edge_count(), 3);
        assert_eq!(g.neighbors(2), &[1, 3]);
        assert_eq!(g.neighbors(3), &[2, 4]);
    }

    #[test]
    fn empty_input_gives_empty_graph() {
        let g = Graph::from_sorted_edges(&[]).unwrap();
        assert_eq!(g.vertex_count(), 0);
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn display_dumps_lists() {
        let g = path_graph();
        let dump = g.to_string();
        assert_eq!(
            dump,
            "Adj[1]: 2, \nAdj[2]: 1, 3, \nAdj[3]: 2, 4, \nAdj[4]: 3, \n"
        );
    }
}
