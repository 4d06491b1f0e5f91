use tracing::debug;

use super::dense::{CountMatrix, ProbabilityMatrix};
use crate::graph::Graph;

/// Adjacency matrix of `graph`: 1 where an edge exists, 0 elsewhere.
///
/// Only neighbors below the current vertex are visited; the symmetric entry is
/// written at the same time.
pub fn adjacency_matrix(graph: &Graph) -> CountMatrix {
    let mut matrix = CountMatrix::zeros(graph.vertex_count() + 1);
    for list in graph.lists() {
        let u = list.vertex();
        for &v in list.neighbors().iter().take_while(|&&v| v < u) {
            matrix[(u, v)] = 1;
            matrix[(v, u)] = 1;
        }
    }
    matrix
}

/// Row-normalised random-walk transition matrix, `P[u][v] = A[u][v] / deg(u)`.
///
/// Rows of zero-degree vertices are left all-zero.
pub fn transition_matrix(adjacency: &CountMatrix) -> ProbabilityMatrix {
    let size = adjacency.size();
    let mut transition = ProbabilityMatrix::zeros(size);
    let mut isolated = 0usize;
    for u in 1..size {
        let row = adjacency.row(u);
        let degree: i64 = row[1..].iter().sum();
        if degree == 0 {
            isolated += 1;
            continue;
        }
        let degree = degree as f64;
        for v in 1..size {
            if row[v] != 0 {
                transition[(u, v)] = row[v] as f64 / degree;
            }
        }
    }
    if isolated > 0 {
        debug!(isolated, "matrix.transition.isolated_rows");
    }
    transition
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_graph() -> Graph {
        Graph::from_sorted_edges(&[(1, 2), (2, 3), (3, 4)]).unwrap()
    }

    #[test]
    fn adjacency_matrix_is_symmetric() {
        let a = adjacency_matrix(&path_graph());
        assert_eq!(a.size(), 5);
        assert_eq!(a.get(1, 2), 1);
        assert_eq!(a.get(2, 1), 1);
        assert_eq!(a.get(3, 4), 1);
        assert_eq!(a.get(1, 3), 0);
        assert!(a.row(0).iter().all(|&x| x == 0));
    }

    #[test]
    fn squared_adjacency_counts_two_step_walks() {
        let a = adjacency_matrix(&path_graph());
        let a2 = a.multiply(&a).unwrap();
        assert_eq!(a2.get(1, 3), 1);
        assert_eq!(a2.get(1, 4), 0);
        assert_eq!(a2.get(2, 2), 2);
    }

    #[test]
    fn transition_rows_sum_to_one() {
        let p = transition_matrix(&adjacency_matrix(&path_graph()));
        for u in 1..p.size() {
            let sum: f64 = p.row(u).iter().sum();
            assert!((sum - 1.0).abs() < 1e-12, "row {u} sums to {sum}");
        }
        assert_eq!(p.get(2, 1), 0.5);
        assert_eq!(p.get(1, 2), 1.0);
    }

    #[test]
    fn isolated_vertex_row_stays_zero() {
        let g = Graph::from_sorted_edges(&[(1, 2), (1, 4)]).unwrap();
        let p = transition_matrix(&adjacency_matrix(&g));
        assert!(p.row(3).iter().all(|&x| x == 0.0));
        assert!(p.row(3).iter().all(|x| x.is_finite()));
        assert_eq!(p.get(1, 4), 0.5);
    }
}
