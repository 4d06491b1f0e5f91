use std::cmp::Ordering;

use tracing::info;

use super::{Metric, Ranking, Scorer};
use crate::error::Result;
use crate::graph::VertexId;
use crate::topk::Link;

/// Jaccard coefficient `|A ∩ B| / |A ∪ B|` of two sorted neighbor lists.
///
/// Two empty neighborhoods score 0.
pub fn jaccard_score(a: &[VertexId], b: &[VertexId]) -> f64 {
    let (mut i, mut j, mut common) = (0usize, 0usize, 0usize);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Equal => {
                common += 1;
                i += 1;
                j += 1;
            }
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
        }
    }
    let union = a.len() + b.len() - common;
    if union == 0 {
        0.0
    } else {
        common as f64 / union as f64
    }
}

pub(super) fn rank(scorer: &Scorer<'_>) -> Result<Ranking> {
    let graph = scorer.graph();
    let mut heap = scorer.heap()?;

    for list_v in graph.lists() {
        let v = list_v.vertex();
        // `v`'s neighbors are walked in step with `u` to skip existing edges.
        let mut adjacent = list_v.neighbors().iter().peekable();
        for list_u in graph.lists().iter().take_while(|list| list.vertex() < v) {
            let u = list_u.vertex();
            while adjacent.next_if(|&&n| n < u).is_some() {}
            if adjacent.peek() == Some(&&u) {
                continue;
            }
            let score = jaccard_score(list_u.neighbors(), list_v.neighbors());
            scorer.offer(&mut heap, Link::new(u, v, score));
        }
    }

    info!(k = scorer.k(), "scoring.jaccard.complete");
    Ok(Ranking::from_heap(Metric::Jaccard, heap, |_| None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;

    #[test]
    fn score_of_overlapping_and_disjoint_sets() {
        assert_eq!(jaccard_score(&[2], &[2, 4]), 0.5);
        assert_eq!(jaccard_score(&[2], &[3]), 0.0);
        assert_eq!(jaccard_score(&[1, 2, 3], &[1, 2, 3]), 1.0);
        assert_eq!(jaccard_score(&[], &[]), 0.0);
        assert_eq!(jaccard_score(&[], &[5]), 0.0);
    }

    #[test]
    fn path_graph_ranking() {
        let g = Graph::from_sorted_edges(&[(1, 2), (2, 3), (3, 4)]).unwrap();
        let ranking = Scorer::new(&g, 3).unwrap().jaccard().unwrap();
        assert_eq!(
            ranking.links(),
            vec![
                Link::new(1, 3, 0.5),
                Link::new(2, 4, 0.5),
                Link::new(1, 4, 0.0),
            ]
        );
        assert!(ranking.entries.iter().all(|e| e.convergence.is_none()));
    }

    #[test]
    fn existing_edges_are_never_ranked() {
        // Triangle 1-2-3 plus pendant 4 on 3.
        let g = Graph::from_sorted_edges(&[(1, 2), (1, 3), (2, 3), (3, 4)]).unwrap();
        let ranking = Scorer::new(&g, 10).unwrap().jaccard().unwrap();
        let pairs: Vec<_> = ranking.links().iter().map(|l| (l.u, l.v)).collect();
        assert_eq!(pairs, vec![(1, 4), (2, 4)]);
        // N(1) = {2, 3}, N(4) = {3}
        assert_eq!(ranking.entries[0].link.score, 0.5);
    }

    #[test]
    fn isolated_pairs_score_zero() {
        let g = Graph::from_sorted_edges(&[(1, 2), (1, 5)]).unwrap();
        let ranking = Scorer::new(&g, 20).unwrap().jaccard().unwrap();
        let isolated = ranking
            .links()
            .into_iter()
            .find(|l| (l.u, l.v) == (3, 4))
            .unwrap();
        assert_eq!(isolated.score, 0.0);
    }
}
