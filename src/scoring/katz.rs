use tracing::{debug, info};

use super::{non_edges, KatzParams, Metric, Ranking, Scorer};
use crate::error::Result;
use crate::matrix::{adjacency_matrix, MatrixPowers, ProbabilityMatrix};
use crate::topk::Link;

/// Accumulates `Σ β^L · A^L[u][v]` for `L = 2..=max_walk_length`.
///
/// Walks may revisit vertices; that is part of the index's definition.
pub(super) fn rank(scorer: &Scorer<'_>, params: &KatzParams) -> Result<Ranking> {
    let mut powers = MatrixPowers::new(adjacency_matrix(scorer.graph()));
    let mut scores = ProbabilityMatrix::zeros(powers.base().size());
    let mut weight = params.beta;

    for _ in 2..=params.max_walk_length {
        powers.advance()?;
        scorer.metrics.matrix_multiply();
        weight *= params.beta;

        let walks = powers.current();
        for (u, v) in non_edges(powers.base()) {
            scores[(u, v)] += weight * walks.get(u, v) as f64;
        }
        debug!(length = powers.exponent(), weight, "scoring.katz.step");
    }

    let mut heap = scorer.heap()?;
    for (u, v) in non_edges(powers.base()) {
        scorer.offer(&mut heap, Link::new(u, v, scores.get(u, v)));
    }

    info!(
        k = scorer.k(),
        beta = params.beta,
        max_walk_length = params.max_walk_length,
        "scoring.katz.complete"
    );
    Ok(Ranking::from_heap(Metric::Katz, heap, |_| None))
}
