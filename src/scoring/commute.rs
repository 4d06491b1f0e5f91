use tracing::{debug, info};

use super::{
    non_edges, CommuteParams, Convergence, ConvergenceParams, Metric, Ranking, Scorer,
};
use crate::error::Result;
use crate::matrix::{
    adjacency_matrix, transition_matrix, CountMatrix, DenseMatrix, MatrixPowers,
    ProbabilityMatrix,
};
use crate::topk::Link;

fn walk_powers(scorer: &Scorer<'_>) -> (CountMatrix, MatrixPowers<f64>) {
    let adjacency = adjacency_matrix(scorer.graph());
    let powers = MatrixPowers::new(transition_matrix(&adjacency));
    (adjacency, powers)
}

/// Contribution of walk length `length` to the commute-time estimate of
/// `(u, v)`: `-length · (P^L[u][v] + P^L[v][u])`.
#[inline]
fn step(probabilities: &ProbabilityMatrix, length: usize, u: usize, v: usize) -> f64 {
    -(length as f64) * (probabilities.get(u, v) + probabilities.get(v, u))
}

pub(super) fn rank_fixed(scorer: &Scorer<'_>, params: &CommuteParams) -> Result<Ranking> {
    let (adjacency, mut powers) = walk_powers(scorer);
    let mut commute = ProbabilityMatrix::zeros(adjacency.size());

    for _ in 2..=params.horizon {
        powers.advance()?;
        scorer.metrics.matrix_multiply();
        let length = powers.exponent();
        let probabilities = powers.current();
        for (u, v) in non_edges(&adjacency) {
            commute[(u, v)] += step(probabilities, length, u, v);
        }
        debug!(length, "scoring.commute_time.step");
    }

    let mut heap = scorer.heap()?;
    for (u, v) in non_edges(&adjacency) {
        scorer.offer(&mut heap, Link::new(u, v, commute.get(u, v)));
    }

    info!(
        k = scorer.k(),
        horizon = params.horizon,
        "scoring.commute_time.complete"
    );
    Ok(Ranking::from_heap(Metric::CommuteTime, heap, |_| None))
}

/// Keeps extending the walk length until `k` pairs have converged or the
/// iteration cap is reached.
///
/// A pair converges at length `L` when its accumulated value moved by less
/// than `tolerance` since length `L - 1` while its magnitude exceeds
/// `min_magnitude`. Converged pairs enter the ranking immediately and their
/// score is frozen. If fewer than `k` pairs converge, the remaining pairs are
/// ranked by their last value and marked as not converged.
pub(super) fn rank_converged(
    scorer: &Scorer<'_>,
    params: &ConvergenceParams,
) -> Result<Ranking> {
    let (adjacency, mut powers) = walk_powers(scorer);
    let size = adjacency.size();
    let mut commute = ProbabilityMatrix::zeros(size);
    let mut converged_at: DenseMatrix<Option<usize>> = DenseMatrix::zeros(size);
    let mut converged = 0usize;
    let mut heap = scorer.heap()?;

    while converged < scorer.k() && powers.exponent() < params.max_iterations {
        powers.advance()?;
        scorer.metrics.matrix_multiply();
        let length = powers.exponent();
        let probabilities = powers.current();

        for (u, v) in non_edges(&adjacency) {
            if converged_at.get(u, v).is_some() {
                continue;
            }
            let previous = commute.get(u, v);
            let value = previous + step(probabilities, length, u, v);
            commute[(u, v)] = value;

            if (value - previous).abs() < params.tolerance && value.abs() > params.min_magnitude {
                converged_at[(u, v)] = Some(length);
                converged += 1;
                scorer.offer(&mut heap, Link::new(u, v, value));
            }
        }
        debug!(length, converged, "scoring.commute_time_converged.step");
    }

    info!(
        converged,
        iterations = powers.exponent(),
        k = scorer.k(),
        "scoring.commute_time_converged.complete"
    );

    if converged < scorer.k() {
        for (u, v) in non_edges(&adjacency) {
            if converged_at.get(u, v).is_none() {
                scorer.offer(&mut heap, Link::new(u, v, commute.get(u, v)));
            }
        }
    }

    let mut ranking = Ranking::from_heap(Metric::CommuteTimeConverged, heap, |link| {
        Some(match converged_at.get(link.u, link.v) {
            Some(iteration) => Convergence::Converged { iteration },
            None => Convergence::NotConverged,
        })
    });
    ranking.converged_pairs = Some(converged);
    Ok(ranking)
}
