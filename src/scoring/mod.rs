//! Link-prediction metrics over a loaded [`Graph`].
//!
//! Every metric walks the unordered vertex pairs `(u, v)` with `u < v`, skips
//! pairs that are already edges and feeds the rest into its own [`TopK`]
//! selector. The result is a [`Ranking`] ordered best-first.

mod commute;
mod jaccard;
mod katz;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{LinkError, Result};
use crate::graph::{Graph, VertexId};
use crate::matrix::CountMatrix;
use crate::metrics::{default_metrics, ScoringMetrics};
use crate::topk::{Link, TopK};

pub use jaccard::jaccard_score;

/// The available link-prediction metrics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Metric {
    /// Neighborhood overlap.
    Jaccard,
    /// Damped walk counts.
    Katz,
    /// Negated commute time over a fixed walk horizon.
    CommuteTime,
    /// Negated commute time, iterated until enough pairs converge.
    CommuteTimeConverged,
}

impl Metric {
    /// Every metric, in the order they are run by default.
    pub const ALL: [Metric; 4] = [
        Metric::Jaccard,
        Metric::Katz,
        Metric::CommuteTime,
        Metric::CommuteTimeConverged,
    ];

    /// Stable lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            Metric::Jaccard => "jaccard",
            Metric::Katz => "katz",
            Metric::CommuteTime => "commute-time",
            Metric::CommuteTimeConverged => "commute-time-converged",
        }
    }

    /// File the ranking is written to inside the output directory.
    pub fn default_file_name(&self) -> &'static str {
        match self {
            Metric::Jaccard => "Jaccard.txt",
            Metric::Katz => "Katz.txt",
            Metric::CommuteTime => "HittingTime.txt",
            Metric::CommuteTimeConverged => "HittingTimeAccurate.txt",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Convergence outcome of a pair scored by [`Metric::CommuteTimeConverged`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Convergence {
    /// The pair met the stopping condition at this walk length.
    Converged {
        /// Walk length at which the change dropped below tolerance.
        iteration: usize,
    },
    /// The iteration cap was reached first.
    NotConverged,
}

impl Convergence {
    /// Integer column written in text output; `-1` when not converged.
    pub fn marker(&self) -> i64 {
        match self {
            Convergence::Converged { iteration } => *iteration as i64,
            Convergence::NotConverged => -1,
        }
    }
}

/// One row of a ranking.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RankedLink {
    /// The scored pair.
    #[serde(flatten)]
    pub link: Link,
    /// Set only by the convergence-seeking commute-time metric.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub convergence: Option<Convergence>,
}

/// Best-first list of candidate links for one metric.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Ranking {
    /// Metric that produced the scores.
    pub metric: Metric,
    /// Entries, highest-ranked first.
    pub entries: Vec<RankedLink>,
    /// Number of pairs that met the convergence test, if applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub converged_pairs: Option<usize>,
}

impl Ranking {
    fn from_heap<F>(metric: Metric, mut heap: TopK, convergence: F) -> Self
    where
        F: Fn(&Link) -> Option<Convergence>,
    {
        let capacity = heap.capacity();
        let entries: Vec<RankedLink> = heap
            .extract_ranked_descending()
            .into_iter()
            .map(|link| RankedLink {
                convergence: convergence(&link),
                link,
            })
            .collect();
        if entries.len() < capacity {
            warn!(
                metric = metric.name(),
                requested = capacity,
                available = entries.len(),
                "scoring.ranking.short"
            );
        }
        Self {
            metric,
            entries,
            converged_pairs: None,
        }
    }

    /// The ranked links without convergence information.
    pub fn links(&self) -> Vec<Link> {
        self.entries.iter().map(|entry| entry.link).collect()
    }
}

/// Katz index parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KatzParams {
    /// Decay per walk step. Larger values give long walks more weight; the
    /// series only converges below the reciprocal of the adjacency matrix's
    /// dominant eigenvalue.
    pub beta: f64,
    /// Longest walk counted.
    pub max_walk_length: usize,
}

impl Default for KatzParams {
    fn default() -> Self {
        Self {
            beta: 0.1,
            max_walk_length: 6,
        }
    }
}

impl KatzParams {
    /// Checks `0 < beta < 1` and `max_walk_length >= 2`.
    pub fn validate(&self) -> Result<()> {
        if !(self.beta > 0.0 && self.beta < 1.0) {
            return Err(LinkError::InvalidArgument(format!(
                "katz beta must lie in (0, 1), got {}",
                self.beta
            )));
        }
        if self.max_walk_length < 2 {
            return Err(LinkError::InvalidArgument(
                "katz max_walk_length must be at least 2".into(),
            ));
        }
        Ok(())
    }
}

/// Fixed-horizon commute-time parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommuteParams {
    /// Longest walk length summed.
    pub horizon: usize,
}

impl Default for CommuteParams {
    fn default() -> Self {
        Self { horizon: 6 }
    }
}

impl CommuteParams {
    /// Checks `horizon >= 2`.
    pub fn validate(&self) -> Result<()> {
        if self.horizon < 2 {
            return Err(LinkError::InvalidArgument(
                "commute horizon must be at least 2".into(),
            ));
        }
        Ok(())
    }
}

/// Convergence-seeking commute-time parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvergenceParams {
    /// Hard cap on the walk length.
    pub max_iterations: usize,
    /// A pair converges when its accumulated value changes by less than this.
    pub tolerance: f64,
    /// ...and its magnitude exceeds this.
    pub min_magnitude: f64,
}

impl Default for ConvergenceParams {
    fn default() -> Self {
        Self {
            max_iterations: 20,
            tolerance: 0.01,
            min_magnitude: 0.00001,
        }
    }
}

impl ConvergenceParams {
    /// Checks `max_iterations >= 2` and positive thresholds.
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations < 2 {
            return Err(LinkError::InvalidArgument(
                "convergence max_iterations must be at least 2".into(),
            ));
        }
        if !(self.tolerance > 0.0) {
            return Err(LinkError::InvalidArgument(
                "convergence tolerance must be positive".into(),
            ));
        }
        if !(self.min_magnitude >= 0.0) {
            return Err(LinkError::InvalidArgument(
                "convergence min_magnitude must not be negative".into(),
            ));
        }
        Ok(())
    }
}

/// Parameters for every metric.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringParams {
    /// Katz settings.
    pub katz: KatzParams,
    /// Fixed-horizon commute-time settings.
    pub commute: CommuteParams,
    /// Convergence-seeking commute-time settings.
    pub convergence: ConvergenceParams,
}

impl ScoringParams {
    /// Validates every section.
    pub fn validate(&self) -> Result<()> {
        self.katz.validate()?;
        self.commute.validate()?;
        self.convergence.validate()
    }
}

/// Runs link-prediction metrics against one graph.
pub struct Scorer<'g> {
    graph: &'g Graph,
    k: usize,
    metrics: Arc<dyn ScoringMetrics>,
}

impl<'g> Scorer<'g> {
    /// Creates a scorer reporting the best `k` links per metric.
    pub fn new(graph: &'g Graph, k: usize) -> Result<Self> {
        if k == 0 {
            return Err(LinkError::InvalidArgument("k must be at least 1".into()));
        }
        Ok(Self {
            graph,
            k,
            metrics: default_metrics(),
        })
    }

    /// Sets the metrics sink.
    pub fn with_metrics(mut self, metrics: Arc<dyn ScoringMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// The graph being scored.
    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    /// Number of links reported per metric.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Runs `metric` with the matching section of `params`.
    pub fn rank(&self, metric: Metric, params: &ScoringParams) -> Result<Ranking> {
        match metric {
            Metric::Jaccard => self.jaccard(),
            Metric::Katz => self.katz(&params.katz),
            Metric::CommuteTime => self.commute_time(&params.commute),
            Metric::CommuteTimeConverged => self.commute_time_converged(&params.convergence),
        }
    }

    /// Jaccard coefficient of the two neighborhoods.
    pub fn jaccard(&self) -> Result<Ranking> {
        jaccard::rank(self)
    }

    /// Katz index truncated at `params.max_walk_length`.
    pub fn katz(&self, params: &KatzParams) -> Result<Ranking> {
        params.validate()?;
        katz::rank(self, params)
    }

    /// Negated commute time summed over walk lengths `2..=params.horizon`.
    pub fn commute_time(&self, params: &CommuteParams) -> Result<Ranking> {
        params.validate()?;
        commute::rank_fixed(self, params)
    }

    /// Negated commute time iterated until `k` pairs converge or the cap is hit.
    pub fn commute_time_converged(&self, params: &ConvergenceParams) -> Result<Ranking> {
        params.validate()?;
        commute::rank_converged(self, params)
    }

    fn heap(&self) -> Result<TopK> {
        TopK::new(self.k)
    }

    fn offer(&self, heap: &mut TopK, link: Link) {
        self.metrics.pair_scored();
        let accepted = heap.try_insert(link);
        self.metrics.heap_insert(accepted);
    }
}

/// Unordered pairs `(u, v)`, `u < v`, that are not edges of `adjacency`.
fn non_edges(adjacency: &CountMatrix) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
    let size = adjacency.size();
    (1..size).flat_map(move |u| {
        (u + 1..size)
            .filter(move |&v| adjacency.get(u, v) == 0)
            .map(move |v| (u, v))
    })
}
