//! Link prediction over static undirected graphs.
//!
//! A graph is loaded once from a sorted edge list, then every non-adjacent
//! vertex pair is scored by one or more structural similarity metrics and the
//! best `k` pairs per metric are reported.
//!
//! ```
//! use linkrank::graph::Graph;
//! use linkrank::scoring::Scorer;
//!
//! let graph = Graph::from_sorted_edges(&[(1, 2), (2, 3), (3, 4)]).unwrap();
//! let ranking = Scorer::new(&graph, 1).unwrap().jaccard().unwrap();
//! let best = ranking.entries[0].link;
//! assert_eq!((best.u, best.v, best.score), (1, 3, 0.5));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod graph;
pub mod matrix;
pub mod metrics;
pub mod output;
pub mod scoring;
pub mod topk;

pub use error::{LinkError, Result};
pub use graph::{Graph, VertexId};
pub use scoring::{Metric, Ranking, Scorer};
pub use topk::{Link, TopK};
