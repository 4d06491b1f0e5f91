//! Graph store: adjacency lists built from a sorted edge list.

mod adjacency;

/// Edge-list reading.
pub mod load;

pub use adjacency::{AdjacencyList, Graph, VertexId};
pub use load::{load_graph, parse_edge_list, read_edge_list, LoadOptions};
