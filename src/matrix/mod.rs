//! Dense square matrices used for walk counting and random-walk probabilities.

mod build;
mod dense;
mod power;

pub use build::{adjacency_matrix, transition_matrix};
pub use dense::{CountMatrix, DenseMatrix, Element, ProbabilityMatrix};
pub use power::MatrixPowers;
