//! Error type shared by graph loading, matrix arithmetic and scoring.

use std::io;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LinkError>;

/// Errors raised while loading a graph or scoring candidate links.
#[derive(Debug, Error)]
pub enum LinkError {
    /// I/O error while reading the edge list or writing a ranking.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// A line of the edge list could not be parsed.
    #[error("line {line}: {message}")]
    Parse {
        /// 1-based line number in the edge file.
        line: usize,
        /// Description of the problem.
        message: String,
    },
    /// Vertex ids are 1-based; zero is not a valid vertex.
    #[error("edge {index}: vertex ids must be positive")]
    InvalidVertex {
        /// 0-based position of the edge in the input sequence.
        index: usize,
    },
    /// The sorted builder received an edge out of `(v, u)` order.
    #[error("edge {index} ({u}, {v}) breaks the required (v, u) ordering")]
    UnsortedEdges {
        /// 0-based position of the edge in the input sequence.
        index: usize,
        /// Smaller endpoint as read.
        u: usize,
        /// Larger endpoint as read.
        v: usize,
    },
    /// Two matrices of different sizes were multiplied.
    #[error("matrix dimension mismatch: {left} x {left} vs {right} x {right}")]
    DimensionMismatch {
        /// Size of the left operand.
        left: usize,
        /// Size of the right operand.
        right: usize,
    },
    /// A parameter was outside its accepted range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
