use super::dense::{DenseMatrix, Element};
use crate::error::Result;

/// Successive powers of a base matrix.
///
/// Only the base and the current power are retained. Each call to
/// [`MatrixPowers::advance`] replaces the current power with the next one, so
/// the previous power is dropped as soon as its successor exists.
#[derive(Debug)]
pub struct MatrixPowers<T> {
    base: DenseMatrix<T>,
    current: DenseMatrix<T>,
    exponent: usize,
}

impl<T: Element> MatrixPowers<T> {
    /// Starts at `base¹`.
    pub fn new(base: DenseMatrix<T>) -> Self {
        let current = base.clone();
        Self {
            base,
            current,
            exponent: 1,
        }
    }

    /// Exponent of [`MatrixPowers::current`].
    pub fn exponent(&self) -> usize {
        self.exponent
    }

    /// The base matrix.
    pub fn base(&self) -> &DenseMatrix<T> {
        &self.base
    }

    /// The current power.
    pub fn current(&self) -> &DenseMatrix<T> {
        &self.current
    }

    /// Moves to the next power and returns it.
    pub fn advance(&mut self) -> Result<&DenseMatrix<T>> {
        self.current = self.current.multiply(&self.base)?;
        self.exponent += 1;
        Ok(&self.current)
    }
}
