use std::ops::{Index, IndexMut};

use crate::error::{LinkError, Result};

/// Arithmetic needed by [`DenseMatrix::multiply`].
pub trait Element: Copy + Default + PartialEq + std::fmt::Debug {
    /// Returns `self + a * b`.
    fn mul_add(self, a: Self, b: Self) -> Self;

    /// Returns `true` for the additive identity.
    fn is_zero(self) -> bool;
}

/// Walk counts. Products that exceed `i64` wrap instead of trapping; large
/// dense graphs raised to high powers are a known precision limit.
impl Element for i64 {
    #[inline]
    fn mul_add(self, a: Self, b: Self) -> Self {
        self.wrapping_add(a.wrapping_mul(b))
    }

    #[inline]
    fn is_zero(self) -> bool {
        self == 0
    }
}

impl Element for f64 {
    #[inline]
    fn mul_add(self, a: Self, b: Self) -> Self {
        self + a * b
    }

    #[inline]
    fn is_zero(self) -> bool {
        self == 0.0
    }
}

/// Square matrix stored row-major in a single allocation.
///
/// Graph matrices are sized `vertex_count + 1` so that vertex ids index rows
/// and columns directly; row and column 0 stay zero.
#[derive(Clone, Debug, PartialEq)]
pub struct DenseMatrix<T> {
    size: usize,
    data: Vec<T>,
}

/// Integer walk-count matrix.
pub type CountMatrix = DenseMatrix<i64>;

/// Floating-point probability / score matrix.
pub type ProbabilityMatrix = DenseMatrix<f64>;

impl<T: Copy + Default> DenseMatrix<T> {
    /// Creates a `size x size` matrix filled with `T::default()`.
    pub fn zeros(size: usize) -> Self {
        Self {
            size,
            data: vec![T::default(); size * size],
        }
    }

    /// Number of rows (and columns).
    pub fn size(&self) -> usize {
        self.size
    }

    /// Element at `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> T {
        self.data[row * self.size + col]
    }

    /// Overwrites the element at `(row, col)`.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        self.data[row * self.size + col] = value;
    }

    /// Row `row` as a slice.
    pub fn row(&self, row: usize) -> &[T] {
        let start = row * self.size;
        &self.data[start..start + self.size]
    }
}

impl<T: Element> DenseMatrix<T> {
    /// Standard O(n³) product `self × rhs`.
    pub fn multiply(&self, rhs: &Self) -> Result<Self> {
        if self.size != rhs.size {
            return Err(LinkError::DimensionMismatch {
                left: self.size,
                right: rhs.size,
            });
        }
        let n = self.size;
        let mut out = Self::zeros(n);
        for (i, out_row) in out.data.chunks_exact_mut(n.max(1)).enumerate() {
            let lhs_row = &self.data[i * n..(i + 1) * n];
            for (k, &a) in lhs_row.iter().enumerate() {
                if a.is_zero() {
                    continue;
                }
                let rhs_row = &rhs.data[k * n..(k + 1) * n];
                for (dst, &b) in out_row.iter_mut().zip(rhs_row) {
                    *dst = dst.mul_add(a, b);
                }
            }
        }
        Ok(out)
    }
}

impl<T: Copy + Default> Index<(usize, usize)> for DenseMatrix<T> {
    type Output = T;

    fn index(&self, (row, col): (usize, usize)) -> &T {
        &self.data[row * self.size + col]
    }
}

impl<T: Copy + Default> IndexMut<(usize, usize)> for DenseMatrix<T> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        &mut self.data[row * self.size + col]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_rows<T: Copy + Default>(rows: &[&[T]]) -> DenseMatrix<T> {
        let mut m = DenseMatrix::zeros(rows.len());
        for (r, row) in rows.iter().enumerate() {
            for (c, &value) in row.iter().enumerate() {
                m[(r, c)] = value;
            }
        }
        m
    }

    #[test]
    fn multiplies_integer_matrices() {
        let a = from_rows::<i64>(&[&[1, 2], &[3, 4]]);
        let b = from_rows::<i64>(&[&[5, 6], &[7, 8]]);
        let c = a.multiply(&b).unwrap();
        assert_eq!(c, from_rows(&[&[19, 22], &[43, 50]]));
    }

    #[test]
    fn multiplies_float_matrices() {
        let a = from_rows::<f64>(&[&[0.5, 0.5], &[1.0, 0.0]]);
        let c = a.multiply(&a).unwrap();
        assert_eq!(c.row(0), &[0.75, 0.25]);
        assert_eq!(c.row(1), &[0.5, 0.5]);
    }

    #[test]
    fn integer_overflow_wraps() {
        let a = from_rows::<i64>(&[&[i64::MAX]]);
        let c = a.multiply(&from_rows(&[&[2]])).unwrap();
        assert_eq!(c.get(0, 0), i64::MAX.wrapping_mul(2));
    }

    #[test]
    fn size_mismatch_is_rejected() {
        let a = CountMatrix::zeros(3);
        let b = CountMatrix::zeros(4);
        let err = a.multiply(&b).unwrap_err();
        assert!(matches!(
            err,
            LinkError::DimensionMismatch { left: 3, right: 4 }
        ));
    }

    #[test]
    fn empty_matrix_product_is_empty() {
        let a = ProbabilityMatrix::zeros(0);
        assert_eq!(a.multiply(&a).unwrap().size(), 0);
    }
}
