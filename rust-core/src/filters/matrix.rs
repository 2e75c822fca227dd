//! Owned square matrix for the RLS inverse-covariance recursion
//!
//! Thin wrapper over `ndarray::Array2` exposing only the two operations the
//! recursion needs, both allocation-free.

use ndarray::Array2;

/// N×N dense matrix, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct SquareMatrix {
    data: Array2<f64>,
}

impl SquareMatrix {
    /// `scale * I_n`
    pub fn identity_scaled(n: usize, scale: f64) -> Self {
        Self {
            data: Array2::eye(n) * scale,
        }
    }

    pub fn dim(&self) -> usize {
        self.data.nrows()
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[[row, col]]
    }

    /// `out = self · x`
    ///
    /// # Panics
    /// If `x` or `out` is not `dim()` long
    #[inline]
    pub fn mul_vec(&self, x: &[f64], out: &mut [f64]) {
        let n = self.dim();
        assert!(x.len() == n && out.len() == n, "vector length must equal matrix dimension {}", n);

        for (o, row) in out.iter_mut().zip(self.data.rows()) {
            *o = row.iter().zip(x).map(|(a, b)| a * b).sum();
        }
    }

    /// `self ← (self − u ⊗ v) / scale`
    ///
    /// # Panics
    /// If `u` or `v` is not `dim()` long
    #[inline]
    pub fn rank_one_update(&mut self, u: &[f64], v: &[f64], scale: f64) {
        let n = self.dim();
        assert!(u.len() == n && v.len() == n, "vector length must equal matrix dimension {}", n);

        let inv_scale = 1.0 / scale;
        for ((i, j), p) in self.data.indexed_iter_mut() {
            *p = (*p - u[i] * v[j]) * inv_scale;
        }
    }

    /// Largest `|a_ij - a_ji|` is at most `tol`
    pub fn is_symmetric(&self, tol: f64) -> bool {
        let n = self.dim();
        (0..n).all(|i| (i + 1..n).all(|j| (self.data[[i, j]] - self.data[[j, i]]).abs() <= tol))
    }

    pub fn trace(&self) -> f64 {
        self.data.diag().sum()
    }

    pub fn as_array(&self) -> &Array2<f64> {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_scaled() {
        let m = SquareMatrix::identity_scaled(3, 4.0);
        assert_eq!(m.dim(), 3);
        assert_eq!(m.get(1, 1), 4.0);
        assert_eq!(m.get(0, 2), 0.0);
        assert!((m.trace() - 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_mul_vec() {
        let m = SquareMatrix::identity_scaled(2, 2.0);
        let mut out = [0.0; 2];
        m.mul_vec(&[1.5, -3.0], &mut out);
        assert_eq!(out, [3.0, -6.0]);
    }

    #[test]
    fn test_rank_one_update() {
        let mut m = SquareMatrix::identity_scaled(2, 1.0);
        m.rank_one_update(&[1.0, 2.0], &[3.0, 4.0], 0.5);
        // (I - [[3,4],[6,8]]) / 0.5
        assert!((m.get(0, 0) + 4.0).abs() < 1e-12);
        assert!((m.get(0, 1) + 8.0).abs() < 1e-12);
        assert!((m.get(1, 0) + 12.0).abs() < 1e-12);
        assert!((m.get(1, 1) + 14.0).abs() < 1e-12);
        assert!(!m.is_symmetric(1e-9));
    }

    #[test]
    fn test_symmetric_update_stays_symmetric() {
        let mut m = SquareMatrix::identity_scaled(3, 10.0);
        let u = [0.5, -1.0, 0.25];
        m.rank_one_update(&u, &u, 0.99);
        assert!(m.is_symmetric(1e-12));
    }
}
