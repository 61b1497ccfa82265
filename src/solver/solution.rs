//! Global DG solution vector.
//!
//! Layout is cell-major: data[k * dofs_per_cell + i] for cell k, dof i.

use crate::error::{AdvectionError, Result};
use crate::fe::{CellValues, NodalBasis};
use crate::mesh::MeshGeometry;

/// Nodal values of the scalar on every cell.
#[derive(Clone, Debug, PartialEq)]
pub struct Solution {
    /// Nodal values, stored as data[k * dofs_per_cell + i]
    pub data: Vec<f64>,
    /// Number of cells
    pub n_cells: usize,
    /// Dofs per cell, (order + 1)²
    pub dofs_per_cell: usize,
}

impl Solution {
    /// Zero solution.
    pub fn new(n_cells: usize, dofs_per_cell: usize) -> Self {
        Self {
            data: vec![0.0; n_cells * dofs_per_cell],
            n_cells,
            dofs_per_cell,
        }
    }

    /// Wrap existing data, checking its length.
    pub fn from_data(data: Vec<f64>, n_cells: usize, dofs_per_cell: usize) -> Result<Self> {
        if data.len() != n_cells * dofs_per_cell {
            return Err(AdvectionError::config(format!(
                "solution has {} values, expected {} cells × {} dofs",
                data.len(),
                n_cells,
                dofs_per_cell
            )));
        }
        Ok(Self {
            data,
            n_cells,
            dofs_per_cell,
        })
    }

    /// Nodal interpolation of `f` at the support points of every cell.
    pub fn interpolate<M, F>(mesh: &M, basis: &NodalBasis, f: F) -> Self
    where
        M: MeshGeometry,
        F: Fn(f64, f64) -> f64,
    {
        let n_dofs = basis.dofs_per_cell();
        let mut solution = Self::new(mesh.n_cells(), n_dofs);
        for k in 0..mesh.n_cells() {
            let values = solution.cell_mut(k);
            for (i, v) in values.iter_mut().enumerate() {
                let (r, s) = basis.support_point(i);
                let (x, y) = mesh.reference_to_physical(k, r, s);
                *v = f(x, y);
            }
        }
        solution
    }

    /// Values of cell `k`.
    #[inline]
    pub fn cell(&self, k: usize) -> &[f64] {
        let start = k * self.dofs_per_cell;
        &self.data[start..start + self.dofs_per_cell]
    }

    /// Mutable values of cell `k`.
    #[inline]
    pub fn cell_mut(&mut self, k: usize) -> &mut [f64] {
        let start = k * self.dofs_per_cell;
        &mut self.data[start..start + self.dofs_per_cell]
    }

    /// Length of the global vector.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Set all values to a constant.
    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }

    /// Add c * other to self (axpy operation).
    pub fn axpy(&mut self, c: f64, other: &Solution) {
        debug_assert_eq!(self.data.len(), other.data.len());
        for (a, b) in self.data.iter_mut().zip(other.data.iter()) {
            *a += c * *b;
        }
    }

    /// Scale all values by a constant.
    pub fn scale(&mut self, c: f64) {
        for v in &mut self.data {
            *v *= c;
        }
    }

    /// Get maximum absolute value.
    pub fn max_abs(&self) -> f64 {
        self.data.iter().map(|&x| x.abs()).fold(0.0, f64::max)
    }

    /// Get minimum value.
    pub fn min(&self) -> f64 {
        self.data.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Get maximum value.
    pub fn max(&self) -> f64 {
        self.data.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// First non-finite value as (cell, dof), if any.
    pub fn find_non_finite(&self) -> Option<(usize, usize)> {
        self.data
            .iter()
            .position(|v| !v.is_finite())
            .map(|idx| (idx / self.dofs_per_cell, idx % self.dofs_per_cell))
    }

    /// Integral of the solution over the domain: Σ_k Σ_q φ(x_q) JxW.
    pub fn total_mass<M: MeshGeometry>(&self, mesh: &M, basis: &NodalBasis) -> Result<f64> {
        let mut integral = 0.0;
        for k in 0..self.n_cells {
            let cv = CellValues::new(mesh, k, basis)?;
            let u_k = self.cell(k);
            for q in 0..cv.n_quadrature_points() {
                let u_q: f64 = (0..self.dofs_per_cell)
                    .map(|i| u_k[i] * cv.shape_value(i, q))
                    .sum();
                integral += u_q * cv.jxw[q];
            }
        }
        Ok(integral)
    }

    /// L2 error against an exact solution.
    ///
    /// ||u - u_exact||_L2 = sqrt( ∫∫ (u - u_exact)² dA ), by cell quadrature.
    pub fn l2_error<M, F>(&self, mesh: &M, basis: &NodalBasis, exact: F) -> Result<f64>
    where
        M: MeshGeometry,
        F: Fn(f64, f64) -> f64,
    {
        let mut error_sq = 0.0;
        for k in 0..self.n_cells {
            let cv = CellValues::new(mesh, k, basis)?;
            let u_k = self.cell(k);
            for q in 0..cv.n_quadrature_points() {
                let u_q: f64 = (0..self.dofs_per_cell)
                    .map(|i| u_k[i] * cv.shape_value(i, q))
                    .sum();
                let (x, y) = cv.points[q];
                let diff = u_q - exact(x, y);
                error_sq += diff * diff * cv.jxw[q];
            }
        }
        Ok(error_sq.sqrt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::QuadMesh;

    #[test]
    fn test_layout() {
        let mut sol = Solution::new(3, 4);
        sol.cell_mut(1)[2] = 5.0;
        assert_eq!(sol.data[6], 5.0);
        assert_eq!(sol.cell(1), &[0.0, 0.0, 5.0, 0.0]);
        assert!(Solution::from_data(vec![0.0; 11], 3, 4).is_err());
    }

    #[test]
    fn test_interpolate_and_integrate_linear() {
        let mesh = QuadMesh::uniform_rectangle(0.0, 2.0, 0.0, 1.0, 4, 3).unwrap();
        let basis = NodalBasis::new(1).unwrap();
        let sol = Solution::interpolate(&mesh, &basis, |x, y| 1.0 + x + 2.0 * y);

        // ∫∫ (1 + x + 2y) over [0,2]×[0,1] = 2 + 2 + 2
        let mass = sol.total_mass(&mesh, &basis).unwrap();
        assert!((mass - 6.0).abs() < 1e-12);

        let err = sol.l2_error(&mesh, &basis, |x, y| 1.0 + x + 2.0 * y).unwrap();
        assert!(err < 1e-13);
    }

    #[test]
    fn test_l2_error_of_offset() {
        let mesh = QuadMesh::unit_square(2).unwrap();
        let basis = NodalBasis::new(2).unwrap();
        let sol = Solution::interpolate(&mesh, &basis, |_, _| 0.5);
        let err = sol.l2_error(&mesh, &basis, |_, _| 0.0).unwrap();
        assert!((err - 0.5).abs() < 1e-13);
    }

    #[test]
    fn test_find_non_finite() {
        let mut sol = Solution::new(2, 4);
        assert_eq!(sol.find_non_finite(), None);
        sol.cell_mut(1)[3] = f64::NAN;
        assert_eq!(sol.find_non_finite(), Some((1, 3)));
    }

    #[test]
    fn test_axpy_and_extrema() {
        let mut a = Solution::from_data(vec![1.0, -2.0, 3.0, 0.5], 1, 4).unwrap();
        let b = Solution::from_data(vec![1.0, 1.0, 1.0, 1.0], 1, 4).unwrap();
        a.axpy(2.0, &b);
        assert_eq!(a.data, vec![3.0, 0.0, 5.0, 2.5]);
        assert_eq!(a.max(), 5.0);
        assert_eq!(a.min(), 0.0);
        a.scale(-1.0);
        assert_eq!(a.max_abs(), 5.0);
    }
}
