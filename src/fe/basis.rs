//! Tensor-product nodal basis on the reference square [-1, 1]².
//!
//! Support points are the Gauss-Lobatto-Legendre points in each direction,
//! numbered lexicographically with x fastest: dof `k = j * (order + 1) + i`
//! sits at (r_i, s_j). Integrals use the Gauss-Legendre rule with
//! `order + 1` points per direction.

use crate::error::{AdvectionError, Result};
use crate::polynomial::{LagrangeBasis1D, QuadratureRule1D, gauss_lobatto_nodes};

/// Highest supported polynomial order.
pub const MAX_ORDER: usize = 10;

/// Lagrange basis of degree `order` in each direction.
#[derive(Clone, Debug)]
pub struct NodalBasis {
    order: usize,
    lagrange: LagrangeBasis1D,
    quadrature: QuadratureRule1D,
}

impl NodalBasis {
    /// Create the basis for polynomial order `order` (0..=MAX_ORDER).
    pub fn new(order: usize) -> Result<Self> {
        if order > MAX_ORDER {
            return Err(AdvectionError::config(format!(
                "polynomial order {} exceeds the maximum of {}",
                order, MAX_ORDER
            )));
        }
        Ok(Self {
            order,
            lagrange: LagrangeBasis1D::new(gauss_lobatto_nodes(order)),
            quadrature: QuadratureRule1D::gauss(order + 1),
        })
    }

    /// Polynomial order.
    #[inline]
    pub fn order(&self) -> usize {
        self.order
    }

    /// Number of support points per direction.
    #[inline]
    pub fn n_1d(&self) -> usize {
        self.order + 1
    }

    /// Dofs per cell, (order + 1)².
    #[inline]
    pub fn dofs_per_cell(&self) -> usize {
        self.n_1d() * self.n_1d()
    }

    /// Dofs per face, order + 1.
    #[inline]
    pub fn dofs_per_face(&self) -> usize {
        self.n_1d()
    }

    /// One-dimensional Gauss rule used for cell and face integrals.
    #[inline]
    pub fn quadrature(&self) -> &QuadratureRule1D {
        &self.quadrature
    }

    /// One-dimensional support points.
    #[inline]
    pub fn nodes_1d(&self) -> &[f64] {
        self.lagrange.nodes()
    }

    /// Reference coordinates (r, s) of dof `k`.
    pub fn support_point(&self, k: usize) -> (f64, f64) {
        let n = self.n_1d();
        let nodes = self.lagrange.nodes();
        (nodes[k % n], nodes[k / n])
    }

    /// Value of shape function `k` at (r, s).
    pub fn shape_value(&self, k: usize, r: f64, s: f64) -> f64 {
        let n = self.n_1d();
        self.lagrange.value(k % n, r) * self.lagrange.value(k / n, s)
    }

    /// Reference gradient (∂/∂r, ∂/∂s) of shape function `k` at (r, s).
    pub fn shape_grad_ref(&self, k: usize, r: f64, s: f64) -> (f64, f64) {
        let n = self.n_1d();
        let (i, j) = (k % n, k / n);
        (
            self.lagrange.derivative(i, r) * self.lagrange.value(j, s),
            self.lagrange.value(i, r) * self.lagrange.derivative(j, s),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_limits() {
        assert!(NodalBasis::new(0).is_ok());
        assert!(NodalBasis::new(MAX_ORDER).is_ok());
        assert!(NodalBasis::new(MAX_ORDER + 1).is_err());
    }

    #[test]
    fn test_lexicographic_support_points() {
        let basis = NodalBasis::new(2).unwrap();
        assert_eq!(basis.dofs_per_cell(), 9);
        assert_eq!(basis.support_point(0), (-1.0, -1.0));
        assert_eq!(basis.support_point(2), (1.0, -1.0));
        assert_eq!(basis.support_point(6), (-1.0, 1.0));
        let (r, s) = basis.support_point(4);
        assert!(r.abs() < 1e-14 && s.abs() < 1e-14);
    }

    #[test]
    fn test_nodal_property() {
        let basis = NodalBasis::new(3).unwrap();
        for k in 0..basis.dofs_per_cell() {
            for m in 0..basis.dofs_per_cell() {
                let (r, s) = basis.support_point(m);
                let expected = if k == m { 1.0 } else { 0.0 };
                assert!((basis.shape_value(k, r, s) - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_gradients_sum_to_zero() {
        let basis = NodalBasis::new(2).unwrap();
        let (r, s) = (0.3, -0.6);
        let (gr, gs) = (0..basis.dofs_per_cell())
            .map(|k| basis.shape_grad_ref(k, r, s))
            .fold((0.0, 0.0), |(a, b), (x, y)| (a + x, b + y));
        assert!(gr.abs() < 1e-12);
        assert!(gs.abs() < 1e-12);
    }
}
