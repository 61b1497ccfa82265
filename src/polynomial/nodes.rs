//! One-dimensional node sets and quadrature rules on [-1, 1].
//!
//! Two families are used:
//! - Gauss-Lobatto-Legendre (GLL) points are the support points of the nodal
//!   basis. They include both endpoints, so on every face exactly `order + 1`
//!   basis functions are non-zero.
//! - Gauss-Legendre points drive all volume and face integrals. With
//!   `order + 1` points the rule integrates degree `2 * order + 1` exactly,
//!   enough for the mass, differentiation and face flux integrands on affine
//!   cells.

use super::legendre::{legendre, legendre_and_derivative};
use std::f64::consts::PI;

const NEWTON_TOL: f64 = 1e-15;
const NEWTON_MAX_ITER: usize = 100;

/// A one-dimensional quadrature rule on [-1, 1], points in ascending order.
#[derive(Clone, Debug, PartialEq)]
pub struct QuadratureRule1D {
    pub points: Vec<f64>,
    pub weights: Vec<f64>,
}

impl QuadratureRule1D {
    /// Gauss-Legendre rule with `n_points` points.
    pub fn gauss(n_points: usize) -> Self {
        let points = gauss_legendre_nodes(n_points);
        let weights = gauss_legendre_weights(&points);
        Self { points, weights }
    }

    /// Gauss-Lobatto-Legendre rule for polynomial order `order` (order + 1 points).
    pub fn gauss_lobatto(order: usize) -> Self {
        let points = gauss_lobatto_nodes(order);
        let weights = gauss_lobatto_weights(order, &points);
        Self { points, weights }
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the rule has no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Gauss-Legendre nodes: the roots of P_n, ascending.
///
/// Newton iteration from the asymptotic guess cos(π (i + 3/4) / (n + 1/2)).
pub fn gauss_legendre_nodes(n_points: usize) -> Vec<f64> {
    assert!(n_points > 0, "Gauss rule needs at least one point");
    let n = n_points;
    let mut nodes = vec![0.0; n];

    for i in 0..n {
        let mut x = -(PI * (i as f64 + 0.75) / (n as f64 + 0.5)).cos();
        for _ in 0..NEWTON_MAX_ITER {
            let (p, dp) = legendre_and_derivative(n, x);
            let update = p / dp;
            x -= update;
            if update.abs() < NEWTON_TOL {
                break;
            }
        }
        nodes[i] = x;
    }

    // The middle root of an odd rule is exactly zero.
    if n % 2 == 1 {
        nodes[n / 2] = 0.0;
    }
    nodes
}

/// Gauss-Legendre weights w_i = 2 / ((1 - x_i²) [P'_n(x_i)]²).
pub fn gauss_legendre_weights(nodes: &[f64]) -> Vec<f64> {
    let n = nodes.len();
    nodes
        .iter()
        .map(|&x| {
            let (_, dp) = legendre_and_derivative(n, x);
            2.0 / ((1.0 - x * x) * dp * dp)
        })
        .collect()
}

/// Gauss-Lobatto-Legendre nodes for polynomial order N.
///
/// Returns N+1 nodes in [-1, 1] including the endpoints: ±1 and the roots of
/// P'_N. Interior nodes are found by Newton iteration on (1 - x²) P'_N(x),
/// whose derivative reduces to -N(N+1) P_N(x).
pub fn gauss_lobatto_nodes(order: usize) -> Vec<f64> {
    let n = order;
    match n {
        0 => return vec![0.0],
        1 => return vec![-1.0, 1.0],
        _ => {}
    }

    let mut nodes: Vec<f64> = (0..=n).map(|j| -(PI * j as f64 / n as f64).cos()).collect();
    nodes[0] = -1.0;
    nodes[n] = 1.0;

    let scale = (n * (n + 1)) as f64;
    for node in nodes.iter_mut().take(n).skip(1) {
        let mut x = *node;
        for _ in 0..NEWTON_MAX_ITER {
            let (p_n, dp_n) = legendre_and_derivative(n, x);
            let update = (1.0 - x * x) * dp_n / (scale * p_n);
            x += update;
            if update.abs() < NEWTON_TOL {
                break;
            }
        }
        *node = x;
    }

    nodes
}

/// Gauss-Lobatto-Legendre weights w_j = 2 / (N(N+1) [P_N(x_j)]²).
pub fn gauss_lobatto_weights(order: usize, nodes: &[f64]) -> Vec<f64> {
    if order == 0 {
        return vec![2.0];
    }
    let denom = (order * (order + 1)) as f64;
    nodes
        .iter()
        .map(|&x| {
            let p = legendre(order, x);
            2.0 / (denom * p * p)
        })
        .collect()
}
