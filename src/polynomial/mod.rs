//! Polynomial evaluation and node generation.
//!
//! This module provides:
//! - 1D Legendre polynomials and their derivatives
//! - 1D Gauss-Legendre and Gauss-Lobatto-Legendre (GLL) nodes and weights
//! - 1D Lagrange interpolation polynomials on an arbitrary node set

mod lagrange;
mod legendre;
mod nodes;

pub use lagrange::LagrangeBasis1D;
pub use legendre::{legendre, legendre_and_derivative};
pub use nodes::{
    QuadratureRule1D, gauss_legendre_nodes, gauss_legendre_weights, gauss_lobatto_nodes,
    gauss_lobatto_weights,
};
