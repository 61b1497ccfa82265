//! One-dimensional Lagrange interpolation polynomials.
//!
//! ℓ_j(x) = Π_{m≠j} (x - x_m) / (x_j - x_m) on a fixed set of distinct nodes.

/// Lagrange basis on a fixed node set.
#[derive(Clone, Debug)]
pub struct LagrangeBasis1D {
    nodes: Vec<f64>,
    /// Precomputed 1 / Π_{m≠j} (x_j - x_m)
    denominators: Vec<f64>,
}

impl LagrangeBasis1D {
    /// Build the basis on `nodes`. Nodes must be distinct.
    pub fn new(nodes: Vec<f64>) -> Self {
        let denominators = (0..nodes.len())
            .map(|j| {
                let prod: f64 = nodes
                    .iter()
                    .enumerate()
                    .filter(|&(m, _)| m != j)
                    .map(|(_, &xm)| nodes[j] - xm)
                    .product();
                1.0 / prod
            })
            .collect();
        Self {
            nodes,
            denominators,
        }
    }

    /// Number of basis functions.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The interpolation nodes.
    #[inline]
    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    /// ℓ_j(x).
    pub fn value(&self, j: usize, x: f64) -> f64 {
        let prod: f64 = self
            .nodes
            .iter()
            .enumerate()
            .filter(|&(m, _)| m != j)
            .map(|(_, &xm)| x - xm)
            .product();
        prod * self.denominators[j]
    }

    /// ℓ'_j(x), by the product rule.
    pub fn derivative(&self, j: usize, x: f64) -> f64 {
        let n = self.nodes.len();
        let mut sum = 0.0;
        for skip in 0..n {
            if skip == j {
                continue;
            }
            let mut prod = 1.0;
            for m in 0..n {
                if m != j && m != skip {
                    prod *= x - self.nodes[m];
                }
            }
            sum += prod;
        }
        sum * self.denominators[j]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polynomial::gauss_lobatto_nodes;

    #[test]
    fn test_kronecker_property() {
        for order in 0..=5 {
            let basis = LagrangeBasis1D::new(gauss_lobatto_nodes(order));
            for j in 0..basis.len() {
                for (m, &x) in basis.nodes().iter().enumerate() {
                    let expected = if j == m { 1.0 } else { 0.0 };
                    assert!((basis.value(j, x) - expected).abs() < 1e-13);
                }
            }
        }
    }

    #[test]
    fn test_partition_of_unity() {
        let basis = LagrangeBasis1D::new(gauss_lobatto_nodes(4));
        for &x in &[-0.9, -0.31, 0.0, 0.42, 0.77] {
            let sum: f64 = (0..basis.len()).map(|j| basis.value(j, x)).sum();
            let dsum: f64 = (0..basis.len()).map(|j| basis.derivative(j, x)).sum();
            assert!((sum - 1.0).abs() < 1e-13);
            assert!(dsum.abs() < 1e-12);
        }
    }

    #[test]
    fn test_linear_basis() {
        let basis = LagrangeBasis1D::new(vec![-1.0, 1.0]);
        assert!((basis.value(0, 0.5) - 0.25).abs() < 1e-15);
        assert!((basis.value(1, 0.5) - 0.75).abs() < 1e-15);
        assert!((basis.derivative(0, 0.3) + 0.5).abs() < 1e-15);
        assert!((basis.derivative(1, 0.3) - 0.5).abs() < 1e-15);
    }

    #[test]
    fn test_derivative_matches_finite_difference() {
        let basis = LagrangeBasis1D::new(gauss_lobatto_nodes(3));
        let h = 1e-6;
        for j in 0..basis.len() {
            let x = 0.23;
            let fd = (basis.value(j, x + h) - basis.value(j, x - h)) / (2.0 * h);
            assert!((basis.derivative(j, x) - fd).abs() < 1e-7);
        }
    }

    #[test]
    fn test_constant_basis() {
        let basis = LagrangeBasis1D::new(vec![0.0]);
        assert!((basis.value(0, 0.7) - 1.0).abs() < 1e-15);
        assert_eq!(basis.derivative(0, 0.7), 0.0);
    }
}
