use serde::{Deserialize, Serialize};

use super::explicit::{AdvectionRhsConfig, advance};
use super::ssp_rk3::ssp_rk3_step;
use crate::error::Result;
use crate::mesh::MeshTopology;
use crate::solver::Solution;

/// Explicit time integration scheme.
///
/// Forward Euler is only stable under a CFL restriction for order 0; with
/// order ≥ 1 the DG semi-discretization has eigenvalues on the imaginary
/// axis and the single-stage update grows at any fixed CFL number.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeScheme {
    /// Single forward-Euler update per step
    ForwardEuler,
    /// Three-stage SSP Runge-Kutta
    #[default]
    SspRk3,
}

impl TimeScheme {
    /// Advance `previous` by one step of size `dt`.
    pub fn step<M: MeshTopology>(
        self,
        previous: &Solution,
        mesh: &M,
        config: &AdvectionRhsConfig<'_>,
        dt: f64,
    ) -> Result<Solution> {
        match self {
            TimeScheme::ForwardEuler => advance(previous, mesh, config, dt),
            TimeScheme::SspRk3 => ssp_rk3_step(previous, mesh, config, dt),
        }
    }

    /// Right-hand side evaluations per step.
    pub fn stages(self) -> usize {
        match self {
            TimeScheme::ForwardEuler => 1,
            TimeScheme::SspRk3 => 3,
        }
    }

    /// Whether a CFL-limited step is stable for basis order `order`.
    pub fn is_cfl_stable(self, order: usize) -> bool {
        match self {
            TimeScheme::ForwardEuler => order == 0,
            TimeScheme::SspRk3 => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_ssp_rk3() {
        assert_eq!(TimeScheme::default(), TimeScheme::SspRk3);
    }

    #[test]
    fn test_cfl_stability() {
        assert!(TimeScheme::ForwardEuler.is_cfl_stable(0));
        assert!(!TimeScheme::ForwardEuler.is_cfl_stable(1));
        assert!(!TimeScheme::ForwardEuler.is_cfl_stable(3));
        assert!((0..=10).all(|p| TimeScheme::SspRk3.is_cfl_stable(p)));
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&TimeScheme::SspRk3).unwrap();
        assert_eq!(json, "\"ssp_rk3\"");
        let scheme: TimeScheme = serde_json::from_str("\"forward_euler\"").unwrap();
        assert_eq!(scheme, TimeScheme::ForwardEuler);
    }
}
