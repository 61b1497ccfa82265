//! SSP-RK3 time integration built on the explicit right-hand side.

use super::explicit::{AdvectionRhsConfig, check_finite, rhs};
use crate::error::Result;
use crate::mesh::MeshTopology;
use crate::solver::Solution;

/// One step of SSP-RK3 in Shu-Osher form, returned as a fresh vector.
///
/// ```text
/// u1    = u + dt L(u)
/// u2    = 3/4 u + 1/4 u1 + 1/4 dt L(u1)
/// u_new = 1/3 u + 2/3 u2 + 2/3 dt L(u2)
/// ```
///
/// `previous` is never modified.
pub fn ssp_rk3_step<M: MeshTopology>(
    previous: &Solution,
    mesh: &M,
    config: &AdvectionRhsConfig<'_>,
    dt: f64,
) -> Result<Solution> {
    ssp_rk3_step_with(previous, |u| rhs(u, mesh, config), dt)
}

/// SSP-RK3 step with an arbitrary fallible right-hand side.
pub fn ssp_rk3_step_with<F>(u: &Solution, rhs_fn: F, dt: f64) -> Result<Solution>
where
    F: Fn(&Solution) -> Result<Solution>,
{
    // Stage 1: u1 = u + dt * L(u)
    let l_u = rhs_fn(u)?;
    let mut u1 = u.clone();
    u1.axpy(dt, &l_u);

    // Stage 2: u2 = 3/4 * u + 1/4 * u1 + 1/4 * dt * L(u1)
    let l_u1 = rhs_fn(&u1)?;
    let mut u2 = u.clone();
    u2.scale(0.75);
    u2.axpy(0.25, &u1);
    u2.axpy(0.25 * dt, &l_u1);

    // Stage 3: u_new = 1/3 * u + 2/3 * u2 + 2/3 * dt * L(u2)
    let l_u2 = rhs_fn(&u2)?;
    let mut next = u.clone();
    next.scale(1.0 / 3.0);
    next.axpy(2.0 / 3.0, &u2);
    next.axpy(2.0 / 3.0 * dt, &l_u2);

    check_finite(&next)?;
    Ok(next)
}
