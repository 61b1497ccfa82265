//! Time integration.
//!
//! - [`advance`]: forward-Euler update φ + Δt (S φ - Σ L f*)
//! - [`ssp_rk3_step`]: three-stage SSP Runge-Kutta on the same right-hand side
//! - [`stable_time_step`]: CFL-based step size estimate
//! - [`TimeScheme`]: run-time choice between the two

mod cfl;
mod explicit;
mod scheme;
mod ssp_rk3;

pub use cfl::stable_time_step;
pub use explicit::{AdvectionRhsConfig, advance, rhs};
pub use scheme::TimeScheme;
pub use ssp_rk3::{ssp_rk3_step, ssp_rk3_step_with};
