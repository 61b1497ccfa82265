//! Numerical fluxes for linear scalar advection.
//!
//! At a face with outward normal n (of the owner) and a_n = v · n:
//!
//! ```text
//! upwind:          F* = a_n u⁻  if a_n ≥ 0,  a_n u⁺ otherwise
//! Lax-Friedrichs:  F* = ½ a_n (u⁻ + u⁺) - ½ |a_n| (u⁺ - u⁻)
//! ```
//!
//! u⁻ is the owner trace and u⁺ the neighbour (or ghost) trace. Both reduce
//! to a_n u when u⁻ = u⁺. For linear advection they coincide.

use serde::{Deserialize, Serialize};

/// Numerical flux type for advection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericalFlux {
    /// Upwind flux (exact for linear advection)
    #[default]
    Upwind,
    /// Lax-Friedrichs flux
    LaxFriedrichs,
}

impl NumericalFlux {
    /// Flux through the face in the owner's outward direction.
    #[inline]
    pub fn evaluate(self, a_n: f64, u_owner: f64, u_neighbor: f64) -> f64 {
        match self {
            NumericalFlux::Upwind => upwind_flux(a_n, u_owner, u_neighbor),
            NumericalFlux::LaxFriedrichs => lax_friedrichs_flux(a_n, u_owner, u_neighbor),
        }
    }
}

/// Upwind flux.
#[inline]
pub fn upwind_flux(a_n: f64, u_minus: f64, u_plus: f64) -> f64 {
    if a_n >= 0.0 {
        // Outflow: use interior value
        a_n * u_minus
    } else {
        // Inflow: use exterior value
        a_n * u_plus
    }
}

/// Lax-Friedrichs flux with the local wave speed |a_n|.
#[inline]
pub fn lax_friedrichs_flux(a_n: f64, u_minus: f64, u_plus: f64) -> f64 {
    0.5 * a_n * (u_minus + u_plus) - 0.5 * a_n.abs() * (u_plus - u_minus)
}
