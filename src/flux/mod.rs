//! Numerical fluxes and their evaluation on face work items.

mod resolver;
mod scalar;

pub use resolver::{resolve, resolve_into};
pub use scalar::{NumericalFlux, lax_friedrichs_flux, upwind_flux};
