//! Boundary conditions for scalar advection.
//!
//! - [`BoundaryFunction`]: ghost value from the owner trace
//! - [`BoundaryTable`]: one function per boundary tag

mod functions;
mod table;

pub use functions::{BoundaryFunction, FixedValue, ZeroGradient};
pub use table::BoundaryTable;
