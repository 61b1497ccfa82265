//! # dg-advection
//!
//! A nodal Discontinuous Galerkin solver for 2D scalar advection
//!
//! ```text
//! ∂φ/∂t + ∇·(v φ) = 0
//! ```
//!
//! on quadrilateral meshes.
//!
//! This crate provides:
//! - Tensor-product Lagrange bases on Gauss-Lobatto-Legendre points
//! - Gauss quadrature on cells and faces of bilinear quads
//! - Per-cell mass, stiffness and lifting operators stored in an arena
//! - A face walker that visits each face once
//! - Upwind and Lax-Friedrichs fluxes with tagged boundary functions
//! - Forward-Euler and SSP-RK3 time stepping
//! - A simulation driver with VTU output
//!
//! # Example
//! ```
//! use dg_advection::{
//!     AdvectionRhsConfig, BoundaryTable, NodalBasis, OperatorArena, QuadMesh, Solution,
//!     UniformWind, advance,
//! };
//!
//! let mesh = QuadMesh::unit_square(2)?;
//! let basis = NodalBasis::new(1)?;
//! let arena = OperatorArena::build(&mesh, &basis, &UniformWind::new(1.0, 0.0))?;
//! let boundaries = BoundaryTable::unit_square_default();
//!
//! let phi = Solution::new(mesh.n_cells(), basis.dofs_per_cell());
//! let config = AdvectionRhsConfig::new(&arena, &boundaries);
//! let next = advance(&phi, &mesh, &config, 0.01)?;
//! assert!(next.max() > 0.0);
//! # Ok::<(), dg_advection::AdvectionError>(())
//! ```

pub mod boundary;
pub mod config;
pub mod error;
pub mod fe;
pub mod flux;
pub mod io;
pub mod mesh;
pub mod operators;
pub mod polynomial;
pub mod simulation;
pub mod solver;
pub mod time;
pub mod wind;

// Re-export main types for convenience
pub use boundary::{BoundaryFunction, BoundaryTable, FixedValue, ZeroGradient};
pub use config::SimulationConfig;
pub use error::{AdvectionError, Result};
pub use fe::{CellValues, FaceValues, NodalBasis};
pub use flux::NumericalFlux;
pub use io::{OutputError, OutputSink, VtuSink};
pub use mesh::{
    BoundaryTag, Face, FaceConnection, FaceWorkItem, MeshGeometry, MeshTopology, QuadMesh,
    face_work_items,
};
pub use operators::{FaceDofMap, LocalOperators, OperatorArena};
pub use simulation::{RunSummary, Simulation, SimulationState};
pub use solver::{DoubleBuffer, Solution};
pub use time::{
    AdvectionRhsConfig, TimeScheme, advance, rhs, ssp_rk3_step, stable_time_step,
};
pub use wind::{RotatingWind, UniformWind, WindField};
