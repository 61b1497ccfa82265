//! Simulation driver.
//!
//! [`Simulation`] owns the mesh, basis, boundary table and operators of one
//! problem and enforces the order in which they are used:
//!
//! ```text
//! Unconfigured --build_operators--> OperatorsBuilt --step--> Stepping --finalize--> Finalized
//!       ^                                                                              |
//!       +------------------------------- reconfigure ---------------------------------+
//! ```
//!
//! # Example
//! ```no_run
//! use dg_advection::boundary::BoundaryTable;
//! use dg_advection::io::VtuSink;
//! use dg_advection::mesh::QuadMesh;
//! use dg_advection::simulation::Simulation;
//! use dg_advection::wind::UniformWind;
//!
//! let mesh = QuadMesh::unit_square(5)?;
//! let mut sim = Simulation::new(
//!     mesh,
//!     1,
//!     UniformWind::new(1.0, 0.5),
//!     BoundaryTable::unit_square_default(),
//! )?;
//! sim.build_operators()?;
//! let mut sink = VtuSink::new("output", "solution");
//! let summary = sim.run(0.5, 1e-3, &mut sink)?;
//! println!("{} steps", summary.n_steps);
//! # Ok::<(), dg_advection::AdvectionError>(())
//! ```

mod runner;

pub use runner::{RunSummary, Simulation, SimulationState};
