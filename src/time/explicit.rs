//! Explicit DG update for scalar advection.
//!
//! The semi-discrete system on each cell is
//!
//! ```text
//! dφ/dt = S φ - Σ_f L_f f*_f
//! ```
//!
//! evaluated in two phases: first every cell's stiffness product (cells are
//! independent and run in parallel with the `parallel` feature), then a
//! serial pass over the face work items adding the lifted fluxes to the
//! owner and, with the flux negated, to the neighbour.

use crate::boundary::BoundaryTable;
use crate::error::{AdvectionError, Result};
use crate::flux::{NumericalFlux, resolve_into};
use crate::mesh::{FaceWorkItem, MeshTopology, face_work_items};
use crate::operators::OperatorArena;
use crate::solver::Solution;

/// Everything the right-hand side needs besides the mesh and the state.
#[derive(Clone, Copy, Debug)]
pub struct AdvectionRhsConfig<'a> {
    /// Precomputed per-cell operators
    pub arena: &'a OperatorArena,
    /// Ghost values on boundary faces
    pub boundaries: &'a BoundaryTable,
    /// Numerical flux at faces
    pub flux: NumericalFlux,
}

impl<'a> AdvectionRhsConfig<'a> {
    pub fn new(arena: &'a OperatorArena, boundaries: &'a BoundaryTable) -> Self {
        Self {
            arena,
            boundaries,
            flux: NumericalFlux::default(),
        }
    }

    /// Set the numerical flux.
    pub fn with_flux(mut self, flux: NumericalFlux) -> Self {
        self.flux = flux;
        self
    }
}

/// Compute dφ/dt = S φ - Σ_f L_f f* for every cell.
pub fn rhs<M: MeshTopology>(
    previous: &Solution,
    mesh: &M,
    config: &AdvectionRhsConfig<'_>,
) -> Result<Solution> {
    let arena = config.arena;
    check_sizes(previous, mesh, arena)?;

    let n_dofs = arena.dofs_per_cell();
    let mut out = Solution::new(arena.n_cells(), n_dofs);

    // Phase 1: volume term
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        out.data
            .par_chunks_mut(n_dofs)
            .enumerate()
            .for_each(|(k, out_k)| arena.cell(k).apply_stiffness(previous.cell(k), out_k));
    }
    #[cfg(not(feature = "parallel"))]
    for (k, out_k) in out.data.chunks_mut(n_dofs).enumerate() {
        arena.cell(k).apply_stiffness(previous.cell(k), out_k);
    }

    // Phase 2: surface terms
    let dofs = arena.face_dofs();
    let n_face = arena.order() + 1;
    let mut flux = vec![0.0; n_face];
    let mut mirrored = vec![0.0; n_face];

    for item in face_work_items(mesh) {
        resolve_into(&item, previous, arena, config.boundaries, config.flux, &mut flux)?;

        let owner = item.owner();
        arena
            .cell(owner)
            .add_lift(item.owner_face(), dofs, &flux, -1.0, out.cell_mut(owner));

        if let FaceWorkItem::Interior {
            neighbor,
            neighbor_face,
            reversed,
            ..
        } = item
        {
            for (i, &f) in flux.iter().enumerate() {
                mirrored[dofs.paired_index(i, reversed)] = -f;
            }
            arena
                .cell(neighbor)
                .add_lift(neighbor_face, dofs, &mirrored, -1.0, out.cell_mut(neighbor));
        }
    }

    Ok(out)
}

/// Forward-Euler step φ + Δt · rhs(φ), returned as a fresh vector.
///
/// `previous` is never modified. Stability of `dt` is the caller's
/// responsibility (see [`stable_time_step`](crate::time::stable_time_step));
/// a non-finite result is reported as [`AdvectionError::NumericalInstability`].
pub fn advance<M: MeshTopology>(
    previous: &Solution,
    mesh: &M,
    config: &AdvectionRhsConfig<'_>,
    dt: f64,
) -> Result<Solution> {
    let l = rhs(previous, mesh, config)?;
    let mut next = previous.clone();
    next.axpy(dt, &l);
    check_finite(&next)?;
    Ok(next)
}

pub(crate) fn check_finite(solution: &Solution) -> Result<()> {
    match solution.find_non_finite() {
        Some((cell, dof)) => Err(AdvectionError::NumericalInstability { cell, dof }),
        None => Ok(()),
    }
}

fn check_sizes<M: MeshTopology>(previous: &Solution, mesh: &M, arena: &OperatorArena) -> Result<()> {
    if mesh.n_cells() != arena.n_cells() {
        return Err(AdvectionError::config(format!(
            "mesh has {} cells but operators were built for {}",
            mesh.n_cells(),
            arena.n_cells()
        )));
    }
    if previous.n_cells != arena.n_cells() || previous.dofs_per_cell != arena.dofs_per_cell() {
        return Err(AdvectionError::config(format!(
            "solution is {} cells × {} dofs, operators expect {} × {}",
            previous.n_cells,
            previous.dofs_per_cell,
            arena.n_cells(),
            arena.dofs_per_cell()
        )));
    }
    Ok(())
}
