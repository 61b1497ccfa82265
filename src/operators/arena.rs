//! Flat storage of the local operators of every cell.

use std::fmt;

use faer::Mat;
use tracing::{debug, info};

use crate::error::Result;
use crate::fe::NodalBasis;
use crate::mesh::{Face, MeshGeometry};
use crate::operators::{FaceDofMap, LocalOperators, build_cell};
use crate::wind::WindField;

/// Local operators for all cells, indexed by cell id.
///
/// Built once per (mesh, order, wind) and immutable afterwards.
#[derive(Clone, Debug)]
pub struct OperatorArena {
    order: usize,
    face_dofs: FaceDofMap,
    cells: Vec<LocalOperators>,
}

impl OperatorArena {
    /// Build the operators of every cell.
    ///
    /// The first failing cell aborts the whole build; no partial arena is
    /// returned.
    pub fn build<M, W>(mesh: &M, basis: &NodalBasis, wind: &W) -> Result<Self>
    where
        M: MeshGeometry,
        W: WindField + ?Sized,
    {
        let n_cells = mesh.n_cells();
        info!(
            n_cells,
            order = basis.order(),
            dofs_per_cell = basis.dofs_per_cell(),
            "building local operators"
        );

        #[cfg(feature = "parallel")]
        let cells = {
            use rayon::prelude::*;
            (0..n_cells)
                .into_par_iter()
                .map(|k| {
                    debug!(cell = k, "assembling cell operators");
                    build_cell(mesh, k, basis, wind)
                })
                .collect::<Result<Vec<_>>>()?
        };

        #[cfg(not(feature = "parallel"))]
        let cells = (0..n_cells)
            .map(|k| {
                debug!(cell = k, "assembling cell operators");
                build_cell(mesh, k, basis, wind)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            order: basis.order(),
            face_dofs: FaceDofMap::new(basis.order()),
            cells,
        })
    }

    #[inline]
    pub fn order(&self) -> usize {
        self.order
    }

    #[inline]
    pub fn n_cells(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn dofs_per_cell(&self) -> usize {
        (self.order + 1) * (self.order + 1)
    }

    /// Face-to-cell dof tables shared by every cell.
    #[inline]
    pub fn face_dofs(&self) -> &FaceDofMap {
        &self.face_dofs
    }

    /// Operators of cell `k`.
    #[inline]
    pub fn cell(&self, k: usize) -> &LocalOperators {
        &self.cells[k]
    }

    /// Iterate over all cells' operators in index order.
    pub fn iter(&self) -> impl Iterator<Item = &LocalOperators> {
        self.cells.iter()
    }

    /// Human-readable stiffness and lifting matrices of cell `k`, or `None`
    /// if there is no such cell.
    pub fn describe_cell(&self, k: usize) -> Option<String> {
        let ops = self.cells.get(k)?;
        let mut out = String::new();
        write_cell_matrices(&mut out, k, ops).ok()?;
        Some(out)
    }
}

fn write_cell_matrices(out: &mut impl fmt::Write, k: usize, ops: &LocalOperators) -> fmt::Result {
    write_matrix(out, &format!("Stiffness matrix, cell {}", k), &ops.stiffness)?;
    for face in Face::ALL {
        write_matrix(
            out,
            &format!("Lifting matrix, cell {}, face {}", k, face.index()),
            ops.lift(face),
        )?;
    }
    Ok(())
}

fn write_matrix(out: &mut impl fmt::Write, title: &str, m: &Mat<f64>) -> fmt::Result {
    writeln!(out, "{}", title)?;
    for i in 0..m.nrows() {
        for j in 0..m.ncols() {
            write!(out, "{:>13.5e}", m[(i, j)])?;
        }
        writeln!(out)?;
    }
    writeln!(out)
}
