//! Flux resolution for one face work item.

use crate::boundary::BoundaryTable;
use crate::error::{AdvectionError, Result};
use crate::mesh::FaceWorkItem;
use crate::operators::OperatorArena;
use crate::solver::Solution;

use super::NumericalFlux;

/// Numerical flux at every face dof of `item`, in the owner's face-local order.
///
/// The value is the flux leaving the owner through the face. The neighbour
/// of an interior item receives its negation.
pub fn resolve(
    item: &FaceWorkItem,
    previous: &Solution,
    arena: &OperatorArena,
    boundaries: &BoundaryTable,
    flux: NumericalFlux,
) -> Result<Vec<f64>> {
    let mut out = vec![0.0; arena.order() + 1];
    resolve_into(item, previous, arena, boundaries, flux, &mut out)?;
    Ok(out)
}

/// As [`resolve`], writing into `out` (length order + 1).
pub fn resolve_into(
    item: &FaceWorkItem,
    previous: &Solution,
    arena: &OperatorArena,
    boundaries: &BoundaryTable,
    flux: NumericalFlux,
    out: &mut [f64],
) -> Result<()> {
    let dofs = arena.face_dofs();
    let owner = item.owner();
    let owner_face = item.owner_face();
    let speeds = arena.cell(owner).normal_wind(owner_face);
    let u_owner_cell = previous.cell(owner);

    for (i, f) in out.iter_mut().enumerate() {
        let k_owner = dofs.map(owner_face, i);
        let u_owner = checked(u_owner_cell[k_owner], owner, k_owner)?;

        let u_neighbor = match *item {
            FaceWorkItem::Interior {
                neighbor,
                neighbor_face,
                reversed,
                ..
            } => {
                let k = dofs.map(neighbor_face, dofs.paired_index(i, reversed));
                checked(previous.cell(neighbor)[k], neighbor, k)?
            }
            FaceWorkItem::Boundary { tag, .. } => boundaries.ghost_value(tag, u_owner)?,
        };

        *f = flux.evaluate(speeds[i], u_owner, u_neighbor);
    }
    Ok(())
}

#[inline]
fn checked(value: f64, cell: usize, dof: usize) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(AdvectionError::NumericalInstability { cell, dof })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::{FixedValue, ZeroGradient};
    use crate::fe::NodalBasis;
    use crate::mesh::{BoundaryTag, Face, QuadMesh, face_work_items};
    use crate::wind::UniformWind;

    #[test]
    fn test_equal_states_give_advective_flux() {
        // Two order-2 cells side by side
        let mesh = QuadMesh::uniform_rectangle(0.0, 2.0, 0.0, 1.0, 2, 1).unwrap();
        let basis = NodalBasis::new(2).unwrap();
        let wind = UniformWind::new(0.6, -0.3);
        let arena = OperatorArena::build(&mesh, &basis, &wind).unwrap();
        let phi = 1.7;
        let previous = Solution::interpolate(&mesh, &basis, |_, _| phi);
        let boundaries = BoundaryTable::uniform(phi);

        let shared: Vec<_> = face_work_items(&mesh)
            .filter(|i| matches!(i, FaceWorkItem::Interior { .. }))
            .collect();
        assert_eq!(shared.len(), 1);

        for flux in [NumericalFlux::Upwind, NumericalFlux::LaxFriedrichs] {
            let f = resolve(&shared[0], &previous, &arena, &boundaries, flux).unwrap();
            assert_eq!(f.len(), 3);
            for &value in &f {
                // Owner is cell 0, outward normal (1, 0)
                assert!((value - 0.6 * phi).abs() < 1e-14);
            }
        }
    }

    #[test]
    fn test_boundary_ghost_value() {
        let mesh = QuadMesh::unit_square(0).unwrap();
        let basis = NodalBasis::new(1).unwrap();
        let arena = OperatorArena::build(&mesh, &basis, &UniformWind::new(1.0, 0.0)).unwrap();
        let previous = Solution::interpolate(&mesh, &basis, |_, _| 0.5);
        let boundaries = BoundaryTable::new()
            .with(BoundaryTag::XMin, FixedValue(2.0))
            .with(BoundaryTag::YMin, FixedValue(0.0))
            .with(BoundaryTag::Far, ZeroGradient);

        let items: Vec<_> = face_work_items(&mesh).collect();
        // x-min inflow: a_n = -1, ghost 2
        let f = resolve(&items[0], &previous, &arena, &boundaries, NumericalFlux::Upwind).unwrap();
        assert!(f.iter().all(|&v| (v + 2.0).abs() < 1e-14));
        // x-max outflow: a_n = 1, owner 0.5
        let f = resolve(&items[1], &previous, &arena, &boundaries, NumericalFlux::Upwind).unwrap();
        assert!(f.iter().all(|&v| (v - 0.5).abs() < 1e-14));
        assert_eq!(items[1].owner_face(), Face::XMax);
    }

    #[test]
    fn test_upwind_takes_neighbor_on_inflow() {
        let mesh = QuadMesh::uniform_rectangle(0.0, 2.0, 0.0, 1.0, 2, 1).unwrap();
        let basis = NodalBasis::new(1).unwrap();
        // Wind blows from cell 1 into cell 0
        let arena = OperatorArena::build(&mesh, &basis, &UniformWind::new(-1.0, 0.0)).unwrap();
        let mut previous = Solution::new(2, 4);
        previous.cell_mut(0).fill(1.0);
        previous.cell_mut(1).fill(3.0);
        let boundaries = BoundaryTable::uniform(0.0);

        let item = face_work_items(&mesh)
            .find(|i| matches!(i, FaceWorkItem::Interior { .. }))
            .unwrap();
        let f = resolve(&item, &previous, &arena, &boundaries, NumericalFlux::Upwind).unwrap();
        assert!(f.iter().all(|&v| (v + 3.0).abs() < 1e-14));
    }

    #[test]
    fn test_reversed_face_pairs_mirrored_dofs() {
        let vertices = vec![
            (0.0, 0.0),
            (1.0, 0.0),
            (0.0, 1.0),
            (1.0, 1.0),
            (2.0, 0.0),
            (2.0, 1.0),
        ];
        let mesh = QuadMesh::from_cells(vertices, vec![[0, 1, 2, 3], [5, 3, 4, 1]]).unwrap();
        let basis = NodalBasis::new(1).unwrap();
        let arena = OperatorArena::build(&mesh, &basis, &UniformWind::new(-1.0, 0.0)).unwrap();
        // Smooth field sampled on both cells: the traces must agree pointwise
        let previous = Solution::interpolate(&mesh, &basis, |_, y| 1.0 + y);
        let boundaries = BoundaryTable::uniform(0.0);

        let item = face_work_items(&mesh)
            .find(|i| matches!(i, FaceWorkItem::Interior { reversed: true, .. }))
            .unwrap();
        let f = resolve(&item, &previous, &arena, &boundaries, NumericalFlux::Upwind).unwrap();
        // Inflow from the neighbour at y = 0 then y = 1
        assert!((f[0] + 1.0).abs() < 1e-14);
        assert!((f[1] + 2.0).abs() < 1e-14);
    }

    #[test]
    fn test_non_finite_trace_is_reported() {
        let mesh = QuadMesh::unit_square(0).unwrap();
        let basis = NodalBasis::new(1).unwrap();
        let arena = OperatorArena::build(&mesh, &basis, &UniformWind::new(1.0, 0.0)).unwrap();
        let mut previous = Solution::new(1, 4);
        previous.cell_mut(0)[2] = f64::INFINITY;
        let boundaries = BoundaryTable::uniform(0.0);

        let item = face_work_items(&mesh).next().unwrap();
        let err = resolve(&item, &previous, &arena, &boundaries, NumericalFlux::Upwind).unwrap_err();
        assert!(matches!(err, AdvectionError::NumericalInstability { cell: 0, dof: 2 }));
    }
}
