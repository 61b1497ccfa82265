//! Face-local to cell-local dof numbering.
//!
//! With lexicographic dofs (x fastest) the `order + 1` dofs on a face form an
//! arithmetic progression `first + i * stride`:
//!
//! | face  | first             | stride    |
//! |-------|-------------------|-----------|
//! | x-min | 0                 | order + 1 |
//! | x-max | order             | order + 1 |
//! | y-min | 0                 | 1         |
//! | y-max | order * (order+1) | 1         |
//!
//! Face-local index `i` increases along the positive reference axis of the
//! face, matching the order of face quadrature points.

pub use crate::mesh::Face;

/// Cell dof of face-local dof `i` on `face`.
#[inline]
pub fn face_to_cell_dof(order: usize, face: Face, i: usize) -> usize {
    let n_1d = order + 1;
    let (first, stride) = match face {
        Face::XMin => (0, n_1d),
        Face::XMax => (order, n_1d),
        Face::YMin => (0, 1),
        Face::YMax => (order * n_1d, 1),
    };
    first + i * stride
}

/// Precomputed face-to-cell dof tables for one polynomial order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FaceDofMap {
    order: usize,
    /// dofs[face][i]
    dofs: [Vec<usize>; 4],
}

impl FaceDofMap {
    pub fn new(order: usize) -> Self {
        let table = |face: Face| (0..=order).map(|i| face_to_cell_dof(order, face, i)).collect();
        Self {
            order,
            dofs: [
                table(Face::XMin),
                table(Face::XMax),
                table(Face::YMin),
                table(Face::YMax),
            ],
        }
    }

    #[inline]
    pub fn order(&self) -> usize {
        self.order
    }

    /// Cell dof of face-local dof `i`.
    #[inline]
    pub fn map(&self, face: Face, i: usize) -> usize {
        self.dofs[face.index()][i]
    }

    /// All cell dofs on `face`, in face-local order.
    #[inline]
    pub fn face_dofs(&self, face: Face) -> &[usize] {
        &self.dofs[face.index()]
    }

    /// Neighbour face-local index paired with owner face-local index `i`.
    #[inline]
    pub fn paired_index(&self, i: usize, reversed: bool) -> usize {
        if reversed { self.order - i } else { i }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_bijection_onto_face_dofs() {
        for order in 0..=6 {
            let map = FaceDofMap::new(order);
            let n_1d = order + 1;
            for face in Face::ALL {
                let dofs: HashSet<usize> = map.face_dofs(face).iter().copied().collect();
                assert_eq!(dofs.len(), n_1d, "order {} face {:?}", order, face);
                assert!(dofs.iter().all(|&k| k < n_1d * n_1d));

                // Exactly the dofs whose support point lies on the face
                let expected: HashSet<usize> = (0..n_1d * n_1d)
                    .filter(|&k| {
                        let (i, j) = (k % n_1d, k / n_1d);
                        match face {
                            Face::XMin => i == 0,
                            Face::XMax => i == order,
                            Face::YMin => j == 0,
                            Face::YMax => j == order,
                        }
                    })
                    .collect();
                assert_eq!(dofs, expected);
            }
        }
    }

    #[test]
    fn test_order_zero_maps_to_single_dof() {
        for face in Face::ALL {
            assert_eq!(face_to_cell_dof(0, face, 0), 0);
        }
    }

    #[test]
    fn test_order_one_tables() {
        let map = FaceDofMap::new(1);
        assert_eq!(map.face_dofs(Face::XMin), &[0, 2]);
        assert_eq!(map.face_dofs(Face::XMax), &[1, 3]);
        assert_eq!(map.face_dofs(Face::YMin), &[0, 1]);
        assert_eq!(map.face_dofs(Face::YMax), &[2, 3]);
    }

    #[test]
    fn test_paired_index() {
        let map = FaceDofMap::new(3);
        assert_eq!(map.paired_index(1, false), 1);
        assert_eq!(map.paired_index(1, true), 2);
        assert_eq!(map.paired_index(0, true), 3);
    }

    #[test]
    #[should_panic]
    fn test_invalid_face_index_panics() {
        let _ = Face::from_index(4);
    }
}
