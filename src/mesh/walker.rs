//! Face traversal that visits every face exactly once.
//!
//! Interior faces are emitted from their canonical owner, the lower-indexed
//! of the two cells. The walker keeps no visited flags: the ownership test is
//! a pure predicate on the two cell indices, so the sequence can be restarted
//! at any time and produces the same items in the same order.

use super::boundary_tags::BoundaryTag;
use super::traits::{Face, FaceConnection, MeshTopology};

/// One unit of face work.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaceWorkItem {
    /// Face shared by two cells, emitted once from the owner.
    Interior {
        owner: usize,
        owner_face: Face,
        neighbor: usize,
        neighbor_face: Face,
        /// Neighbour face dof `order - i` pairs with owner face dof `i`.
        reversed: bool,
    },
    /// Face on the domain boundary.
    Boundary {
        owner: usize,
        owner_face: Face,
        tag: BoundaryTag,
    },
}

impl FaceWorkItem {
    /// Cell that owns the face.
    #[inline]
    pub fn owner(&self) -> usize {
        match *self {
            FaceWorkItem::Interior { owner, .. } | FaceWorkItem::Boundary { owner, .. } => owner,
        }
    }

    /// Face of the owner cell.
    #[inline]
    pub fn owner_face(&self) -> Face {
        match *self {
            FaceWorkItem::Interior { owner_face, .. } | FaceWorkItem::Boundary { owner_face, .. } => {
                owner_face
            }
        }
    }
}

/// Returns `true` if `cell` owns the face it shares with `neighbor`.
#[inline]
pub fn is_canonical_owner(cell: usize, neighbor: usize) -> bool {
    cell < neighbor
}

/// Lazy iterator over the unique faces of a mesh.
///
/// Cells are visited in index order and faces in local order.
pub struct FaceWalker<'a, M: MeshTopology> {
    mesh: &'a M,
    cell: usize,
    face: usize,
}

impl<'a, M: MeshTopology> FaceWalker<'a, M> {
    pub fn new(mesh: &'a M) -> Self {
        Self {
            mesh,
            cell: 0,
            face: 0,
        }
    }
}

impl<M: MeshTopology> Iterator for FaceWalker<'_, M> {
    type Item = FaceWorkItem;

    fn next(&mut self) -> Option<FaceWorkItem> {
        let n_cells = self.mesh.n_cells();
        while self.cell < n_cells {
            let cell = self.cell;
            let face = Face::from_index(self.face);

            self.face += 1;
            if self.face == M::FACES_PER_CELL {
                self.face = 0;
                self.cell += 1;
            }

            match self.mesh.connection(cell, face) {
                FaceConnection::Boundary(tag) => {
                    return Some(FaceWorkItem::Boundary {
                        owner: cell,
                        owner_face: face,
                        tag,
                    });
                }
                FaceConnection::Interior(n) if is_canonical_owner(cell, n.cell) => {
                    return Some(FaceWorkItem::Interior {
                        owner: cell,
                        owner_face: face,
                        neighbor: n.cell,
                        neighbor_face: n.face,
                        reversed: n.reversed,
                    });
                }
                FaceConnection::Interior(_) => {}
            }
        }
        None
    }
}

/// Start a fresh traversal of `mesh`.
pub fn face_work_items<M: MeshTopology>(mesh: &M) -> FaceWalker<'_, M> {
    FaceWalker::new(mesh)
}
