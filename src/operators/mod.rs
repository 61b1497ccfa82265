//! DG operators: face dof numbering, per-cell mass, stiffness and lifting
//! matrices, and the arena that holds them for a whole mesh.

mod arena;
mod face_map;
mod local;

pub use arena::OperatorArena;
pub use face_map::{Face, FaceDofMap, face_to_cell_dof};
pub use local::{LocalOperators, build_cell};
