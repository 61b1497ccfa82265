//! Mesh representation.
//!
//! Provides the quadrilateral mesh used by the DG discretization:
//! - Connectivity and geometry traits
//! - Boundary tags with fixed numeric ids
//! - Structured, periodic and unstructured quad meshes
//! - The face walker producing one work item per unique face

mod boundary_tags;
mod quad_mesh;
mod traits;
mod walker;

pub use boundary_tags::BoundaryTag;
pub use quad_mesh::{MAX_REFINEMENTS, QuadMesh};
pub use traits::{Face, FaceConnection, Jacobian, MeshGeometry, MeshTopology, Neighbor};
pub use walker::{FaceWalker, FaceWorkItem, face_work_items, is_canonical_owner};
