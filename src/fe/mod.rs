//! Finite-element evaluation on quadrilateral cells.
//!
//! - [`NodalBasis`]: Lagrange basis on Gauss-Lobatto-Legendre support points
//! - [`CellValues`] / [`FaceValues`]: shape data and weights at Gauss points

mod basis;
mod values;

pub use basis::{MAX_ORDER, NodalBasis};
pub use values::{CellValues, FacePoint, FaceValues, face_point};
