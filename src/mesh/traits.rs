//! Mesh traits used by the operator builder and the face walker.
//!
//! - [`MeshTopology`]: cell count and face connectivity
//! - [`MeshGeometry`]: bilinear reference-to-physical mapping of each cell
//!
//! Every cell is a quadrilateral with four faces in a fixed order
//! (see [`Face`]). Cell vertices are stored lexicographically, so the
//! reference corners (-1,-1), (1,-1), (-1,1), (1,1) map to vertices 0..4 and
//! every face runs along the positive reference axis.

use super::boundary_tags::BoundaryTag;

/// Local face of a quadrilateral cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Face {
    /// r = -1
    XMin = 0,
    /// r = +1
    XMax = 1,
    /// s = -1
    YMin = 2,
    /// s = +1
    YMax = 3,
}

impl Face {
    /// All faces in local order.
    pub const ALL: [Face; 4] = [Face::XMin, Face::XMax, Face::YMin, Face::YMax];

    /// Convert a local face index into a face.
    ///
    /// # Panics
    /// If `index >= 4`. Face indices are produced by the crate itself, so an
    /// out-of-range value is a programming error.
    pub fn from_index(index: usize) -> Face {
        match index {
            0 => Face::XMin,
            1 => Face::XMax,
            2 => Face::YMin,
            3 => Face::YMax,
            _ => panic!("invalid face index {index}: quadrilaterals have faces 0..4"),
        }
    }

    /// Local face index in 0..4.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The face on the opposite side of the cell.
    pub fn opposite(self) -> Face {
        match self {
            Face::XMin => Face::XMax,
            Face::XMax => Face::XMin,
            Face::YMin => Face::YMax,
            Face::YMax => Face::YMin,
        }
    }

    /// Local vertex indices at the start and end of the face.
    pub fn vertices(self) -> [usize; 2] {
        match self {
            Face::XMin => [0, 2],
            Face::XMax => [1, 3],
            Face::YMin => [0, 1],
            Face::YMax => [2, 3],
        }
    }

    /// Reference coordinates of the point at parameter `t` in [-1, 1] along the face.
    pub fn reference_point(self, t: f64) -> (f64, f64) {
        match self {
            Face::XMin => (-1.0, t),
            Face::XMax => (1.0, t),
            Face::YMin => (t, -1.0),
            Face::YMax => (t, 1.0),
        }
    }
}

/// Information about a neighbour cell across a face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Neighbor {
    /// Index of the neighbouring cell.
    pub cell: usize,
    /// Face of the neighbouring cell that points back at this cell.
    pub face: Face,
    /// True when the two faces run in opposite physical directions.
    pub reversed: bool,
}

/// Result of querying face connectivity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaceConnection {
    /// Interior face shared with a neighbour cell.
    Interior(Neighbor),
    /// Boundary face with its tag.
    Boundary(BoundaryTag),
}

impl FaceConnection {
    /// Returns `true` if this is an interior face.
    #[inline]
    pub fn is_interior(&self) -> bool {
        matches!(self, FaceConnection::Interior(_))
    }

    /// Returns `true` if this is a boundary face.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        matches!(self, FaceConnection::Boundary(_))
    }

    /// Returns the neighbour if this is an interior face.
    #[inline]
    pub fn neighbor(&self) -> Option<&Neighbor> {
        match self {
            FaceConnection::Interior(n) => Some(n),
            FaceConnection::Boundary(_) => None,
        }
    }

    /// Returns the boundary tag if this is a boundary face.
    #[inline]
    pub fn boundary_tag(&self) -> Option<BoundaryTag> {
        match self {
            FaceConnection::Interior(_) => None,
            FaceConnection::Boundary(t) => Some(*t),
        }
    }
}

/// Cell count and face connectivity.
pub trait MeshTopology: Send + Sync {
    /// Number of faces per cell.
    const FACES_PER_CELL: usize = 4;

    /// Total number of cells. Cell indices are dense in `0..n_cells()`.
    fn n_cells(&self) -> usize;

    /// Query connectivity across a face.
    fn connection(&self, cell: usize, face: Face) -> FaceConnection;

    /// Neighbour across a face, if interior.
    fn neighbor(&self, cell: usize, face: Face) -> Option<Neighbor> {
        self.connection(cell, face).neighbor().copied()
    }

    /// Boundary tag of a face, if on the boundary.
    fn boundary_tag(&self, cell: usize, face: Face) -> Option<BoundaryTag> {
        self.connection(cell, face).boundary_tag()
    }
}

/// Jacobian of the reference-to-physical map at a point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Jacobian {
    pub x_r: f64,
    pub x_s: f64,
    pub y_r: f64,
    pub y_s: f64,
}

impl Jacobian {
    /// Determinant x_r y_s - x_s y_r.
    #[inline]
    pub fn det(&self) -> f64 {
        self.x_r * self.y_s - self.x_s * self.y_r
    }
}

/// Bilinear geometry of quadrilateral cells.
pub trait MeshGeometry: MeshTopology {
    /// Physical vertices of a cell in lexicographic order.
    fn cell_vertices(&self, cell: usize) -> [(f64, f64); 4];

    /// Map reference coordinates (r, s) in [-1, 1]² to physical coordinates.
    ///
    /// ```text
    /// x(r, s) = (1-r)(1-s)/4 x0 + (1+r)(1-s)/4 x1
    ///         + (1-r)(1+s)/4 x2 + (1+r)(1+s)/4 x3
    /// ```
    fn reference_to_physical(&self, cell: usize, r: f64, s: f64) -> (f64, f64) {
        let verts = self.cell_vertices(cell);
        let n = [
            (1.0 - r) * (1.0 - s) / 4.0,
            (1.0 + r) * (1.0 - s) / 4.0,
            (1.0 - r) * (1.0 + s) / 4.0,
            (1.0 + r) * (1.0 + s) / 4.0,
        ];
        verts
            .iter()
            .zip(n.iter())
            .fold((0.0, 0.0), |(x, y), (&(vx, vy), &w)| (x + w * vx, y + w * vy))
    }

    /// Jacobian of the bilinear map at (r, s).
    fn jacobian(&self, cell: usize, r: f64, s: f64) -> Jacobian {
        let verts = self.cell_vertices(cell);
        let dn_dr = [-(1.0 - s) / 4.0, (1.0 - s) / 4.0, -(1.0 + s) / 4.0, (1.0 + s) / 4.0];
        let dn_ds = [-(1.0 - r) / 4.0, -(1.0 + r) / 4.0, (1.0 - r) / 4.0, (1.0 + r) / 4.0];

        let mut jac = Jacobian {
            x_r: 0.0,
            x_s: 0.0,
            y_r: 0.0,
            y_s: 0.0,
        };
        for (v, &(x, y)) in verts.iter().enumerate() {
            jac.x_r += dn_dr[v] * x;
            jac.x_s += dn_ds[v] * x;
            jac.y_r += dn_dr[v] * y;
            jac.y_s += dn_ds[v] * y;
        }
        jac
    }

    /// Physical midpoint of a face.
    fn face_center(&self, cell: usize, face: Face) -> (f64, f64) {
        let verts = self.cell_vertices(cell);
        let [a, b] = face.vertices();
        (
            0.5 * (verts[a].0 + verts[b].0),
            0.5 * (verts[a].1 + verts[b].1),
        )
    }

    /// Minimum face length over the mesh, used for CFL estimates.
    fn h_min(&self) -> f64 {
        let mut h_min = f64::INFINITY;
        for cell in 0..self.n_cells() {
            let verts = self.cell_vertices(cell);
            for face in Face::ALL {
                let [a, b] = face.vertices();
                let len = ((verts[b].0 - verts[a].0).powi(2) + (verts[b].1 - verts[a].1).powi(2))
                    .sqrt();
                h_min = h_min.min(len);
            }
        }
        h_min
    }
}
