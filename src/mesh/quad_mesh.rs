//! Quadrilateral mesh with precomputed face connectivity.
//!
//! Cells store their four vertex indices lexicographically:
//! - v0: (r=-1, s=-1)
//! - v1: (r=+1, s=-1)
//! - v2: (r=-1, s=+1)
//! - v3: (r=+1, s=+1)
//!
//! Faces follow [`Face`]: 0 = x-min (v0→v2), 1 = x-max (v1→v3),
//! 2 = y-min (v0→v1), 3 = y-max (v2→v3).

use std::collections::HashMap;

use super::boundary_tags::BoundaryTag;
use super::traits::{Face, FaceConnection, MeshGeometry, MeshTopology, Neighbor};
use crate::error::{AdvectionError, Result};

/// Largest global refinement accepted by [`QuadMesh::unit_square`].
pub const MAX_REFINEMENTS: u32 = 12;

/// 2D mesh of quadrilateral cells.
#[derive(Clone, Debug)]
pub struct QuadMesh {
    /// Vertex coordinates: vertices[i] = (x, y)
    pub vertices: Vec<(f64, f64)>,
    /// Cell-vertex connectivity in lexicographic order
    pub cells: Vec<[usize; 4]>,
    /// Connectivity of every (cell, face)
    connections: Vec<[FaceConnection; 4]>,
}

impl QuadMesh {
    /// Uniform `2^refinements × 2^refinements` mesh of the unit square.
    ///
    /// Boundary faces are tagged by their centre: x = 0 is [`BoundaryTag::XMin`],
    /// y = 0 is [`BoundaryTag::YMin`] and the remaining sides are [`BoundaryTag::Far`].
    pub fn unit_square(refinements: u32) -> Result<Self> {
        if refinements > MAX_REFINEMENTS {
            return Err(AdvectionError::config(format!(
                "refinement level {} exceeds the maximum of {}",
                refinements, MAX_REFINEMENTS
            )));
        }
        let n = 1usize << refinements;
        Self::uniform_rectangle(0.0, 1.0, 0.0, 1.0, n, n)
    }

    /// Uniform mesh of [x0, x1] × [y0, y1] with `nx × ny` cells.
    ///
    /// Cell (i, j) has index `j * nx + i`.
    pub fn uniform_rectangle(x0: f64, x1: f64, y0: f64, y1: f64, nx: usize, ny: usize) -> Result<Self> {
        let (vertices, cells) = structured_grid(x0, x1, y0, y1, nx, ny)?;
        let tol = 1e-10 * (x1 - x0).max(y1 - y0);

        let mut mesh = Self {
            vertices,
            cells,
            connections: Vec::with_capacity(nx * ny),
        };

        for j in 0..ny {
            for i in 0..nx {
                let k = j * nx + i;
                let mut conn = [FaceConnection::Boundary(BoundaryTag::Far); 4];
                let neighbors = [
                    (i > 0).then(|| k - 1),
                    (i + 1 < nx).then(|| k + 1),
                    (j > 0).then(|| k - nx),
                    (j + 1 < ny).then(|| k + nx),
                ];
                for face in Face::ALL {
                    conn[face.index()] = match neighbors[face.index()] {
                        Some(cell) => FaceConnection::Interior(Neighbor {
                            cell,
                            face: face.opposite(),
                            reversed: false,
                        }),
                        None => {
                            let center = mesh.face_center_of(k, face);
                            FaceConnection::Boundary(BoundaryTag::classify(center, x0, y0, tol))
                        }
                    };
                }
                mesh.connections.push(conn);
            }
        }

        Ok(mesh)
    }

    /// Uniform mesh of [x0, x1] × [y0, y1], periodic in both directions.
    ///
    /// Needs at least two cells in each direction, otherwise a cell would be
    /// its own neighbour.
    pub fn uniform_periodic(x0: f64, x1: f64, y0: f64, y1: f64, nx: usize, ny: usize) -> Result<Self> {
        if nx < 2 || ny < 2 {
            return Err(AdvectionError::config(format!(
                "periodic mesh needs at least 2 cells per direction, got {}×{}",
                nx, ny
            )));
        }
        let (vertices, cells) = structured_grid(x0, x1, y0, y1, nx, ny)?;

        let mut connections = Vec::with_capacity(nx * ny);
        for j in 0..ny {
            for i in 0..nx {
                let neighbors = [
                    j * nx + (i + nx - 1) % nx,
                    j * nx + (i + 1) % nx,
                    ((j + ny - 1) % ny) * nx + i,
                    ((j + 1) % ny) * nx + i,
                ];
                let mut conn = [FaceConnection::Boundary(BoundaryTag::Far); 4];
                for face in Face::ALL {
                    conn[face.index()] = FaceConnection::Interior(Neighbor {
                        cell: neighbors[face.index()],
                        face: face.opposite(),
                        reversed: false,
                    });
                }
                connections.push(conn);
            }
        }

        Ok(Self {
            vertices,
            cells,
            connections,
        })
    }

    /// Build a mesh from explicit vertices and lexicographic cell connectivity.
    ///
    /// Faces are matched through shared vertex pairs. A shared face whose
    /// two sides run in opposite directions is marked `reversed`. Boundary
    /// faces are tagged by their centre relative to the mesh bounding box.
    pub fn from_cells(vertices: Vec<(f64, f64)>, cells: Vec<[usize; 4]>) -> Result<Self> {
        if cells.is_empty() {
            return Err(AdvectionError::config("mesh has no cells"));
        }
        for (k, cell) in cells.iter().enumerate() {
            if let Some(&v) = cell.iter().find(|&&v| v >= vertices.len()) {
                return Err(AdvectionError::config(format!(
                    "cell {} references vertex {} but only {} vertices exist",
                    k,
                    v,
                    vertices.len()
                )));
            }
        }

        // Undirected edge -> (cell, face) occurrences
        let mut edges: HashMap<(usize, usize), Vec<(usize, Face)>> = HashMap::new();
        for (k, cell) in cells.iter().enumerate() {
            for face in Face::ALL {
                let [a, b] = face.vertices();
                let (va, vb) = (cell[a], cell[b]);
                edges.entry((va.min(vb), va.max(vb))).or_default().push((k, face));
            }
        }

        let x_min = vertices.iter().map(|v| v.0).fold(f64::INFINITY, f64::min);
        let y_min = vertices.iter().map(|v| v.1).fold(f64::INFINITY, f64::min);
        let x_max = vertices.iter().map(|v| v.0).fold(f64::NEG_INFINITY, f64::max);
        let y_max = vertices.iter().map(|v| v.1).fold(f64::NEG_INFINITY, f64::max);
        let tol = 1e-10 * (x_max - x_min).max(y_max - y_min);

        let mut mesh = Self {
            vertices,
            cells,
            connections: Vec::new(),
        };
        let mut connections = vec![[FaceConnection::Boundary(BoundaryTag::Far); 4]; mesh.cells.len()];

        for (key, sides) in &edges {
            match sides.as_slice() {
                [(k, face)] => {
                    let center = mesh.face_center_of(*k, *face);
                    connections[*k][face.index()] =
                        FaceConnection::Boundary(BoundaryTag::classify(center, x_min, y_min, tol));
                }
                [(ka, fa), (kb, fb)] => {
                    if ka == kb {
                        return Err(AdvectionError::config(format!(
                            "cell {} is its own neighbour across faces {:?} and {:?}",
                            ka, fa, fb
                        )));
                    }
                    let start_a = mesh.cells[*ka][fa.vertices()[0]];
                    let start_b = mesh.cells[*kb][fb.vertices()[0]];
                    let reversed = start_a != start_b;
                    connections[*ka][fa.index()] = FaceConnection::Interior(Neighbor {
                        cell: *kb,
                        face: *fb,
                        reversed,
                    });
                    connections[*kb][fb.index()] = FaceConnection::Interior(Neighbor {
                        cell: *ka,
                        face: *fa,
                        reversed,
                    });
                }
                _ => {
                    return Err(AdvectionError::config(format!(
                        "edge ({}, {}) is shared by {} cells",
                        key.0,
                        key.1,
                        sides.len()
                    )));
                }
            }
        }

        mesh.connections = connections;
        Ok(mesh)
    }

    /// Number of cells.
    #[inline]
    pub fn n_cells(&self) -> usize {
        self.cells.len()
    }

    /// Number of boundary faces.
    pub fn n_boundary_faces(&self) -> usize {
        self.connections
            .iter()
            .flat_map(|c| c.iter())
            .filter(|c| c.is_boundary())
            .count()
    }

    /// Number of unique interior faces.
    pub fn n_interior_faces(&self) -> usize {
        let sides = self
            .connections
            .iter()
            .flat_map(|c| c.iter())
            .filter(|c| c.is_interior())
            .count();
        sides / 2
    }

    fn face_center_of(&self, cell: usize, face: Face) -> (f64, f64) {
        let [a, b] = face.vertices();
        let (pa, pb) = (self.vertices[self.cells[cell][a]], self.vertices[self.cells[cell][b]]);
        (0.5 * (pa.0 + pb.0), 0.5 * (pa.1 + pb.1))
    }
}

fn structured_grid(
    x0: f64,
    x1: f64,
    y0: f64,
    y1: f64,
    nx: usize,
    ny: usize,
) -> Result<(Vec<(f64, f64)>, Vec<[usize; 4]>)> {
    if nx == 0 || ny == 0 {
        return Err(AdvectionError::config(
            "need at least one cell in each direction",
        ));
    }
    if !(x1 > x0 && y1 > y0) {
        return Err(AdvectionError::config(format!(
            "invalid domain bounds [{}, {}] × [{}, {}]",
            x0, x1, y0, y1
        )));
    }

    let dx = (x1 - x0) / nx as f64;
    let dy = (y1 - y0) / ny as f64;

    let mut vertices = Vec::with_capacity((nx + 1) * (ny + 1));
    for j in 0..=ny {
        for i in 0..=nx {
            vertices.push((x0 + i as f64 * dx, y0 + j as f64 * dy));
        }
    }

    let mut cells = Vec::with_capacity(nx * ny);
    for j in 0..ny {
        for i in 0..nx {
            let v0 = j * (nx + 1) + i;
            let v2 = v0 + (nx + 1);
            cells.push([v0, v0 + 1, v2, v2 + 1]);
        }
    }

    Ok((vertices, cells))
}

impl MeshTopology for QuadMesh {
    fn n_cells(&self) -> usize {
        self.cells.len()
    }

    fn connection(&self, cell: usize, face: Face) -> FaceConnection {
        self.connections[cell][face.index()]
    }
}

impl MeshGeometry for QuadMesh {
    fn cell_vertices(&self, cell: usize) -> [(f64, f64); 4] {
        let [v0, v1, v2, v3] = self.cells[cell];
        [
            self.vertices[v0],
            self.vertices[v1],
            self.vertices[v2],
            self.vertices[v3],
        ]
    }
}
