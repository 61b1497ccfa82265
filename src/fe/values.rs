//! Shape values, physical gradients and quadrature weights on one cell or face.
//!
//! Cell quadrature points are the tensor Gauss points, numbered like dofs
//! (x fastest). Face quadrature points run along the positive reference axis
//! of the face, so point `q` on face 0 is (r, s) = (-1, t_q).

use crate::error::{AdvectionError, Result};
use crate::fe::NodalBasis;
use crate::mesh::{Face, MeshGeometry};
use crate::operators::face_to_cell_dof;

/// Per-cell quadrature data.
#[derive(Clone, Debug)]
pub struct CellValues {
    n_dofs: usize,
    /// Physical quadrature points
    pub points: Vec<(f64, f64)>,
    /// Jacobian determinant times quadrature weight
    pub jxw: Vec<f64>,
    /// values[q * n_dofs + k]
    values: Vec<f64>,
    /// Physical gradients, same layout as `values`
    grads: Vec<(f64, f64)>,
}

impl CellValues {
    /// Evaluate the basis on `cell`.
    ///
    /// Fails with [`AdvectionError::DegenerateCell`] if the Jacobian is not
    /// positive and finite at every quadrature point.
    pub fn new<M: MeshGeometry>(mesh: &M, cell: usize, basis: &NodalBasis) -> Result<Self> {
        let rule = basis.quadrature();
        let n_1d = rule.len();
        let n_q = n_1d * n_1d;
        let n_dofs = basis.dofs_per_cell();

        let mut points = Vec::with_capacity(n_q);
        let mut jxw = Vec::with_capacity(n_q);
        let mut values = Vec::with_capacity(n_q * n_dofs);
        let mut grads = Vec::with_capacity(n_q * n_dofs);

        for qj in 0..n_1d {
            for qi in 0..n_1d {
                let (r, s) = (rule.points[qi], rule.points[qj]);
                let jac = mesh.jacobian(cell, r, s);
                let det = jac.det();
                if !(det.is_finite() && det > 0.0) {
                    return Err(AdvectionError::DegenerateCell {
                        cell,
                        jacobian: det,
                    });
                }

                points.push(mesh.reference_to_physical(cell, r, s));
                jxw.push(det * rule.weights[qi] * rule.weights[qj]);

                for k in 0..n_dofs {
                    values.push(basis.shape_value(k, r, s));
                    let (dr, ds) = basis.shape_grad_ref(k, r, s);
                    grads.push((
                        (jac.y_s * dr - jac.y_r * ds) / det,
                        (-jac.x_s * dr + jac.x_r * ds) / det,
                    ));
                }
            }
        }

        Ok(Self {
            n_dofs,
            points,
            jxw,
            values,
            grads,
        })
    }

    /// Number of quadrature points.
    #[inline]
    pub fn n_quadrature_points(&self) -> usize {
        self.jxw.len()
    }

    #[inline]
    pub fn shape_value(&self, k: usize, q: usize) -> f64 {
        self.values[q * self.n_dofs + k]
    }

    #[inline]
    pub fn shape_grad(&self, k: usize, q: usize) -> (f64, f64) {
        self.grads[q * self.n_dofs + k]
    }
}

/// Geometry at one point of a face.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FacePoint {
    /// Physical position
    pub point: (f64, f64),
    /// Outward unit normal
    pub normal: (f64, f64),
    /// Physical length per unit of the face parameter
    pub length_scale: f64,
}

/// Position, outward normal and length scale at parameter `t` along `face`.
pub fn face_point<M: MeshGeometry>(mesh: &M, cell: usize, face: Face, t: f64) -> Result<FacePoint> {
    let (r, s) = face.reference_point(t);
    let jac = mesh.jacobian(cell, r, s);

    let (tx, ty) = match face {
        Face::XMin | Face::XMax => (jac.x_s, jac.y_s),
        Face::YMin | Face::YMax => (jac.x_r, jac.y_r),
    };
    let length_scale = (tx * tx + ty * ty).sqrt();
    if !(length_scale.is_finite() && length_scale > 0.0) {
        return Err(AdvectionError::DegenerateCell {
            cell,
            jacobian: length_scale,
        });
    }

    // Rotate the tangent clockwise, then flip on the faces where that points inward
    let sign = match face {
        Face::XMin | Face::YMax => -1.0,
        Face::XMax | Face::YMin => 1.0,
    };
    let normal = (sign * ty / length_scale, -sign * tx / length_scale);

    Ok(FacePoint {
        point: mesh.reference_to_physical(cell, r, s),
        normal,
        length_scale,
    })
}

/// Per-face quadrature data for the `order + 1` basis functions living on the face.
#[derive(Clone, Debug)]
pub struct FaceValues {
    n_face_dofs: usize,
    /// Physical quadrature points
    pub points: Vec<(f64, f64)>,
    /// Outward unit normals
    pub normals: Vec<(f64, f64)>,
    /// Face length scale times quadrature weight
    pub jxw: Vec<f64>,
    /// values[q * n_face_dofs + i] for face-local dof i
    values: Vec<f64>,
}

impl FaceValues {
    pub fn new<M: MeshGeometry>(mesh: &M, cell: usize, face: Face, basis: &NodalBasis) -> Result<Self> {
        let rule = basis.quadrature();
        let n_face_dofs = basis.dofs_per_face();
        let n_q = rule.len();

        let mut points = Vec::with_capacity(n_q);
        let mut normals = Vec::with_capacity(n_q);
        let mut jxw = Vec::with_capacity(n_q);
        let mut values = Vec::with_capacity(n_q * n_face_dofs);

        for (&t, &w) in rule.points.iter().zip(rule.weights.iter()) {
            let fp = face_point(mesh, cell, face, t)?;
            points.push(fp.point);
            normals.push(fp.normal);
            jxw.push(fp.length_scale * w);

            let (r, s) = face.reference_point(t);
            for i in 0..n_face_dofs {
                let k = face_to_cell_dof(basis.order(), face, i);
                values.push(basis.shape_value(k, r, s));
            }
        }

        Ok(Self {
            n_face_dofs,
            points,
            normals,
            jxw,
            values,
        })
    }

    #[inline]
    pub fn n_quadrature_points(&self) -> usize {
        self.jxw.len()
    }

    /// Value of face-local basis function `i` at face quadrature point `q`.
    #[inline]
    pub fn shape_value(&self, i: usize, q: usize) -> f64 {
        self.values[q * self.n_face_dofs + i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::QuadMesh;

    #[test]
    fn test_cell_area() {
        let mesh = QuadMesh::uniform_rectangle(0.0, 2.0, 0.0, 1.0, 4, 2).unwrap();
        let basis = NodalBasis::new(2).unwrap();
        let values = CellValues::new(&mesh, 3, &basis).unwrap();
        let area: f64 = values.jxw.iter().sum();
        assert!((area - 0.25).abs() < 1e-14);
    }

    #[test]
    fn test_physical_gradient_of_linear_field() {
        // Skewed but convex cell
        let vertices = vec![(0.0, 0.0), (2.0, 0.2), (0.3, 1.0), (1.8, 1.5)];
        let mesh = QuadMesh::from_cells(vertices, vec![[0, 1, 2, 3]]).unwrap();
        let basis = NodalBasis::new(1).unwrap();
        let values = CellValues::new(&mesh, 0, &basis).unwrap();

        // Interpolate f = 3x - 2y at the vertices; bilinear map reproduces it exactly
        let nodal: Vec<f64> = mesh.cell_vertices(0).iter().map(|&(x, y)| 3.0 * x - 2.0 * y).collect();
        for q in 0..values.n_quadrature_points() {
            let (gx, gy) = (0..4)
                .map(|k| {
                    let (dx, dy) = values.shape_grad(k, q);
                    (nodal[k] * dx, nodal[k] * dy)
                })
                .fold((0.0, 0.0), |(a, b), (x, y)| (a + x, b + y));
            assert!((gx - 3.0).abs() < 1e-12, "gx = {}", gx);
            assert!((gy + 2.0).abs() < 1e-12, "gy = {}", gy);
        }
    }

    #[test]
    fn test_degenerate_cell_is_rejected() {
        // Clockwise vertex order gives a negative Jacobian
        let vertices = vec![(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)];
        let mesh = QuadMesh::from_cells(vertices, vec![[2, 3, 0, 1]]).unwrap();
        let basis = NodalBasis::new(1).unwrap();
        let err = CellValues::new(&mesh, 0, &basis).unwrap_err();
        assert!(matches!(err, AdvectionError::DegenerateCell { cell: 0, .. }));
    }

    #[test]
    fn test_outward_normals_on_square() {
        let mesh = QuadMesh::uniform_rectangle(0.0, 1.0, 0.0, 1.0, 1, 1).unwrap();
        let expected = [(-1.0, 0.0), (1.0, 0.0), (0.0, -1.0), (0.0, 1.0)];
        for face in Face::ALL {
            let fp = face_point(&mesh, 0, face, 0.2).unwrap();
            let (nx, ny) = expected[face.index()];
            assert!((fp.normal.0 - nx).abs() < 1e-14);
            assert!((fp.normal.1 - ny).abs() < 1e-14);
            assert!((fp.length_scale - 0.5).abs() < 1e-14);
        }
    }

    #[test]
    fn test_face_length_and_trace() {
        let mesh = QuadMesh::uniform_rectangle(0.0, 1.0, 0.0, 1.0, 4, 4).unwrap();
        let basis = NodalBasis::new(3).unwrap();
        for face in Face::ALL {
            let values = FaceValues::new(&mesh, 5, face, &basis).unwrap();
            let length: f64 = values.jxw.iter().sum();
            assert!((length - 0.25).abs() < 1e-14);

            // Face-local functions form a partition of unity along the face
            for q in 0..values.n_quadrature_points() {
                let sum: f64 = (0..basis.dofs_per_face()).map(|i| values.shape_value(i, q)).sum();
                assert!((sum - 1.0).abs() < 1e-12);
            }
        }
    }
}
