//! Local DG operators of a single cell.
//!
//! For the weak form M dφ/dt = D φ - Σ_f F_f f*_f:
//!
//! ```text
//! M(i,j)   = Σ_q φ_i φ_j JxW
//! D(i,j)   = Σ_q (∇φ_i · v) φ_j JxW
//! F_f(i,j) = Σ_q φ_i φ_j JxW_f      (only i, j on face f)
//! S        = M⁻¹ D
//! L_f      = M⁻¹ F_f
//! ```

use faer::{Mat, Side, linalg::solvers::DenseSolveCore};

use crate::error::{AdvectionError, Result};
use crate::fe::{CellValues, FaceValues, NodalBasis, face_point};
use crate::mesh::{Face, MeshGeometry};
use crate::operators::FaceDofMap;
use crate::wind::WindField;

/// Operators owned by one cell.
#[derive(Clone, Debug)]
pub struct LocalOperators {
    /// Mass matrix (symmetric positive definite)
    pub mass: Mat<f64>,
    /// Inverse mass matrix
    pub mass_inv: Mat<f64>,
    /// Stiffness matrix M⁻¹ D
    pub stiffness: Mat<f64>,
    /// Lifting matrix M⁻¹ F_f for each face, (n_dofs × n_dofs)
    pub lift: [Mat<f64>; 4],
    /// v · n at each face support point, n the cell's outward normal
    pub normal_wind: [Vec<f64>; 4],
}

impl LocalOperators {
    /// Number of dofs per cell.
    #[inline]
    pub fn dofs_per_cell(&self) -> usize {
        self.mass.nrows()
    }

    /// Lifting matrix of a face.
    #[inline]
    pub fn lift(&self, face: Face) -> &Mat<f64> {
        &self.lift[face.index()]
    }

    /// Frozen normal wind speeds on a face, in face-local order.
    #[inline]
    pub fn normal_wind(&self, face: Face) -> &[f64] {
        &self.normal_wind[face.index()]
    }

    /// out = S u
    pub fn apply_stiffness(&self, u: &[f64], out: &mut [f64]) {
        let n = self.dofs_per_cell();
        for i in 0..n {
            let mut sum = 0.0;
            for j in 0..n {
                sum += self.stiffness[(i, j)] * u[j];
            }
            out[i] = sum;
        }
    }

    /// out += scale · L_f flux, with `flux` given at the face-local dofs.
    pub fn add_lift(&self, face: Face, dofs: &FaceDofMap, flux: &[f64], scale: f64, out: &mut [f64]) {
        let lift = self.lift(face);
        let face_dofs = dofs.face_dofs(face);
        for (i, out_i) in out.iter_mut().enumerate() {
            let mut sum = 0.0;
            for (&k, &f) in face_dofs.iter().zip(flux.iter()) {
                sum += lift[(i, k)] * f;
            }
            *out_i += scale * sum;
        }
    }
}

/// Assemble the operators of one cell.
///
/// Fails with [`AdvectionError::DegenerateCell`] on a non-positive Jacobian or
/// a singular mass matrix, and with [`AdvectionError::NonFiniteWind`] if the
/// wind is NaN or infinite at any sample point.
pub fn build_cell<M, W>(mesh: &M, cell: usize, basis: &NodalBasis, wind: &W) -> Result<LocalOperators>
where
    M: MeshGeometry,
    W: WindField + ?Sized,
{
    let n = basis.dofs_per_cell();
    let dofs = FaceDofMap::new(basis.order());
    let cv = CellValues::new(mesh, cell, basis)?;

    let mut mass = Mat::<f64>::zeros(n, n);
    let mut diff = Mat::<f64>::zeros(n, n);

    for q in 0..cv.n_quadrature_points() {
        let (x, y) = cv.points[q];
        let v = sample_wind(wind, x, y)?;
        let jxw = cv.jxw[q];

        for i in 0..n {
            let phi_i = cv.shape_value(i, q);
            let (gx, gy) = cv.shape_grad(i, q);
            let advective = gx * v.0 + gy * v.1;
            for j in 0..n {
                let phi_j = cv.shape_value(j, q);
                mass[(i, j)] += phi_i * phi_j * jxw;
                diff[(i, j)] += advective * phi_j * jxw;
            }
        }
    }

    let mass_inv = invert(&mass, cell)?;
    let stiffness = matmul(&mass_inv, &diff);

    let mut lift = [
        Mat::zeros(n, n),
        Mat::zeros(n, n),
        Mat::zeros(n, n),
        Mat::zeros(n, n),
    ];
    let mut normal_wind: [Vec<f64>; 4] = Default::default();

    for face in Face::ALL {
        let fv = FaceValues::new(mesh, cell, face, basis)?;
        let face_dofs = dofs.face_dofs(face);

        let mut flux = Mat::<f64>::zeros(n, n);
        for q in 0..fv.n_quadrature_points() {
            for (a, &i) in face_dofs.iter().enumerate() {
                for (b, &j) in face_dofs.iter().enumerate() {
                    flux[(i, j)] += fv.shape_value(a, q) * fv.shape_value(b, q) * fv.jxw[q];
                }
            }
        }
        lift[face.index()] = matmul(&mass_inv, &flux);

        let mut speeds = Vec::with_capacity(face_dofs.len());
        for &t in basis.nodes_1d() {
            let fp = face_point(mesh, cell, face, t)?;
            let v = sample_wind(wind, fp.point.0, fp.point.1)?;
            speeds.push(v.0 * fp.normal.0 + v.1 * fp.normal.1);
        }
        normal_wind[face.index()] = speeds;
    }

    Ok(LocalOperators {
        mass,
        mass_inv,
        stiffness,
        lift,
        normal_wind,
    })
}

fn sample_wind<W: WindField + ?Sized>(wind: &W, x: f64, y: f64) -> Result<(f64, f64)> {
    let v = wind.velocity(x, y);
    if v.0.is_finite() && v.1.is_finite() {
        Ok(v)
    } else {
        Err(AdvectionError::NonFiniteWind { x, y })
    }
}

/// Inverse of the SPD mass matrix through its Cholesky factor.
fn invert(mass: &Mat<f64>, cell: usize) -> Result<Mat<f64>> {
    let llt = mass
        .as_ref()
        .llt(Side::Lower)
        .map_err(|_| AdvectionError::DegenerateCell { cell, jacobian: 0.0 })?;
    let inv = llt.inverse();

    let n = inv.nrows();
    for col in 0..n {
        for row in 0..n {
            if !inv[(row, col)].is_finite() {
                return Err(AdvectionError::DegenerateCell { cell, jacobian: 0.0 });
            }
        }
    }
    Ok(inv)
}

fn matmul(a: &Mat<f64>, b: &Mat<f64>) -> Mat<f64> {
    let (m, k, n) = (a.nrows(), a.ncols(), b.ncols());
    let mut c = Mat::<f64>::zeros(m, n);
    for i in 0..m {
        for p in 0..k {
            let a_ip = a[(i, p)];
            if a_ip == 0.0 {
                continue;
            }
            for j in 0..n {
                c[(i, j)] += a_ip * b[(p, j)];
            }
        }
    }
    c
}
