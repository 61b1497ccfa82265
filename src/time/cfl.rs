//! Time step estimate for explicit DG advection.

use crate::mesh::MeshGeometry;
use crate::wind::WindField;

/// Stable time step estimate.
///
/// Uses the CFL condition: dt ≤ CFL * h_min / (|v|_max * (2p + 1))
///
/// |v|_max comes from [`WindField::max_speed`] when available, otherwise
/// from sampling the wind at every cell vertex and centre. Returns
/// `f64::INFINITY` for a (numerically) zero wind.
pub fn stable_time_step<M, W>(mesh: &M, wind: &W, order: usize, cfl: f64) -> f64
where
    M: MeshGeometry,
    W: WindField + ?Sized,
{
    let wave_speed = match wind.max_speed() {
        Some(speed) => speed,
        None => sampled_max_speed(mesh, wind),
    };

    if wave_speed < 1e-14 {
        return f64::INFINITY;
    }

    // DG CFL: account for polynomial order
    let dg_factor = 2.0 * order as f64 + 1.0;

    cfl * mesh.h_min() / (wave_speed * dg_factor)
}

fn sampled_max_speed<M, W>(mesh: &M, wind: &W) -> f64
where
    M: MeshGeometry,
    W: WindField + ?Sized,
{
    let mut max_speed: f64 = 0.0;
    for k in 0..mesh.n_cells() {
        let center = mesh.reference_to_physical(k, 0.0, 0.0);
        for (x, y) in mesh.cell_vertices(k).into_iter().chain(std::iter::once(center)) {
            let (u, v) = wind.velocity(x, y);
            max_speed = max_speed.max(u.hypot(v));
        }
    }
    max_speed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::QuadMesh;
    use crate::wind::{RotatingWind, UniformWind};

    #[test]
    fn test_uniform_wind() {
        let mesh = QuadMesh::unit_square(3).unwrap();
        let dt = stable_time_step(&mesh, &UniformWind::new(3.0, 4.0), 2, 0.5);
        // 0.5 * (1/8) / (5 * 5)
        assert!((dt - 0.0025).abs() < 1e-15);
    }

    #[test]
    fn test_zero_wind() {
        let mesh = QuadMesh::unit_square(1).unwrap();
        let dt = stable_time_step(&mesh, &UniformWind::new(0.0, 0.0), 1, 1.0);
        assert!(dt.is_infinite());
    }

    #[test]
    fn test_sampled_wind() {
        let mesh = QuadMesh::unit_square(1).unwrap();
        // Max speed at the corners: ω √2 / 2
        let wind = RotatingWind::new((0.5, 0.5), 2.0);
        let dt = stable_time_step(&mesh, &wind, 0, 1.0);
        assert!((dt - 0.5 / 2.0_f64.sqrt()).abs() < 1e-14);
    }
}
