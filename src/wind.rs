//! Advecting velocity fields.
//!
//! The operators sample the wind once, at build time, at every cell
//! quadrature point and every face support point. A wind that changes in
//! time therefore needs a fresh [`OperatorArena`](crate::operators::OperatorArena).

use serde::{Deserialize, Serialize};

/// Velocity field v(x, y) advecting the scalar.
pub trait WindField: Send + Sync {
    /// Velocity at a physical point.
    fn velocity(&self, x: f64, y: f64) -> (f64, f64);

    /// Upper bound on |v| over the domain, if known.
    ///
    /// Used by the CFL helper. The default returns `None`, in which case the
    /// helper samples the field at the cell vertices.
    fn max_speed(&self) -> Option<f64> {
        None
    }
}

impl<F> WindField for F
where
    F: Fn(f64, f64) -> (f64, f64) + Send + Sync,
{
    fn velocity(&self, x: f64, y: f64) -> (f64, f64) {
        self(x, y)
    }
}

/// Spatially constant wind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct UniformWind {
    /// Velocity in x-direction
    pub velocity_x: f64,
    /// Velocity in y-direction
    pub velocity_y: f64,
}

impl UniformWind {
    pub fn new(velocity_x: f64, velocity_y: f64) -> Self {
        Self {
            velocity_x,
            velocity_y,
        }
    }

    /// Wind given as (speed, angle).
    ///
    /// angle is in radians, measured counter-clockwise from the positive x-axis.
    pub fn from_polar(speed: f64, angle: f64) -> Self {
        Self {
            velocity_x: speed * angle.cos(),
            velocity_y: speed * angle.sin(),
        }
    }

    /// Magnitude of the velocity.
    #[inline]
    pub fn speed(&self) -> f64 {
        self.velocity_x.hypot(self.velocity_y)
    }

    /// Wave speed in a given normal direction: v · n
    #[inline]
    pub fn normal_wave_speed(&self, normal: (f64, f64)) -> f64 {
        self.velocity_x * normal.0 + self.velocity_y * normal.1
    }
}

impl WindField for UniformWind {
    fn velocity(&self, _x: f64, _y: f64) -> (f64, f64) {
        (self.velocity_x, self.velocity_y)
    }

    fn max_speed(&self) -> Option<f64> {
        Some(self.speed())
    }
}

/// Solid-body rotation about a centre: v = ω (-(y - y_c), x - x_c).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RotatingWind {
    pub center: (f64, f64),
    /// Angular velocity, counter-clockwise positive
    pub omega: f64,
}

impl RotatingWind {
    pub fn new(center: (f64, f64), omega: f64) -> Self {
        Self { center, omega }
    }
}

impl WindField for RotatingWind {
    fn velocity(&self, x: f64, y: f64) -> (f64, f64) {
        (
            -self.omega * (y - self.center.1),
            self.omega * (x - self.center.0),
        )
    }
}
