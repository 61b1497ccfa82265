//! Run configuration.
//!
//! A [`SimulationConfig`] can be built in code with the `with_*` methods or
//! read from JSON. Every field has a default, so a file only needs the
//! values it changes:
//!
//! ```json
//! {
//!   "order": 2,
//!   "refinements": 4,
//!   "t_final": 0.5,
//!   "flux": "lax_friedrichs",
//!   "scheme": "ssp_rk3",
//!   "wind": { "velocity_x": 1.0, "velocity_y": 0.0 }
//! }
//! ```

use std::f64::consts::FRAC_1_SQRT_2;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AdvectionError, Result};
use crate::fe::MAX_ORDER;
use crate::flux::NumericalFlux;
use crate::mesh::{MAX_REFINEMENTS, MeshGeometry};
use crate::time::{TimeScheme, stable_time_step};
use crate::wind::UniformWind;

/// Parameters of a unit-square advection run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Polynomial order of the nodal basis
    pub order: usize,
    /// Global refinements of the unit square (2^r cells per direction)
    pub refinements: u32,
    /// CFL number used when `dt` is not given
    pub cfl: f64,
    /// End time
    pub t_final: f64,
    /// Fixed time step (None = CFL estimate)
    pub dt: Option<f64>,
    /// Write a snapshot every this many steps (None = initial and final only)
    pub output_interval: Option<usize>,
    /// Numerical flux at faces
    pub flux: NumericalFlux,
    /// Time integration scheme
    pub scheme: TimeScheme,
    /// Directory for VTU snapshots
    pub output_dir: PathBuf,
    /// File name prefix for VTU snapshots
    pub output_prefix: String,
    /// Constant advecting wind
    pub wind: UniformWind,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            order: 1,
            refinements: 5,
            cfl: 0.5,
            t_final: 1.0,
            dt: None,
            output_interval: None,
            flux: NumericalFlux::Upwind,
            scheme: TimeScheme::SspRk3,
            output_dir: PathBuf::from("output"),
            output_prefix: String::from("solution"),
            wind: UniformWind::new(FRAC_1_SQRT_2, FRAC_1_SQRT_2),
        }
    }
}

impl SimulationConfig {
    /// Default configuration with the given order and refinement level.
    pub fn new(order: usize, refinements: u32) -> Self {
        Self {
            order,
            refinements,
            ..Self::default()
        }
    }

    /// Parse a configuration from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)
            .map_err(|e| AdvectionError::config(format!("invalid configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            AdvectionError::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&text)
    }

    /// Pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| AdvectionError::config(format!("cannot serialize configuration: {}", e)))
    }

    /// Save the configuration to a file.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = self.to_json_string()?;
        std::fs::write(path, text).map_err(|e| {
            AdvectionError::config(format!("cannot write {}: {}", path.display(), e))
        })
    }

    pub fn with_cfl(mut self, cfl: f64) -> Self {
        self.cfl = cfl;
        self
    }

    pub fn with_t_final(mut self, t_final: f64) -> Self {
        self.t_final = t_final;
        self
    }

    /// Use a fixed time step instead of the CFL estimate.
    pub fn with_dt(mut self, dt: f64) -> Self {
        self.dt = Some(dt);
        self
    }

    pub fn with_output_interval(mut self, steps: usize) -> Self {
        self.output_interval = Some(steps);
        self
    }

    pub fn with_flux(mut self, flux: NumericalFlux) -> Self {
        self.flux = flux;
        self
    }

    pub fn with_scheme(mut self, scheme: TimeScheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn with_wind(mut self, wind: UniformWind) -> Self {
        self.wind = wind;
        self
    }

    pub fn with_output(mut self, dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        self.output_dir = dir.into();
        self.output_prefix = prefix.into();
        self
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.order > MAX_ORDER {
            return Err(AdvectionError::config(format!(
                "order {} exceeds the maximum of {}",
                self.order, MAX_ORDER
            )));
        }
        if self.refinements > MAX_REFINEMENTS {
            return Err(AdvectionError::config(format!(
                "refinement level {} exceeds the maximum of {}",
                self.refinements, MAX_REFINEMENTS
            )));
        }
        if !(self.cfl > 0.0 && self.cfl <= 1.0) {
            return Err(AdvectionError::config(format!(
                "CFL number must lie in (0, 1], got {}",
                self.cfl
            )));
        }
        if !(self.t_final > 0.0 && self.t_final.is_finite()) {
            return Err(AdvectionError::config(format!(
                "t_final must be positive and finite, got {}",
                self.t_final
            )));
        }
        if let Some(dt) = self.dt
            && !(dt > 0.0 && dt.is_finite())
        {
            return Err(AdvectionError::config(format!(
                "dt must be positive and finite, got {}",
                dt
            )));
        }
        if self.output_interval == Some(0) {
            return Err(AdvectionError::config("output_interval must be at least 1"));
        }
        if !(self.wind.velocity_x.is_finite() && self.wind.velocity_y.is_finite()) {
            return Err(AdvectionError::config("wind components must be finite"));
        }
        Ok(())
    }

    /// Time step for `mesh`: the fixed `dt` if set, otherwise the CFL estimate.
    pub fn time_step<M: MeshGeometry>(&self, mesh: &M) -> f64 {
        self.dt
            .unwrap_or_else(|| stable_time_step(mesh, &self.wind, self.order, self.cfl))
    }
}
