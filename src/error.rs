//! Error types for operator assembly and time stepping.

use thiserror::Error;

use crate::io::OutputError;

/// Errors that can occur while configuring, assembling or advancing a problem.
#[derive(Error, Debug)]
pub enum AdvectionError {
    /// Invalid polynomial order, mismatched sizes, missing boundary
    /// functions or an illegal simulation state transition.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Cell geometry with a zero or negative Jacobian (or a singular mass matrix).
    #[error("Degenerate cell {cell}: Jacobian {jacobian:.3e} at a quadrature point")]
    DegenerateCell { cell: usize, jacobian: f64 },

    /// The wind field returned NaN or Inf.
    #[error("Wind field is not finite at ({x}, {y})")]
    NonFiniteWind { x: f64, y: f64 },

    /// A non-finite value appeared in the solution after an update.
    #[error("Numerical instability: non-finite value in cell {cell}, dof {dof}")]
    NumericalInstability { cell: usize, dof: usize },

    /// Writing results failed.
    #[error(transparent)]
    Output(#[from] OutputError),
}

impl AdvectionError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AdvectionError>;
