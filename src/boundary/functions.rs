//! Ghost-value functions for boundary faces.
//!
//! A boundary face has no neighbour, so the flux resolver pairs the owner's
//! trace value with a ghost value computed from it.

/// Ghost value on a boundary face as a function of the owner-side trace.
pub trait BoundaryFunction: Send + Sync {
    fn ghost_value(&self, owner: f64) -> f64;
}

impl<F> BoundaryFunction for F
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    fn ghost_value(&self, owner: f64) -> f64 {
        self(owner)
    }
}

/// Prescribed constant boundary value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedValue(pub f64);

impl BoundaryFunction for FixedValue {
    fn ghost_value(&self, _owner: f64) -> f64 {
        self.0
    }
}

/// Zero-gradient (extrapolation) boundary: the ghost equals the owner value.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ZeroGradient;

impl BoundaryFunction for ZeroGradient {
    fn ghost_value(&self, owner: f64) -> f64 {
        owner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_value_ignores_owner() {
        assert_eq!(FixedValue(1.5).ghost_value(-3.0), 1.5);
    }

    #[test]
    fn test_zero_gradient_copies_owner() {
        assert_eq!(ZeroGradient.ghost_value(0.25), 0.25);
    }

    #[test]
    fn test_closure() {
        let reflect = |u: f64| -u;
        assert_eq!(reflect.ghost_value(2.0), -2.0);
    }
}
