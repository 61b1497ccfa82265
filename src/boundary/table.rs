//! Dispatch table from boundary tag to ghost-value function.

use std::fmt;

use super::functions::{BoundaryFunction, FixedValue, ZeroGradient};
use crate::error::{AdvectionError, Result};
use crate::mesh::{BoundaryTag, Face, MeshTopology};

/// One boundary function per [`BoundaryTag`].
///
/// Set up once, checked against the mesh with [`BoundaryTable::validate`],
/// then only read.
#[derive(Default)]
pub struct BoundaryTable {
    entries: [Option<Box<dyn BoundaryFunction>>; 3],
}

impl BoundaryTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with the same constant ghost value on every tag.
    pub fn uniform(value: f64) -> Self {
        Self::new()
            .with(BoundaryTag::XMin, FixedValue(value))
            .with(BoundaryTag::YMin, FixedValue(value))
            .with(BoundaryTag::Far, FixedValue(value))
    }

    /// Inflow of 1 through x-min, 0 through y-min, zero gradient elsewhere.
    pub fn unit_square_default() -> Self {
        Self::new()
            .with(BoundaryTag::XMin, FixedValue(1.0))
            .with(BoundaryTag::YMin, FixedValue(0.0))
            .with(BoundaryTag::Far, ZeroGradient)
    }

    /// Set the function for `tag`.
    pub fn with<B: BoundaryFunction + 'static>(mut self, tag: BoundaryTag, function: B) -> Self {
        self.entries[tag.id() as usize] = Some(Box::new(function));
        self
    }

    /// Function registered for `tag`, if any.
    pub fn get(&self, tag: BoundaryTag) -> Option<&dyn BoundaryFunction> {
        self.entries[tag.id() as usize].as_deref()
    }

    /// Check that every tag appearing on the mesh boundary has a function.
    pub fn validate<M: MeshTopology>(&self, mesh: &M) -> Result<()> {
        for cell in 0..mesh.n_cells() {
            for face in Face::ALL {
                if let Some(tag) = mesh.boundary_tag(cell, face)
                    && self.get(tag).is_none()
                {
                    return Err(AdvectionError::config(format!(
                        "no boundary function for tag {} (cell {}, face {:?})",
                        tag, cell, face
                    )));
                }
            }
        }
        Ok(())
    }

    /// Ghost value for `tag` given the owner trace.
    pub fn ghost_value(&self, tag: BoundaryTag, owner: f64) -> Result<f64> {
        self.get(tag)
            .map(|f| f.ghost_value(owner))
            .ok_or_else(|| AdvectionError::config(format!("no boundary function for tag {}", tag)))
    }
}

impl fmt::Debug for BoundaryTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let configured: Vec<BoundaryTag> = BoundaryTag::ALL
            .into_iter()
            .filter(|&t| self.get(t).is_some())
            .collect();
        f.debug_struct("BoundaryTable")
            .field("configured", &configured)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::QuadMesh;

    #[test]
    fn test_unit_square_default_values() {
        let table = BoundaryTable::unit_square_default();
        assert_eq!(table.ghost_value(BoundaryTag::XMin, 0.3).unwrap(), 1.0);
        assert_eq!(table.ghost_value(BoundaryTag::YMin, 0.3).unwrap(), 0.0);
        assert_eq!(table.ghost_value(BoundaryTag::Far, 0.3).unwrap(), 0.3);
    }

    #[test]
    fn test_validate_reports_missing_tag() {
        let mesh = QuadMesh::unit_square(1).unwrap();
        let table = BoundaryTable::new()
            .with(BoundaryTag::XMin, FixedValue(1.0))
            .with(BoundaryTag::Far, ZeroGradient);
        let err = table.validate(&mesh).unwrap_err();
        assert!(matches!(err, AdvectionError::Configuration(_)));
        assert!(err.to_string().contains("y-min"));

        assert!(BoundaryTable::unit_square_default().validate(&mesh).is_ok());
    }

    #[test]
    fn test_periodic_mesh_needs_no_functions() {
        let mesh = QuadMesh::uniform_periodic(0.0, 1.0, 0.0, 1.0, 2, 2).unwrap();
        assert!(BoundaryTable::new().validate(&mesh).is_ok());
    }

    #[test]
    fn test_missing_tag_is_an_error() {
        let table = BoundaryTable::new();
        assert!(table.ghost_value(BoundaryTag::Far, 1.0).is_err());
    }

    #[test]
    fn test_closure_entry() {
        let table = BoundaryTable::uniform(0.0).with(BoundaryTag::Far, |u: f64| 2.0 * u);
        assert_eq!(table.ghost_value(BoundaryTag::Far, 1.5).unwrap(), 3.0);
        assert_eq!(format!("{:?}", table).matches("Far").count(), 1);
    }
}
