//! Boundary tags for quadrilateral mesh faces.
//!
//! The tag set is closed: every boundary face carries one of three tags,
//! and the boundary table must supply a function for each tag the mesh uses.

use std::fmt;

/// Tag identifying the boundary a face lies on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum BoundaryTag {
    /// Face on the x-min side of the domain (id 0).
    XMin = 0,
    /// Face on the y-min side of the domain (id 1).
    YMin = 1,
    /// Any other boundary face (id 2).
    #[default]
    Far = 2,
}

impl BoundaryTag {
    /// All tags, ordered by id.
    pub const ALL: [BoundaryTag; 3] = [BoundaryTag::XMin, BoundaryTag::YMin, BoundaryTag::Far];

    /// Numeric boundary id.
    #[inline]
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Tag for a numeric boundary id.
    pub fn from_id(id: u8) -> Option<BoundaryTag> {
        match id {
            0 => Some(BoundaryTag::XMin),
            1 => Some(BoundaryTag::YMin),
            2 => Some(BoundaryTag::Far),
            _ => None,
        }
    }

    /// Classify a boundary face by the position of its centre.
    ///
    /// Precedence is x-min, then y-min, then everything else, so a centre
    /// lying on both the x-min and the y-min line is tagged [`BoundaryTag::XMin`].
    pub fn classify(center: (f64, f64), x_min: f64, y_min: f64, tol: f64) -> BoundaryTag {
        if (center.0 - x_min).abs() <= tol {
            BoundaryTag::XMin
        } else if (center.1 - y_min).abs() <= tol {
            BoundaryTag::YMin
        } else {
            BoundaryTag::Far
        }
    }
}

impl fmt::Display for BoundaryTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BoundaryTag::XMin => "x-min",
            BoundaryTag::YMin => "y-min",
            BoundaryTag::Far => "far",
        };
        write!(f, "{} (id {})", name, self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_round_trip() {
        for tag in BoundaryTag::ALL {
            assert_eq!(BoundaryTag::from_id(tag.id()), Some(tag));
        }
        assert_eq!(BoundaryTag::from_id(3), None);
    }

    #[test]
    fn test_classify_sides() {
        let tol = 1e-12;
        assert_eq!(BoundaryTag::classify((0.0, 0.5), 0.0, 0.0, tol), BoundaryTag::XMin);
        assert_eq!(BoundaryTag::classify((0.5, 0.0), 0.0, 0.0, tol), BoundaryTag::YMin);
        assert_eq!(BoundaryTag::classify((1.0, 0.5), 0.0, 0.0, tol), BoundaryTag::Far);
        assert_eq!(BoundaryTag::classify((0.5, 1.0), 0.0, 0.0, tol), BoundaryTag::Far);
    }

    #[test]
    fn test_classify_corner_prefers_x_min() {
        assert_eq!(
            BoundaryTag::classify((0.0, 0.0), 0.0, 0.0, 1e-12),
            BoundaryTag::XMin
        );
    }
}
