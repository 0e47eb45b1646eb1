pub mod compute;
pub mod error;
pub mod geometry;
pub mod query;

// Re-export the key types at crate root for convenience.
pub use error::{GeometryError, Result};
pub use geometry::bbox::BoundingBox;
pub use geometry::curves::{Arc, Circle, Curve, Line, NurbsCurve, PolyCurve, Polyline};
pub use geometry::plane::Plane;
pub use geometry::point::Point3d;
pub use geometry::vector::Vec3;
pub use query::containment::{is_containing_curve, is_containing_points};
pub use query::parameter::{parameter_at_point, point_at_parameter};

/// Global tolerance configuration for geometric comparisons.
///
/// Every predicate in a single query uses the same distance tolerance, so
/// chains of "approximately equal" points stay consistent throughout one
/// computation.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Points closer than this are considered coincident (model units).
    pub distance: f64,
    /// Angles smaller than this (radians) are considered zero.
    pub angular: f64,
}

impl Tolerance {
    /// Default coincidence threshold for distance comparisons.
    pub const DISTANCE: f64 = 1e-6;
    /// Default threshold for parallelism checks, signed-angle tie-breaks and
    /// arc seam snapping.
    pub const ANGULAR: f64 = 1e-4;
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            distance: Self::DISTANCE,
            angular: Self::ANGULAR,
        }
    }
}

impl Tolerance {
    pub fn points_coincident(&self, a: &Point3d, b: &Point3d) -> bool {
        a.distance_to(b) < self.distance
    }

    pub fn is_zero_length(&self, length: f64) -> bool {
        length.abs() < self.distance
    }

    pub fn is_zero_angle(&self, angle: f64) -> bool {
        angle.abs() < self.angular
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tolerance() {
        let tol = Tolerance::default();
        assert!(tol.points_coincident(
            &Point3d::new(0.0, 0.0, 0.0),
            &Point3d::new(0.0, 0.0, 1e-8),
        ));
        assert!(!tol.points_coincident(
            &Point3d::new(0.0, 0.0, 0.0),
            &Point3d::new(0.0, 0.0, 1e-3),
        ));
        assert!(tol.is_zero_length(1e-9));
        assert!(tol.is_zero_angle(-1e-6));
    }
}
