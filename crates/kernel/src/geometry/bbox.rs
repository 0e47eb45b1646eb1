use serde::{Deserialize, Serialize};

use super::curves::Curve;
use super::point::Point3d;
use crate::error::Result;

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point3d,
    pub max: Point3d,
}

impl BoundingBox {
    pub fn new(min: Point3d, max: Point3d) -> Self {
        Self { min, max }
    }

    /// An inverted box that absorbs any point on the first expansion.
    pub fn empty() -> Self {
        Self {
            min: Point3d::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3d::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn from_points(points: &[Point3d]) -> Self {
        let mut bbox = Self::empty();
        for p in points {
            bbox.expand_to_include(p);
        }
        bbox
    }

    pub fn expand_to_include(&mut self, p: &Point3d) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    pub fn union(&self, other: &Self) -> Self {
        let mut result = *self;
        result.expand_to_include(&other.min);
        result.expand_to_include(&other.max);
        result
    }

    /// Whether the point lies inside the box. With `accept_on_edge` the box
    /// is widened by `tolerance` on every face and the faces themselves are
    /// included; otherwise it is shrunk by the same amount and the shrunk
    /// faces are excluded, so points within `tolerance` of a face flip
    /// between the two modes.
    pub fn is_containing_point(&self, p: &Point3d, accept_on_edge: bool, tolerance: f64) -> bool {
        if accept_on_edge {
            p.x >= self.min.x - tolerance
                && p.x <= self.max.x + tolerance
                && p.y >= self.min.y - tolerance
                && p.y <= self.max.y + tolerance
                && p.z >= self.min.z - tolerance
                && p.z <= self.max.z + tolerance
        } else {
            p.x > self.min.x + tolerance
                && p.x < self.max.x - tolerance
                && p.y > self.min.y + tolerance
                && p.y < self.max.y - tolerance
                && p.z > self.min.z + tolerance
                && p.z < self.max.z - tolerance
        }
    }

    /// Whether every point in the list lies inside the box. An empty list is
    /// not contained.
    pub fn is_containing_points(
        &self,
        points: &[Point3d],
        accept_on_edge: bool,
        tolerance: f64,
    ) -> bool {
        !points.is_empty()
            && points
                .iter()
                .all(|p| self.is_containing_point(p, accept_on_edge, tolerance))
    }

    /// Whether `other` lies entirely inside this box. Testing a box against
    /// itself is true only with `accept_on_edge`.
    pub fn is_containing_box(&self, other: &Self, accept_on_edge: bool, tolerance: f64) -> bool {
        self.is_containing_point(&other.min, accept_on_edge, tolerance)
            && self.is_containing_point(&other.max, accept_on_edge, tolerance)
    }

    /// Whether the curve's own bounds lie entirely inside this box.
    pub fn is_containing_curve(
        &self,
        curve: &Curve,
        accept_on_edge: bool,
        tolerance: f64,
    ) -> Result<bool> {
        Ok(self.is_containing_box(&curve.bounds()?, accept_on_edge, tolerance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::curves::Line;

    const TOL: f64 = 1e-6;

    fn unit_box() -> BoundingBox {
        BoundingBox::new(Point3d::ORIGIN, Point3d::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_point_containment_modes() {
        let bbox = unit_box();
        let interior = Point3d::new(0.5, 0.5, 0.5);
        assert!(bbox.is_containing_point(&interior, false, TOL));
        assert!(bbox.is_containing_point(&interior, true, TOL));

        // A corner is on the boundary: edge mode decides.
        let corner = Point3d::new(1.0, 1.0, 1.0);
        assert!(bbox.is_containing_point(&corner, true, TOL));
        assert!(!bbox.is_containing_point(&corner, false, TOL));

        let outside = Point3d::new(1.1, 0.5, 0.5);
        assert!(!bbox.is_containing_point(&outside, true, TOL));
    }

    #[test]
    fn test_exact_band_points() {
        let bbox = unit_box();
        // Exactly one tolerance inside a face is still excluded in strict
        // mode; past the band it counts.
        assert!(!bbox.is_containing_point(&Point3d::new(TOL, 0.5, 0.5), false, TOL));
        assert!(bbox.is_containing_point(&Point3d::new(2.0 * TOL, 0.5, 0.5), false, TOL));
        // Exactly one tolerance outside a face is still included in edge mode.
        assert!(bbox.is_containing_point(&Point3d::new(-TOL, 0.5, 0.5), true, TOL));
    }

    #[test]
    fn test_self_containment_only_on_edge() {
        let bbox = unit_box();
        assert!(bbox.is_containing_box(&bbox, true, TOL));
        assert!(!bbox.is_containing_box(&bbox, false, TOL));
    }

    #[test]
    fn test_point_list_scan() {
        let bbox = unit_box();
        let points = [
            Point3d::new(0.2, 0.2, 0.2),
            Point3d::new(0.8, 0.8, 0.8),
        ];
        assert!(bbox.is_containing_points(&points, false, TOL));

        let mixed = [Point3d::new(0.2, 0.2, 0.2), Point3d::new(2.0, 0.0, 0.0)];
        assert!(!bbox.is_containing_points(&mixed, true, TOL));
        assert!(!bbox.is_containing_points(&[], true, TOL));
    }

    #[test]
    fn test_from_points_and_union() {
        let a = BoundingBox::from_points(&[Point3d::ORIGIN, Point3d::new(1.0, 2.0, 0.0)]);
        let b = BoundingBox::from_points(&[Point3d::new(-1.0, 0.0, 0.0), Point3d::new(0.0, 0.5, 3.0)]);
        let u = a.union(&b);
        assert!((u.min.x - (-1.0)).abs() < 1e-12);
        assert!((u.max.y - 2.0).abs() < 1e-12);
        assert!((u.max.z - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_curve_containment_via_bounds() {
        let bbox = unit_box();
        let inside = Curve::Line(Line::new(
            Point3d::new(0.1, 0.1, 0.1),
            Point3d::new(0.9, 0.9, 0.9),
        ));
        assert!(bbox.is_containing_curve(&inside, false, TOL).unwrap());

        let poking_out = Curve::Line(Line::new(
            Point3d::new(0.1, 0.1, 0.1),
            Point3d::new(1.5, 0.9, 0.9),
        ));
        assert!(!bbox.is_containing_curve(&poking_out, true, TOL).unwrap());
    }
}
