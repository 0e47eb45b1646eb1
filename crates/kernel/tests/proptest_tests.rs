//! Property-based tests for geometric query invariants using the `proptest` crate.

use proptest::prelude::*;

use nalgebra::DMatrix;

use bim_kernel::compute::{count_nonzero_rows, row_echelon_form};
use bim_kernel::geometry::curves::{Arc, Circle, Curve, Line, Polyline};
use bim_kernel::geometry::point::Point3d;
use bim_kernel::geometry::vector::Vec3;
use bim_kernel::query::containment::is_containing_points;
use bim_kernel::query::parameter::{parameter_at_point, point_at_parameter};
use bim_kernel::BoundingBox;

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

/// Arbitrary 3D coordinate tuple in a reasonable floating-point range.
fn arb_point() -> impl Strategy<Value = (f64, f64, f64)> {
    (-100.0f64..100.0, -100.0f64..100.0, -100.0f64..100.0)
}

/// Arbitrary matrix entries for reduction tests.
fn arb_matrix(rows: usize, cols: usize) -> impl Strategy<Value = DMatrix<f64>> {
    prop::collection::vec(-10.0f64..10.0, rows * cols)
        .prop_map(move |data| DMatrix::from_row_slice(rows, cols, &data))
}

/// Arbitrary non-degenerate circle radius.
fn arb_radius() -> impl Strategy<Value = f64> {
    0.5f64..50.0
}

/// Arbitrary plane normal bounded away from zero length.
fn arb_normal() -> impl Strategy<Value = Vec3> {
    (-1.0f64..1.0, -1.0f64..1.0, -1.0f64..1.0)
        .prop_map(|(x, y, z)| Vec3::new(x, y, z))
        .prop_filter("normal too short", |v| v.length() > 0.3)
}

const TOL: f64 = 1e-6;

// ---------------------------------------------------------------------------
// 1. Reduced row echelon form is idempotent: REF(REF(m)) == REF(m)
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn echelon_idempotent(m in arb_matrix(3, 4)) {
        let once = row_echelon_form(&m, true, TOL);
        let twice = row_echelon_form(&once, true, TOL);
        for (a, b) in once.iter().zip(twice.iter()) {
            prop_assert!((a - b).abs() < 1e-6 * (1.0 + a.abs()),
                "reduction not idempotent: {} != {}", a, b);
        }
    }
}

// ---------------------------------------------------------------------------
// 2. Non-zero row count never exceeds the smaller matrix dimension
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn echelon_rank_bound(m in arb_matrix(4, 3)) {
        let reduced = row_echelon_form(&m, true, TOL);
        let rank = count_nonzero_rows(&reduced, TOL);
        prop_assert!(rank <= 3, "rank {} exceeds column count 3", rank);
    }
}

// ---------------------------------------------------------------------------
// 3. Duplicating a row never increases the non-zero row count
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn echelon_duplicate_row_drops_rank(m in arb_matrix(2, 3)) {
        let mut data = Vec::with_capacity(9);
        for i in 0..2 {
            for j in 0..3 {
                data.push(m[(i, j)]);
            }
        }
        // Third row repeats the first.
        for j in 0..3 {
            data.push(m[(0, j)]);
        }
        let stacked = DMatrix::from_row_slice(3, 3, &data);
        let reduced = row_echelon_form(&stacked, true, TOL);
        let rank = count_nonzero_rows(&reduced, TOL);
        prop_assert!(rank <= 2, "duplicated row produced rank {}", rank);
    }
}

// ---------------------------------------------------------------------------
// 4. Line parameterization round-trip: param(point_at(t)) == t
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn line_parameter_roundtrip(
        (ax, ay, az) in arb_point(),
        (bx, by, bz) in arb_point(),
        t in 0.0f64..1.0,
    ) {
        let a = Point3d::new(ax, ay, az);
        let b = Point3d::new(bx, by, bz);
        prop_assume!(a.distance_to(&b) > 0.1);

        let line = Curve::Line(Line::new(a, b));
        let p = point_at_parameter(&line, t).unwrap();
        let back = parameter_at_point(&line, &p, TOL).unwrap().unwrap();
        prop_assert!((back - t).abs() < 1e-9,
            "line roundtrip: {} != {}", back, t);
    }
}

// ---------------------------------------------------------------------------
// 5. Circle parameterization round-trip away from the seam
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn circle_parameter_roundtrip(
        (cx, cy, cz) in arb_point(),
        normal in arb_normal(),
        r in arb_radius(),
        t in 0.01f64..0.95,
    ) {
        let circle = Curve::Circle(Circle::new(Point3d::new(cx, cy, cz), normal, r));
        let p = point_at_parameter(&circle, t).unwrap();
        let back = parameter_at_point(&circle, &p, TOL).unwrap().unwrap();
        prop_assert!((back - t).abs() < 1e-6,
            "circle roundtrip: {} != {}", back, t);
    }
}

// ---------------------------------------------------------------------------
// 6. Arc parameterization round-trip inside the sweep
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn arc_parameter_roundtrip(
        (cx, cy, cz) in arb_point(),
        normal in arb_normal(),
        r in arb_radius(),
        start in -3.0f64..3.0,
        sweep in 0.1f64..6.0,
        t in 0.05f64..0.95,
    ) {
        // Borrow a seam direction perpendicular to the normal.
        let frame = Circle::new(Point3d::new(cx, cy, cz), normal, r);
        let arc = Curve::Arc(Arc::new(
            Point3d::new(cx, cy, cz),
            frame.normal,
            frame.x_axis,
            r,
            start,
            start + sweep,
        ));
        let p = point_at_parameter(&arc, t).unwrap();
        let back = parameter_at_point(&arc, &p, TOL).unwrap().unwrap();
        prop_assert!((back - t).abs() < 1e-6,
            "arc roundtrip: {} != {}", back, t);
    }
}

// ---------------------------------------------------------------------------
// 7. Rectangle perimeter round-trip across segment joints
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn polyline_parameter_roundtrip(
        w in 0.1f64..100.0,
        h in 0.1f64..100.0,
        t in 0.01f64..0.99,
    ) {
        let rect = Curve::Polyline(Polyline::new(vec![
            Point3d::new(0.0, 0.0, 0.0),
            Point3d::new(w, 0.0, 0.0),
            Point3d::new(w, h, 0.0),
            Point3d::new(0.0, h, 0.0),
            Point3d::new(0.0, 0.0, 0.0),
        ]));
        let p = point_at_parameter(&rect, t).unwrap();
        let back = parameter_at_point(&rect, &p, TOL).unwrap().unwrap();
        prop_assert!((back - t).abs() < 1e-5,
            "perimeter roundtrip: {} != {}", back, t);
    }
}

// ---------------------------------------------------------------------------
// 8. A box built from points contains those points in edge mode
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn bounding_box_covers_its_points(
        pts in prop::collection::vec(arb_point(), 1..20),
    ) {
        let points: Vec<Point3d> = pts.iter().map(|(x, y, z)| Point3d::new(*x, *y, *z)).collect();
        let bbox = BoundingBox::from_points(&points);
        prop_assert!(bbox.is_containing_points(&points, true, TOL),
            "box does not cover its own generating points");
    }
}

// ---------------------------------------------------------------------------
// 9. A box contains itself only when edges are accepted
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn bounding_box_self_containment(
        (ox, oy, oz) in arb_point(),
        dx in 0.1f64..100.0,
        dy in 0.1f64..100.0,
        dz in 0.1f64..100.0,
    ) {
        let bbox = BoundingBox::new(
            Point3d::new(ox, oy, oz),
            Point3d::new(ox + dx, oy + dy, oz + dz),
        );
        prop_assert!(bbox.is_containing_box(&bbox, true, TOL));
        prop_assert!(!bbox.is_containing_box(&bbox, false, TOL));
    }
}

// ---------------------------------------------------------------------------
// 10. Square region containment: shrunk interior points in, scaled points out
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn square_region_classification(
        (cx, cy) in (-100.0f64..100.0, -100.0f64..100.0),
        size in 0.5f64..50.0,
        fx in -0.8f64..0.8,
        fy in -0.8f64..0.8,
    ) {
        let half = size / 2.0;
        let square = Curve::Polyline(Polyline::new(vec![
            Point3d::new(cx - half, cy - half, 0.0),
            Point3d::new(cx + half, cy - half, 0.0),
            Point3d::new(cx + half, cy + half, 0.0),
            Point3d::new(cx - half, cy + half, 0.0),
            Point3d::new(cx - half, cy - half, 0.0),
        ]));
        let inside = [Point3d::new(cx + fx * half, cy + fy * half, 0.0)];
        prop_assert!(is_containing_points(&square, &inside, false, TOL).unwrap(),
            "interior point classified outside");

        let outside = [Point3d::new(cx + 1.5 * half, cy + 1.7 * half, 0.0)];
        prop_assert!(!is_containing_points(&square, &outside, true, TOL).unwrap(),
            "exterior point classified inside");
    }
}

// ---------------------------------------------------------------------------
// 11. Disc containment by radius fraction
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn disc_classification_by_radius(
        (cx, cy, cz) in arb_point(),
        r in arb_radius(),
        f_in in 0.0f64..0.9,
        f_out in 1.1f64..3.0,
        dir in 0.0f64..std::f64::consts::TAU,
    ) {
        let center = Point3d::new(cx, cy, cz);
        let disc = Curve::Circle(Circle::with_axes(center, Vec3::Z, Vec3::X, r));
        let offset = Vec3::new(dir.cos(), dir.sin(), 0.0);

        let inside = [center + offset * (f_in * r)];
        prop_assert!(is_containing_points(&disc, &inside, false, TOL).unwrap(),
            "point at {} of the radius classified outside", f_in);

        let outside = [center + offset * (f_out * r)];
        prop_assert!(!is_containing_points(&disc, &outside, true, TOL).unwrap(),
            "point at {} of the radius classified inside", f_out);
    }
}
