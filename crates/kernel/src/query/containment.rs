//! Planar region containment queries.
//!
//! A closed planar curve bounds a region; points are classified by casting an
//! in-plane ray and counting transversal boundary crossings on one side of
//! the point (odd count = inside). Hits landing on a sub-part endpoint are
//! resolved by the signed angle between the ray and the sub-part tangent
//! about the region normal, so a ray through a vertex is counted exactly
//! once. Rays parallel to a boundary edge are re-aimed with a random
//! in-plane direction before casting.

use rand::Rng;

use crate::error::Result;
use crate::geometry::curves::{Circle, Curve, Line};
use crate::geometry::intersection::{atom_line_hits, cull_duplicates, curve_curve};
use crate::geometry::plane::Plane;
use crate::geometry::point::Point3d;
use crate::geometry::vector::Vec3;
use crate::query::parameter::{parameter_at_point, point_at_parameter};
use crate::Tolerance;

/// Attempts to find a cast direction not parallel to any boundary edge
/// before giving up on the point.
const MAX_RAY_PERTURBATIONS: usize = 16;

/// Whether the region bounded by `curve` contains every point in `points`.
///
/// `accept_on_edge` decides points within `tolerance` of the boundary. An
/// empty point list is not contained; an open boundary contains nothing; a
/// bare line bounds no region. NURBS boundaries are rejected.
pub fn is_containing_points(
    curve: &Curve,
    points: &[Point3d],
    accept_on_edge: bool,
    tolerance: f64,
) -> Result<bool> {
    match curve {
        Curve::Line(_) => Ok(false),
        Curve::Circle(c) => Ok(circle_contains_points(c, points, accept_on_edge, tolerance)),
        Curve::Arc(a) => {
            if a.is_closed(tolerance) {
                Ok(circle_contains_points(
                    &a.circle(),
                    points,
                    accept_on_edge,
                    tolerance,
                ))
            } else {
                Ok(false)
            }
        }
        Curve::Polyline(_) | Curve::PolyCurve(_) => {
            region_contains_points(curve, points, accept_on_edge, tolerance)
        }
        Curve::Nurbs(_) => Err(curve.unsupported("is_containing_points")),
    }
}

/// Whether the region bounded by `curve1` contains the whole of `curve2`.
///
/// The inner curve is sampled between its boundary crossings, so each sample
/// stands for a whole run of the curve on one side of the boundary. Without
/// `accept_on_edge` any boundary crossing disqualifies immediately.
pub fn is_containing_curve(
    curve1: &Curve,
    curve2: &Curve,
    accept_on_edge: bool,
    tolerance: f64,
) -> Result<bool> {
    if matches!(curve2, Curve::Nurbs(_)) {
        return Err(curve2.unsupported("is_containing_curve"));
    }
    match curve1 {
        Curve::Line(_) => Ok(false),
        Curve::Nurbs(_) => Err(curve1.unsupported("is_containing_curve")),
        Curve::Arc(a) => {
            if a.is_closed(tolerance) {
                let circle = Curve::Circle(a.circle());
                is_containing_curve(&circle, curve2, accept_on_edge, tolerance)
            } else {
                Ok(false)
            }
        }
        Curve::Circle(c) => match curve2 {
            // Straight geometry lies inside a disc exactly when its vertices do.
            Curve::Line(_) | Curve::Polyline(_) => Ok(circle_contains_points(
                c,
                &curve2.control_points()?,
                accept_on_edge,
                tolerance,
            )),
            _ => sample_and_test(curve1, curve2, accept_on_edge, tolerance),
        },
        Curve::Polyline(_) | Curve::PolyCurve(_) => {
            if !curve1.is_closed(tolerance)? {
                return Ok(false);
            }
            sample_and_test(curve1, curve2, accept_on_edge, tolerance)
        }
    }
}

/// Containment against a disc: each point must lie on the circle plane and
/// within the radius, with `tolerance` widening or shrinking the disc
/// depending on `accept_on_edge`.
fn circle_contains_points(
    circle: &Circle,
    points: &[Point3d],
    accept_on_edge: bool,
    tolerance: f64,
) -> bool {
    if points.is_empty() {
        return false;
    }
    let plane = circle.plane();
    for p in points {
        if plane.distance_to_point(p).abs() > tolerance {
            return false;
        }
        let d = p.distance_to(&circle.center);
        if accept_on_edge {
            if d - circle.radius - tolerance > 0.0 {
                return false;
            }
        } else if d - circle.radius + tolerance >= 0.0 {
            return false;
        }
    }
    true
}

/// Ray-cast containment against a closed polyline or polycurve boundary.
fn region_contains_points(
    curve: &Curve,
    points: &[Point3d],
    accept_on_edge: bool,
    tolerance: f64,
) -> Result<bool> {
    if points.is_empty() {
        return Ok(false);
    }
    if !curve.is_closed(tolerance)? {
        return Ok(false);
    }

    let sq_tol = tolerance * tolerance;
    let plane = match curve.fit_plane(tolerance)? {
        Some(plane) => plane,
        None => {
            // The boundary spans no plane, so it bounds no area; only points
            // on the boundary itself can pass, and only in edge mode.
            tracing::debug!(
                curve = curve.type_name(),
                "containment boundary has no stable plane"
            );
            if !accept_on_edge {
                return Ok(false);
            }
            for p in points {
                if curve.closest_point(p)?.distance_squared_to(p) > sq_tol {
                    return Ok(false);
                }
            }
            return Ok(true);
        }
    };

    let sub_parts = curve.sub_parts()?;
    let edge_dirs: Vec<Vec3> = sub_parts
        .iter()
        .filter_map(|part| match part {
            Curve::Line(l) => {
                let d = l.direction();
                (d != Vec3::ZERO).then_some(d)
            }
            _ => None,
        })
        .collect();
    let mut rng = rand::rng();

    for p in points {
        if plane.distance_to_point(p).abs() > tolerance {
            return Ok(false);
        }
        let p_pt = plane.project(p);

        let direction = match cast_direction(&plane, &p_pt, &edge_dirs, &mut rng) {
            Some(direction) => direction,
            None => {
                tracing::warn!(
                    max_attempts = MAX_RAY_PERTURBATIONS,
                    "no cast direction clear of boundary edges; treating point as outside"
                );
                return Ok(false);
            }
        };
        let ray = Line::infinite(p_pt, p_pt + direction);

        let mut crossings: Vec<Point3d> = Vec::new();
        let mut grazes: Vec<Point3d> = Vec::new();
        for part in &sub_parts {
            for hit in atom_line_hits(&ray, part, tolerance)? {
                match classify_hit(&hit, part, &direction, &plane, tolerance)? {
                    HitKind::Crossing => crossings.push(hit),
                    HitKind::Graze => grazes.push(hit),
                }
            }
        }

        if crossings.is_empty() {
            return Ok(false);
        }

        let nearest_sq = crossings
            .iter()
            .chain(grazes.iter())
            .map(|q| q.distance_squared_to(&p_pt))
            .fold(f64::INFINITY, f64::min);
        if nearest_sq <= sq_tol {
            // The point sits on the boundary itself.
            if accept_on_edge {
                continue;
            }
            return Ok(false);
        }

        let before = crossings
            .iter()
            .filter(|q| (**q - p_pt).dot(&direction) < 0.0)
            .count();
        if before % 2 == 0 {
            return Ok(false);
        }
    }
    Ok(true)
}

/// A direction in the boundary plane that is not parallel to any straight
/// boundary edge. The first candidate aims at the fitted plane origin (the
/// boundary centroid); further attempts are random in-plane directions.
fn cast_direction<R: Rng>(
    plane: &Plane,
    from: &Point3d,
    edge_dirs: &[Vec3],
    rng: &mut R,
) -> Option<Vec3> {
    let parallel_to_edge = |d: &Vec3| {
        edge_dirs
            .iter()
            .any(|e| 1.0 - e.dot(d).abs() <= Tolerance::ANGULAR)
    };

    let mut direction = (plane.origin - *from).normalized().unwrap_or(Vec3::ZERO);
    let mut attempts = 0;
    while direction == Vec3::ZERO || parallel_to_edge(&direction) {
        if attempts == MAX_RAY_PERTURBATIONS {
            return None;
        }
        direction = plane
            .random_in_plane(rng)
            .normalized()
            .unwrap_or(Vec3::ZERO);
        attempts += 1;
    }
    Some(direction)
}

enum HitKind {
    Crossing,
    Graze,
}

/// Resolve a ray hit against one boundary sub-part.
///
/// A hit at the part's start counts only when the signed angle from the ray
/// to the part tangent (about the region normal) is positive, a hit at its
/// end only when it is negative. The part sharing that vertex sees the
/// opposite sign and contributes a graze instead of a second crossing, so
/// each vertex crossing is counted exactly once while the hit still marks
/// the boundary for the proximity check. Tangential contact anywhere is
/// likewise a graze.
fn classify_hit(
    hit: &Point3d,
    part: &Curve,
    direction: &Vec3,
    plane: &Plane,
    tolerance: f64,
) -> Result<HitKind> {
    let tangent = match part.tangent_at_point(hit, tolerance)? {
        Some(t) => t,
        None => return Ok(HitKind::Graze),
    };
    let signed = direction.signed_angle(&tangent, &plane.normal);

    let sq_tol = tolerance * tolerance;
    if part.start_point()?.distance_squared_to(hit) <= sq_tol {
        if signed > Tolerance::ANGULAR {
            Ok(HitKind::Crossing)
        } else {
            Ok(HitKind::Graze)
        }
    } else if part.end_point()?.distance_squared_to(hit) <= sq_tol {
        if signed < -Tolerance::ANGULAR {
            Ok(HitKind::Crossing)
        } else {
            Ok(HitKind::Graze)
        }
    } else if signed.abs() <= Tolerance::ANGULAR
        || std::f64::consts::PI - signed.abs() <= Tolerance::ANGULAR
    {
        Ok(HitKind::Graze)
    } else {
        Ok(HitKind::Crossing)
    }
}

/// Sample the inner curve between its boundary crossings and classify the
/// samples against the region.
fn sample_and_test(
    region: &Curve,
    curve2: &Curve,
    accept_on_edge: bool,
    tolerance: f64,
) -> Result<bool> {
    let intersections = curve_curve(region, curve2, tolerance)?;
    if !accept_on_edge && !intersections.is_empty() {
        return Ok(false);
    }

    let mut params = vec![0.0, 1.0];
    for q in &intersections {
        if let Some(t) = parameter_at_point(curve2, q, tolerance)? {
            params.push(t);
        }
    }
    params.sort_by(f64::total_cmp);

    let mut samples = Vec::with_capacity(params.len().saturating_sub(1));
    for pair in params.windows(2) {
        samples.push(point_at_parameter(curve2, (pair[0] + pair[1]) * 0.5)?);
    }
    let samples = cull_duplicates(samples, tolerance);
    is_containing_points(region, &samples, accept_on_edge, tolerance)
}
