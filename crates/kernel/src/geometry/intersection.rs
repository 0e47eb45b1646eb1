//! Pairwise intersection routines between atomic curves, plus the dispatch
//! used by the containment and sampling queries.
//!
//! Finite lines accept parameters within a tolerance band past their
//! endpoints, so intersections landing exactly on a vertex are reported by
//! both adjacent segments.

use std::f64::consts::TAU;

use super::curves::{Arc, Circle, Curve, Line};
use super::point::Point3d;
use crate::error::Result;
use crate::Tolerance;

/// Whether `t` addresses a point of `line`, allowing a `tolerance`-wide band
/// past each endpoint for finite lines.
fn param_in_range(line: &Line, t: f64, tolerance: f64) -> bool {
    if line.infinite {
        return true;
    }
    let len = line.length();
    if len < f64::EPSILON {
        return true;
    }
    let band = tolerance / len;
    t >= -band && t <= 1.0 + band
}

/// Intersection point of two lines, or `None` when they are parallel, skew
/// beyond `tolerance`, or meet outside their bounds.
pub fn line_line(l1: &Line, l2: &Line, tolerance: f64) -> Option<Point3d> {
    let d1 = l1.end - l1.start;
    let d2 = l2.end - l2.start;
    let a = d1.length_squared();
    let e = d2.length_squared();

    if a < f64::EPSILON {
        let q = l2.closest_point(&l1.start);
        return (q.distance_to(&l1.start) <= tolerance).then(|| l1.start.midpoint(&q));
    }
    if e < f64::EPSILON {
        let q = l1.closest_point(&l2.start);
        return (q.distance_to(&l2.start) <= tolerance).then(|| l2.start.midpoint(&q));
    }

    let r = l1.start - l2.start;
    let b = d1.dot(&d2);
    let c = d1.dot(&r);
    let f = d2.dot(&r);

    // sin² of the angle between the lines; near-parallel pairs have no
    // stable single intersection point.
    let denom = a * e - b * b;
    if denom <= a * e * Tolerance::ANGULAR * Tolerance::ANGULAR {
        return None;
    }

    let s = (b * f - c * e) / denom;
    let t = (a * f - b * c) / denom;
    if !param_in_range(l1, s, tolerance) || !param_in_range(l2, t, tolerance) {
        return None;
    }

    let p1 = l1.point_at(s);
    let p2 = l2.point_at(t);
    (p1.distance_to(&p2) <= tolerance).then(|| p1.midpoint(&p2))
}

/// Intersection points of a line and a circle. A transversal line pierces the
/// circle plane in at most one point; an in-plane line cuts a chord (two
/// points), grazes tangentially (one), or misses. Results are snapped onto
/// the circle.
pub fn line_circle(line: &Line, circle: &Circle, tolerance: f64) -> Vec<Point3d> {
    let plane = circle.plane();
    let dir = line.end - line.start;
    let dir_unit = match dir.normalized() {
        Some(u) => u,
        None => {
            let snapped = circle.closest_point(&line.start);
            if snapped.distance_to(&line.start) <= tolerance {
                return vec![snapped];
            }
            return Vec::new();
        }
    };

    let incidence = dir_unit.dot(&plane.normal);
    if incidence.abs() > Tolerance::ANGULAR {
        // Transversal: a single plane pierce, kept if it lands on the circle.
        let t = -plane.distance_to_point(&line.start) / dir.dot(&plane.normal);
        if !param_in_range(line, t, tolerance) {
            return Vec::new();
        }
        let pierce = line.point_at(t);
        let snapped = circle.closest_point(&pierce);
        if snapped.distance_to(&pierce) <= tolerance {
            return vec![snapped];
        }
        return Vec::new();
    }

    // In-plane case: the line must actually lie in the circle plane.
    if plane.distance_to_point(&line.start).abs() > tolerance {
        return Vec::new();
    }

    let t_foot = (circle.center - line.start).dot(&dir) / dir.length_squared();
    let foot = line.point_at(t_foot);
    let d = foot.distance_to(&circle.center);
    let r = circle.radius;
    if d > r + tolerance {
        return Vec::new();
    }

    let candidates = if (d - r).abs() <= tolerance {
        vec![t_foot]
    } else {
        let half = (r * r - d * d).max(0.0).sqrt();
        let dt = half / dir.length();
        vec![t_foot - dt, t_foot + dt]
    };

    candidates
        .into_iter()
        .filter(|t| param_in_range(line, *t, tolerance))
        .map(|t| circle.closest_point(&line.point_at(t)))
        .collect()
}

/// Whether a point on the arc's circle falls within the arc's sweep, with an
/// angular tolerance at both ends.
fn within_sweep(arc: &Arc, p: &Point3d) -> bool {
    let rel = arc.relative_angle_of(p);
    rel <= arc.angle() + Tolerance::ANGULAR || TAU - rel <= Tolerance::ANGULAR
}

pub fn line_arc(line: &Line, arc: &Arc, tolerance: f64) -> Vec<Point3d> {
    line_circle(line, &arc.circle(), tolerance)
        .into_iter()
        .filter(|p| within_sweep(arc, p))
        .collect()
}

/// Intersection points of two coplanar circles; non-coplanar or concentric
/// pairs yield none.
pub fn circle_circle(c1: &Circle, c2: &Circle, tolerance: f64) -> Vec<Point3d> {
    if !c1.normal.is_parallel_to(&c2.normal, Tolerance::ANGULAR) {
        return Vec::new();
    }
    if c1.plane().distance_to_point(&c2.center).abs() > tolerance {
        return Vec::new();
    }

    let delta = c2.center - c1.center;
    let d = delta.length();
    if d < f64::EPSILON {
        return Vec::new();
    }
    let (r1, r2) = (c1.radius, c2.radius);
    if d > r1 + r2 + tolerance || d < (r1 - r2).abs() - tolerance {
        return Vec::new();
    }

    let dir = delta / d;
    let a = (d * d + r1 * r1 - r2 * r2) / (2.0 * d);
    let mid = c1.center + dir * a;
    let h_sq = r1 * r1 - a * a;
    if h_sq <= tolerance * tolerance {
        // Tangent contact.
        return vec![c1.closest_point(&mid)];
    }
    let h = h_sq.sqrt();
    let perp = c1.normal.cross(&dir);
    vec![mid + perp * h, mid - perp * h]
}

pub fn circle_arc(circle: &Circle, arc: &Arc, tolerance: f64) -> Vec<Point3d> {
    circle_circle(circle, &arc.circle(), tolerance)
        .into_iter()
        .filter(|p| within_sweep(arc, p))
        .collect()
}

pub fn arc_arc(a1: &Arc, a2: &Arc, tolerance: f64) -> Vec<Point3d> {
    circle_circle(&a1.circle(), &a2.circle(), tolerance)
        .into_iter()
        .filter(|p| within_sweep(a1, p) && within_sweep(a2, p))
        .collect()
}

fn atom_intersections(a: &Curve, b: &Curve, tolerance: f64) -> Result<Vec<Point3d>> {
    match (a, b) {
        (Curve::Line(l1), Curve::Line(l2)) => {
            Ok(line_line(l1, l2, tolerance).into_iter().collect())
        }
        (Curve::Line(l), Curve::Circle(c)) | (Curve::Circle(c), Curve::Line(l)) => {
            Ok(line_circle(l, c, tolerance))
        }
        (Curve::Line(l), Curve::Arc(arc)) | (Curve::Arc(arc), Curve::Line(l)) => {
            Ok(line_arc(l, arc, tolerance))
        }
        (Curve::Circle(c1), Curve::Circle(c2)) => Ok(circle_circle(c1, c2, tolerance)),
        (Curve::Circle(c), Curve::Arc(arc)) | (Curve::Arc(arc), Curve::Circle(c)) => {
            Ok(circle_arc(c, arc, tolerance))
        }
        (Curve::Arc(a1), Curve::Arc(a2)) => Ok(arc_arc(a1, a2, tolerance)),
        _ => Err(a.unsupported("intersections")),
    }
}

/// Intersections of a line with a single atomic sub-part.
pub(crate) fn atom_line_hits(line: &Line, part: &Curve, tolerance: f64) -> Result<Vec<Point3d>> {
    atom_intersections(&Curve::Line(*line), part, tolerance)
}

/// Intersections of a line with any curve, flattened over the curve's
/// sub-parts. Vertex hits shared by adjacent sub-parts appear once per part;
/// callers needing unique locations should cull.
pub fn line_curve(line: &Line, curve: &Curve, tolerance: f64) -> Result<Vec<Point3d>> {
    let line_curve = Curve::Line(*line);
    let mut out = Vec::new();
    for part in curve.sub_parts()? {
        out.extend(atom_intersections(&line_curve, &part, tolerance)?);
    }
    Ok(out)
}

/// Unique intersection points of two curves, computed pairwise over their
/// sub-parts.
pub fn curve_curve(c1: &Curve, c2: &Curve, tolerance: f64) -> Result<Vec<Point3d>> {
    let parts1 = c1.sub_parts()?;
    let parts2 = c2.sub_parts()?;
    let mut out = Vec::new();
    for a in &parts1 {
        for b in &parts2 {
            out.extend(atom_intersections(a, b, tolerance)?);
        }
    }
    Ok(cull_duplicates(out, tolerance))
}

/// Keep-first duplicate removal: a point within `tolerance` of an earlier
/// kept point is dropped.
pub fn cull_duplicates(points: Vec<Point3d>, tolerance: f64) -> Vec<Point3d> {
    let sq = tolerance * tolerance;
    let mut out: Vec<Point3d> = Vec::with_capacity(points.len());
    for p in points {
        if !out.iter().any(|q| q.distance_squared_to(&p) <= sq) {
            out.push(p);
        }
    }
    out
}
