//! Normalized arclength parameterization of curves.
//!
//! Parameters run from 0 at the curve start to 1 at its end. Compound curves
//! are parameterized by accumulated length over their sub-parts, so the
//! mapping is continuous across joints.

use std::f64::consts::TAU;

use crate::error::Result;
use crate::geometry::curves::Curve;
use crate::geometry::point::Point3d;
use crate::Tolerance;

/// Normalized parameter of `p` on `curve`, or `None` when the point is not
/// within `tolerance` of the curve. On compound curves the first sub-part
/// holding the point wins.
pub fn parameter_at_point(curve: &Curve, p: &Point3d, tolerance: f64) -> Result<Option<f64>> {
    let sq_tol = tolerance * tolerance;
    match curve {
        Curve::Line(l) => {
            let closest = l.closest_point(p);
            if closest.distance_squared_to(p) > sq_tol {
                return Ok(None);
            }
            let len = l.length();
            if len < f64::EPSILON {
                return Ok(Some(0.0));
            }
            Ok(Some(l.start.distance_to(&closest) / len))
        }
        Curve::Circle(c) => {
            if c.closest_point(p).distance_squared_to(p) > sq_tol {
                return Ok(None);
            }
            let v = c.plane().project(p) - c.center;
            let angle = c.x_axis.signed_angle(&v, &c.normal).rem_euclid(TAU);
            Ok(Some(angle / TAU))
        }
        Curve::Arc(a) => {
            if a.closest_point(p).distance_squared_to(p) > sq_tol {
                return Ok(None);
            }
            let mut rel = a.relative_angle_of(p);
            // A hit at the closing seam of a full sweep reads as the start.
            if rel < Tolerance::ANGULAR || (rel - TAU).abs() < Tolerance::ANGULAR {
                rel = 0.0;
            }
            let sweep = a.angle();
            if sweep.abs() < f64::EPSILON {
                return Ok(Some(0.0));
            }
            Ok(Some((rel / sweep).clamp(0.0, 1.0)))
        }
        Curve::Polyline(_) | Curve::PolyCurve(_) => {
            let total = curve.length()?;
            if total < f64::EPSILON {
                let start = curve.start_point()?;
                return Ok((start.distance_to(p) <= tolerance).then_some(0.0));
            }
            let mut acc = 0.0;
            for part in curve.sub_parts()? {
                let len = part.length()?;
                if part.closest_point(p)?.distance_squared_to(p) <= sq_tol {
                    if let Some(local) = parameter_at_point(&part, p, tolerance)? {
                        return Ok(Some((acc + local * len) / total));
                    }
                }
                acc += len;
            }
            Ok(None)
        }
        Curve::Nurbs(_) => Err(curve.unsupported("parameter_at_point")),
    }
}

/// Point at normalized parameter `t`. Lines extrapolate past their bounds;
/// compound curves clamp to their endpoints.
pub fn point_at_parameter(curve: &Curve, t: f64) -> Result<Point3d> {
    match curve {
        Curve::Line(l) => Ok(l.point_at(t)),
        Curve::Arc(a) => Ok(a.point_at(t)),
        Curve::Circle(c) => Ok(c.point_at(t)),
        Curve::Polyline(_) | Curve::PolyCurve(_) => {
            if t <= 0.0 {
                return curve.start_point();
            }
            let total = curve.length()?;
            if total < f64::EPSILON {
                return curve.start_point();
            }
            let target = t * total;
            let mut acc = 0.0;
            for part in curve.sub_parts()? {
                let len = part.length()?;
                if acc + len >= target && len >= f64::EPSILON {
                    return point_at_parameter(&part, (target - acc) / len);
                }
                acc += len;
            }
            curve.end_point()
        }
        Curve::Nurbs(_) => Err(curve.unsupported("point_at_parameter")),
    }
}
