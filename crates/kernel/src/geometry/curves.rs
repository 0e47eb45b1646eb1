use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use super::bbox::BoundingBox;
use super::plane::Plane;
use super::point::Point3d;
use super::vector::Vec3;
use crate::error::{GeometryError, Result};
use crate::Tolerance;

/// A straight segment between two points. With `infinite` set the segment is
/// treated as the unbounded line through them (intersection and closest-point
/// queries extend beyond the endpoints).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub start: Point3d,
    pub end: Point3d,
    #[serde(default)]
    pub infinite: bool,
}

impl Line {
    pub fn new(start: Point3d, end: Point3d) -> Self {
        Self {
            start,
            end,
            infinite: false,
        }
    }

    pub fn infinite(start: Point3d, end: Point3d) -> Self {
        Self {
            start,
            end,
            infinite: true,
        }
    }

    /// Length of the bounded segment, regardless of the `infinite` flag.
    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    /// Unit direction from start to end; zero for a degenerate segment.
    pub fn direction(&self) -> Vec3 {
        (self.end - self.start).normalized().unwrap_or(Vec3::ZERO)
    }

    /// Point at normalized parameter `t` (0 = start, 1 = end). Values outside
    /// [0, 1] extrapolate along the supporting line.
    pub fn point_at(&self, t: f64) -> Point3d {
        self.start.lerp(&self.end, t)
    }

    pub fn closest_point(&self, p: &Point3d) -> Point3d {
        let axis = self.end - self.start;
        let len_sq = axis.length_squared();
        if len_sq < f64::EPSILON {
            return self.start;
        }
        let mut t = (*p - self.start).dot(&axis) / len_sq;
        if !self.infinite {
            t = t.clamp(0.0, 1.0);
        }
        self.point_at(t)
    }
}

/// A circular arc in a local frame: `x_axis` is the zero-angle direction,
/// angles grow counter-clockwise about `normal`.
///
/// Invariant: `end_angle > start_angle` and the sweep is at most 2π.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    pub center: Point3d,
    pub normal: Vec3,
    pub x_axis: Vec3,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl Arc {
    pub fn new(
        center: Point3d,
        normal: Vec3,
        x_axis: Vec3,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    ) -> Self {
        Self {
            center,
            normal: normal.normalized().unwrap_or(Vec3::Z),
            x_axis: x_axis.normalized().unwrap_or(Vec3::X),
            radius,
            start_angle,
            end_angle,
        }
    }

    fn y_axis(&self) -> Vec3 {
        self.normal.cross(&self.x_axis)
    }

    /// Swept angle.
    pub fn angle(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    pub fn length(&self) -> f64 {
        self.radius * self.angle().abs()
    }

    pub fn plane(&self) -> Plane {
        Plane::new(self.center, self.normal)
    }

    pub fn point_at_angle(&self, theta: f64) -> Point3d {
        self.center
            + self.x_axis * (self.radius * theta.cos())
            + self.y_axis() * (self.radius * theta.sin())
    }

    /// Point at normalized parameter `t` over the sweep.
    pub fn point_at(&self, t: f64) -> Point3d {
        self.point_at_angle(self.start_angle + t * self.angle())
    }

    pub fn start_point(&self) -> Point3d {
        self.point_at_angle(self.start_angle)
    }

    pub fn end_point(&self) -> Point3d {
        self.point_at_angle(self.end_angle)
    }

    /// Unit tangent in the direction of increasing angle.
    pub fn tangent_at_angle(&self, theta: f64) -> Vec3 {
        self.x_axis * (-theta.sin()) + self.y_axis() * theta.cos()
    }

    /// Angle of `p` relative to `start_angle`, normalized into [0, 2π).
    /// The point is projected onto the arc plane first.
    pub fn relative_angle_of(&self, p: &Point3d) -> f64 {
        let v = self.plane().project(p) - self.center;
        (self.x_axis.signed_angle(&v, &self.normal) - self.start_angle).rem_euclid(TAU)
    }

    pub fn is_closed(&self, tolerance: f64) -> bool {
        self.angle().abs() >= TAU - Tolerance::ANGULAR
            || self.start_point().distance_to(&self.end_point()) <= tolerance
    }

    pub fn closest_point(&self, p: &Point3d) -> Point3d {
        let proj = self.plane().project(p);
        let v = proj - self.center;
        if v.length_squared() < f64::EPSILON {
            return self.start_point();
        }
        let rel = self.relative_angle_of(p);
        if rel <= self.angle() {
            self.point_at_angle(self.start_angle + rel)
        } else {
            let start = self.start_point();
            let end = self.end_point();
            if p.distance_squared_to(&start) <= p.distance_squared_to(&end) {
                start
            } else {
                end
            }
        }
    }

    /// The full circle the arc lies on, sharing its seam direction.
    pub fn circle(&self) -> Circle {
        Circle::with_axes(self.center, self.normal, self.x_axis, self.radius)
    }
}

/// A full circle; `x_axis` is the seam (parameter-zero) direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point3d,
    pub normal: Vec3,
    pub x_axis: Vec3,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Point3d, normal: Vec3, radius: f64) -> Self {
        let normal = normal.normalized().unwrap_or(Vec3::Z);
        let x_axis = if normal.x.abs() < 0.9 {
            Vec3::X.cross(&normal)
        } else {
            Vec3::Y.cross(&normal)
        };
        Self {
            center,
            normal,
            x_axis: x_axis.normalized().unwrap_or(Vec3::X),
            radius,
        }
    }

    pub fn with_axes(center: Point3d, normal: Vec3, x_axis: Vec3, radius: f64) -> Self {
        Self {
            center,
            normal: normal.normalized().unwrap_or(Vec3::Z),
            x_axis: x_axis.normalized().unwrap_or(Vec3::X),
            radius,
        }
    }

    fn y_axis(&self) -> Vec3 {
        self.normal.cross(&self.x_axis)
    }

    pub fn length(&self) -> f64 {
        TAU * self.radius
    }

    pub fn plane(&self) -> Plane {
        Plane::new(self.center, self.normal)
    }

    pub fn point_at_angle(&self, theta: f64) -> Point3d {
        self.center
            + self.x_axis * (self.radius * theta.cos())
            + self.y_axis() * (self.radius * theta.sin())
    }

    /// Point at normalized parameter `t` (full turn from the seam).
    pub fn point_at(&self, t: f64) -> Point3d {
        self.point_at_angle(t * TAU)
    }

    pub fn start_point(&self) -> Point3d {
        self.center + self.x_axis * self.radius
    }

    pub fn tangent_at_angle(&self, theta: f64) -> Vec3 {
        self.x_axis * (-theta.sin()) + self.y_axis() * theta.cos()
    }

    pub fn closest_point(&self, p: &Point3d) -> Point3d {
        let proj = self.plane().project(p);
        match (proj - self.center).normalized() {
            Some(radial) => self.center + radial * self.radius,
            // The plane axis: every circle point is equally close.
            None => self.start_point(),
        }
    }

    /// Exact axis-aligned bounds: the circle's half-extent along a world axis
    /// is r·sqrt(1 − nᵢ²).
    pub fn bounds(&self) -> BoundingBox {
        let n = self.normal;
        let ext = Vec3::new(
            self.radius * (1.0 - n.x * n.x).max(0.0).sqrt(),
            self.radius * (1.0 - n.y * n.y).max(0.0).sqrt(),
            self.radius * (1.0 - n.z * n.z).max(0.0).sqrt(),
        );
        BoundingBox::new(self.center - ext, self.center + ext)
    }
}

/// An ordered run of straight segments. Closed when the first and last
/// vertices coincide within tolerance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    pub points: Vec<Point3d>,
}

impl Polyline {
    pub fn new(points: Vec<Point3d>) -> Self {
        Self { points }
    }

    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| pair[0].distance_to(&pair[1]))
            .sum()
    }

    pub fn is_closed(&self, tolerance: f64) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) if self.points.len() > 2 => {
                first.distance_to(last) <= tolerance
            }
            _ => false,
        }
    }

    pub fn sub_parts(&self) -> Vec<Line> {
        self.points
            .windows(2)
            .map(|pair| Line::new(pair[0], pair[1]))
            .collect()
    }

    pub fn closest_point(&self, p: &Point3d) -> Point3d {
        let mut best = self.points.first().copied().unwrap_or(Point3d::ORIGIN);
        let mut best_sq = f64::INFINITY;
        for segment in self.sub_parts() {
            let candidate = segment.closest_point(p);
            let sq = candidate.distance_squared_to(p);
            if sq < best_sq {
                best_sq = sq;
                best = candidate;
            }
        }
        best
    }
}

/// Raw NURBS curve data. Carried so callers can route such curves through the
/// shared `Curve` sum type; every query rejects the variant with
/// `GeometryError::Unsupported` rather than guessing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NurbsCurve {
    pub control_points: Vec<Point3d>,
    pub weights: Vec<f64>,
    pub knots: Vec<f64>,
    pub degree: usize,
}

/// A compound curve of heterogeneous segments. Caller invariant: each
/// segment's end coincides with the next segment's start within tolerance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolyCurve {
    pub curves: Vec<Curve>,
}

impl PolyCurve {
    pub fn new(curves: Vec<Curve>) -> Self {
        Self { curves }
    }
}

/// All curve representations understood by the query layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Curve {
    Line(Line),
    Arc(Arc),
    Circle(Circle),
    Polyline(Polyline),
    PolyCurve(PolyCurve),
    Nurbs(NurbsCurve),
}

impl Curve {
    /// Classify the curve type for diagnostics and error reporting.
    pub fn type_name(&self) -> &'static str {
        match self {
            Curve::Line(_) => "Line",
            Curve::Arc(_) => "Arc",
            Curve::Circle(_) => "Circle",
            Curve::Polyline(_) => "Polyline",
            Curve::PolyCurve(_) => "PolyCurve",
            Curve::Nurbs(_) => "Nurbs",
        }
    }

    pub(crate) fn unsupported(&self, operation: &'static str) -> GeometryError {
        GeometryError::Unsupported {
            operation,
            curve: self.type_name(),
        }
    }

    pub fn length(&self) -> Result<f64> {
        match self {
            Curve::Line(l) => Ok(l.length()),
            Curve::Arc(a) => Ok(a.length()),
            Curve::Circle(c) => Ok(c.length()),
            Curve::Polyline(p) => Ok(p.length()),
            Curve::PolyCurve(pc) => {
                let mut total = 0.0;
                for c in &pc.curves {
                    total += c.length()?;
                }
                Ok(total)
            }
            Curve::Nurbs(_) => Err(self.unsupported("length")),
        }
    }

    pub fn start_point(&self) -> Result<Point3d> {
        match self {
            Curve::Line(l) => Ok(l.start),
            Curve::Arc(a) => Ok(a.start_point()),
            Curve::Circle(c) => Ok(c.start_point()),
            Curve::Polyline(p) => Ok(p.points.first().copied().unwrap_or(Point3d::ORIGIN)),
            Curve::PolyCurve(pc) => match pc.curves.first() {
                Some(first) => first.start_point(),
                None => Ok(Point3d::ORIGIN),
            },
            Curve::Nurbs(_) => Err(self.unsupported("start_point")),
        }
    }

    pub fn end_point(&self) -> Result<Point3d> {
        match self {
            Curve::Line(l) => Ok(l.end),
            Curve::Arc(a) => Ok(a.end_point()),
            Curve::Circle(c) => Ok(c.start_point()),
            Curve::Polyline(p) => Ok(p.points.last().copied().unwrap_or(Point3d::ORIGIN)),
            Curve::PolyCurve(pc) => match pc.curves.last() {
                Some(last) => last.end_point(),
                None => Ok(Point3d::ORIGIN),
            },
            Curve::Nurbs(_) => Err(self.unsupported("end_point")),
        }
    }

    pub fn is_closed(&self, tolerance: f64) -> Result<bool> {
        match self {
            Curve::Line(_) => Ok(false),
            Curve::Arc(a) => Ok(a.is_closed(tolerance)),
            Curve::Circle(_) => Ok(true),
            Curve::Polyline(p) => Ok(p.is_closed(tolerance)),
            Curve::PolyCurve(pc) => {
                if pc.curves.is_empty() {
                    return Ok(false);
                }
                let start = self.start_point()?;
                let end = self.end_point()?;
                Ok(start.distance_to(&end) <= tolerance)
            }
            Curve::Nurbs(_) => Err(self.unsupported("is_closed")),
        }
    }

    /// Maximal simple pieces (lines, arcs, circles) in traversal order.
    /// Atomic curves yield themselves; compound curves flatten recursively.
    pub fn sub_parts(&self) -> Result<Vec<Curve>> {
        match self {
            Curve::Line(_) | Curve::Arc(_) | Curve::Circle(_) => Ok(vec![self.clone()]),
            Curve::Polyline(p) => Ok(p.sub_parts().into_iter().map(Curve::Line).collect()),
            Curve::PolyCurve(pc) => {
                let mut parts = Vec::new();
                for c in &pc.curves {
                    parts.extend(c.sub_parts()?);
                }
                Ok(parts)
            }
            Curve::Nurbs(_) => Err(self.unsupported("sub_parts")),
        }
    }

    /// Representative points used for plane fitting and bound estimation.
    /// Arcs contribute five samples over the sweep, circles their four
    /// cardinal points.
    pub fn control_points(&self) -> Result<Vec<Point3d>> {
        match self {
            Curve::Line(l) => Ok(vec![l.start, l.end]),
            Curve::Arc(a) => Ok((0..=4).map(|i| a.point_at(f64::from(i) / 4.0)).collect()),
            Curve::Circle(c) => Ok((0..4)
                .map(|i| c.point_at_angle(f64::from(i) * TAU / 4.0))
                .collect()),
            Curve::Polyline(p) => Ok(p.points.clone()),
            Curve::PolyCurve(pc) => {
                let mut points = Vec::new();
                for c in &pc.curves {
                    points.extend(c.control_points()?);
                }
                Ok(points)
            }
            Curve::Nurbs(_) => Err(self.unsupported("control_points")),
        }
    }

    pub fn closest_point(&self, p: &Point3d) -> Result<Point3d> {
        match self {
            Curve::Line(l) => Ok(l.closest_point(p)),
            Curve::Arc(a) => Ok(a.closest_point(p)),
            Curve::Circle(c) => Ok(c.closest_point(p)),
            Curve::Polyline(pl) => Ok(pl.closest_point(p)),
            Curve::PolyCurve(_) => {
                let mut best = self.start_point()?;
                let mut best_sq = f64::INFINITY;
                for part in self.sub_parts()? {
                    let candidate = part.closest_point(p)?;
                    let sq = candidate.distance_squared_to(p);
                    if sq < best_sq {
                        best_sq = sq;
                        best = candidate;
                    }
                }
                Ok(best)
            }
            Curve::Nurbs(_) => Err(self.unsupported("closest_point")),
        }
    }

    /// Unit tangent at a point assumed to lie on the curve; `None` when the
    /// point is not within `tolerance` of any sub-part, or the local
    /// direction is degenerate.
    pub fn tangent_at_point(&self, p: &Point3d, tolerance: f64) -> Result<Option<Vec3>> {
        match self {
            Curve::Line(l) => {
                let dir = l.direction();
                Ok((dir != Vec3::ZERO).then_some(dir))
            }
            Curve::Arc(a) => {
                let v = a.plane().project(p) - a.center;
                if v.length_squared() < f64::EPSILON {
                    return Ok(None);
                }
                let theta = a.x_axis.signed_angle(&v, &a.normal);
                Ok(Some(a.tangent_at_angle(theta)))
            }
            Curve::Circle(c) => {
                let v = c.plane().project(p) - c.center;
                if v.length_squared() < f64::EPSILON {
                    return Ok(None);
                }
                let theta = c.x_axis.signed_angle(&v, &c.normal);
                Ok(Some(c.tangent_at_angle(theta)))
            }
            Curve::Polyline(_) | Curve::PolyCurve(_) => {
                let sq_tol = tolerance * tolerance;
                for part in self.sub_parts()? {
                    if part.closest_point(p)?.distance_squared_to(p) <= sq_tol {
                        return part.tangent_at_point(p, tolerance);
                    }
                }
                Ok(None)
            }
            Curve::Nurbs(_) => Err(self.unsupported("tangent_at_point")),
        }
    }

    /// Best-effort plane through the curve. Circles and arcs carry their own
    /// plane; other curves fit one through their control points. `None` when
    /// no stable plane exists (degenerate or collinear geometry).
    pub fn fit_plane(&self, tolerance: f64) -> Result<Option<Plane>> {
        match self {
            Curve::Arc(a) => Ok(Some(a.plane())),
            Curve::Circle(c) => Ok(Some(c.plane())),
            _ => Ok(Plane::fit(&self.control_points()?, tolerance)),
        }
    }

    /// Axis-aligned bounds. Exact for lines, polylines and circles;
    /// sample-based (slightly tight) for arcs and compound curves holding
    /// them.
    pub fn bounds(&self) -> Result<BoundingBox> {
        match self {
            Curve::Circle(c) => Ok(c.bounds()),
            _ => Ok(BoundingBox::from_points(&self.control_points()?)),
        }
    }
}
