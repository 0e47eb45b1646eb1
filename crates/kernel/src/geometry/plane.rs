use nalgebra::{DMatrix, Matrix3, SymmetricEigen};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::point::Point3d;
use super::vector::Vec3;
use crate::compute::echelon::{count_nonzero_rows, echelon_tolerance, row_echelon_form};

/// An infinite plane given by a point on it and a unit normal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub origin: Point3d,
    pub normal: Vec3,
}

impl Plane {
    pub fn new(origin: Point3d, normal: Vec3) -> Self {
        Self {
            origin,
            normal: normal.normalized().unwrap_or(Vec3::ZERO),
        }
    }

    pub fn xy() -> Self {
        Self {
            origin: Point3d::ORIGIN,
            normal: Vec3::Z,
        }
    }

    /// Signed distance from the point to the plane (positive on the normal side).
    pub fn distance_to_point(&self, p: &Point3d) -> f64 {
        (*p - self.origin).dot(&self.normal)
    }

    /// Orthogonal projection of the point onto the plane.
    pub fn project(&self, p: &Point3d) -> Point3d {
        *p - self.normal * self.distance_to_point(p)
    }

    /// An orthonormal in-plane basis (u, v) with u × v = normal.
    pub fn basis(&self) -> (Vec3, Vec3) {
        let u = if self.normal.x.abs() < 0.9 {
            Vec3::X.cross(&self.normal)
        } else {
            Vec3::Y.cross(&self.normal)
        };
        let u = u.normalized().unwrap_or(Vec3::X);
        (u, self.normal.cross(&u))
    }

    /// A random non-zero vector lying in the plane, used to perturb
    /// degenerate test rays during containment checks.
    pub fn random_in_plane<R: Rng>(&self, rng: &mut R) -> Vec3 {
        let (u, v) = self.basis();
        loop {
            let a: f64 = rng.random_range(-1.0..1.0);
            let b: f64 = rng.random_range(-1.0..1.0);
            let candidate = u * a + v * b;
            if candidate.length_squared() > 0.01 {
                return candidate;
            }
        }
    }

    /// Best-fit plane through a point set.
    ///
    /// Returns `None` when the points do not span a plane: fewer than three
    /// points, or a centered point matrix of rank below two at the scaled
    /// reduction tolerance (coincident or collinear input). The normal is the
    /// eigenvector of the smallest covariance eigenvalue, so for non-planar
    /// input this is the least-squares plane, not an exact one.
    pub fn fit(points: &[Point3d], tolerance: f64) -> Option<Plane> {
        if points.len() < 3 {
            return None;
        }

        let n = points.len() as f64;
        let sum = points
            .iter()
            .fold(Vec3::ZERO, |acc, p| acc + p.to_vec3());
        let centroid = Point3d::ORIGIN + sum / n;

        let mut centered = DMatrix::zeros(points.len(), 3);
        for (i, p) in points.iter().enumerate() {
            let d = *p - centroid;
            centered[(i, 0)] = d.x;
            centered[(i, 1)] = d.y;
            centered[(i, 2)] = d.z;
        }
        let scaled = echelon_tolerance(&centered, tolerance);
        let echelon = row_echelon_form(&centered, false, scaled);
        if count_nonzero_rows(&echelon, scaled) < 2 {
            return None;
        }

        let mut cov = Matrix3::zeros();
        for p in points {
            let d = *p - centroid;
            cov[(0, 0)] += d.x * d.x;
            cov[(0, 1)] += d.x * d.y;
            cov[(0, 2)] += d.x * d.z;
            cov[(1, 1)] += d.y * d.y;
            cov[(1, 2)] += d.y * d.z;
            cov[(2, 2)] += d.z * d.z;
        }
        cov[(1, 0)] = cov[(0, 1)];
        cov[(2, 0)] = cov[(0, 2)];
        cov[(2, 1)] = cov[(1, 2)];

        let eigen = SymmetricEigen::new(cov);
        let smallest = eigen.eigenvalues.imin();
        let column = eigen.eigenvectors.column(smallest);
        let normal = Vec3::new(column[0], column[1], column[2]).normalized()?;

        Some(Plane {
            origin: centroid,
            normal,
        })
    }
}
