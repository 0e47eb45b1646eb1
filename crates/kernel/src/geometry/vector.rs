use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A vector in 3D Euclidean space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
    pub const X: Self = Self {
        x: 1.0,
        y: 0.0,
        z: 0.0,
    };
    pub const Y: Self = Self {
        x: 0.0,
        y: 1.0,
        z: 0.0,
    };
    pub const Z: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 1.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn length(&self) -> f64 {
        self.length_squared().sqrt()
    }

    pub fn length_squared(&self) -> f64 {
        self.dot(self)
    }

    pub fn normalized(&self) -> Option<Self> {
        let len = self.length();
        if len < 1e-15 {
            None
        } else {
            Some(*self / len)
        }
    }

    pub fn angle_to(&self, other: &Self) -> f64 {
        let d = self.dot(other);
        let len_product = self.length() * other.length();
        if len_product < 1e-15 {
            return 0.0;
        }
        (d / len_product).clamp(-1.0, 1.0).acos()
    }

    /// Angle from `self` to `other` measured about `normal`, in (−π, π].
    /// Positive means counter-clockwise when looking against the normal.
    pub fn signed_angle(&self, other: &Self, normal: &Self) -> f64 {
        normal.dot(&self.cross(other)).atan2(self.dot(other))
    }

    pub fn is_parallel_to(&self, other: &Self, angular_tol: f64) -> bool {
        let angle = self.angle_to(other);
        angle < angular_tol || (std::f64::consts::PI - angle) < angular_tol
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Div<f64> for Vec3 {
    type Output = Self;
    fn div(self, rhs: f64) -> Self::Output {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y, -self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_dot_cross() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert!((a.dot(&b) - 32.0).abs() < 1e-12);
        let c = Vec3::X.cross(&Vec3::Y);
        assert!((c.z - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalized() {
        let v = Vec3::new(3.0, 0.0, 4.0);
        let n = v.normalized().unwrap();
        approx::assert_relative_eq!(n.length(), 1.0, epsilon = 1e-12);
        approx::assert_relative_eq!(n.x, 0.6, epsilon = 1e-12);
        assert!(Vec3::ZERO.normalized().is_none());
    }

    #[test]
    fn test_signed_angle() {
        // X to Y about Z is a positive quarter turn.
        let a = Vec3::X.signed_angle(&Vec3::Y, &Vec3::Z);
        assert!((a - FRAC_PI_2).abs() < 1e-12);
        // Y to X about Z is the negative quarter turn.
        let b = Vec3::Y.signed_angle(&Vec3::X, &Vec3::Z);
        assert!((b + FRAC_PI_2).abs() < 1e-12);
        // Flipping the reference normal flips the sign.
        let c = Vec3::X.signed_angle(&Vec3::Y, &(-Vec3::Z));
        assert!((c + FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_parallel() {
        assert!(Vec3::X.is_parallel_to(&(Vec3::X * 5.0), 1e-10));
        assert!(Vec3::X.is_parallel_to(&(-Vec3::X), 1e-10));
        assert!(!Vec3::X.is_parallel_to(&Vec3::Y, 1e-10));
    }
}
