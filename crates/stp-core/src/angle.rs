use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use typeshare::typeshare;

use crate::Vector2;

/// A heading in radians, normalised to (-pi, pi].
///
/// All arithmetic re-normalises the result, so the difference of two headings is
/// always the shortest signed turn between them:
///
/// ```
/// # use stp_core::Angle;
/// let a = Angle::from_degrees(170.0);
/// let b = Angle::from_degrees(-170.0);
/// assert!(((b - a).degrees() - 20.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialOrd, Serialize, Deserialize)]
#[typeshare(serialized_as = "f64")]
pub struct Angle(f64);

impl Angle {
    pub const ZERO: Angle = Angle(0.0);
    pub const PI: Angle = Angle(PI);
    pub const PI_2: Angle = Angle(PI / 2.0);

    pub fn from_radians(radians: f64) -> Self {
        Angle(wrap_angle(radians))
    }

    pub fn from_degrees(degrees: f64) -> Self {
        Self::from_radians(degrees.to_radians())
    }

    /// Heading of the vector pointing from `from` to `to`.
    pub fn between_points(from: Vector2, to: Vector2) -> Self {
        Self::of_vector(&(to - from))
    }

    /// Heading of a vector. The zero vector has heading zero.
    pub fn of_vector(v: &Vector2) -> Self {
        if v.x == 0.0 && v.y == 0.0 {
            return Angle::ZERO;
        }
        Self::from_radians(v.y.atan2(v.x))
    }

    pub fn radians(&self) -> f64 {
        self.0
    }

    pub fn degrees(&self) -> f64 {
        self.0.to_degrees()
    }

    /// Magnitude of the angle in radians, in [0, pi].
    pub fn abs(&self) -> f64 {
        self.0.abs()
    }

    /// Unit vector pointing along this heading.
    pub fn to_unit_vector(&self) -> Vector2 {
        Vector2::new(self.0.cos(), self.0.sin())
    }

    pub fn rotate_vector(&self, v: &Vector2) -> Vector2 {
        nalgebra::Rotation2::new(self.0) * v
    }
}

impl std::ops::Add for Angle {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Angle::from_radians(self.0 + other.0)
    }
}

impl std::ops::Sub for Angle {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Angle::from_radians(self.0 - other.0)
    }
}

impl std::ops::Neg for Angle {
    type Output = Self;

    fn neg(self) -> Self {
        Angle::from_radians(-self.0)
    }
}

impl std::fmt::Display for Angle {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:.1}°", self.degrees())
    }
}

impl Default for Angle {
    fn default() -> Self {
        Angle::ZERO
    }
}

impl PartialEq for Angle {
    fn eq(&self, other: &Self) -> bool {
        (*self - *other).abs() < 1e-6
    }
}

fn wrap_angle(angle: f64) -> f64 {
    let mut angle = angle % (2.0 * PI);
    if angle <= -PI {
        angle += 2.0 * PI;
    } else if angle > PI {
        angle -= 2.0 * PI;
    }
    angle
}
