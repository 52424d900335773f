use std::ops::{Neg, Add, AddAssign, Sub, Mul, Div};
use std::fmt;

use bytemuck::{Pod, Zeroable};

use crate::error::{Math3dError, Math3dResult};


/// What `Vec3::normalize` does when handed a vector of length zero.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ZeroLengthPolicy {
    /// Zero length is a caller bug. Panics.
    #[default]
    FailFast,
    /// Zero length yields the zero vector.
    ReturnZero,
}

#[derive(PartialEq, Clone, Copy, Default, Debug, Pod, Zeroable)]
#[repr(C)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}
impl Vec3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn len(&self) -> f32 {
        self.len_sq().sqrt()
    }

    pub fn len_sq(&self) -> f32 {
        self.dot(*self)
    }

    pub fn dot(&self, vec: Vec3) -> f32 {
        self.x*vec.x + self.y*vec.y + self.z*vec.z
    }

    /// Right-handed cross product.
    pub fn cross(&self, vec: Vec3) -> Self {
        Self::new(
            self.y*vec.z - self.z*vec.y,
            self.z*vec.x - self.x*vec.z,
            self.x*vec.y - self.y*vec.x,
        )
    }

    /// Scale to unit length, handling zero length according to `policy`.
    pub fn normalize(&self, policy: ZeroLengthPolicy) -> Self {
        let len = self.len();
        if len == 0.0 {
            match policy {
                ZeroLengthPolicy::FailFast => {
                    panic!("attempted to normalize a zero-length vector");
                }
                ZeroLengthPolicy::ReturnZero => {
                    log::trace!("normalizing zero-length vector, returning zero");
                    return Self::zero();
                }
            }
        }
        Self::new(self.x / len, self.y / len, self.z / len)
    }

    /// Unit vector in the same direction. Panics on a zero vector.
    pub fn normalized(&self) -> Self {
        self.normalize(ZeroLengthPolicy::FailFast)
    }

    /// Unit vector in the same direction, or the zero vector.
    pub fn normalized_or_zero(&self) -> Self {
        self.normalize(ZeroLengthPolicy::ReturnZero)
    }

    /// Unit vector in the same direction, or an error for a zero vector.
    pub fn try_normalize(&self) -> Math3dResult<Self> {
        if self.len_sq() == 0.0 {
            return Err(Math3dError::ZeroLengthVector);
        }
        Ok(self.normalized())
    }
}

impl Neg for Vec3 {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl Add for Vec3 {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Vec3 {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;

    fn mul(self, other: f32) -> Self::Output {
        Self::new(self.x * other, self.y * other, self.z * other)
    }
}

impl Mul<Vec3> for f32 {
    type Output = Vec3;

    fn mul(self, other: Vec3) -> Self::Output {
        other * self
    }
}

impl Div<f32> for Vec3 {
    type Output = Self;

    fn div(self, other: f32) -> Self::Output {
        Self::new(self.x / other, self.y / other, self.z / other)
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from(arr: [f32; 3]) -> Vec3 {
        Vec3::new(arr[0], arr[1], arr[2])
    }
}

impl From<Vec3> for [f32; 3] {
    fn from(vec: Vec3) -> [f32; 3] {
        [vec.x, vec.y, vec.z]
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prec = f.precision().unwrap_or(2);
        write!(f, "({:.prec$}, {:.prec$}, {:.prec$})", self.x, self.y, self.z)
    }
}


#[cfg(test)]
use approx::assert_abs_diff_eq;

#[cfg(test)]
use proptest::prelude::*;

#[test]
fn cross_test() {
    let v  = Vec3::new(4.0, 3.0, 6.0);
    let v2 = Vec3::new(2.0, 9.0, 3.0);

    let cross = v.cross(v2);
    assert!(cross == Vec3::new(-45.0, 0.0, 30.0));
}

#[test]
fn cross_is_right_handed() {
    let x = Vec3::new(1.0, 0.0, 0.0);
    let y = Vec3::new(0.0, 1.0, 0.0);
    assert_eq!(x.cross(y), Vec3::new(0.0, 0.0, 1.0));
    assert_eq!(y.cross(x), Vec3::new(0.0, 0.0, -1.0));
}

#[test]
fn dot_test() {
    let v  = Vec3::new(4.0, 3.0, 6.0);
    let v2 = Vec3::new(2.0, 9.0, 3.0);

    let dot = v.dot(v2);
    assert!(dot == 53.0);
}

#[test]
fn length_of_pythagorean_triple() {
    assert_eq!(Vec3::new(3.0, 0.0, 4.0).len(), 5.0);
    assert_eq!(Vec3::new(2.0, 3.0, 6.0).len_sq(), 49.0);
}

#[test]
fn normalize_scales_to_unit_length() {
    let n = Vec3::new(1.0, 0.7, 0.5).normalized();
    assert_abs_diff_eq!(n.len(), 1.0, epsilon = 1e-6);
    assert_abs_diff_eq!(n.y / n.x, 0.7, epsilon = 1e-6);
}

#[test]
#[should_panic(expected = "zero-length")]
fn fail_fast_normalize_panics_on_zero() {
    Vec3::zero().normalize(ZeroLengthPolicy::FailFast);
}

#[test]
fn return_zero_normalize_yields_zero() {
    assert_eq!(Vec3::zero().normalized_or_zero(), Vec3::zero());
    let n = Vec3::new(0.0, -2.0, 0.0).normalize(ZeroLengthPolicy::ReturnZero);
    assert_eq!(n, Vec3::new(0.0, -1.0, 0.0));
}

#[test]
fn try_normalize_reports_zero_length() {
    assert!(matches!(Vec3::zero().try_normalize(), Err(Math3dError::ZeroLengthVector)));
    let n = Vec3::new(0.0, 0.0, 5.0).try_normalize().unwrap();
    assert_eq!(n, Vec3::new(0.0, 0.0, 1.0));
}

#[test]
fn display_uses_two_decimals_by_default() {
    let v = Vec3::new(1.0, -0.456, 2.0 / 3.0);
    assert_eq!(format!("{v}"), "(1.00, -0.46, 0.67)");
    assert_eq!(format!("{v:.1}"), "(1.0, -0.5, 0.7)");
}

#[cfg(test)]
proptest! {
    #[test]
    fn normalized_has_unit_length(
        x in -100.0f32..100.0,
        y in -100.0f32..100.0,
        z in -100.0f32..100.0,
    ) {
        let v = Vec3::new(x, y, z);
        prop_assume!(v.len() > 1e-3);
        prop_assert!((v.normalized().len() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn cross_is_orthogonal_to_inputs(
        a in prop::array::uniform3(-10.0f32..10.0),
        b in prop::array::uniform3(-10.0f32..10.0),
    ) {
        let (a, b) = (Vec3::from(a), Vec3::from(b));
        let c = a.cross(b);
        prop_assert!(c.dot(a).abs() < 1e-2);
        prop_assert!(c.dot(b).abs() < 1e-2);
    }
}
