use std::ops::{Neg, Add, Sub, Mul};
use std::fmt;

use bytemuck::{Pod, Zeroable};

use crate::vector::Vec3;
use crate::matrix::Mat4x4;

/// Above this dot product `slerp` falls back to a plain component lerp.
pub const SLERP_LERP_THRESHOLD: f32 = 0.9995;

/// Quaternion stored as vector part `(x, y, z)` and scalar part `w`.
/// Rotations expect unit length; nothing here enforces it.
#[derive(PartialEq, Clone, Copy, Default, Debug, Pod, Zeroable)]
#[repr(C)]
pub struct Quaternion {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}
impl Quaternion {
    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    pub fn identity() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }

    /// Pure quaternion `(v, 0)`.
    pub fn from_vector(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z, 0.0)
    }

    /// Rotation of `angle` radians about `axis`.
    ///
    /// The axis is normalized first; a zero axis gives a degenerate
    /// quaternion `(0, 0, 0, cos(angle / 2))` rather than failing.
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        let axis = axis.normalized_or_zero();
        let half = angle * 0.5;
        let s = half.sin();
        Self::new(axis.x * s, axis.y * s, axis.z * s, half.cos())
    }

    pub fn vector(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    pub fn dot(&self, other: Quaternion) -> f32 {
        self.x*other.x + self.y*other.y + self.z*other.z + self.w*other.w
    }

    pub fn len(&self) -> f32 {
        self.dot(*self).sqrt()
    }

    pub fn conjugate(&self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    /// Multiplicative inverse. The zero quaternion maps to itself.
    pub fn inverse(&self) -> Self {
        let len_sq = self.dot(*self);
        if len_sq == 0.0 {
            return *self;
        }
        self.conjugate() * (1.0 / len_sq)
    }

    pub fn normalized(&self) -> Self {
        let len = self.len();
        if len == 0.0 {
            return *self;
        }
        *self * (1.0 / len)
    }

    pub fn to_matrix(&self) -> Mat4x4 {
        Mat4x4::from(*self)
    }

    /// Rotate `v` as `q * (v, 0) * conj(q)`. Assumes `self` is unit length.
    pub fn rotate_vector(&self, v: Vec3) -> Vec3 {
        let r = Self::from_vector(v);
        (*self * r * self.conjugate()).vector()
    }

    /// Spherical interpolation from `q0` (t = 0) to `q1` (t = 1) along the
    /// shorter arc. `t` is not clamped.
    ///
    /// Nearly parallel inputs are blended linearly and the result is left
    /// unnormalized.
    pub fn slerp(q0: Quaternion, q1: Quaternion, t: f32) -> Self {
        let mut q1 = q1;
        let mut dot = q0.dot(q1);

        if dot < 0.0 {
            q1 = -q1;
            dot = -dot;
        }

        if dot > SLERP_LERP_THRESHOLD {
            log::trace!("slerp inputs nearly parallel (dot = {dot}), using lerp");
            return q0 + (q1 - q0) * t;
        }

        let theta = dot.acos();
        let sin_theta = theta.sin();
        let scale0 = ((1.0 - t) * theta).sin() / sin_theta;
        let scale1 = (t * theta).sin() / sin_theta;

        q0 * scale0 + q1 * scale1
    }
}

impl Neg for Quaternion {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y, -self.z, -self.w)
    }
}

impl Add for Quaternion {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z, self.w + other.w)
    }
}

impl Sub for Quaternion {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z, self.w - other.w)
    }
}

impl Mul<f32> for Quaternion {
    type Output = Self;

    fn mul(self, other: f32) -> Self::Output {
        Self::new(self.x * other, self.y * other, self.z * other, self.w * other)
    }
}

impl Mul for Quaternion {
    type Output = Self;

    /// Hamilton product.
    fn mul(self, other: Self) -> Self::Output {
        Self::new(
            self.w*other.x + self.x*other.w + self.y*other.z - self.z*other.y,
            self.w*other.y - self.x*other.z + self.y*other.w + self.z*other.x,
            self.w*other.z + self.x*other.y - self.y*other.x + self.z*other.w,
            self.w*other.w - self.x*other.x - self.y*other.y - self.z*other.z,
        )
    }
}

impl fmt::Display for Quaternion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prec = f.precision().unwrap_or(2);
        write!(f, "({:.prec$}, {:.prec$}, {:.prec$}, {:.prec$})", self.x, self.y, self.z, self.w)
    }
}


#[cfg(test)]
use approx::assert_abs_diff_eq;

#[cfg(test)]
use proptest::prelude::*;

#[cfg(test)]
fn assert_quat_near(a: Quaternion, b: Quaternion, eps: f32) {
    assert_abs_diff_eq!(a.x, b.x, epsilon = eps);
    assert_abs_diff_eq!(a.y, b.y, epsilon = eps);
    assert_abs_diff_eq!(a.z, b.z, epsilon = eps);
    assert_abs_diff_eq!(a.w, b.w, epsilon = eps);
}

#[cfg(test)]
fn assert_vec_near(a: Vec3, b: Vec3, eps: f32) {
    assert_abs_diff_eq!(a.x, b.x, epsilon = eps);
    assert_abs_diff_eq!(a.y, b.y, epsilon = eps);
    assert_abs_diff_eq!(a.z, b.z, epsilon = eps);
}

#[cfg(test)]
fn to_cgmath(q: Quaternion) -> cgmath::Quaternion<f32> {
    cgmath::Quaternion::new(q.w, q.x, q.y, q.z)
}

#[cfg(test)]
fn slerp_inputs() -> (Quaternion, Quaternion) {
    (
        Quaternion::from_axis_angle(Vec3::new(0.71, 0.71, 0.0), 0.3),
        Quaternion::from_axis_angle(Vec3::new(0.71, 0.0, 0.71), std::f32::consts::PI),
    )
}

#[test]
fn hamilton_product_of_basis() {
    let i = Quaternion::new(1.0, 0.0, 0.0, 0.0);
    let j = Quaternion::new(0.0, 1.0, 0.0, 0.0);
    let k = Quaternion::new(0.0, 0.0, 1.0, 0.0);

    assert_eq!(i * j, k);
    assert_eq!(j * i, -k);
    assert_eq!(i * i, Quaternion::new(0.0, 0.0, 0.0, -1.0));
}

#[test]
fn axis_angle_is_unit_length() {
    let axis = Vec3::new(1.0, 0.4, -0.2).normalized();
    let q = Quaternion::from_axis_angle(axis, 0.45);
    assert_abs_diff_eq!(q.len(), 1.0, epsilon = 1e-6);
    assert_abs_diff_eq!(q.w, (0.225f32).cos(), epsilon = 1e-7);
}

#[test]
fn axis_angle_normalizes_axis() {
    let q = Quaternion::from_axis_angle(Vec3::new(0.0, 0.0, 10.0), std::f32::consts::FRAC_PI_2);
    assert_quat_near(q, Quaternion::new(0.0, 0.0, (0.5f32).sqrt(), (0.5f32).sqrt()), 1e-6);
}

#[test]
fn zero_axis_gives_degenerate_quaternion() {
    let q = Quaternion::from_axis_angle(Vec3::zero(), 1.0);
    assert_eq!(q.vector(), Vec3::zero());
    assert_abs_diff_eq!(q.w, (0.5f32).cos());
}

#[test]
fn rotate_vector_quarter_turn_about_z() {
    let q = Quaternion::from_axis_angle(Vec3::new(0.0, 0.0, 1.0), std::f32::consts::FRAC_PI_2);
    assert_vec_near(q.rotate_vector(Vec3::new(1.0, 0.0, 0.0)), Vec3::new(0.0, 1.0, 0.0), 1e-6);
}

#[test]
fn rotate_vector_agrees_with_matrix() {
    let axis = Vec3::new(1.0, 0.4, -0.2).normalized();
    let q = Quaternion::from_axis_angle(axis, 0.45);
    let point = Vec3::new(2.1, -0.9, 1.3);

    let by_quat = q.rotate_vector(point);
    let by_mat = q.to_matrix().transform(point);
    assert_vec_near(by_quat, by_mat, 1e-4);
}

#[test]
fn matrix_matches_cgmath() {
    let q = Quaternion::from_axis_angle(Vec3::new(-0.3, 0.8, 0.5), 1.2);
    let reference: [[f32; 4]; 4] = cgmath::Matrix4::from(to_cgmath(q)).into();
    let ours: [[f32; 4]; 4] = q.to_matrix().into();

    for i in 0..4 {
        for j in 0..4 {
            assert_abs_diff_eq!(ours[i][j], reference[i][j], epsilon = 1e-6);
        }
    }
}

#[test]
fn rotate_vector_matches_cgmath() {
    let q = Quaternion::from_axis_angle(Vec3::new(0.2, -1.0, 0.7), 2.4);
    let v = Vec3::new(2.1, -0.9, 1.3);
    let reference = to_cgmath(q) * cgmath::Vector3::new(v.x, v.y, v.z);
    assert_vec_near(q.rotate_vector(v), Vec3::new(reference.x, reference.y, reference.z), 1e-5);
}

#[test]
fn inverse_undoes_rotation() {
    let q = Quaternion::from_axis_angle(Vec3::new(1.0, 2.0, 3.0), 0.8) * 2.0;
    assert_quat_near(q * q.inverse(), Quaternion::identity(), 1e-6);
    assert_eq!(Quaternion::default().inverse(), Quaternion::default());
}

#[test]
fn slerp_endpoints() {
    let (q0, q1) = slerp_inputs();
    assert_quat_near(Quaternion::slerp(q0, q1, 0.0), q0, 1e-6);
    assert_quat_near(Quaternion::slerp(q0, q1, 1.0), q1, 1e-6);
}

#[test]
fn slerp_midpoint_is_unit_and_between() {
    let (q0, q1) = slerp_inputs();
    let mid = Quaternion::slerp(q0, q1, 0.5);

    assert_abs_diff_eq!(mid.len(), 1.0, epsilon = 1e-5);
    // Equal angular distance to both ends.
    assert_abs_diff_eq!(mid.dot(q0), mid.dot(q1), epsilon = 1e-5);
    assert!(mid.dot(q0) > q0.dot(q1));
}

#[test]
fn slerp_matches_cgmath() {
    let (q0, q1) = slerp_inputs();
    for t in [0.1, 0.3, 0.5, 0.7, 0.9] {
        let reference = to_cgmath(q0).slerp(to_cgmath(q1), t);
        let ours = Quaternion::slerp(q0, q1, t);
        assert_quat_near(ours, Quaternion::new(reference.v.x, reference.v.y, reference.v.z, reference.s), 1e-4);
    }
}

#[test]
fn slerp_takes_shorter_arc() {
    let q0 = Quaternion::from_axis_angle(Vec3::new(0.0, 1.0, 0.0), 0.2);
    let q1 = -Quaternion::from_axis_angle(Vec3::new(0.0, 1.0, 0.0), 1.0);
    assert!(q0.dot(q1) < 0.0);

    assert_quat_near(Quaternion::slerp(q0, q1, 1.0), -q1, 1e-6);
    let mid = Quaternion::slerp(q0, q1, 0.5);
    assert_quat_near(mid, Quaternion::from_axis_angle(Vec3::new(0.0, 1.0, 0.0), 0.6), 1e-5);
}

#[test]
fn slerp_near_parallel_lerps_without_normalizing() {
    let q0 = Quaternion::new(0.0, 0.0, 0.0, 1.0);
    let q1 = Quaternion::new(0.02, 0.0, 0.0, 1.0);
    assert!(q0.dot(q1) > SLERP_LERP_THRESHOLD);

    let mid = Quaternion::slerp(q0, q1, 0.5);
    assert_eq!(mid, Quaternion::new(0.01, 0.0, 0.0, 1.0));
    // Plain lerp keeps the drift off the unit sphere.
    assert!(mid.len() > 1.0);
}

#[cfg(test)]
fn unit_quaternion() -> impl Strategy<Value = Quaternion> {
    (prop::array::uniform3(-1.0f32..1.0), -6.0f32..6.0)
        .prop_filter("non-degenerate axis", |(axis, _)| Vec3::from(*axis).len() > 0.1)
        .prop_map(|(axis, angle)| Quaternion::from_axis_angle(Vec3::from(axis), angle))
}

#[cfg(test)]
proptest! {
    #[test]
    fn axis_angle_always_unit(q in unit_quaternion()) {
        prop_assert!((q.len() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn rotation_paths_agree(q in unit_quaternion(), v in prop::array::uniform3(-10.0f32..10.0)) {
        let v = Vec3::from(v);
        let diff = q.rotate_vector(v) - q.to_matrix().transform(v);
        prop_assert!(diff.len() < 1e-3);
    }

    #[test]
    fn slerp_hits_both_endpoints(q0 in unit_quaternion(), q1 in unit_quaternion()) {
        let end = if q0.dot(q1) < 0.0 { -q1 } else { q1 };
        let start_gap = Quaternion::slerp(q0, q1, 0.0) - q0;
        let end_gap = Quaternion::slerp(q0, q1, 1.0) - end;
        prop_assert!(start_gap.len() < 1e-4);
        prop_assert!(end_gap.len() < 1e-4);
    }

    #[test]
    fn slerp_stays_on_shorter_arc(q0 in unit_quaternion(), q1 in unit_quaternion(), t in 0.0f32..1.0) {
        let limit = q0.dot(q1).abs().min(1.0).acos();
        let q = Quaternion::slerp(q0, q1, t).normalized();
        let travelled = q.dot(q0).abs().min(1.0).acos();
        prop_assert!(travelled <= limit + 2e-3);
    }
}
