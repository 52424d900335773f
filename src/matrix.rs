use std::ops::Mul;
use std::fmt;

use bytemuck::{Pod, Zeroable};

use crate::vector::Vec3;
use crate::quaternion::Quaternion;

/// Below this, `cos + 1` counts as anti-parallel in `direction_to_direction`.
pub const ANTI_PARALLEL_EPSILON: f32 = 1e-6;

/// Row-major 4 x 4 matrix. Vectors are rows and multiply from the left,
/// so the translation lives in row 3.
#[derive(Clone, Copy, PartialEq, Debug, Default, Pod, Zeroable)]
#[repr(C)]
pub struct Mat4x4 {
    pub m: [[f32; 4]; 4],
}
impl Mat4x4 {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        r0c0: f32, r0c1: f32, r0c2: f32, r0c3: f32,
        r1c0: f32, r1c1: f32, r1c2: f32, r1c3: f32,
        r2c0: f32, r2c1: f32, r2c2: f32, r2c3: f32,
        r3c0: f32, r3c1: f32, r3c2: f32, r3c3: f32,
    ) -> Self {
        Self::from_rows(
            [r0c0, r0c1, r0c2, r0c3],
            [r1c0, r1c1, r1c2, r1c3],
            [r2c0, r2c1, r2c2, r2c3],
            [r3c0, r3c1, r3c2, r3c3],
        )
    }

    pub fn from_rows(r0: [f32; 4], r1: [f32; 4], r2: [f32; 4], r3: [f32; 4]) -> Self {
        Self { m: [r0, r1, r2, r3] }
    }

    pub fn identity() -> Self {
        Self::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0
        )
    }

    pub fn from_translation(v: Vec3) -> Self {
        Self::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            v.x, v.y, v.z, 1.0
        )
    }

    pub fn row(&self, i: usize) -> [f32; 4] {
        self.m[i]
    }

    pub fn transpose(&self) -> Self {
        let mut out = Self::default();
        for (i, row) in self.m.iter().enumerate() {
            for (j, value) in row.iter().enumerate() {
                out.m[j][i] = *value;
            }
        }
        out
    }

    /// Minimal rotation taking direction `from` onto direction `to`.
    ///
    /// Both inputs are expected to be unit length. Anti-parallel inputs have
    /// no unique rotation axis, so any axis orthogonal to `from` is used.
    /// Exactly opposite inputs that are not unit length are rejected in debug
    /// builds; release builds return `cos * I`, which is not a rotation.
    pub fn direction_to_direction(from: Vec3, to: Vec3) -> Self {
        let cross = from.cross(to);
        let cos = from.dot(to);
        let sin = cross.len();

        let axis = if (cos + 1.0).abs() <= ANTI_PARALLEL_EPSILON {
            log::debug!("anti-parallel directions, picking axis orthogonal to {from}");
            let ortho = if from.x.abs() > ANTI_PARALLEL_EPSILON || from.y.abs() > ANTI_PARALLEL_EPSILON {
                Vec3::new(-from.y, from.x, 0.0)
            }
            else {
                Vec3::new(from.z, 0.0, -from.x)
            };
            ortho.normalized()
        }
        else {
            // Exactly parallel inputs have a zero cross product; a zero axis
            // with sin = 0 and k = 1 - cos still yields identity.
            debug_assert!(
                cos >= 0.0 || cross.len_sq() > 0.0,
                "opposite directions passed to direction_to_direction must be unit length"
            );
            cross.normalized_or_zero()
        };

        Self::from_cos_sin_axis(cos, sin, axis)
    }

    /// Rodrigues rotation about a unit `axis`, laid out for row vectors.
    fn from_cos_sin_axis(cos: f32, sin: f32, axis: Vec3) -> Self {
        let Vec3 { x, y, z } = axis;
        let k = 1.0 - cos;

        Self::new(
            cos + x * x * k,     x * y * k + z * sin, x * z * k - y * sin, 0.0,
            y * x * k - z * sin, cos + y * y * k,     y * z * k + x * sin, 0.0,
            z * x * k + y * sin, z * y * k - x * sin, cos + z * z * k,     0.0,
            0.0,                 0.0,                 0.0,                 1.0,
        )
    }

    /// `v` as a row vector times rows 0..3, plus the translation row.
    pub fn transform(&self, v: Vec3) -> Vec3 {
        let [r0, r1, r2, r3] = self.m;
        Vec3::new(
            v.x * r0[0] + v.y * r1[0] + v.z * r2[0] + r3[0],
            v.x * r0[1] + v.y * r1[1] + v.z * r2[1] + r3[1],
            v.x * r0[2] + v.y * r1[2] + v.z * r2[2] + r3[2],
        )
    }
}

impl From<[[f32; 4]; 4]> for Mat4x4 {
    fn from(m: [[f32; 4]; 4]) -> Mat4x4 {
        Self { m }
    }
}

impl From<Mat4x4> for [[f32; 4]; 4] {
    fn from(mat: Mat4x4) -> [[f32; 4]; 4] {
        mat.m
    }
}

impl From<Quaternion> for Mat4x4 {
    /// Convert the quaternion to a 4 x 4 rotation matrix.
    fn from(quat: Quaternion) -> Mat4x4 {
        let Quaternion { x, y, z, w } = quat;

        let xx = x * x;
        let yy = y * y;
        let zz = z * z;

        let xy = x * y;
        let xz = x * z;
        let yz = y * z;

        let wx = w * x;
        let wy = w * y;
        let wz = w * z;

        Mat4x4::new(
            1.0 - 2.0 * (yy + zz), 2.0 * (xy + wz),       2.0 * (xz - wy),       0.0,
            2.0 * (xy - wz),       1.0 - 2.0 * (xx + zz), 2.0 * (yz + wx),       0.0,
            2.0 * (xz + wy),       2.0 * (yz - wx),       1.0 - 2.0 * (xx + yy), 0.0,
            0.0,                   0.0,                   0.0,                   1.0,
        )
    }
}

impl Mul for Mat4x4 {
    type Output = Self;

    /// `a * b` applies `a` first, then `b`.
    fn mul(self, other: Self) -> Self::Output {
        let mut out = Self::default();
        for i in 0..4 {
            for j in 0..4 {
                out.m[i][j] = (0..4).map(|k| self.m[i][k] * other.m[k][j]).sum();
            }
        }
        out
    }
}

impl Mul<Mat4x4> for Vec3 {
    type Output = Vec3;

    fn mul(self, other: Mat4x4) -> Self::Output {
        other.transform(self)
    }
}

impl fmt::Display for Mat4x4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prec = f.precision().unwrap_or(3);
        for (i, row) in self.m.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for (j, value) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{value:6.prec$}")?;
            }
        }
        Ok(())
    }
}


#[cfg(test)]
use approx::assert_abs_diff_eq;

#[cfg(test)]
use proptest::prelude::*;

#[cfg(test)]
fn assert_vec_near(a: Vec3, b: Vec3, eps: f32) {
    assert_abs_diff_eq!(a.x, b.x, epsilon = eps);
    assert_abs_diff_eq!(a.y, b.y, epsilon = eps);
    assert_abs_diff_eq!(a.z, b.z, epsilon = eps);
}

#[cfg(test)]
fn assert_mat_near(a: Mat4x4, b: Mat4x4, eps: f32) {
    for i in 0..4 {
        for j in 0..4 {
            assert_abs_diff_eq!(a.m[i][j], b.m[i][j], epsilon = eps);
        }
    }
}

#[test]
fn mat_multiply() {
    let mat1 = Mat4x4::new(
        1.0, 5.0, 9.0, 4.0,
        2.0, 6.0, 1.0, 5.0,
        3.0, 7.0, 2.0, 6.0,
        4.0, 8.0, 3.0, 7.0
    );
    let res = mat1 * Mat4x4::from_translation(Vec3::new(1.0, 2.0, 3.0));

    assert!(res == Mat4x4::new(
        5.0, 13.0, 21.0, 4.0,
        7.0, 16.0, 16.0, 5.0,
        9.0, 19.0, 20.0, 6.0,
        11.0, 22.0, 24.0, 7.0
    ));
}

#[test]
fn product_applies_left_operand_first() {
    let a = Mat4x4::direction_to_direction(Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0));
    let b = Mat4x4::from_translation(Vec3::new(0.0, 0.0, 2.0));
    let v = Vec3::new(3.0, 0.0, 0.0);

    assert_vec_near(v * (a * b), (v * a) * b, 1e-6);
    assert_vec_near(v * (a * b), Vec3::new(0.0, 3.0, 2.0), 1e-6);
}

#[test]
fn transform_adds_translation_row() {
    let mat = Mat4x4::from_translation(Vec3::new(1.0, -2.0, 0.5));
    assert_eq!(mat.transform(Vec3::new(1.0, 1.0, 1.0)), Vec3::new(2.0, -1.0, 1.5));
}

#[test]
fn transpose_swaps_rows_and_columns() {
    let mat = Mat4x4::from_translation(Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(mat.transpose().row(0), [1.0, 0.0, 0.0, 1.0]);
    assert_eq!(mat.transpose().transpose(), mat);
}

#[test]
fn layout_is_row_major() {
    let mat = Mat4x4::from_translation(Vec3::new(7.0, 8.0, 9.0));
    let flat: [f32; 16] = bytemuck::cast(mat);
    assert_eq!(&flat[12..15], &[7.0, 8.0, 9.0]);
    assert_eq!(<[[f32; 4]; 4]>::from(mat)[3][1], 8.0);
}

#[test]
fn direction_to_same_direction_is_identity() {
    let from = Vec3::new(-0.6, 0.9, 0.2).normalized();
    assert_mat_near(Mat4x4::direction_to_direction(from, from), Mat4x4::identity(), 1e-5);
}

#[test]
fn direction_to_exact_same_direction_does_not_panic() {
    let from = Vec3::new(0.0, 1.0, 0.0);
    assert_mat_near(Mat4x4::direction_to_direction(from, from), Mat4x4::identity(), 1e-6);
}

#[test]
fn direction_to_direction_maps_from_onto_to() {
    let from = Vec3::new(-0.6, 0.9, 0.2).normalized();
    let to = Vec3::new(0.4, 0.7, -0.5).normalized();
    let rot = Mat4x4::direction_to_direction(from, to);

    assert_vec_near(rot.transform(from), to, 1e-5);
    assert_eq!(rot.row(3), [0.0, 0.0, 0.0, 1.0]);
    assert_eq!(rot.m[0][3], 0.0);
}

#[test]
fn direction_to_direction_sign_convention() {
    let rot = Mat4x4::direction_to_direction(Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0));
    assert_mat_near(rot, Mat4x4::new(
        0.0, 1.0, 0.0, 0.0,
        -1.0, 0.0, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        0.0, 0.0, 0.0, 1.0,
    ), 1e-6);
}

#[test]
fn anti_parallel_x_axis_uses_fallback_axis() {
    let from = Vec3::new(1.0, 0.0, 0.0);
    let rot = Mat4x4::direction_to_direction(from, -from);

    // axis (0, 1, 0), half turn
    assert_mat_near(rot, Mat4x4::new(
        -1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, -1.0, 0.0,
        0.0, 0.0, 0.0, 1.0,
    ), 1e-6);
}

#[test]
fn anti_parallel_z_axis_uses_xz_fallback() {
    let from = Vec3::new(0.0, 0.0, 1.0);
    let rot = Mat4x4::direction_to_direction(from, -from);
    assert_vec_near(rot.transform(from), -from, 1e-6);
}

#[test]
fn anti_parallel_general_direction() {
    let from = Vec3::new(1.0, 0.7, 0.5).normalized();
    let rot = Mat4x4::direction_to_direction(from, -from);
    assert_vec_near(rot.transform(from), -from, 1e-5);
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "must be unit length")]
fn opposite_non_unit_directions_are_rejected() {
    Mat4x4::direction_to_direction(Vec3::new(2.0, 0.0, 0.0), Vec3::new(-2.0, 0.0, 0.0));
}

#[test]
fn zero_direction_stays_defined() {
    let rot = Mat4x4::direction_to_direction(Vec3::zero(), Vec3::new(0.0, 1.0, 0.0));
    assert_eq!(rot.row(3), [0.0, 0.0, 0.0, 1.0]);
}

#[test]
fn display_uses_six_wide_three_decimals() {
    let text = format!("{}", Mat4x4::identity());
    let first = text.lines().next().unwrap();
    assert_eq!(first, " 1.000  0.000  0.000  0.000");
    assert_eq!(text.lines().count(), 4);
}

#[cfg(test)]
fn unit_vec3() -> impl Strategy<Value = Vec3> {
    prop::array::uniform3(-1.0f32..1.0)
        .prop_map(Vec3::from)
        .prop_filter("non-degenerate", |v| v.len() > 0.1)
        .prop_map(|v| v.normalized())
}

#[cfg(test)]
proptest! {
    #[test]
    fn rotation_maps_any_direction_onto_any_other(from in unit_vec3(), to in unit_vec3()) {
        let rot = Mat4x4::direction_to_direction(from, to);
        let mapped = rot.transform(from);
        prop_assert!((mapped - to).len() < 1e-3);
    }

    #[test]
    fn rotation_onto_itself_is_identity(from in unit_vec3()) {
        let rot = Mat4x4::direction_to_direction(from, from);
        let identity = Mat4x4::identity();
        for i in 0..4 {
            for j in 0..4 {
                prop_assert!((rot.m[i][j] - identity.m[i][j]).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn rotation_preserves_length(from in unit_vec3(), to in unit_vec3(), v in unit_vec3()) {
        let rot = Mat4x4::direction_to_direction(from, to);
        prop_assert!((rot.transform(v * 3.0).len() - 3.0).abs() < 1e-3);
    }
}
