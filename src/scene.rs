use std::fmt;
use std::str::FromStr;

use crate::{
    error::Math3dError,
    matrix::Mat4x4,
    overlay::{Overlay, ROW_HEIGHT},
    quaternion::Quaternion,
    vector::Vec3,
};

/// Interpolation parameters drawn by the slerp scene.
pub const SLERP_STEPS: [f32; 5] = [0.0, 0.3, 0.5, 0.7, 1.0];

/// Fixed-input demos that push their results to an overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scene {
    DirectionToDirection,
    RotateVector,
    Slerp,
}
impl Scene {
    pub const ALL: [Scene; 3] = [Scene::DirectionToDirection, Scene::RotateVector, Scene::Slerp];

    pub fn draw(&self, overlay: &mut Overlay) {
        match self {
            Scene::DirectionToDirection => draw_direction_to_direction(overlay),
            Scene::RotateVector => draw_rotate_vector(overlay),
            Scene::Slerp => draw_slerp(overlay),
        }
    }
}
impl FromStr for Scene {
    type Err = Math3dError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "direction" => Ok(Scene::DirectionToDirection),
            "rotate" => Ok(Scene::RotateVector),
            "slerp" => Ok(Scene::Slerp),
            _ => Err(Math3dError::UnknownScene(s.to_string())),
        }
    }
}
impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Scene::DirectionToDirection => "direction",
            Scene::RotateVector => "rotate",
            Scene::Slerp => "slerp",
        };
        write!(f, "{name}")
    }
}

fn draw_direction_to_direction(overlay: &mut Overlay) {
    let from0 = Vec3::new(1.0, 0.7, 0.5).normalized();
    let to0 = -from0;
    let from1 = Vec3::new(-0.6, 0.9, 0.2).normalized();
    let to1 = Vec3::new(0.4, 0.7, -0.5).normalized();

    let rotate0 = Mat4x4::direction_to_direction(
        Vec3::new(1.0, 0.0, 0.0).normalized(),
        Vec3::new(-1.0, 0.0, 0.0).normalized(),
    );
    let rotate1 = Mat4x4::direction_to_direction(from0, to0);
    let rotate2 = Mat4x4::direction_to_direction(from1, to1);

    overlay.matrix_screen_print(0, 0, &rotate0, "rotateMatrix0");
    overlay.matrix_screen_print(0, ROW_HEIGHT * 5, &rotate1, "rotateMatrix1");
    overlay.matrix_screen_print(0, ROW_HEIGHT * 10, &rotate2, "rotateMatrix2");
}

fn draw_rotate_vector(overlay: &mut Overlay) {
    let rotation = Quaternion::from_axis_angle(Vec3::new(1.0, 0.4, -0.2).normalized(), 0.45);
    let point = Vec3::new(2.1, -0.9, 1.3);
    let rotate_matrix = rotation.to_matrix();
    let by_quaternion = rotation.rotate_vector(point);
    let by_matrix = rotate_matrix.transform(point);

    overlay.quaternion_screen_print(0, 0, rotation, "   : rotation");
    overlay.matrix_screen_print(0, ROW_HEIGHT, &rotate_matrix, "rotateMatrix");
    overlay.vector_screen_print(0, ROW_HEIGHT * 6, by_quaternion, "   : rotateByQuaternion");
    overlay.vector_screen_print(0, ROW_HEIGHT * 7, by_matrix, "   : rotateByMatrix");
}

fn draw_slerp(overlay: &mut Overlay) {
    let rotation0 = Quaternion::from_axis_angle(Vec3::new(0.71, 0.71, 0.0), 0.3);
    let rotation1 = Quaternion::from_axis_angle(Vec3::new(0.71, 0.0, 0.71), std::f32::consts::PI);

    for (i, t) in SLERP_STEPS.iter().enumerate() {
        let interpolated = Quaternion::slerp(rotation0, rotation1, *t);
        overlay.quaternion_screen_print(
            0,
            ROW_HEIGHT * i as i32,
            interpolated,
            &format!("   : interpolate{i}, Slerp(q0, q1, {t:.1})"),
        );
    }
}


#[test]
fn scene_names_round_trip() {
    for scene in Scene::ALL {
        assert_eq!(scene.to_string().parse::<Scene>(), Ok(scene));
    }
    assert!("teapot".parse::<Scene>().is_err());
}

#[test]
fn direction_scene_prints_three_matrices() {
    let mut overlay = Overlay::default();
    Scene::DirectionToDirection.draw(&mut overlay);
    let text = overlay.render();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 15);
    assert_eq!(lines[0], "rotateMatrix0");
    assert_eq!(lines[5], "rotateMatrix1");
    assert_eq!(lines[10], "rotateMatrix2");
    // Half turn about y for x -> -x.
    assert!(lines[1].starts_with("-1.000"));
    assert_eq!(lines[4], " 0.000     0.000     0.000     1.000");
}

#[test]
fn rotate_scene_shows_matching_results() {
    let mut overlay = Overlay::default();
    Scene::RotateVector.draw(&mut overlay);
    let text = overlay.render();
    let lines: Vec<&str> = text.lines().collect();

    assert!(lines[6].ends_with("rotateByQuaternion"));
    assert!(lines[7].ends_with("rotateByMatrix"));
    assert_eq!(lines[6].split_whitespace().take(3).collect::<Vec<_>>(),
               lines[7].split_whitespace().take(3).collect::<Vec<_>>());
}

#[test]
fn slerp_scene_prints_each_step() {
    let mut overlay = Overlay::default();
    Scene::Slerp.draw(&mut overlay);
    let text = overlay.render();

    assert_eq!(text.lines().count(), SLERP_STEPS.len());
    assert!(text.lines().last().unwrap().ends_with("Slerp(q0, q1, 1.0)"));
}
