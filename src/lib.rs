pub mod vector;
pub mod matrix;
pub mod quaternion;
pub mod error;
pub mod config;
pub mod overlay;
pub mod scene;

pub use crate::error::{Math3dError, Math3dResult};
pub use crate::matrix::Mat4x4;
pub use crate::quaternion::Quaternion;
pub use crate::vector::{Vec3, ZeroLengthPolicy};

use crate::config::Config;
use crate::overlay::Overlay;

/// Render `config.frames` frames of every configured scene.
///
/// Each frame starts from a cleared overlay and recomputes everything from
/// the scene's fixed inputs.
pub fn run(config: &Config) -> Vec<String> {
    let mut overlay = Overlay::new(config.overlay);
    let mut frames = Vec::with_capacity(config.frames * config.scenes.len());

    for scene in &config.scenes {
        for frame in 0..config.frames {
            log::debug!("drawing scene {scene}, frame {frame}");
            overlay.begin_frame();
            scene.draw(&mut overlay);
            frames.push(overlay.render());
        }
    }
    frames
}


#[test]
fn frames_are_identical() {
    let config = Config {
        frames: 3,
        ..Config::new(vec!["-scene".to_string(), "slerp".to_string()]).unwrap()
    };
    let frames = run(&config);

    assert_eq!(frames.len(), 3);
    assert!(frames.iter().all(|frame| *frame == frames[0]));
}

#[test]
fn runs_every_scene_in_order() {
    let frames = run(&Config::new(Vec::new()).unwrap());

    assert_eq!(frames.len(), 3);
    assert!(frames[0].starts_with("rotateMatrix0"));
    assert!(frames[1].lines().nth(1).unwrap().starts_with("rotateMatrix"));
    assert!(frames[2].contains("Slerp(q0, q1, 0.5)"));
}
