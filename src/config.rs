use std::fmt;

use crate::{
    error::{Math3dError, Math3dResult},
    overlay::CELL_CHARS,
    scene::Scene,
};


/// Parsing states.
enum Parse {
    None,
    Scene,
    VectorPrecision,
    MatrixPrecision,
    Frames,
}
impl Parse {
    fn flag(&self) -> &'static str {
        match self {
            Parse::None => "",
            Parse::Scene => "-scene",
            Parse::VectorPrecision => "-vprec",
            Parse::MatrixPrecision => "-mprec",
            Parse::Frames => "-frames",
        }
    }
}


/// User defined configuration settings.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub scenes: Vec<Scene>,
    pub overlay: OverlayConfig,
    pub frames: usize,
}
impl Config {
    /// Create a new Config from command line arguments, program name excluded.
    pub fn new(args: Vec<String>) -> Math3dResult<Config> {
        let mut parser = Parse::None;
        let mut cfg    = Config::default();

        for arg in args.into_iter() {
            match arg.as_str() {
                "-scene" => {
                    parser = Parse::Scene;
                    continue;
                }
                "-vprec" => {
                    parser = Parse::VectorPrecision;
                    continue;
                }
                "-mprec" => {
                    parser = Parse::MatrixPrecision;
                    continue;
                }
                "-frames" => {
                    parser = Parse::Frames;
                    continue;
                }
                _ => {},
            }
            match parser {
                Parse::Scene => {
                    if arg == "all" {
                        cfg.scenes.extend(Scene::ALL);
                    }
                    else {
                        cfg.scenes.push(arg.parse()?);
                    }
                }
                Parse::VectorPrecision => {
                    cfg.overlay.vector_precision = parse_precision(&arg)?;
                }
                Parse::MatrixPrecision => {
                    cfg.overlay.matrix_precision = parse_precision(&arg)?;
                }
                Parse::Frames => {
                    if let Ok(frames) = arg.parse::<usize>() {
                        cfg.frames = frames;
                    }
                    else {
                        return Err(
                            Math3dError::InvalidFrameCount(arg.clone())
                        );
                    }
                }
                Parse::None => {},
            }
            parser = Parse::None;
        }
        if !matches!(parser, Parse::None) {
            return Err(
                Math3dError::MissingValue(parser.flag().to_string())
            );
        }
        if cfg.scenes.is_empty() {
            cfg.scenes.extend(Scene::ALL);
        }
        let mut seen = Vec::with_capacity(cfg.scenes.len());
        cfg.scenes.retain(|scene| {
            if seen.contains(scene) {
                return false;
            }
            seen.push(*scene);
            true
        });
        Ok(cfg)
    }
}
impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "
            \rScenes
            \r=============================================================",
        )?;
        for (i, scene) in self.scenes.iter().enumerate() {
            write!(f, "
                \rScene {i}: {scene}",
            )?;
        }
        writeln!(f, "
            \rFrames: {}
            \r{}",
            self.frames,
            self.overlay,
        )
    }
}
impl Default for Config {
    fn default() -> Self {
        Self {
            scenes: Vec::new(),
            overlay: OverlayConfig::default(),
            frames: 1,
        }
    }
}

/// Number formatting used by the text overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OverlayConfig {
    pub vector_precision: usize,
    pub matrix_precision: usize,
    pub matrix_width: usize,
}
impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            vector_precision: 2,
            matrix_precision: 3,
            matrix_width: 6,
        }
    }
}
impl fmt::Display for OverlayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vector Precision: {},
            \rMatrix Precision: {},
            \rMatrix Width: {}",
            self.vector_precision,
            self.matrix_precision,
            self.matrix_width,
        )
    }
}

/// Most decimals a value can carry and still fit an overlay cell with a
/// space to spare, sign and integer digit included.
pub const MAX_PRECISION: usize = CELL_CHARS - 4;

fn parse_precision(arg: &str) -> Math3dResult<usize> {
    match arg.parse::<usize>() {
        Ok(prec) if prec <= MAX_PRECISION => Ok(prec),
        _ => Err(Math3dError::InvalidPrecision(arg.to_string())),
    }
}


#[cfg(test)]
fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn defaults_to_every_scene() {
    let cfg = Config::new(Vec::new()).unwrap();
    assert_eq!(cfg.scenes, Scene::ALL.to_vec());
    assert_eq!(cfg.frames, 1);
    assert_eq!(cfg.overlay, OverlayConfig::default());
}

#[test]
fn parses_scenes_and_precision() {
    let cfg = Config::new(args(&["-scene", "slerp", "-scene", "rotate", "-vprec", "4", "-mprec", "1"])).unwrap();
    assert_eq!(cfg.scenes, vec![Scene::Slerp, Scene::RotateVector]);
    assert_eq!(cfg.overlay.vector_precision, 4);
    assert_eq!(cfg.overlay.matrix_precision, 1);
}

#[test]
fn accepts_largest_precision() {
    let cfg = Config::new(args(&["-vprec", "6", "-mprec", "6"])).unwrap();
    assert_eq!(cfg.overlay.vector_precision, MAX_PRECISION);
    assert_eq!(cfg.overlay.matrix_precision, MAX_PRECISION);
}

#[test]
fn stray_arguments_are_ignored() {
    let cfg = Config::new(args(&["-scene", "direction", "extra", "-frames", "3"])).unwrap();
    assert_eq!(cfg.scenes, vec![Scene::DirectionToDirection]);
    assert_eq!(cfg.frames, 3);
}

#[test]
fn repeated_scenes_run_once() {
    let cfg = Config::new(args(&["-scene", "slerp", "-scene", "all"])).unwrap();
    assert_eq!(cfg.scenes, vec![Scene::Slerp, Scene::DirectionToDirection, Scene::RotateVector]);
}

#[test]
fn rejects_bad_values() {
    assert_eq!(
        Config::new(args(&["-scene", "teapot"])),
        Err(Math3dError::UnknownScene("teapot".to_string()))
    );
    assert_eq!(
        Config::new(args(&["-vprec", "many"])),
        Err(Math3dError::InvalidPrecision("many".to_string()))
    );
    assert_eq!(
        Config::new(args(&["-mprec", "7"])),
        Err(Math3dError::InvalidPrecision("7".to_string()))
    );
    assert_eq!(
        Config::new(args(&["-frames", "-1"])),
        Err(Math3dError::InvalidFrameCount("-1".to_string()))
    );
    assert_eq!(
        Config::new(args(&["-mprec"])),
        Err(Math3dError::MissingValue("-mprec".to_string()))
    );
}
