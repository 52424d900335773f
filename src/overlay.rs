use crate::{
    config::OverlayConfig,
    matrix::Mat4x4,
    quaternion::Quaternion,
    vector::Vec3,
};

/// Height of one text row in overlay pixels.
pub const ROW_HEIGHT: i32 = 20;
/// Width of one value column in overlay pixels.
pub const COLUMN_WIDTH: i32 = 60;
/// Characters a column occupies once rendered as text.
pub const CELL_CHARS: usize = 10;

struct Entry {
    x: i32,
    y: i32,
    text: String,
}

/// Debug text overlay addressed in pixel coordinates.
///
/// Text is collected during a frame and rasterized onto a character grid by
/// `render`. Nothing carries over between frames.
pub struct Overlay {
    config: OverlayConfig,
    entries: Vec<Entry>,
}
impl Overlay {
    pub fn new(config: OverlayConfig) -> Self {
        Self {
            config,
            entries: Vec::new(),
        }
    }

    pub fn begin_frame(&mut self) {
        self.entries.clear();
    }

    pub fn screen_print(&mut self, x: i32, y: i32, text: impl Into<String>) {
        self.entries.push(Entry { x, y, text: text.into() });
    }

    pub fn vector_screen_print(&mut self, x: i32, y: i32, v: Vec3, label: &str) {
        let prec = self.config.vector_precision;
        for (i, value) in [v.x, v.y, v.z].iter().enumerate() {
            self.screen_print(x + i as i32 * COLUMN_WIDTH, y, format!("{value:.prec$}"));
        }
        self.screen_print(x + 3 * COLUMN_WIDTH, y, label);
    }

    pub fn quaternion_screen_print(&mut self, x: i32, y: i32, q: Quaternion, label: &str) {
        let prec = self.config.vector_precision;
        for (i, value) in [q.x, q.y, q.z, q.w].iter().enumerate() {
            self.screen_print(x + i as i32 * COLUMN_WIDTH, y, format!("{value:.prec$}"));
        }
        self.screen_print(x + 4 * COLUMN_WIDTH, y, label);
    }

    /// Label on the first row, then the four matrix rows beneath it.
    pub fn matrix_screen_print(&mut self, x: i32, y: i32, matrix: &Mat4x4, label: &str) {
        let OverlayConfig { matrix_precision: prec, matrix_width: width, .. } = self.config;
        self.screen_print(x, y, label);
        for (row, values) in matrix.m.iter().enumerate() {
            for (column, value) in values.iter().enumerate() {
                self.screen_print(
                    x + column as i32 * COLUMN_WIDTH,
                    y + (row as i32 + 1) * ROW_HEIGHT,
                    format!("{value:width$.prec$}"),
                );
            }
        }
    }

    /// Rasterize this frame's text. Text that would run into earlier text on
    /// the same line is pushed right, leaving one space between them.
    pub fn render(&self) -> String {
        let mut grid: Vec<Vec<char>> = Vec::new();

        for entry in &self.entries {
            let row = (entry.y.max(0) / ROW_HEIGHT) as usize;
            let col = entry.x.max(0) as usize * CELL_CHARS / COLUMN_WIDTH as usize;

            if grid.len() <= row {
                grid.resize(row + 1, Vec::new());
            }
            let line = &mut grid[row];
            let used = line.iter().rposition(|ch| *ch != ' ').map_or(0, |last| last + 2);
            let start = col.max(used);
            for (i, ch) in entry.text.chars().enumerate() {
                let at = start + i;
                if line.len() <= at {
                    line.resize(at + 1, ' ');
                }
                line[at] = ch;
            }
        }

        grid.iter()
            .map(|line| line.iter().collect::<String>().trim_end().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
impl Default for Overlay {
    fn default() -> Self {
        Self::new(OverlayConfig::default())
    }
}


#[test]
fn vector_prints_in_columns_with_label() {
    let mut overlay = Overlay::default();
    overlay.vector_screen_print(0, 0, Vec3::new(1.0, -2.5, 3.126), "v");
    assert_eq!(overlay.render(), "1.00      -2.50     3.13      v");
}

#[test]
fn quaternion_label_follows_four_columns() {
    let mut overlay = Overlay::default();
    overlay.quaternion_screen_print(0, ROW_HEIGHT, Quaternion::identity(), "q");
    assert_eq!(overlay.render(), "\n0.00      0.00      0.00      1.00      q");
}

#[test]
fn matrix_prints_label_then_rows() {
    let mut overlay = Overlay::default();
    overlay.matrix_screen_print(0, 0, &Mat4x4::identity(), "identity");
    let text = overlay.render();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], "identity");
    assert_eq!(lines[1], " 1.000     0.000     0.000     0.000");
    assert_eq!(lines[4], " 0.000     0.000     0.000     1.000");
}

#[test]
fn precision_follows_config() {
    let mut overlay = Overlay::new(OverlayConfig {
        vector_precision: 0,
        matrix_precision: 1,
        matrix_width: 4,
    });
    overlay.vector_screen_print(0, 0, Vec3::new(1.4, 2.6, 3.0), "v");
    overlay.matrix_screen_print(0, ROW_HEIGHT, &Mat4x4::identity(), "m");
    let text = overlay.render();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "1         3         3         v");
    assert_eq!(lines[2], " 1.0       0.0       0.0       0.0");
}

#[test]
fn values_at_largest_precision_print_whole() {
    use crate::config::MAX_PRECISION;

    let mut overlay = Overlay::new(OverlayConfig {
        vector_precision: MAX_PRECISION,
        matrix_precision: MAX_PRECISION,
        matrix_width: 6,
    });
    let matrix = Mat4x4::direction_to_direction(
        Vec3::new(-0.6, 0.9, 0.2).normalized(),
        Vec3::new(0.4, 0.7, -0.5).normalized(),
    );
    let v = Vec3::new(-0.123456789, 12.5, -1.0);
    overlay.vector_screen_print(0, 0, v, "v");
    overlay.matrix_screen_print(0, ROW_HEIGHT, &matrix, "m");
    let text = overlay.render();
    let lines: Vec<&str> = text.lines().collect();

    let expected: Vec<String> = [v.x, v.y, v.z].iter()
        .map(|value| format!("{value:.6}"))
        .chain(std::iter::once("v".to_string()))
        .collect();
    assert_eq!(lines[0].split_whitespace().collect::<Vec<_>>(), expected);

    for (row, values) in matrix.m.iter().enumerate() {
        let expected: Vec<String> = values.iter().map(|value| format!("{value:.6}")).collect();
        assert_eq!(lines[row + 2].split_whitespace().collect::<Vec<_>>(), expected);
    }
}

#[test]
fn overlong_text_is_pushed_right_not_clipped() {
    let mut overlay = Overlay::default();
    overlay.screen_print(0, 0, "12345.678000");
    overlay.screen_print(COLUMN_WIDTH, 0, "next");
    assert_eq!(overlay.render(), "12345.678000 next");
}

#[test]
fn begin_frame_clears_previous_text() {
    let mut overlay = Overlay::default();
    overlay.screen_print(0, 0, "stale");
    overlay.begin_frame();
    overlay.screen_print(COLUMN_WIDTH, 0, "fresh");
    assert_eq!(overlay.render(), "          fresh");
}
