//! Op-log backend. Records every drawing command while keeping a real
//! matrix stack, so tests (and the determinism property) can compare two
//! renders command-for-command without a rasterizer in the loop.

use glam::{DAffine2, DVec2};

use super::{BackendError, DrawContext, SurfaceId, TextExtents};

/// Fixed glyph metrics: the recorder has no font system, so every char is
/// one em-advance wide at a nominal 10-unit size.
const FONT_SIZE: f64 = 10.0;
const CHAR_ADVANCE: f64 = 6.0;

#[derive(Clone, Debug, PartialEq)]
pub enum Op {
    Save,
    Restore,
    SetMatrix(DAffine2),
    Translate(f64, f64),
    Rotate(f64),
    Scale(f64, f64),
    MoveTo(f64, f64),
    LineTo(f64, f64),
    CurveTo(f64, f64, f64, f64, f64, f64),
    RelMoveTo(f64, f64),
    RelLineTo(f64, f64),
    Rectangle(f64, f64, f64, f64),
    ClosePath,
    NewPath,
    NewSubPath,
    Arc(f64, f64, f64, f64, f64),
    Clip,
    Stroke,
    Fill,
    SetSourceRgb(f64, f64, f64),
    SetDash(Vec<f64>, f64),
    SetLineWidth(f64),
    ShowText(String),
    ShowPage,
    SetSourceSurface(SurfaceId, f64, f64),
    Paint,
}

pub struct RecordingContext {
    ops: Vec<Op>,
    matrix: DAffine2,
    stack: Vec<DAffine2>,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            matrix: DAffine2::IDENTITY,
            stack: Vec::new(),
        }
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    pub fn take_ops(&mut self) -> Vec<Op> {
        std::mem::take(&mut self.ops)
    }

    /// Unmatched `save` count; zero after a well-behaved paint.
    pub fn save_depth(&self) -> usize {
        self.stack.len()
    }

    pub fn current_matrix(&self) -> DAffine2 {
        self.matrix
    }

    pub fn count(&self, pred: impl Fn(&Op) -> bool) -> usize {
        self.ops.iter().filter(|op| pred(op)).count()
    }

    /// Current transform applied to a user-space point. Lets tests assert
    /// device positions without replaying the matrix ops themselves.
    pub fn to_device(&self, x: f64, y: f64) -> (f64, f64) {
        let p = self.matrix.transform_point2(DVec2::new(x, y));
        (p.x, p.y)
    }
}

impl Default for RecordingContext {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawContext for RecordingContext {
    fn save(&mut self) {
        self.stack.push(self.matrix);
        self.ops.push(Op::Save);
    }

    fn restore(&mut self) {
        if let Some(m) = self.stack.pop() {
            self.matrix = m;
        }
        self.ops.push(Op::Restore);
    }

    fn get_matrix(&self) -> DAffine2 {
        self.matrix
    }

    fn set_matrix(&mut self, matrix: DAffine2) {
        self.matrix = matrix;
        self.ops.push(Op::SetMatrix(matrix));
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.matrix = self.matrix * DAffine2::from_translation(DVec2::new(dx, dy));
        self.ops.push(Op::Translate(dx, dy));
    }

    fn rotate(&mut self, angle: f64) {
        self.matrix = self.matrix * DAffine2::from_angle(angle);
        self.ops.push(Op::Rotate(angle));
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.matrix = self.matrix * DAffine2::from_scale(DVec2::new(sx, sy));
        self.ops.push(Op::Scale(sx, sy));
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ops.push(Op::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ops.push(Op::LineTo(x, y));
    }

    fn curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64) {
        self.ops.push(Op::CurveTo(x1, y1, x2, y2, x3, y3));
    }

    fn rel_move_to(&mut self, dx: f64, dy: f64) {
        self.ops.push(Op::RelMoveTo(dx, dy));
    }

    fn rel_line_to(&mut self, dx: f64, dy: f64) {
        self.ops.push(Op::RelLineTo(dx, dy));
    }

    fn rectangle(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ops.push(Op::Rectangle(x, y, width, height));
    }

    fn close_path(&mut self) {
        self.ops.push(Op::ClosePath);
    }

    fn new_path(&mut self) {
        self.ops.push(Op::NewPath);
    }

    fn new_sub_path(&mut self) {
        self.ops.push(Op::NewSubPath);
    }

    fn arc(&mut self, xc: f64, yc: f64, radius: f64, angle1: f64, angle2: f64) {
        self.ops.push(Op::Arc(xc, yc, radius, angle1, angle2));
    }

    fn clip(&mut self) -> Result<(), BackendError> {
        self.ops.push(Op::Clip);
        Ok(())
    }

    fn stroke(&mut self) -> Result<(), BackendError> {
        self.ops.push(Op::Stroke);
        Ok(())
    }

    fn fill(&mut self) -> Result<(), BackendError> {
        self.ops.push(Op::Fill);
        Ok(())
    }

    fn set_source_rgb(&mut self, r: f64, g: f64, b: f64) {
        self.ops.push(Op::SetSourceRgb(r, g, b));
    }

    fn set_dash(&mut self, dashes: &[f64], offset: f64) {
        self.ops.push(Op::SetDash(dashes.to_vec(), offset));
    }

    fn set_line_width(&mut self, width: f64) {
        self.ops.push(Op::SetLineWidth(width));
    }

    fn text_extents(&mut self, text: &str) -> Result<TextExtents, BackendError> {
        let width = CHAR_ADVANCE * text.chars().count() as f64;
        Ok(TextExtents {
            x_bearing: 0.0,
            y_bearing: -FONT_SIZE * 0.8,
            width,
            height: FONT_SIZE,
            x_advance: width,
            y_advance: 0.0,
        })
    }

    fn show_text(&mut self, text: &str) -> Result<(), BackendError> {
        self.ops.push(Op::ShowText(text.to_string()));
        Ok(())
    }

    fn show_page(&mut self) -> Result<(), BackendError> {
        self.ops.push(Op::ShowPage);
        Ok(())
    }

    fn set_source_surface(&mut self, surface: SurfaceId, x: f64, y: f64) {
        self.ops.push(Op::SetSourceSurface(surface, x, y));
    }

    fn paint(&mut self) -> Result<(), BackendError> {
        self.ops.push(Op::Paint);
        Ok(())
    }
}
