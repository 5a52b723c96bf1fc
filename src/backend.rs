//! Drawing-context capability consumed by the painter tree.
//!
//! The engine never talks to a concrete surface library; it draws through
//! [`DrawContext`], a Cairo-shaped trait a backend adapter implements. Path
//! and matrix mutators are infallible; operations that rasterize or measure
//! report [`BackendError`] so adapter faults can propagate to the pager.

pub mod recording;

use glam::DAffine2;

pub use recording::{Op, RecordingContext};

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct BackendError(pub String);

impl BackendError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Extents of a text string as the backend would render it, in user-space
/// units. Mirrors the Cairo `text_extents_t` fields the core consumes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextExtents {
    pub x_bearing: f64,
    pub y_bearing: f64,
    pub width: f64,
    pub height: f64,
    pub x_advance: f64,
    pub y_advance: f64,
}

/// Opaque handle to a backend surface, for `set_source_surface`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u64);

/// Minimal backend a render pass needs. Every painter must leave the
/// context state exactly as it found it (`save`/`restore` pairing).
pub trait DrawContext {
    fn save(&mut self);
    fn restore(&mut self);

    fn get_matrix(&self) -> DAffine2;
    fn set_matrix(&mut self, matrix: DAffine2);
    fn translate(&mut self, dx: f64, dy: f64);
    fn rotate(&mut self, angle: f64);
    fn scale(&mut self, sx: f64, sy: f64);

    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64);
    fn rel_move_to(&mut self, dx: f64, dy: f64);
    fn rel_line_to(&mut self, dx: f64, dy: f64);
    fn rectangle(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn close_path(&mut self);
    fn new_path(&mut self);
    fn new_sub_path(&mut self);
    fn arc(&mut self, xc: f64, yc: f64, radius: f64, angle1: f64, angle2: f64);

    fn clip(&mut self) -> Result<(), BackendError>;
    fn stroke(&mut self) -> Result<(), BackendError>;
    fn fill(&mut self) -> Result<(), BackendError>;

    fn set_source_rgb(&mut self, r: f64, g: f64, b: f64);
    fn set_dash(&mut self, dashes: &[f64], offset: f64);
    fn set_line_width(&mut self, width: f64);

    fn text_extents(&mut self, text: &str) -> Result<TextExtents, BackendError>;
    fn show_text(&mut self, text: &str) -> Result<(), BackendError>;

    fn show_page(&mut self) -> Result<(), BackendError>;
    fn set_source_surface(&mut self, surface: SurfaceId, x: f64, y: f64);
    fn paint(&mut self) -> Result<(), BackendError>;
}
