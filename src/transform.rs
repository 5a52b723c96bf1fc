//! The plot field and its data-to-device coordinate transformer.

use std::cell::RefCell;
use std::rc::Rc;

use crate::axes::{Axis, LinearAxis};

/// Shared handle to a field: the plot, its axis painters and its field
/// painters all consult the same axis pair.
pub type FieldRef = Rc<RefCell<RectField>>;

/// Owns the x/y axis pair bounding the plot field.
#[derive(Clone, Debug)]
pub struct RectField {
    pub xaxis: Axis,
    pub yaxis: Axis,
}

impl RectField {
    pub fn new() -> Self {
        Self {
            xaxis: Axis::Linear(LinearAxis { min: 0.0, max: 10.0 }),
            yaxis: Axis::Linear(LinearAxis { min: 0.0, max: 10.0 }),
        }
    }

    pub fn shared(self) -> FieldRef {
        Rc::new(RefCell::new(self))
    }

    /// Short-lived record mapping data values to device coordinates for
    /// one paint of a `width` x `height` field.
    pub fn transformer(&self, width: f64, height: f64, weak_clamp: bool) -> Transformer {
        Transformer {
            xaxis: self.xaxis.clone(),
            yaxis: self.yaxis.clone(),
            width,
            height,
            weak_clamp,
        }
    }
}

impl Default for RectField {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps data values into the device space of a field. With weak clamping
/// the axis fraction is clipped to [-1, 2] before scaling, so wildly
/// off-field coordinates cannot overflow the drawing backend; the field
/// clip rectangle discards them.
#[derive(Clone, Debug)]
pub struct Transformer {
    xaxis: Axis,
    yaxis: Axis,
    pub width: f64,
    pub height: f64,
    pub weak_clamp: bool,
}

impl Transformer {
    fn clamp(&self, frac: f64) -> f64 {
        if self.weak_clamp {
            frac.clamp(-1.0, 2.0)
        } else {
            frac
        }
    }

    pub fn map_x(&self, x: f64) -> f64 {
        self.clamp(self.xaxis.transform(x)) * self.width
    }

    /// Math-to-screen flip: larger y values land nearer the top.
    pub fn map_y(&self, y: f64) -> f64 {
        (1.0 - self.clamp(self.yaxis.transform(y))) * self.height
    }

    pub fn map_point(&self, x: f64, y: f64) -> (f64, f64) {
        (self.map_x(x), self.map_y(y))
    }

    /// Batch form used by the data painters: one pass over both columns.
    pub fn map_cols(&self, xs: &[f64], ys: &[f64]) -> Vec<(f64, f64)> {
        xs.iter()
            .zip(ys.iter())
            .map(|(&x, &y)| self.map_point(x, y))
            .collect()
    }

    pub fn x_inbounds(&self, x: f64) -> bool {
        self.xaxis.inbounds(x)
    }

    pub fn y_inbounds(&self, y: f64) -> bool {
        self.yaxis.inbounds(y)
    }
}
