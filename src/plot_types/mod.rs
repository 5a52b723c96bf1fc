//! Field painters: painters that draw data inside the clipped plot
//! field.

pub mod band;
pub mod key;
pub mod overlay;
pub mod stepped;
pub mod xy;

pub use band::{FilledBand, XBand};
pub use key::KeyPainter;
pub use overlay::AbsoluteFieldOverlay;
pub use stepped::{ContinuousSteppedPainter, DiscreteSteppedPainter};
pub use xy::XYDataPainter;

use crate::bag::Bag;
use crate::errors::Result;
use crate::painter::Painter;
use crate::transform::FieldRef;

/// Data extent of a field painter; `None` means no constraint on that
/// bound.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DataBounds {
    pub xmin: Option<f64>,
    pub xmax: Option<f64>,
    pub ymin: Option<f64>,
    pub ymax: Option<f64>,
}

impl DataBounds {
    pub fn from_ranges(x: Option<(f64, f64)>, y: Option<(f64, f64)>) -> Self {
        Self {
            xmin: x.map(|r| r.0),
            xmax: x.map(|r| r.1),
            ymin: y.map(|r| r.0),
            ymax: y.map(|r| r.1),
        }
    }

    pub fn union(&self, other: &DataBounds) -> DataBounds {
        fn merge(a: Option<f64>, b: Option<f64>, f: fn(f64, f64) -> f64) -> Option<f64> {
            match (a, b) {
                (Some(a), Some(b)) => Some(f(a, b)),
                (Some(a), None) => Some(a),
                (None, b) => b,
            }
        }
        DataBounds {
            xmin: merge(self.xmin, other.xmin, f64::min),
            xmax: merge(self.xmax, other.xmax, f64::max),
            ymin: merge(self.ymin, other.ymin, f64::min),
            ymax: merge(self.ymax, other.ymax, f64::max),
        }
    }
}

/// A painter drawn inside the plot field. The plot allocates it the full
/// field rectangle and clips it there; data coordinates go through the
/// field's transformer.
pub trait FieldPainter: Painter {
    fn set_field(&mut self, field: FieldRef);
    fn field(&self) -> Option<&FieldRef>;

    fn data_bounds(&self) -> DataBounds {
        DataBounds::default()
    }

    /// Whether this painter consumes an entry of the rotating data-theme
    /// palette.
    fn wants_data_style(&self) -> bool {
        false
    }

    fn set_data_style(&mut self, _dsn: usize) {}

    /// Legend entry, if the painter has one to offer.
    fn key_painter(&mut self) -> Option<Box<dyn Painter>> {
        None
    }

    /// Pull this round's chunk out of the bag, if the painter is wired
    /// to one.
    fn absorb_round(&mut self, _bag: &mut Bag) -> Result<()> {
        Ok(())
    }
}
