//! vecplot: a 2D scientific plotting engine that renders painter trees
//! through a Cairo-like drawing context.

pub mod axes;
pub mod axis_painters;
pub mod backend;
pub mod bag;
pub mod data;
pub mod errors;
pub mod layout;
pub mod pager;
pub mod painter;
pub mod plot;
pub mod plot_types;
pub mod rendering;
pub mod stamps;
pub mod theme;
pub mod transform;

pub use axes::{AngularAxis, AngularMode, Axis, DiscreteAxis, LinearAxis, LogAxis};
pub use axis_painters::{AxisPainter, AxisSide, LabelFormat, WhichAxis};
pub use backend::{DrawContext, RecordingContext};
pub use bag::{Bag, DataSource, Filter, FunctionFilter, IndexMapFilter, Value, VecSource};
pub use errors::{PlotError, Result};
pub use layout::{Grid, HBox, LinearBox, NullPainter, Overlay, RightRotationPainter, Rotation, TextPainter, VBox};
pub use pager::{GridPager, MultiPagePager, Pager, ReusingPager, SinglePagePager};
pub use painter::{Extents, Painter};
pub use plot::RectPlot;
pub use plot_types::{
    AbsoluteFieldOverlay, ContinuousSteppedPainter, DiscreteSteppedPainter, FieldPainter,
    FilledBand, KeyPainter, XBand, XYDataPainter,
};
pub use rendering::render;
pub use stamps::{DataThemedStamp, PrimaryStamp, Stamp, StampShape, WithXErrorBars, WithYErrorBars};
pub use theme::{Color, StyleToken, Theme};
pub use transform::{RectField, Transformer};
