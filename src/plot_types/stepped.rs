//! Step plots: one for discrete x axes, one histogram-style for
//! continuous left-edge bins.

use crate::axes::Axis;
use crate::backend::DrawContext;
use crate::bag::{Bag, FilterId, SinkId};
use crate::data::{ColumnRequest, ColumnSlots, DataHolder};
use crate::errors::{PlotError, Result};
use crate::painter::{Extents, Painter, PainterCore};
use crate::plot_types::{DataBounds, FieldPainter, KeyPainter};
use crate::theme::{StyleToken, Theme};
use crate::transform::FieldRef;

/// Horizontal segment per ordinate, with optional vertical connectors
/// between adjacent steps.
///
/// Step edges are the midpoints between neighboring ordinate positions;
/// the first step starts at the field's left edge and the last ends at
/// its right edge. This is the behavior observed with a padded discrete
/// axis; with `pad_boundaries` off the edge handling is unspecified.
pub struct DiscreteSteppedPainter {
    core: PainterCore,
    field: Option<FieldRef>,
    holder: DataHolder,
    slots: ColumnSlots,
    pub connectors: bool,
    dsn: usize,
    sink: Option<SinkId>,
    pub key_text: Option<String>,
}

impl DiscreteSteppedPainter {
    pub fn new(connectors: bool) -> Self {
        let mut holder = DataHolder::new();
        let slots = holder.register(&ColumnRequest {
            xs: 1,
            ys: 1,
            ..ColumnRequest::default()
        });
        Self {
            core: PainterCore::new(StyleToken::GenericLine),
            field: None,
            holder,
            slots,
            connectors,
            dsn: 0,
            sink: None,
            key_text: None,
        }
    }

    pub fn set_data(&mut self, xs: &[f64], ys: &[f64]) {
        self.holder
            .set_xy(self.slots.x_start, self.slots.y_start, xs, ys);
    }

    pub fn expose_in(&mut self, bag: &mut Bag, name: &str) -> Result<()> {
        let sink = bag.register_sink(&self.holder.sink_spec())?;
        bag.expose_sink(sink, name)?;
        self.sink = Some(sink);
        Ok(())
    }

    pub fn link_from(&mut self, bag: &mut Bag, filter: FilterId) -> Result<()> {
        let sink = bag.register_sink(&self.holder.sink_spec())?;
        bag.link(filter, sink)?;
        self.sink = Some(sink);
        Ok(())
    }
}

impl Painter for DiscreteSteppedPainter {
    fn core(&self) -> &PainterCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PainterCore {
        &mut self.core
    }

    fn get_minimum_size(&mut self, _ctx: &mut dyn DrawContext, _style: &Theme) -> Result<Extents> {
        Ok(Extents::zero())
    }

    fn do_paint(&mut self, ctx: &mut dyn DrawContext, style: &Theme) -> Result<()> {
        let field = self
            .field
            .as_ref()
            .ok_or_else(|| PlotError::layout("field painter painted without a field"))?;
        let (width, height) = (self.core.width(), self.core.height());
        let field = field.borrow();
        let Axis::Discrete(ax) = &field.xaxis else {
            return Err(PlotError::domain(
                "discrete stepped painter requires a discrete x axis",
            ));
        };
        let xform = field.transformer(width, height, true);
        let pos = |i: usize| ax.transform_index(i) * width;
        let n = ax.len();

        style.apply_data_line(ctx, self.dsn);
        let xs = self.holder.x_col(self.slots.x_start);
        let ys = self.holder.y_col(self.slots.y_start);
        let mut prev: Option<(usize, f64, f64)> = None;
        for (&x, &y) in xs.iter().zip(ys.iter()) {
            let idx = ax.index_of(x)?;
            let left = if idx == 0 {
                0.0
            } else {
                (pos(idx) + pos(idx - 1)) / 2.0
            };
            let right = if idx == n - 1 {
                width
            } else {
                (pos(idx) + pos(idx + 1)) / 2.0
            };
            let y_dev = xform.map_y(y);
            ctx.move_to(left, y_dev);
            ctx.line_to(right, y_dev);
            if self.connectors {
                if let Some((pidx, pright, py)) = prev {
                    if pidx + 1 == idx && (pright - left).abs() < 1e-9 {
                        ctx.move_to(left, py);
                        ctx.line_to(left, y_dev);
                    }
                }
            }
            prev = Some((idx, right, y_dev));
        }
        ctx.stroke()?;
        Ok(())
    }
}

impl FieldPainter for DiscreteSteppedPainter {
    fn set_field(&mut self, field: FieldRef) {
        self.field = Some(field);
    }

    fn field(&self) -> Option<&FieldRef> {
        self.field.as_ref()
    }

    fn data_bounds(&self) -> DataBounds {
        // The x extent is owned by the discrete axis itself.
        DataBounds::from_ranges(None, self.holder.y_bounds())
    }

    fn wants_data_style(&self) -> bool {
        true
    }

    fn set_data_style(&mut self, dsn: usize) {
        self.dsn = dsn;
    }

    fn key_painter(&mut self) -> Option<Box<dyn Painter>> {
        let text = self.key_text.clone()?;
        let mut key = KeyPainter::new(text, self.dsn);
        key.show_line = true;
        Some(Box::new(key))
    }

    fn absorb_round(&mut self, bag: &mut Bag) -> Result<()> {
        if let Some(sink) = self.sink {
            if let Some(chunk) = bag.get_chunk(sink)? {
                self.holder.ingest_rows(&chunk)?;
            }
        }
        Ok(())
    }
}

/// Histogram-style stairstep. X values are bin left edges; the final
/// segment extends to a right edge derived as `2*x[n-1] - x[n-2]`.
pub struct ContinuousSteppedPainter {
    core: PainterCore,
    field: Option<FieldRef>,
    holder: DataHolder,
    slots: ColumnSlots,
    dsn: usize,
    sink: Option<SinkId>,
    pub key_text: Option<String>,
}

impl ContinuousSteppedPainter {
    pub fn new() -> Self {
        let mut holder = DataHolder::new();
        let slots = holder.register(&ColumnRequest {
            xs: 1,
            ys: 1,
            ..ColumnRequest::default()
        });
        Self {
            core: PainterCore::new(StyleToken::GenericLine),
            field: None,
            holder,
            slots,
            dsn: 0,
            sink: None,
            key_text: None,
        }
    }

    pub fn set_data(&mut self, xs: &[f64], ys: &[f64]) {
        self.holder
            .set_xy(self.slots.x_start, self.slots.y_start, xs, ys);
    }

    pub fn expose_in(&mut self, bag: &mut Bag, name: &str) -> Result<()> {
        let sink = bag.register_sink(&self.holder.sink_spec())?;
        bag.expose_sink(sink, name)?;
        self.sink = Some(sink);
        Ok(())
    }

    pub fn link_from(&mut self, bag: &mut Bag, filter: FilterId) -> Result<()> {
        let sink = bag.register_sink(&self.holder.sink_spec())?;
        bag.link(filter, sink)?;
        self.sink = Some(sink);
        Ok(())
    }

    /// The derived right edge of the last bin.
    fn right_edge(xs: &[f64]) -> f64 {
        2.0 * xs[xs.len() - 1] - xs[xs.len() - 2]
    }
}

impl Default for ContinuousSteppedPainter {
    fn default() -> Self {
        Self::new()
    }
}

impl Painter for ContinuousSteppedPainter {
    fn core(&self) -> &PainterCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PainterCore {
        &mut self.core
    }

    fn get_minimum_size(&mut self, _ctx: &mut dyn DrawContext, _style: &Theme) -> Result<Extents> {
        Ok(Extents::zero())
    }

    fn do_paint(&mut self, ctx: &mut dyn DrawContext, style: &Theme) -> Result<()> {
        let field = self
            .field
            .as_ref()
            .ok_or_else(|| PlotError::layout("field painter painted without a field"))?;
        let xs = self.holder.x_col(self.slots.x_start);
        let ys = self.holder.y_col(self.slots.y_start);
        if xs.len() < 2 {
            return Ok(());
        }
        let xform = field
            .borrow()
            .transformer(self.core.width(), self.core.height(), true);

        style.apply_data_line(ctx, self.dsn);
        ctx.move_to(xform.map_x(xs[0]), xform.map_y(ys[0]));
        for i in 1..xs.len() {
            let x = xform.map_x(xs[i]);
            ctx.line_to(x, xform.map_y(ys[i - 1]));
            ctx.line_to(x, xform.map_y(ys[i]));
        }
        let xr = xform.map_x(Self::right_edge(xs));
        ctx.line_to(xr, xform.map_y(ys[ys.len() - 1]));
        ctx.stroke()?;
        Ok(())
    }
}

impl FieldPainter for ContinuousSteppedPainter {
    fn set_field(&mut self, field: FieldRef) {
        self.field = Some(field);
    }

    fn field(&self) -> Option<&FieldRef> {
        self.field.as_ref()
    }

    fn data_bounds(&self) -> DataBounds {
        let xs = self.holder.x_col(self.slots.x_start);
        let x = if xs.len() >= 2 {
            Some((xs[0], Self::right_edge(xs)))
        } else {
            self.holder.x_bounds()
        };
        DataBounds::from_ranges(x, self.holder.y_bounds())
    }

    fn wants_data_style(&self) -> bool {
        true
    }

    fn set_data_style(&mut self, dsn: usize) {
        self.dsn = dsn;
    }

    fn key_painter(&mut self) -> Option<Box<dyn Painter>> {
        let text = self.key_text.clone()?;
        let mut key = KeyPainter::new(text, self.dsn);
        key.show_line = true;
        Some(Box::new(key))
    }

    fn absorb_round(&mut self, bag: &mut Bag) -> Result<()> {
        if let Some(sink) = self.sink {
            if let Some(chunk) = bag.get_chunk(sink)? {
                self.holder.ingest_rows(&chunk)?;
            }
        }
        Ok(())
    }
}
