//! Band painters: a data-driven low/high envelope and a static vertical
//! band between two x values.

use crate::axes::Axis;
use crate::backend::DrawContext;
use crate::bag::{Bag, FilterId, SinkId};
use crate::data::{ColumnRequest, ColumnSlots, DataHolder};
use crate::errors::{PlotError, Result};
use crate::painter::{Extents, Painter, PainterCore};
use crate::plot_types::{DataBounds, FieldPainter};
use crate::theme::{StyleToken, Theme};
use crate::transform::FieldRef;

/// Fills the region between a low and a high y value per x. Over a
/// discrete x axis each ordinate gets its own filled cell; over a
/// continuous axis the points join into one filled polygon.
pub struct FilledBand {
    core: PainterCore,
    field: Option<FieldRef>,
    holder: DataHolder,
    slots: ColumnSlots,
    sink: Option<SinkId>,
}

impl FilledBand {
    pub fn new() -> Self {
        let mut holder = DataHolder::new();
        let slots = holder.register(&ColumnRequest {
            xs: 1,
            ys: 2,
            ..ColumnRequest::default()
        });
        Self {
            core: PainterCore::new(StyleToken::GenericBand),
            field: None,
            holder,
            slots,
            sink: None,
        }
    }

    pub fn set_data(&mut self, xs: &[f64], lo: &[f64], hi: &[f64]) {
        self.holder.set_x_col(self.slots.x_start, xs);
        self.holder.set_y_col(self.slots.y_start, lo);
        self.holder.set_y_col(self.slots.y_start + 1, hi);
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

impl Default for FilledBand {
    fn default() -> Self {
        Self::new()
    }
}

impl Painter for FilledBand {
    fn core(&self) -> &PainterCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PainterCore {
        &mut self.core
    }

    fn get_minimum_size(&mut self, _ctx: &mut dyn DrawContext, _style: &Theme) -> Result<Extents> {
        Ok(Extents::zero())
    }

    fn do_paint(&mut self, ctx: &mut dyn DrawContext, _style: &Theme) -> Result<()> {
        let field = self
            .field
            .as_ref()
            .ok_or_else(|| PlotError::layout("field painter painted without a field"))?;
        let (width, height) = (self.core.width(), self.core.height());
        let xs = self.holder.x_col(self.slots.x_start);
        let lo = self.holder.y_col(self.slots.y_start);
        let hi = self.holder.y_col(self.slots.y_start + 1);
        if xs.is_empty() {
            return Ok(());
        }
        let field = field.borrow();
        let xform = field.transformer(width, height, true);

        if let Axis::Discrete(ax) = &field.xaxis {
            let pos = |i: usize| ax.transform_index(i) * width;
            let n = ax.len();
            for ((&x, &l), &h) in xs.iter().zip(lo.iter()).zip(hi.iter()) {
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
                let y0 = xform.map_y(l);
                let y1 = xform.map_y(h);
                ctx.rectangle(left, y1.min(y0), right - left, (y0 - y1).abs());
                ctx.fill()?;
            }
        } else {
            // Top edge forward, bottom edge backward, one fill.
            ctx.move_to(xform.map_x(xs[0]), xform.map_y(hi[0]));
            for i in 1..xs.len() {
                ctx.line_to(xform.map_x(xs[i]), xform.map_y(hi[i]));
            }
            for i in (0..xs.len()).rev() {
                ctx.line_to(xform.map_x(xs[i]), xform.map_y(lo[i]));
            }
            ctx.close_path();
            ctx.fill()?;
        }
        Ok(())
    }
}

impl FieldPainter for FilledBand {
    fn set_field(&mut self, field: FieldRef) {
        self.field = Some(field);
    }

    fn field(&self) -> Option<&FieldRef> {
        self.field.as_ref()
    }

    fn data_bounds(&self) -> DataBounds {
        DataBounds::from_ranges(self.holder.x_bounds(), self.holder.y_bounds())
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

/// Fills the vertical band between two fixed x values.
pub struct XBand {
    core: PainterCore,
    field: Option<FieldRef>,
    pub xmin: f64,
    pub xmax: f64,
}

impl XBand {
    pub fn new(xmin: f64, xmax: f64) -> Self {
        Self {
            core: PainterCore::new(StyleToken::GenericBand),
            field: None,
            xmin,
            xmax,
        }
    }
}

impl Painter for XBand {
    fn core(&self) -> &PainterCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PainterCore {
        &mut self.core
    }

    fn get_minimum_size(&mut self, _ctx: &mut dyn DrawContext, _style: &Theme) -> Result<Extents> {
        Ok(Extents::zero())
    }

    fn do_paint(&mut self, ctx: &mut dyn DrawContext, _style: &Theme) -> Result<()> {
        let field = self
            .field
            .as_ref()
            .ok_or_else(|| PlotError::layout("field painter painted without a field"))?;
        let (width, height) = (self.core.width(), self.core.height());
        let xform = field.borrow().transformer(width, height, true);
        let x0 = xform.map_x(self.xmin);
        let x1 = xform.map_x(self.xmax);
        ctx.rectangle(x0.min(x1), 0.0, (x1 - x0).abs(), height);
        ctx.fill()?;
        Ok(())
    }
}

impl FieldPainter for XBand {
    fn set_field(&mut self, field: FieldRef) {
        self.field = Some(field);
    }

    fn field(&self) -> Option<&FieldRef> {
        self.field.as_ref()
    }
}
