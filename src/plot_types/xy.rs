//! Scatter/line painter over one x column and one y column.

use crate::backend::DrawContext;
use crate::bag::{Bag, FilterId, SinkId};
use crate::data::{ColumnRequest, ColumnSlots, DataHolder};
use crate::errors::{PlotError, Result};
use crate::painter::{Extents, Painter, PainterCore};
use crate::plot_types::{DataBounds, FieldPainter, KeyPainter};
use crate::stamps::{paint_many, Stamp};
use crate::theme::{StyleToken, Theme};
use crate::transform::FieldRef;

/// Stroke is flushed every this many vertices so backend path state
/// stays bounded.
const STROKE_BATCH: usize = 100;

/// Connects points with lines and/or stamps them.
pub struct XYDataPainter {
    core: PainterCore,
    field: Option<FieldRef>,
    holder: DataHolder,
    slots: ColumnSlots,
    stamp: Option<Box<dyn Stamp>>,
    pub lines: bool,
    dsn: usize,
    sink: Option<SinkId>,
    pub key_text: Option<String>,
}

impl XYDataPainter {
    pub fn new(lines: bool, stamp: Option<Box<dyn Stamp>>) -> Self {
        let mut holder = DataHolder::new();
        let slots = holder.register(&ColumnRequest {
            xs: 1,
            ys: 1,
            ..ColumnRequest::default()
        });
        let mut stamp = stamp;
        if let Some(s) = &mut stamp {
            s.register_columns(&mut holder);
        }
        Self {
            core: PainterCore::new(StyleToken::GenericLine),
            field: None,
            holder,
            slots,
            stamp,
            lines,
            dsn: 0,
            sink: None,
            key_text: None,
        }
    }

    /// Direct population, bypassing the bag.
    pub fn set_data(&mut self, xs: &[f64], ys: &[f64]) {
        self.holder
            .set_xy(self.slots.x_start, self.slots.y_start, xs, ys);
    }

    /// The bag sink spec this painter's columns demand.
    pub fn sink_spec(&self) -> String {
        self.holder.sink_spec()
    }

    pub fn expose_in(&mut self, bag: &mut Bag, name: &str) -> Result<()> {
        let sink = bag.register_sink(&self.sink_spec())?;
        bag.expose_sink(sink, name)?;
        self.sink = Some(sink);
        Ok(())
    }

    pub fn link_from(&mut self, bag: &mut Bag, filter: FilterId) -> Result<()> {
        let sink = bag.register_sink(&self.sink_spec())?;
        bag.link(filter, sink)?;
        self.sink = Some(sink);
        Ok(())
    }

    pub fn holder(&self) -> &DataHolder {
        &self.holder
    }
}

impl Painter for XYDataPainter {
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
        let xform =
            field
                .borrow()
                .transformer(self.core.width(), self.core.height(), true);
        let pts = xform.map_cols(
            self.holder.x_col(self.slots.x_start),
            self.holder.y_col(self.slots.y_start),
        );

        if self.lines && !pts.is_empty() {
            style.apply_data_line(ctx, self.dsn);
            ctx.move_to(pts[0].0, pts[0].1);
            for (i, &(x, y)) in pts.iter().enumerate().skip(1) {
                ctx.line_to(x, y);
                if i % STROKE_BATCH == 0 {
                    ctx.stroke()?;
                    ctx.move_to(x, y);
                }
            }
            ctx.stroke()?;
        }

        // Stamps go on top of the connecting lines.
        if let Some(stamp) = &self.stamp {
            style.apply_data_stamp(ctx, self.dsn);
            paint_many(
                stamp.as_ref(),
                ctx,
                style,
                &xform,
                &self.holder,
                self.slots.x_start,
                self.slots.y_start,
                self.dsn,
            )?;
        }
        Ok(())
    }
}

impl FieldPainter for XYDataPainter {
    fn set_field(&mut self, field: FieldRef) {
        self.field = Some(field);
    }

    fn field(&self) -> Option<&FieldRef> {
        self.field.as_ref()
    }

    fn data_bounds(&self) -> DataBounds {
        DataBounds::from_ranges(self.holder.x_bounds(), self.holder.y_bounds())
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
        key.show_line = self.lines;
        key.show_stamp = self.stamp.is_some();
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
