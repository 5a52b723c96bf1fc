//! Point markers. A primary stamp draws a fixed shape; decorator stamps
//! wrap a primary and add error bars or limit arrows, registering the
//! extra data columns they consume.

use serde::{Deserialize, Serialize};

use crate::backend::DrawContext;
use crate::data::{ColumnRequest, ColumnSlots, DataHolder};
use crate::errors::Result;
use crate::theme::Theme;
use crate::transform::Transformer;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StampShape {
    Circle,
    UpTriangle,
    DownTriangle,
    Diamond,
    Square,
    X,
    Plus,
}

/// Trace one symbol centered on the origin. `size` is the full extent in
/// device units. Open shapes (X, plus) are stroked regardless of `fill`.
pub fn draw_symbol(
    ctx: &mut dyn DrawContext,
    shape: StampShape,
    size: f64,
    fill: bool,
) -> Result<()> {
    let r = size / 2.0;
    let closed = match shape {
        StampShape::Circle => {
            ctx.new_sub_path();
            ctx.arc(0.0, 0.0, r, 0.0, std::f64::consts::TAU);
            true
        }
        StampShape::Square => {
            ctx.rectangle(-r, -r, size, size);
            true
        }
        StampShape::Diamond => {
            ctx.move_to(0.0, -r);
            ctx.line_to(r, 0.0);
            ctx.line_to(0.0, r);
            ctx.line_to(-r, 0.0);
            ctx.close_path();
            true
        }
        StampShape::UpTriangle => {
            triangle(ctx, r, -90.0);
            true
        }
        StampShape::DownTriangle => {
            triangle(ctx, r, 90.0);
            true
        }
        StampShape::X => {
            ctx.move_to(-r, -r);
            ctx.line_to(r, r);
            ctx.move_to(r, -r);
            ctx.line_to(-r, r);
            false
        }
        StampShape::Plus => {
            ctx.move_to(-r, 0.0);
            ctx.line_to(r, 0.0);
            ctx.move_to(0.0, -r);
            ctx.line_to(0.0, r);
            false
        }
    };
    if fill && closed {
        ctx.fill()?;
    } else {
        ctx.stroke()?;
    }
    Ok(())
}

fn triangle(ctx: &mut dyn DrawContext, r: f64, start_deg: f64) {
    for (i, step) in [0.0, 120.0, 240.0].iter().enumerate() {
        let a = (start_deg + step).to_radians();
        let (x, y) = (r * a.cos(), r * a.sin());
        if i == 0 {
            ctx.move_to(x, y);
        } else {
            ctx.line_to(x, y);
        }
    }
    ctx.close_path();
}

/// Per-point marker. Stamps are painted after any connecting lines so
/// they sit on top.
pub trait Stamp {
    /// Claim extra columns from the painter's holder. Primaries claim
    /// nothing; decorators claim their error/limit columns here.
    fn register_columns(&mut self, _holder: &mut DataHolder) {}

    /// Paint the marker for row `idx` at device position `(x, y)`.
    fn paint_at(
        &self,
        ctx: &mut dyn DrawContext,
        style: &Theme,
        xform: &Transformer,
        holder: &DataHolder,
        idx: usize,
        x: f64,
        y: f64,
        dsn: usize,
    ) -> Result<()>;
}

/// Paint one marker per row of the given x/y columns.
pub fn paint_many(
    stamp: &dyn Stamp,
    ctx: &mut dyn DrawContext,
    style: &Theme,
    xform: &Transformer,
    holder: &DataHolder,
    x_col: usize,
    y_col: usize,
    dsn: usize,
) -> Result<()> {
    let n = holder.x_col(x_col).len().min(holder.y_col(y_col).len());
    for idx in 0..n {
        let x = xform.map_x(holder.x_col(x_col)[idx]);
        let y = xform.map_y(holder.y_col(y_col)[idx]);
        stamp.paint_at(ctx, style, xform, holder, idx, x, y, dsn)?;
    }
    Ok(())
}

/// Fixed shape, size, rotation and fill.
pub struct PrimaryStamp {
    pub shape: StampShape,
    /// Multiplier on the style's `small_scale`.
    pub size: f64,
    /// Rotation in radians.
    pub rot: f64,
    pub fill: bool,
}

impl PrimaryStamp {
    pub fn new(shape: StampShape) -> Self {
        Self {
            shape,
            size: 1.0,
            rot: 0.0,
            fill: true,
        }
    }

    pub fn outlined(shape: StampShape) -> Self {
        Self {
            fill: false,
            ..Self::new(shape)
        }
    }
}

impl Stamp for PrimaryStamp {
    fn paint_at(
        &self,
        ctx: &mut dyn DrawContext,
        style: &Theme,
        _xform: &Transformer,
        _holder: &DataHolder,
        _idx: usize,
        x: f64,
        y: f64,
        _dsn: usize,
    ) -> Result<()> {
        ctx.save();
        ctx.translate(x, y);
        if self.rot != 0.0 {
            ctx.rotate(self.rot);
        }
        let result = draw_symbol(ctx, self.shape, self.size * style.small_scale, self.fill);
        ctx.restore();
        result
    }
}

/// Resolves shape and color from the rotating palette at paint time,
/// using the owning painter's primary style number.
pub struct DataThemedStamp {
    pub size: f64,
    pub fill: bool,
}

impl DataThemedStamp {
    pub fn new() -> Self {
        Self {
            size: 1.0,
            fill: true,
        }
    }
}

impl Default for DataThemedStamp {
    fn default() -> Self {
        Self::new()
    }
}

impl Stamp for DataThemedStamp {
    fn paint_at(
        &self,
        ctx: &mut dyn DrawContext,
        style: &Theme,
        _xform: &Transformer,
        _holder: &DataHolder,
        _idx: usize,
        x: f64,
        y: f64,
        dsn: usize,
    ) -> Result<()> {
        style.apply_data_stamp(ctx, dsn);
        ctx.save();
        ctx.translate(x, y);
        let shape = style.symbol_for(dsn);
        let result = draw_symbol(ctx, shape, self.size * style.small_scale, self.fill);
        ctx.restore();
        result
    }
}

/// Adds a vertical error bar from two extra y columns, then delegates to
/// the wrapped stamp.
pub struct WithYErrorBars {
    sub: Box<dyn Stamp>,
    slots: ColumnSlots,
}

impl WithYErrorBars {
    pub fn new(sub: Box<dyn Stamp>) -> Self {
        Self {
            sub,
            slots: ColumnSlots::default(),
        }
    }
}

impl Stamp for WithYErrorBars {
    fn register_columns(&mut self, holder: &mut DataHolder) {
        self.slots = holder.register(&ColumnRequest {
            ys: 2,
            ..ColumnRequest::default()
        });
        self.sub.register_columns(holder);
    }

    fn paint_at(
        &self,
        ctx: &mut dyn DrawContext,
        style: &Theme,
        xform: &Transformer,
        holder: &DataHolder,
        idx: usize,
        x: f64,
        y: f64,
        dsn: usize,
    ) -> Result<()> {
        let lo = xform.map_y(holder.y_col(self.slots.y_start)[idx]);
        let hi = xform.map_y(holder.y_col(self.slots.y_start + 1)[idx]);
        ctx.move_to(x, lo);
        ctx.line_to(x, hi);
        ctx.stroke()?;
        self.sub
            .paint_at(ctx, style, xform, holder, idx, x, y, dsn)
    }
}

/// Horizontal counterpart of [`WithYErrorBars`].
pub struct WithXErrorBars {
    sub: Box<dyn Stamp>,
    slots: ColumnSlots,
}

impl WithXErrorBars {
    pub fn new(sub: Box<dyn Stamp>) -> Self {
        Self {
            sub,
            slots: ColumnSlots::default(),
        }
    }
}

impl Stamp for WithXErrorBars {
    fn register_columns(&mut self, holder: &mut DataHolder) {
        self.slots = holder.register(&ColumnRequest {
            xs: 2,
            ..ColumnRequest::default()
        });
        self.sub.register_columns(holder);
    }

    fn paint_at(
        &self,
        ctx: &mut dyn DrawContext,
        style: &Theme,
        xform: &Transformer,
        holder: &DataHolder,
        idx: usize,
        x: f64,
        y: f64,
        dsn: usize,
    ) -> Result<()> {
        let lo = xform.map_x(holder.x_col(self.slots.x_start)[idx]);
        let hi = xform.map_x(holder.x_col(self.slots.x_start + 1)[idx]);
        ctx.move_to(lo, y);
        ctx.line_to(hi, y);
        ctx.stroke()?;
        self.sub
            .paint_at(ctx, style, xform, holder, idx, x, y, dsn)
    }
}

/// Limit arrow: a shaft from the point toward a per-row target value,
/// finished with a head. Vertical arrows read a y column, horizontal an
/// x column.
pub struct WithArrow {
    sub: Box<dyn Stamp>,
    vertical: bool,
    slots: ColumnSlots,
}

impl WithArrow {
    pub fn vertical(sub: Box<dyn Stamp>) -> Self {
        Self {
            sub,
            vertical: true,
            slots: ColumnSlots::default(),
        }
    }

    pub fn horizontal(sub: Box<dyn Stamp>) -> Self {
        Self {
            sub,
            vertical: false,
            slots: ColumnSlots::default(),
        }
    }
}

impl Stamp for WithArrow {
    fn register_columns(&mut self, holder: &mut DataHolder) {
        let req = if self.vertical {
            ColumnRequest {
                ys: 1,
                ..ColumnRequest::default()
            }
        } else {
            ColumnRequest {
                xs: 1,
                ..ColumnRequest::default()
            }
        };
        self.slots = holder.register(&req);
        self.sub.register_columns(holder);
    }

    fn paint_at(
        &self,
        ctx: &mut dyn DrawContext,
        style: &Theme,
        xform: &Transformer,
        holder: &DataHolder,
        idx: usize,
        x: f64,
        y: f64,
        dsn: usize,
    ) -> Result<()> {
        let head = style.small_scale;
        let (tx, ty) = if self.vertical {
            (x, xform.map_y(holder.y_col(self.slots.y_start)[idx]))
        } else {
            (xform.map_x(holder.x_col(self.slots.x_start)[idx]), y)
        };
        ctx.move_to(x, y);
        ctx.line_to(tx, ty);
        // Head: two barbs angled back along the shaft.
        let (dx, dy) = (tx - x, ty - y);
        let len = (dx * dx + dy * dy).sqrt();
        if len > 0.0 {
            let (ux, uy) = (dx / len, dy / len);
            ctx.move_to(tx, ty);
            ctx.line_to(tx - head * (ux + 0.5 * uy), ty - head * (uy - 0.5 * ux));
            ctx.move_to(tx, ty);
            ctx.line_to(tx - head * (ux - 0.5 * uy), ty - head * (uy + 0.5 * ux));
        }
        ctx.stroke()?;
        self.sub
            .paint_at(ctx, style, xform, holder, idx, x, y, dsn)
    }
}

/// Data-driven stamp: shape, size, fill, color theme and an optional
/// vertical error bar can each vary per point, read from columns chosen
/// at construction time.
pub struct MultiStamp {
    pub base_shape: StampShape,
    pub base_size: f64,
    pub vary_color: bool,
    pub vary_shape: bool,
    pub vary_fill: bool,
    pub vary_size: bool,
    pub y_errors: bool,
    slots: ColumnSlots,
}

const MULTI_SHAPES: [StampShape; 7] = [
    StampShape::Circle,
    StampShape::UpTriangle,
    StampShape::DownTriangle,
    StampShape::Diamond,
    StampShape::Square,
    StampShape::X,
    StampShape::Plus,
];

impl MultiStamp {
    pub fn new(base_shape: StampShape) -> Self {
        Self {
            base_shape,
            base_size: 1.0,
            vary_color: false,
            vary_shape: false,
            vary_fill: false,
            vary_size: false,
            y_errors: false,
            slots: ColumnSlots::default(),
        }
    }
}

impl Stamp for MultiStamp {
    fn register_columns(&mut self, holder: &mut DataHolder) {
        let ints = [self.vary_color, self.vary_shape, self.vary_fill]
            .iter()
            .filter(|&&b| b)
            .count();
        let req = ColumnRequest {
            ints,
            floats: usize::from(self.vary_size),
            ys: if self.y_errors { 2 } else { 0 },
            ..ColumnRequest::default()
        };
        self.slots = holder.register(&req);
    }

    fn paint_at(
        &self,
        ctx: &mut dyn DrawContext,
        style: &Theme,
        xform: &Transformer,
        holder: &DataHolder,
        idx: usize,
        x: f64,
        y: f64,
        dsn: usize,
    ) -> Result<()> {
        let mut int_cursor = self.slots.int_start;
        let mut next_int = |holder: &DataHolder| {
            let v = holder.int_col(int_cursor)[idx];
            int_cursor += 1;
            v
        };

        let theme_idx = if self.vary_color {
            next_int(holder) as usize
        } else {
            dsn
        };
        let shape = if self.vary_shape {
            MULTI_SHAPES[next_int(holder) as usize % MULTI_SHAPES.len()]
        } else {
            self.base_shape
        };
        let fill = if self.vary_fill {
            next_int(holder) != 0
        } else {
            true
        };
        let size = if self.vary_size {
            holder.float_col(self.slots.float_start)[idx]
        } else {
            self.base_size
        };

        style.apply_data_stamp(ctx, theme_idx);
        if self.y_errors {
            let lo = xform.map_y(holder.y_col(self.slots.y_start)[idx]);
            let hi = xform.map_y(holder.y_col(self.slots.y_start + 1)[idx]);
            ctx.move_to(x, lo);
            ctx.line_to(x, hi);
            ctx.stroke()?;
        }
        ctx.save();
        ctx.translate(x, y);
        let result = draw_symbol(ctx, shape, size * style.small_scale, fill);
        ctx.restore();
        result
    }
}
