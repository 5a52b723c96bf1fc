//! Layout primitives: the null sentinel, text labels, overlays, uniform
//! grids, rotation wrappers and weighted boxes.

use crate::backend::DrawContext;
use crate::errors::{PlotError, Result};
use crate::painter::{adopt, configure_child_at, release, Extents, Painter, PainterCore};
use crate::theme::{StyleToken, Theme};

/// Zero-size placeholder. Paints an X across its allocation so an empty
/// slot is visible in output.
pub struct NullPainter {
    core: PainterCore,
}

impl NullPainter {
    pub fn new() -> Self {
        Self {
            core: PainterCore::new(StyleToken::Muted),
        }
    }

    pub fn boxed() -> Box<dyn Painter> {
        Box::new(Self::new())
    }
}

impl Default for NullPainter {
    fn default() -> Self {
        Self::new()
    }
}

impl Painter for NullPainter {
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
        let (w, h) = (self.core.width(), self.core.height());
        if w * h <= 0.0 {
            return Ok(());
        }
        ctx.move_to(0.0, 0.0);
        ctx.line_to(w, h);
        ctx.move_to(w, 0.0);
        ctx.line_to(0.0, h);
        ctx.stroke()?;
        Ok(())
    }
}

/// Single-line text label, measured through the context.
pub struct TextPainter {
    core: PainterCore,
    pub text: String,
}

impl TextPainter {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            core: PainterCore::new(StyleToken::Foreground),
            text: text.into(),
        }
    }

    pub fn boxed(text: impl Into<String>) -> Box<dyn Painter> {
        Box::new(Self::new(text))
    }
}

impl Painter for TextPainter {
    fn core(&self) -> &PainterCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PainterCore {
        &mut self.core
    }

    fn get_minimum_size(&mut self, ctx: &mut dyn DrawContext, _style: &Theme) -> Result<Extents> {
        let te = ctx.text_extents(&self.text)?;
        Ok(Extents::sized(te.width, te.height))
    }

    fn do_paint(&mut self, ctx: &mut dyn DrawContext, _style: &Theme) -> Result<()> {
        let te = ctx.text_extents(&self.text)?;
        ctx.move_to(-te.x_bearing, -te.y_bearing);
        ctx.show_text(&self.text)?;
        Ok(())
    }
}

/// Stacks children at the same rectangle, optionally filling the
/// background, with a uniform border inside the allocation.
pub struct Overlay {
    core: PainterCore,
    children: Vec<Box<dyn Painter>>,
    pub bg_fill: bool,
    pub border: f64,
}

impl Overlay {
    pub fn new() -> Self {
        Self {
            core: PainterCore::new(StyleToken::BgFill),
            children: Vec::new(),
            bg_fill: false,
            border: 0.0,
        }
    }

    pub fn add_child(&mut self, child: Box<dyn Painter>) {
        self.children.push(adopt(child));
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl Default for Overlay {
    fn default() -> Self {
        Self::new()
    }
}

impl Painter for Overlay {
    fn core(&self) -> &PainterCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PainterCore {
        &mut self.core
    }

    fn get_minimum_size(&mut self, ctx: &mut dyn DrawContext, style: &Theme) -> Result<Extents> {
        let mut min = Extents::zero();
        for child in &mut self.children {
            min = min.max_with(&child.get_minimum_size(ctx, style)?);
        }
        min.width += 2.0 * self.border;
        min.height += 2.0 * self.border;
        Ok(min)
    }

    fn configure_children(&mut self, ctx: &mut dyn DrawContext, style: &Theme) -> Result<()> {
        let alloc = self.core.alloc();
        let inner = Extents {
            width: alloc.width - 2.0 * self.border,
            height: alloc.height - 2.0 * self.border,
            ..alloc
        };
        for child in &mut self.children {
            configure_child_at(child.as_mut(), ctx, style, self.border, self.border, inner)?;
        }
        Ok(())
    }

    fn do_paint(&mut self, ctx: &mut dyn DrawContext, style: &Theme) -> Result<()> {
        if self.bg_fill {
            style.apply(ctx, StyleToken::BgFill);
            ctx.rectangle(0.0, 0.0, self.core.width(), self.core.height());
            ctx.fill()?;
        }
        for child in &mut self.children {
            child.paint(ctx, style)?;
        }
        Ok(())
    }
}

/// Uniform cell grid. Every cell holds a painter; removed children are
/// replaced with [`NullPainter`] so the grid stays fully populated.
pub struct Grid {
    core: PainterCore,
    nw: usize,
    nh: usize,
    cells: Vec<Box<dyn Painter>>,
    pub hpad: f64,
    pub vpad: f64,
    pub border: f64,
    cell_min: Extents,
}

impl Grid {
    pub fn new(nw: usize, nh: usize) -> Result<Self> {
        if nw == 0 || nh == 0 {
            return Err(PlotError::domain("grid dimensions must be nonzero"));
        }
        let cells = (0..nw * nh)
            .map(|_| adopt(NullPainter::boxed()))
            .collect();
        Ok(Self {
            core: PainterCore::new(StyleToken::Foreground),
            nw,
            nh,
            cells,
            hpad: 2.0,
            vpad: 2.0,
            border: 1.0,
            cell_min: Extents::zero(),
        })
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.nw, self.nh)
    }

    fn index(&self, ix: usize, iy: usize) -> Result<usize> {
        if ix >= self.nw || iy >= self.nh {
            return Err(PlotError::domain(format!(
                "cell ({ix}, {iy}) outside {}x{} grid",
                self.nw, self.nh
            )));
        }
        Ok(iy * self.nw + ix)
    }

    /// Replace the painter at a cell; the previous occupant is released
    /// and dropped.
    pub fn set_cell(&mut self, ix: usize, iy: usize, painter: Box<dyn Painter>) -> Result<()> {
        let idx = self.index(ix, iy)?;
        let old = std::mem::replace(&mut self.cells[idx], adopt(painter));
        drop(release(old));
        Ok(())
    }

    /// Remove a child, leaving a null painter in its place.
    pub fn take_cell(&mut self, ix: usize, iy: usize) -> Result<Box<dyn Painter>> {
        let idx = self.index(ix, iy)?;
        let old = std::mem::replace(&mut self.cells[idx], adopt(NullPainter::boxed()));
        Ok(release(old))
    }

    pub fn cell(&self, ix: usize, iy: usize) -> Result<&dyn Painter> {
        Ok(self.cells[self.index(ix, iy)?].as_ref())
    }

    pub fn cell_mut(&mut self, ix: usize, iy: usize) -> Result<&mut (dyn Painter + 'static)> {
        let idx = self.index(ix, iy)?;
        Ok(self.cells[idx].as_mut())
    }
}

impl Painter for Grid {
    fn core(&self) -> &PainterCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PainterCore {
        &mut self.core
    }

    fn get_minimum_size(&mut self, ctx: &mut dyn DrawContext, style: &Theme) -> Result<Extents> {
        let mut cell_min = Extents::zero();
        for cell in &mut self.cells {
            cell_min = cell_min.max_with(&cell.get_minimum_size(ctx, style)?);
        }
        self.cell_min = cell_min;
        let width = self.nw as f64 * cell_min.total_width()
            + (self.nw - 1) as f64 * self.hpad
            + 2.0 * self.border;
        let height = self.nh as f64 * cell_min.total_height()
            + (self.nh - 1) as f64 * self.vpad
            + 2.0 * self.border;
        Ok(Extents::sized(width, height))
    }

    fn configure_children(&mut self, ctx: &mut dyn DrawContext, style: &Theme) -> Result<()> {
        let alloc = self.core.alloc();
        let cw = (alloc.width - 2.0 * self.border - (self.nw - 1) as f64 * self.hpad)
            / self.nw as f64;
        let ch = (alloc.height - 2.0 * self.border - (self.nh - 1) as f64 * self.vpad)
            / self.nh as f64;
        let min = self.cell_min;
        if cw < min.total_width() - 1e-9 || ch < min.total_height() - 1e-9 {
            return Err(PlotError::ContextTooSmall {
                need_w: min.total_width(),
                need_h: min.total_height(),
                have_w: cw,
                have_h: ch,
            });
        }
        // All cells receive the same allocation, with borders equalized
        // to the measured maxima.
        let cell_alloc = Extents {
            width: cw - min.border_left - min.border_right,
            height: ch - min.border_top - min.border_bottom,
            ..min
        };
        for iy in 0..self.nh {
            for ix in 0..self.nw {
                let dx = self.border + ix as f64 * (cw + self.hpad) + min.border_left;
                let dy = self.border + iy as f64 * (ch + self.vpad) + min.border_top;
                let cell = self.cells[iy * self.nw + ix].as_mut();
                configure_child_at(cell, ctx, style, dx, dy, cell_alloc)?;
            }
        }
        Ok(())
    }

    fn do_paint(&mut self, ctx: &mut dyn DrawContext, style: &Theme) -> Result<()> {
        for cell in &mut self.cells {
            cell.paint(ctx, style)?;
        }
        Ok(())
    }
}

/// Quarter-turn rotations a [`RightRotationPainter`] supports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rotation {
    None,
    /// 90 degrees clockwise in device space.
    Clockwise90,
    /// 90 degrees counter-clockwise in device space.
    CounterClockwise90,
    HalfTurn,
}

/// Wraps a child and rotates it by a multiple of 90 degrees. The minimum
/// size tuple is relabeled so the child's own sense of
/// top/right/bottom/left is preserved.
pub struct RightRotationPainter {
    core: PainterCore,
    child: Box<dyn Painter>,
    pub rotation: Rotation,
}

impl RightRotationPainter {
    pub fn new(rotation: Rotation, child: Box<dyn Painter>) -> Self {
        Self {
            core: PainterCore::new(StyleToken::Foreground),
            child: adopt(child),
            rotation,
        }
    }

    pub fn child(&self) -> &dyn Painter {
        self.child.as_ref()
    }

    fn rotate_min(&self, m: Extents) -> Extents {
        match self.rotation {
            Rotation::None => m,
            Rotation::CounterClockwise90 => Extents {
                width: m.height,
                height: m.width,
                border_top: m.border_right,
                border_right: m.border_bottom,
                border_bottom: m.border_left,
                border_left: m.border_top,
            },
            Rotation::Clockwise90 => Extents {
                width: m.height,
                height: m.width,
                border_top: m.border_left,
                border_right: m.border_top,
                border_bottom: m.border_right,
                border_left: m.border_bottom,
            },
            Rotation::HalfTurn => Extents {
                width: m.width,
                height: m.height,
                border_top: m.border_bottom,
                border_right: m.border_left,
                border_bottom: m.border_top,
                border_left: m.border_right,
            },
        }
    }

    /// Inverse relabeling: screen borders back into the child's frame.
    fn child_alloc(&self, alloc: Extents) -> Extents {
        match self.rotation {
            Rotation::None => alloc,
            Rotation::CounterClockwise90 => Extents {
                width: alloc.height,
                height: alloc.width,
                border_top: alloc.border_left,
                border_right: alloc.border_top,
                border_bottom: alloc.border_right,
                border_left: alloc.border_bottom,
            },
            Rotation::Clockwise90 => Extents {
                width: alloc.height,
                height: alloc.width,
                border_top: alloc.border_right,
                border_right: alloc.border_bottom,
                border_bottom: alloc.border_left,
                border_left: alloc.border_top,
            },
            Rotation::HalfTurn => Extents {
                width: alloc.width,
                height: alloc.height,
                border_top: alloc.border_bottom,
                border_right: alloc.border_left,
                border_bottom: alloc.border_top,
                border_left: alloc.border_right,
            },
        }
    }
}

impl Painter for RightRotationPainter {
    fn core(&self) -> &PainterCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PainterCore {
        &mut self.core
    }

    fn get_minimum_size(&mut self, ctx: &mut dyn DrawContext, style: &Theme) -> Result<Extents> {
        let m = self.child.get_minimum_size(ctx, style)?;
        Ok(self.rotate_min(m))
    }

    fn configure_children(&mut self, ctx: &mut dyn DrawContext, style: &Theme) -> Result<()> {
        let alloc = self.core.alloc();
        let child_alloc = self.child_alloc(alloc);
        ctx.save();
        match self.rotation {
            Rotation::None => {}
            Rotation::CounterClockwise90 => {
                ctx.translate(0.0, alloc.height);
                ctx.rotate(-std::f64::consts::FRAC_PI_2);
            }
            Rotation::Clockwise90 => {
                ctx.translate(alloc.width, 0.0);
                ctx.rotate(std::f64::consts::FRAC_PI_2);
            }
            Rotation::HalfTurn => {
                ctx.translate(alloc.width, alloc.height);
                ctx.rotate(std::f64::consts::PI);
            }
        }
        let result = self.child.configure_painting(ctx, style, child_alloc);
        ctx.restore();
        result
    }

    fn do_paint(&mut self, ctx: &mut dyn DrawContext, style: &Theme) -> Result<()> {
        self.child.paint(ctx, style)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BoxAxis {
    Horizontal,
    Vertical,
}

struct BoxChild {
    painter: Box<dyn Painter>,
    weight: f64,
    min: Extents,
}

/// Arranges children along one axis with per-child weights. Weight-0
/// children sit at their minimum size; remaining space is divided among
/// the others in proportion to weight. End borders along the major axis
/// merge with the box's outside border; minor-axis borders are equalized
/// across all children so stacked plots share their margins.
pub struct LinearBox {
    core: PainterCore,
    axis: BoxAxis,
    children: Vec<BoxChild>,
    pub pad: f64,
}

pub struct HBox;
pub struct VBox;

impl HBox {
    pub fn new() -> LinearBox {
        LinearBox::new(BoxAxis::Horizontal)
    }
}

impl VBox {
    pub fn new() -> LinearBox {
        LinearBox::new(BoxAxis::Vertical)
    }
}

impl LinearBox {
    fn new(axis: BoxAxis) -> Self {
        Self {
            core: PainterCore::new(StyleToken::Foreground),
            axis,
            children: Vec::new(),
            pad: 2.0,
        }
    }

    pub fn add_child(&mut self, painter: Box<dyn Painter>, weight: f64) {
        self.children.push(BoxChild {
            painter: adopt(painter),
            weight,
            min: Extents::zero(),
        });
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

}

/// Measured child size along the major axis, and its leading/trailing
/// major-axis borders.
fn major_of(axis: BoxAxis, m: &Extents) -> (f64, f64, f64) {
    match axis {
        BoxAxis::Horizontal => (m.width, m.border_left, m.border_right),
        BoxAxis::Vertical => (m.height, m.border_top, m.border_bottom),
    }
}

impl Painter for LinearBox {
    fn core(&self) -> &PainterCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PainterCore {
        &mut self.core
    }

    fn get_minimum_size(&mut self, ctx: &mut dyn DrawContext, style: &Theme) -> Result<Extents> {
        if self.children.is_empty() {
            return Ok(Extents::zero());
        }
        for child in &mut self.children {
            child.min = child.painter.get_minimum_size(ctx, style)?;
        }
        let n = self.children.len();
        let mut major_size = (n - 1) as f64 * self.pad;
        let mut minor_size: f64 = 0.0;
        let mut minor_lead: f64 = 0.0;
        let mut minor_trail: f64 = 0.0;
        for (i, child) in self.children.iter().enumerate() {
            let (sz, lead, trail) = major_of(self.axis, &child.min);
            major_size += sz;
            // Interior major borders widen the gaps; end borders merge
            // into the box's outside border.
            if i > 0 {
                major_size += lead;
            }
            if i < n - 1 {
                major_size += trail;
            }
            let (msz, mlead, mtrail) = match self.axis {
                BoxAxis::Horizontal => {
                    (child.min.height, child.min.border_top, child.min.border_bottom)
                }
                BoxAxis::Vertical => {
                    (child.min.width, child.min.border_left, child.min.border_right)
                }
            };
            minor_size = minor_size.max(msz);
            minor_lead = minor_lead.max(mlead);
            minor_trail = minor_trail.max(mtrail);
        }
        let (_, first_lead, _) = major_of(self.axis, &self.children[0].min);
        let (_, _, last_trail) = major_of(self.axis, &self.children[n - 1].min);
        Ok(match self.axis {
            BoxAxis::Horizontal => Extents {
                width: major_size,
                height: minor_size,
                border_top: minor_lead,
                border_right: last_trail,
                border_bottom: minor_trail,
                border_left: first_lead,
            },
            BoxAxis::Vertical => Extents {
                width: minor_size,
                height: major_size,
                border_top: first_lead,
                border_right: minor_trail,
                border_bottom: last_trail,
                border_left: minor_lead,
            },
        })
    }

    fn configure_children(&mut self, ctx: &mut dyn DrawContext, style: &Theme) -> Result<()> {
        if self.children.is_empty() {
            return Ok(());
        }
        let alloc = self.core.alloc();
        let n = self.children.len();
        let major_avail = match self.axis {
            BoxAxis::Horizontal => alloc.width,
            BoxAxis::Vertical => alloc.height,
        };
        let mut fixed = (n - 1) as f64 * self.pad;
        let mut total_weight = 0.0;
        for (i, child) in self.children.iter().enumerate() {
            let (sz, lead, trail) = major_of(self.axis, &child.min);
            fixed += sz;
            if i > 0 {
                fixed += lead;
            }
            if i < n - 1 {
                fixed += trail;
            }
            total_weight += child.weight;
        }
        let extra = major_avail - fixed;
        if extra < -1e-9 {
            return Err(PlotError::ContextTooSmall {
                need_w: fixed,
                need_h: fixed,
                have_w: major_avail,
                have_h: major_avail,
            });
        }

        // Minor-axis borders are equalized across children.
        let (minor_avail, minor_lead, minor_trail) = match self.axis {
            BoxAxis::Horizontal => (alloc.height, alloc.border_top, alloc.border_bottom),
            BoxAxis::Vertical => (alloc.width, alloc.border_left, alloc.border_right),
        };

        let mut cursor = 0.0;
        for (i, child) in self.children.iter_mut().enumerate() {
            let (sz, lead, trail) = major_of(self.axis, &child.min);
            let grow = if total_weight > 0.0 {
                extra * child.weight / total_weight
            } else {
                0.0
            };
            let major_here = sz + grow;
            let lead_border = if i == 0 {
                match self.axis {
                    BoxAxis::Horizontal => alloc.border_left,
                    BoxAxis::Vertical => alloc.border_top,
                }
            } else {
                lead
            };
            let trail_border = if i == n - 1 {
                match self.axis {
                    BoxAxis::Horizontal => alloc.border_right,
                    BoxAxis::Vertical => alloc.border_bottom,
                }
            } else {
                trail
            };
            if i > 0 {
                cursor += lead;
            }
            let (child_alloc, dx, dy) = match self.axis {
                BoxAxis::Horizontal => (
                    Extents {
                        width: major_here,
                        height: minor_avail,
                        border_top: minor_lead,
                        border_right: trail_border,
                        border_bottom: minor_trail,
                        border_left: lead_border,
                    },
                    cursor,
                    0.0,
                ),
                BoxAxis::Vertical => (
                    Extents {
                        width: minor_avail,
                        height: major_here,
                        border_top: lead_border,
                        border_right: minor_trail,
                        border_bottom: trail_border,
                        border_left: minor_lead,
                    },
                    0.0,
                    cursor,
                ),
            };
            configure_child_at(child.painter.as_mut(), ctx, style, dx, dy, child_alloc)?;
            cursor += major_here;
            if i < n - 1 {
                cursor += trail + self.pad;
            }
        }
        Ok(())
    }

    fn do_paint(&mut self, ctx: &mut dyn DrawContext, style: &Theme) -> Result<()> {
        for child in &mut self.children {
            child.painter.paint(ctx, style)?;
        }
        Ok(())
    }
}
