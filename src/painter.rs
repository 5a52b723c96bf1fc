//! Scene-graph node protocol: measure, place, paint.
//!
//! Layout is two-pass. A parent first asks each child for its minimum
//! size (a width/height plus four outside borders the child may draw
//! into), then translates the context to the child's origin and calls
//! `configure_painting`, which records the context matrix and the
//! allocation. `paint` reinstalls the recorded matrix inside a
//! save/restore pair, so every painter leaves the context exactly as it
//! found it.

use glam::DAffine2;

use crate::backend::DrawContext;
use crate::errors::{PlotError, Result};
use crate::theme::{StyleToken, Theme};

/// Width/height plus the four outside borders, in device units. Returned
/// by the measure pass and handed back as the allocation in the place
/// pass.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Extents {
    pub width: f64,
    pub height: f64,
    pub border_top: f64,
    pub border_right: f64,
    pub border_bottom: f64,
    pub border_left: f64,
}

impl Extents {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Borderless extents (the v1 two-tuple protocol).
    pub fn sized(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn total_width(&self) -> f64 {
        self.width + self.border_left + self.border_right
    }

    pub fn total_height(&self) -> f64 {
        self.height + self.border_top + self.border_bottom
    }

    /// Component-wise maximum, used by overlays and grids.
    pub fn max_with(&self, other: &Extents) -> Extents {
        Extents {
            width: self.width.max(other.width),
            height: self.height.max(other.height),
            border_top: self.border_top.max(other.border_top),
            border_right: self.border_right.max(other.border_right),
            border_bottom: self.border_bottom.max(other.border_bottom),
            border_left: self.border_left.max(other.border_left),
        }
    }

    /// Fold the borders into the size, leaving zero borders.
    pub fn flattened(&self) -> Extents {
        Extents::sized(self.total_width(), self.total_height())
    }
}

/// State every painter carries: the saved transform, the allocation, and
/// the main style token applied before `do_paint`.
#[derive(Clone, Debug)]
pub struct PainterCore {
    matrix: Option<DAffine2>,
    alloc: Extents,
    main_style: StyleToken,
    attached: bool,
}

impl PainterCore {
    pub fn new(main_style: StyleToken) -> Self {
        Self {
            matrix: None,
            alloc: Extents::zero(),
            main_style,
            attached: false,
        }
    }

    pub fn main_style(&self) -> StyleToken {
        self.main_style
    }

    pub fn set_main_style(&mut self, token: StyleToken) {
        self.main_style = token;
    }

    pub fn alloc(&self) -> Extents {
        self.alloc
    }

    pub fn width(&self) -> f64 {
        self.alloc.width
    }

    pub fn height(&self) -> f64 {
        self.alloc.height
    }

    pub fn matrix(&self) -> Option<DAffine2> {
        self.matrix
    }

    /// Called by a container adopting this painter, or by the render
    /// driver on the root. Idempotent.
    pub fn attach(&mut self) {
        self.attached = true;
    }

    /// Called when a container releases this painter.
    pub fn detach(&mut self) {
        self.attached = false;
        self.matrix = None;
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Record the context transform and the allocation. Re-placeable any
    /// number of times before paint.
    pub fn accept(&mut self, ctx: &dyn DrawContext, alloc: Extents) -> Result<()> {
        if !self.attached {
            return Err(PlotError::layout(
                "configure_painting on a painter with no parent",
            ));
        }
        self.matrix = Some(ctx.get_matrix());
        self.alloc = alloc;
        Ok(())
    }
}

pub trait Painter {
    fn core(&self) -> &PainterCore;
    fn core_mut(&mut self) -> &mut PainterCore;

    /// Pure with respect to layout; may consult the context only to
    /// measure text extents.
    fn get_minimum_size(&mut self, ctx: &mut dyn DrawContext, style: &Theme) -> Result<Extents>;

    /// Record the transform and allocation, then place children. The
    /// context is positioned at this painter's origin when called.
    fn configure_painting(
        &mut self,
        ctx: &mut dyn DrawContext,
        style: &Theme,
        alloc: Extents,
    ) -> Result<()> {
        self.core_mut().accept(ctx, alloc)?;
        self.configure_children(ctx, style)
    }

    /// Hook for containers; leaf painters keep the default.
    fn configure_children(&mut self, _ctx: &mut dyn DrawContext, _style: &Theme) -> Result<()> {
        Ok(())
    }

    fn paint(&mut self, ctx: &mut dyn DrawContext, style: &Theme) -> Result<()> {
        let matrix = self
            .core()
            .matrix()
            .ok_or_else(|| PlotError::layout("paint before configure_painting"))?;
        let token = self.core().main_style();
        ctx.save();
        ctx.set_matrix(matrix);
        style.apply(ctx, token);
        let result = self.do_paint(ctx, style);
        ctx.restore();
        result
    }

    fn do_paint(&mut self, ctx: &mut dyn DrawContext, style: &Theme) -> Result<()>;
}

/// Adopt a child into a container and hand it back.
pub fn adopt(mut child: Box<dyn Painter>) -> Box<dyn Painter> {
    child.core_mut().attach();
    child
}

/// Release a child from its container before returning it to the caller.
pub fn release(mut child: Box<dyn Painter>) -> Box<dyn Painter> {
    child.core_mut().detach();
    child
}

/// Place a child at `(dx, dy)` relative to the current origin. Wraps the
/// translate in a save/restore so the caller's matrix is untouched.
pub fn configure_child_at(
    child: &mut dyn Painter,
    ctx: &mut dyn DrawContext,
    style: &Theme,
    dx: f64,
    dy: f64,
    alloc: Extents,
) -> Result<()> {
    ctx.save();
    ctx.translate(dx, dy);
    let result = child.configure_painting(ctx, style, alloc);
    ctx.restore();
    result
}
