//! Positions a child painter at a fractional alignment inside the plot
//! field. Used for legends and annotations.

use crate::backend::DrawContext;
use crate::errors::Result;
use crate::painter::{adopt, configure_child_at, Extents, Painter, PainterCore};
use crate::plot_types::FieldPainter;
use crate::theme::{StyleToken, Theme};
use crate::transform::FieldRef;

pub struct AbsoluteFieldOverlay {
    core: PainterCore,
    field: Option<FieldRef>,
    child: Box<dyn Painter>,
    /// 0 = left edge, 1 = right edge.
    pub h_align: f64,
    /// 0 = top edge, 1 = bottom edge.
    pub v_align: f64,
    /// Multiplier on the style's `small_scale`.
    pub padding: f64,
}

impl AbsoluteFieldOverlay {
    pub fn new(child: Box<dyn Painter>, h_align: f64, v_align: f64) -> Self {
        Self {
            core: PainterCore::new(StyleToken::Foreground),
            field: None,
            child: adopt(child),
            h_align,
            v_align,
            padding: 1.0,
        }
    }
}

impl Painter for AbsoluteFieldOverlay {
    fn core(&self) -> &PainterCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PainterCore {
        &mut self.core
    }

    fn get_minimum_size(&mut self, _ctx: &mut dyn DrawContext, _style: &Theme) -> Result<Extents> {
        Ok(Extents::zero())
    }

    fn configure_children(&mut self, ctx: &mut dyn DrawContext, style: &Theme) -> Result<()> {
        let min = self.child.get_minimum_size(ctx, style)?;
        let pad = self.padding * style.small_scale;
        let alloc = self.core.alloc();
        let free_w = (alloc.width - min.width - 2.0 * pad).max(0.0);
        let free_h = (alloc.height - min.height - 2.0 * pad).max(0.0);
        let dx = pad + self.h_align * free_w;
        let dy = pad + self.v_align * free_h;
        configure_child_at(
            self.child.as_mut(),
            ctx,
            style,
            dx,
            dy,
            Extents::sized(min.width, min.height),
        )
    }

    fn do_paint(&mut self, ctx: &mut dyn DrawContext, style: &Theme) -> Result<()> {
        self.child.paint(ctx, style)
    }
}

impl FieldPainter for AbsoluteFieldOverlay {
    fn set_field(&mut self, field: FieldRef) {
        self.field = Some(field);
    }

    fn field(&self) -> Option<&FieldRef> {
        self.field.as_ref()
    }
}
