//! Legend entries: a line swatch, a centered stamp symbol, and a label,
//! all keyed to the owning painter's primary style number.

use crate::backend::DrawContext;
use crate::errors::Result;
use crate::painter::{Extents, Painter, PainterCore};
use crate::stamps::draw_symbol;
use crate::theme::{StyleToken, Theme};

pub struct KeyPainter {
    core: PainterCore,
    pub text: String,
    pub dsn: usize,
    pub show_line: bool,
    pub show_stamp: bool,
}

impl KeyPainter {
    pub fn new(text: impl Into<String>, dsn: usize) -> Self {
        Self {
            core: PainterCore::new(StyleToken::Foreground),
            text: text.into(),
            dsn,
            show_line: true,
            show_stamp: false,
        }
    }

    fn swatch_width(&self, style: &Theme) -> f64 {
        2.0 * style.large_scale
    }
}

impl Painter for KeyPainter {
    fn core(&self) -> &PainterCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PainterCore {
        &mut self.core
    }

    fn get_minimum_size(&mut self, ctx: &mut dyn DrawContext, style: &Theme) -> Result<Extents> {
        let te = ctx.text_extents(&self.text)?;
        let width = self.swatch_width(style) + style.small_scale + te.width;
        let height = te.height.max(2.0 * style.small_scale);
        Ok(Extents::sized(width, height))
    }

    fn do_paint(&mut self, ctx: &mut dyn DrawContext, style: &Theme) -> Result<()> {
        let sw = self.swatch_width(style);
        let mid = self.core.height() / 2.0;
        if self.show_line {
            style.apply_data_line(ctx, self.dsn);
            ctx.move_to(0.0, mid);
            ctx.line_to(sw, mid);
            ctx.stroke()?;
        }
        if self.show_stamp {
            style.apply_data_stamp(ctx, self.dsn);
            ctx.save();
            ctx.translate(sw / 2.0, mid);
            let shape = style.symbol_for(self.dsn);
            let r = draw_symbol(ctx, shape, style.small_scale, true);
            ctx.restore();
            r?;
        }
        style.apply(ctx, StyleToken::Foreground);
        let te = ctx.text_extents(&self.text)?;
        let x = sw + style.small_scale;
        let y = (self.core.height() - te.height) / 2.0;
        ctx.move_to(x - te.x_bearing, y - te.y_bearing);
        ctx.show_text(&self.text)?;
        Ok(())
    }
}
