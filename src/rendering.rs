//! Top-level render driver: measure, place, paint.
//!
//! A pass that fails with context-too-small is caught here: the frame is
//! blanked, the failure is logged, and the host process keeps going.
//! Wiring and domain errors propagate; they are programming bugs.

use crate::backend::DrawContext;
use crate::errors::{PlotError, Result};
use crate::painter::{Extents, Painter};
use crate::theme::{StyleToken, Theme};

/// Render one painter tree into a `width` x `height` context.
pub fn render(
    root: &mut dyn Painter,
    ctx: &mut dyn DrawContext,
    style: &Theme,
    width: f64,
    height: f64,
) -> Result<()> {
    // The driver acts as the root's parent.
    root.core_mut().attach();
    match render_pass(root, ctx, style, width, height) {
        Err(err) if err.is_too_small() => {
            tracing::error!(%err, "render aborted; blanking frame");
            blank_frame(ctx, style, width, height)
        }
        other => other,
    }
}

fn render_pass(
    root: &mut dyn Painter,
    ctx: &mut dyn DrawContext,
    style: &Theme,
    width: f64,
    height: f64,
) -> Result<()> {
    let min = root.get_minimum_size(ctx, style)?;
    if min.total_width() > width + 1e-9 || min.total_height() > height + 1e-9 {
        return Err(PlotError::ContextTooSmall {
            need_w: min.total_width(),
            need_h: min.total_height(),
            have_w: width,
            have_h: height,
        });
    }

    blank_frame(ctx, style, width, height)?;

    // Borders stay at their measured minima; all remaining space goes to
    // the interior.
    let alloc = Extents {
        width: width - min.border_left - min.border_right,
        height: height - min.border_top - min.border_bottom,
        ..min
    };
    ctx.save();
    ctx.translate(min.border_left, min.border_top);
    let placed = root.configure_painting(ctx, style, alloc);
    ctx.restore();
    placed?;

    root.paint(ctx, style)
}

/// Fill the whole frame with the background.
pub fn blank_frame(
    ctx: &mut dyn DrawContext,
    style: &Theme,
    width: f64,
    height: f64,
) -> Result<()> {
    ctx.save();
    style.apply(ctx, StyleToken::BgFill);
    ctx.rectangle(0.0, 0.0, width, height);
    let filled = ctx.fill();
    ctx.restore();
    filled?;
    Ok(())
}
