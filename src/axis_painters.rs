//! Axis painters: tick generation, tick marks and tick labels for each
//! plot side.
//!
//! Painters are side-agnostic. An [`AxisPaintHelper`] carries which side
//! of the field is being painted and owns the primitives that turn
//! "paint a tick into the plot" or "how much room does this label need"
//! into concrete coordinates, so no painter branches on the side itself.

use std::cell::RefCell;
use std::rc::Rc;

use crate::axes::{AngularIncrement, Axis};
use crate::backend::DrawContext;
use crate::errors::Result;
use crate::theme::{StyleToken, Theme};
use crate::transform::FieldRef;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AxisSide {
    Top,
    Right,
    Bottom,
    Left,
}

impl AxisSide {
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }
}

/// Which of the field's axes a painter reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WhichAxis {
    X,
    Y,
}

impl AxisSide {
    pub fn which_axis(&self) -> WhichAxis {
        if self.is_horizontal() {
            WhichAxis::X
        } else {
            WhichAxis::Y
        }
    }
}

/// Side-aware geometry for one paint of one axis. The context origin is
/// the top-left corner of the plot field.
#[derive(Clone, Copy, Debug)]
pub struct AxisPaintHelper {
    pub side: AxisSide,
    pub width: f64,
    pub height: f64,
}

impl AxisPaintHelper {
    /// Point on the baseline at `frac` of the way along the axis
    /// (frac 0 at the axis minimum).
    pub fn axis_pos(&self, frac: f64) -> (f64, f64) {
        match self.side {
            AxisSide::Bottom => (frac * self.width, self.height),
            AxisSide::Top => (frac * self.width, 0.0),
            AxisSide::Left => (0.0, (1.0 - frac) * self.height),
            AxisSide::Right => (self.width, (1.0 - frac) * self.height),
        }
    }

    /// Unit vector pointing from the baseline into the plot field.
    pub fn inward(&self) -> (f64, f64) {
        match self.side {
            AxisSide::Bottom => (0.0, -1.0),
            AxisSide::Top => (0.0, 1.0),
            AxisSide::Left => (1.0, 0.0),
            AxisSide::Right => (-1.0, 0.0),
        }
    }

    pub fn paint_baseline(&self, ctx: &mut dyn DrawContext) -> Result<()> {
        let (x0, y0) = self.axis_pos(0.0);
        let (x1, y1) = self.axis_pos(1.0);
        ctx.move_to(x0, y0);
        ctx.line_to(x1, y1);
        ctx.stroke()?;
        Ok(())
    }

    /// Tick from the baseline into the field.
    pub fn paint_tick_in(&self, ctx: &mut dyn DrawContext, frac: f64, len: f64) -> Result<()> {
        let (x, y) = self.axis_pos(frac);
        let (ix, iy) = self.inward();
        ctx.move_to(x, y);
        ctx.line_to(x + ix * len, y + iy * len);
        ctx.stroke()?;
        Ok(())
    }

    /// Tick away from the field: the inward primitive with the length
    /// negated.
    pub fn paint_tick_out(&self, ctx: &mut dyn DrawContext, frac: f64, len: f64) -> Result<()> {
        self.paint_tick_in(ctx, frac, -len)
    }

    /// Room a `w` x `h` label takes when laid out against this side:
    /// (outward from the field, along the side).
    pub fn space_rect_out(&self, w: f64, h: f64) -> (f64, f64) {
        if self.side.is_horizontal() {
            (h, w)
        } else {
            (w, h)
        }
    }

    /// Top-left corner for a `w` x `h` label box sitting `gap` outside
    /// the baseline, centered on `frac`.
    pub fn label_anchor(&self, frac: f64, w: f64, h: f64, gap: f64) -> (f64, f64) {
        match self.side {
            AxisSide::Bottom => (frac * self.width - w / 2.0, self.height + gap),
            AxisSide::Top => (frac * self.width - w / 2.0, -gap - h),
            AxisSide::Left => (-gap - w, (1.0 - frac) * self.height - h / 2.0),
            AxisSide::Right => (self.width + gap, (1.0 - frac) * self.height - h / 2.0),
        }
    }
}

/// Tick label formatting: a default heuristic, a fixed precision, or an
/// arbitrary function.
pub enum LabelFormat {
    Auto,
    Precision(usize),
    Func(Box<dyn Fn(f64) -> String>),
}

impl LabelFormat {
    pub fn format(&self, v: f64) -> String {
        match self {
            Self::Auto => format_number(v),
            Self::Precision(p) => format!("{v:.prec$}", prec = *p),
            Self::Func(f) => f(v),
        }
    }
}

impl Default for LabelFormat {
    fn default() -> Self {
        Self::Auto
    }
}

/// Magnitude-dependent formatting with trailing zeros trimmed.
pub fn format_number(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    let s = if v.abs() >= 1000.0 {
        format!("{v:.0}")
    } else if v.abs() < 0.001 {
        format!("{v:.3e}")
    } else {
        format!("{v:.3}")
    };
    if s.contains('.') && !s.contains('e') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// A tick position: axis fraction, data value, majorness.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tick {
    pub frac: f64,
    pub value: f64,
    pub major: bool,
}

/// One painter per plot side (or shared across opposite sides).
pub trait AxisPainter {
    /// `(outward, along)`: exterior room needed beyond the field edge,
    /// and how far labels extend along the side.
    fn space_exterior(
        &mut self,
        helper: &AxisPaintHelper,
        ctx: &mut dyn DrawContext,
        style: &Theme,
    ) -> Result<(f64, f64)>;

    fn paint(
        &mut self,
        helper: &AxisPaintHelper,
        ctx: &mut dyn DrawContext,
        style: &Theme,
    ) -> Result<()>;

    /// Adjust the associated axis to round bounds. Idempotent.
    fn nudge_bounds(&mut self);
}

pub type AxisPainterRef = Rc<RefCell<dyn AxisPainter>>;

/// Baseline only; used for sides the magic selector leaves unselected.
pub struct BlankAxisPainter;

impl AxisPainter for BlankAxisPainter {
    fn space_exterior(
        &mut self,
        _helper: &AxisPaintHelper,
        _ctx: &mut dyn DrawContext,
        _style: &Theme,
    ) -> Result<(f64, f64)> {
        Ok((0.0, 0.0))
    }

    fn paint(
        &mut self,
        helper: &AxisPaintHelper,
        ctx: &mut dyn DrawContext,
        style: &Theme,
    ) -> Result<()> {
        style.apply(ctx, StyleToken::Foreground);
        helper.paint_baseline(ctx)
    }

    fn nudge_bounds(&mut self) {}
}

/// Linear tick generation.
///
/// `mip` is the magnitude of the span; when the span sits in the bottom
/// ~30% of its decade the magnitude is dropped one step so labels stay
/// dense. Ticks whose magnitude would vanish against the bounds are
/// clamped to exactly zero when the span crosses zero.
pub fn linear_ticks(min: f64, max: f64, minor_ticks: u32) -> Vec<Tick> {
    let span = max - min;
    let mut mip = span.log10().floor();
    if span.log10() - mip < 0.3 {
        mip -= 1.0;
    }
    let inc = 10f64.powf(mip) / minor_ticks as f64;
    let zero_clamp = 1e-6 * min.abs().max(max.abs());
    let crosses_zero = min < 0.0 && max > 0.0;

    let mut out = Vec::new();
    let mut coeff = (min / inc - 1e-9).ceil() as i64;
    loop {
        let mut value = coeff as f64 * inc;
        if value > max + inc * 1e-9 {
            break;
        }
        if crosses_zero && value != 0.0 && value.abs() < zero_clamp {
            value = 0.0;
        }
        out.push(Tick {
            frac: (value - min) / span,
            value,
            major: coeff.rem_euclid(minor_ticks as i64) == 0,
        });
        coeff += 1;
    }
    out
}

/// Shared knobs for the numeric axis painters.
struct TickStyle {
    paint_baseline: bool,
    avoid_bounds_labels: bool,
    label_format: LabelFormat,
}

impl Default for TickStyle {
    fn default() -> Self {
        Self {
            paint_baseline: true,
            avoid_bounds_labels: false,
            label_format: LabelFormat::Auto,
        }
    }
}

fn paint_ticks_and_labels(
    ticks: &[Tick],
    labels: &dyn Fn(&Tick) -> Option<String>,
    cfg: &TickStyle,
    helper: &AxisPaintHelper,
    ctx: &mut dyn DrawContext,
    style: &Theme,
) -> Result<()> {
    style.apply(ctx, StyleToken::Foreground);
    if cfg.paint_baseline {
        helper.paint_baseline(ctx)?;
    }
    let gap = style.small_scale;
    for tick in ticks {
        if tick.frac < -1e-9 || tick.frac > 1.0 + 1e-9 {
            continue;
        }
        let len = if tick.major {
            2.0 * style.small_scale
        } else {
            style.small_scale
        };
        helper.paint_tick_in(ctx, tick.frac, len)?;
        if !tick.major {
            continue;
        }
        if cfg.avoid_bounds_labels && (tick.frac < 1e-6 || tick.frac > 1.0 - 1e-6) {
            continue;
        }
        if let Some(text) = labels(tick) {
            let te = ctx.text_extents(&text)?;
            let (x, y) = helper.label_anchor(tick.frac, te.width, te.height, gap);
            ctx.move_to(x - te.x_bearing, y - te.y_bearing);
            ctx.show_text(&text)?;
        }
    }
    Ok(())
}

fn measure_labels(
    ticks: &[Tick],
    labels: &dyn Fn(&Tick) -> Option<String>,
    helper: &AxisPaintHelper,
    ctx: &mut dyn DrawContext,
    style: &Theme,
) -> Result<(f64, f64)> {
    let mut outward: f64 = 0.0;
    let mut along: f64 = 0.0;
    for tick in ticks {
        if !tick.major {
            continue;
        }
        if let Some(text) = labels(tick) {
            let te = ctx.text_extents(&text)?;
            let (o, a) = helper.space_rect_out(te.width, te.height);
            outward = outward.max(o);
            along = along.max(a);
        }
    }
    if outward > 0.0 {
        outward += style.small_scale;
    }
    Ok((outward, along))
}

fn axis_of(field: &FieldRef, which: WhichAxis, f: impl FnOnce(&Axis) -> Vec<Tick>) -> Vec<Tick> {
    let field = field.borrow();
    match which {
        WhichAxis::X => f(&field.xaxis),
        WhichAxis::Y => f(&field.yaxis),
    }
}

fn nudge_axis(field: &FieldRef, which: WhichAxis) {
    let mut field = field.borrow_mut();
    match which {
        WhichAxis::X => field.xaxis.nudge_bounds(),
        WhichAxis::Y => field.yaxis.nudge_bounds(),
    }
}

pub struct LinearAxisPainter {
    field: FieldRef,
    which: WhichAxis,
    pub minor_ticks: u32,
    cfg: TickStyle,
}

impl LinearAxisPainter {
    pub fn new(field: FieldRef, which: WhichAxis) -> Self {
        Self {
            field,
            which,
            minor_ticks: 5,
            cfg: TickStyle::default(),
        }
    }

    pub fn set_label_format(&mut self, format: LabelFormat) {
        self.cfg.label_format = format;
    }

    pub fn set_avoid_bounds_labels(&mut self, avoid: bool) {
        self.cfg.avoid_bounds_labels = avoid;
    }

    fn ticks(&self) -> Vec<Tick> {
        let minor = self.minor_ticks;
        axis_of(&self.field, self.which, |axis| {
            let (min, max) = axis.bounds();
            linear_ticks(min, max, minor)
        })
    }
}

impl AxisPainter for LinearAxisPainter {
    fn space_exterior(
        &mut self,
        helper: &AxisPaintHelper,
        ctx: &mut dyn DrawContext,
        style: &Theme,
    ) -> Result<(f64, f64)> {
        let ticks = self.ticks();
        let fmt = &self.cfg.label_format;
        measure_labels(&ticks, &|t: &Tick| Some(fmt.format(t.value)), helper, ctx, style)
    }

    fn paint(
        &mut self,
        helper: &AxisPaintHelper,
        ctx: &mut dyn DrawContext,
        style: &Theme,
    ) -> Result<()> {
        let ticks = self.ticks();
        let fmt = &self.cfg.label_format;
        paint_ticks_and_labels(
            &ticks,
            &|t: &Tick| Some(fmt.format(t.value)),
            &self.cfg,
            helper,
            ctx,
            style,
        )
    }

    fn nudge_bounds(&mut self) {
        nudge_axis(&self.field, self.which);
    }
}

fn superscript(k: i64) -> String {
    const DIGITS: [char; 10] = ['⁰', '¹', '²', '³', '⁴', '⁵', '⁶', '⁷', '⁸', '⁹'];
    let mut out = String::new();
    if k < 0 {
        out.push('⁻');
    }
    let digits = k.unsigned_abs().to_string();
    for c in digits.chars() {
        out.push(DIGITS[c.to_digit(10).unwrap() as usize]);
    }
    out
}

/// Major ticks at powers of ten, minors at 2..=9 times each power.
pub fn log_ticks(logmin: f64, logmax: f64) -> Vec<Tick> {
    let span = logmax - logmin;
    let mut out = Vec::new();
    let k0 = logmin.floor() as i64;
    let k1 = logmax.ceil() as i64;
    for k in k0..=k1 {
        let lk = k as f64;
        if lk >= logmin - 1e-9 && lk <= logmax + 1e-9 {
            out.push(Tick {
                frac: (lk - logmin) / span,
                value: lk,
                major: true,
            });
        }
        for j in 2..10 {
            let lv = lk + (j as f64).log10();
            if lv >= logmin - 1e-9 && lv <= logmax + 1e-9 {
                out.push(Tick {
                    frac: (lv - logmin) / span,
                    value: lv,
                    major: false,
                });
            }
        }
    }
    out.sort_by(|a, b| a.frac.total_cmp(&b.frac));
    out
}

/// Labels majors as a power of ten with a superscript exponent.
pub struct LogarithmicAxisPainter {
    field: FieldRef,
    which: WhichAxis,
    cfg: TickStyle,
}

impl LogarithmicAxisPainter {
    pub fn new(field: FieldRef, which: WhichAxis) -> Self {
        Self {
            field,
            which,
            cfg: TickStyle::default(),
        }
    }

    fn ticks(&self) -> Vec<Tick> {
        axis_of(&self.field, self.which, |axis| match axis {
            Axis::Logarithmic(a) => log_ticks(a.logmin, a.logmax),
            // A mis-paired axis paints nothing rather than lying.
            _ => Vec::new(),
        })
    }
}

fn log_label(tick: &Tick) -> Option<String> {
    let k = tick.value.round() as i64;
    Some(format!("10{}", superscript(k)))
}

impl AxisPainter for LogarithmicAxisPainter {
    fn space_exterior(
        &mut self,
        helper: &AxisPaintHelper,
        ctx: &mut dyn DrawContext,
        style: &Theme,
    ) -> Result<(f64, f64)> {
        let ticks = self.ticks();
        measure_labels(&ticks, &log_label, helper, ctx, style)
    }

    fn paint(
        &mut self,
        helper: &AxisPaintHelper,
        ctx: &mut dyn DrawContext,
        style: &Theme,
    ) -> Result<()> {
        let ticks = self.ticks();
        paint_ticks_and_labels(&ticks, &log_label, &self.cfg, helper, ctx, style)
    }

    fn nudge_bounds(&mut self) {
        nudge_axis(&self.field, self.which);
    }
}

/// One tick per ordinate; labels go through an injectable formatter.
pub struct DiscreteAxisPainter {
    field: FieldRef,
    which: WhichAxis,
    pub label_format: LabelFormat,
    cfg: TickStyle,
}

impl DiscreteAxisPainter {
    pub fn new(field: FieldRef, which: WhichAxis) -> Self {
        Self {
            field,
            which,
            label_format: LabelFormat::Auto,
            cfg: TickStyle::default(),
        }
    }

    fn ticks(&self) -> Vec<Tick> {
        axis_of(&self.field, self.which, |axis| match axis {
            Axis::Discrete(a) => (0..a.len())
                .map(|i| Tick {
                    frac: a.transform_index(i),
                    value: a.ordinates()[i],
                    major: true,
                })
                .collect(),
            _ => Vec::new(),
        })
    }
}

impl AxisPainter for DiscreteAxisPainter {
    fn space_exterior(
        &mut self,
        helper: &AxisPaintHelper,
        ctx: &mut dyn DrawContext,
        style: &Theme,
    ) -> Result<(f64, f64)> {
        let ticks = self.ticks();
        let fmt = &self.label_format;
        measure_labels(&ticks, &|t: &Tick| Some(fmt.format(t.value)), helper, ctx, style)
    }

    fn paint(
        &mut self,
        helper: &AxisPaintHelper,
        ctx: &mut dyn DrawContext,
        style: &Theme,
    ) -> Result<()> {
        let ticks = self.ticks();
        let fmt = &self.label_format;
        paint_ticks_and_labels(
            &ticks,
            &|t: &Tick| Some(fmt.format(t.value)),
            &self.cfg,
            helper,
            ctx,
            style,
        )
    }

    fn nudge_bounds(&mut self) {}
}

/// An angular tick: unit/minute/second label fields plus majorness.
struct AngularTick {
    frac: f64,
    major: bool,
    fields: Vec<String>,
    negative: bool,
}

/// Ticks from the increment table, with adjacent major labels eliding
/// the leading fields they share (12h 30m 00s, then 31m 00s, then 30s).
pub struct AngularAxisPainter {
    field: FieldRef,
    which: WhichAxis,
    cfg: TickStyle,
}

impl AngularAxisPainter {
    pub fn new(field: FieldRef, which: WhichAxis) -> Self {
        Self {
            field,
            which,
            cfg: TickStyle::default(),
        }
    }

    fn ticks(&self) -> Vec<AngularTick> {
        let field = self.field.borrow();
        let axis = match self.which {
            WhichAxis::X => &field.xaxis,
            WhichAxis::Y => &field.yaxis,
        };
        let Axis::Angular(axis) = axis else {
            return Vec::new();
        };
        let incr = axis.pick_increment();
        let to_sec = axis.mode.unit_factor() * 3600.0;
        let min_sec = axis.min * to_sec;
        let max_sec = axis.max * to_sec;
        let span = max_sec - min_sec;
        let suffixes = axis.mode.unit_suffixes();

        let mut out = Vec::new();
        let mut step = (min_sec / incr.secincr - 1e-9).ceil() as i64;
        loop {
            let sec = step as f64 * incr.secincr;
            if sec > max_sec + incr.secincr * 1e-9 {
                break;
            }
            let major = step.rem_euclid(incr.major_per_minor as i64) == 0;
            let wrapped = axis.mode.wrap(sec / 3600.0) * 3600.0;
            out.push(AngularTick {
                frac: (sec - min_sec) / span,
                major,
                fields: label_fields(wrapped.abs(), incr, &suffixes),
                negative: wrapped < 0.0,
            });
            step += 1;
        }
        out
    }
}

fn label_fields(abs_sec: f64, incr: AngularIncrement, suffixes: &[&'static str; 3]) -> Vec<String> {
    let total = abs_sec.round() as i64;
    let unit = total / 3600;
    let minute = (total % 3600) / 60;
    let second = total % 60;
    let mut fields = vec![format!("{unit}{}", suffixes[0])];
    if incr.detail >= 2 {
        fields.push(format!("{minute:02}{}", suffixes[1]));
    }
    if incr.detail >= 3 {
        fields.push(format!("{second:02}{}", suffixes[2]));
    }
    fields
}

/// Drop the leading fields shared with the previous label; always keep
/// at least the last field.
fn elide(prev: Option<&[String]>, fields: &[String]) -> String {
    let mut start = 0;
    if let Some(prev) = prev {
        while start < fields.len() - 1
            && prev.get(start) == Some(&fields[start])
        {
            start += 1;
        }
    }
    fields[start..].join(" ")
}

impl AxisPainter for AngularAxisPainter {
    fn space_exterior(
        &mut self,
        helper: &AxisPaintHelper,
        ctx: &mut dyn DrawContext,
        style: &Theme,
    ) -> Result<(f64, f64)> {
        let mut outward: f64 = 0.0;
        let mut along: f64 = 0.0;
        let mut prev: Option<Vec<String>> = None;
        for tick in self.ticks() {
            if !tick.major {
                continue;
            }
            let text = elide(prev.as_deref(), &tick.fields);
            prev = Some(tick.fields);
            let te = ctx.text_extents(&text)?;
            let (o, a) = helper.space_rect_out(te.width, te.height);
            outward = outward.max(o);
            along = along.max(a);
        }
        if outward > 0.0 {
            outward += style.small_scale;
        }
        Ok((outward, along))
    }

    fn paint(
        &mut self,
        helper: &AxisPaintHelper,
        ctx: &mut dyn DrawContext,
        style: &Theme,
    ) -> Result<()> {
        style.apply(ctx, StyleToken::Foreground);
        if self.cfg.paint_baseline {
            helper.paint_baseline(ctx)?;
        }
        let gap = style.small_scale;
        let mut prev: Option<Vec<String>> = None;
        for tick in self.ticks() {
            if tick.frac < -1e-9 || tick.frac > 1.0 + 1e-9 {
                continue;
            }
            let len = if tick.major {
                2.0 * style.small_scale
            } else {
                style.small_scale
            };
            helper.paint_tick_in(ctx, tick.frac, len)?;
            if !tick.major {
                continue;
            }
            let mut text = elide(prev.as_deref(), &tick.fields);
            if tick.negative {
                text.insert(0, '-');
            }
            prev = Some(tick.fields);
            let te = ctx.text_extents(&text)?;
            let (x, y) = helper.label_anchor(tick.frac, te.width, te.height, gap);
            ctx.move_to(x - te.x_bearing, y - te.y_bearing);
            ctx.show_text(&text)?;
        }
        Ok(())
    }

    fn nudge_bounds(&mut self) {
        nudge_axis(&self.field, self.which);
    }
}

/// The magic-axis-selector's painter for whatever axis variant the field
/// currently holds on that side.
pub fn default_painter(field: &FieldRef, which: WhichAxis) -> AxisPainterRef {
    let kind = {
        let f = field.borrow();
        match which {
            WhichAxis::X => f.xaxis.kind(),
            WhichAxis::Y => f.yaxis.kind(),
        }
    };
    use crate::axes::AxisKind;
    match kind {
        AxisKind::Linear => Rc::new(RefCell::new(LinearAxisPainter::new(Rc::clone(field), which))),
        AxisKind::Logarithmic => {
            Rc::new(RefCell::new(LogarithmicAxisPainter::new(Rc::clone(field), which)))
        }
        AxisKind::Discrete => {
            Rc::new(RefCell::new(DiscreteAxisPainter::new(Rc::clone(field), which)))
        }
        AxisKind::Angular => {
            Rc::new(RefCell::new(AngularAxisPainter::new(Rc::clone(field), which)))
        }
    }
}
