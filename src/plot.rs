//! The rectangular plot: a default field, four axis painters, an ordered
//! stack of field painters drawn inside the clipped field, outer
//! painters pinned to the sides, and an optional legend.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::axes::{Axis, LinearAxis, LogAxis};
use crate::axis_painters::{
    default_painter, AxisPaintHelper, AxisPainterRef, AxisSide, BlankAxisPainter, WhichAxis,
};
use crate::backend::DrawContext;
use crate::bag::{Bag, DataSource};
use crate::errors::{PlotError, Result};
use crate::painter::{adopt, configure_child_at, Extents, Painter, PainterCore};
use crate::plot_types::{DataBounds, FieldPainter};
use crate::theme::{StyleToken, Theme};
use crate::transform::FieldRef;

const SIDES: [AxisSide; 4] = [
    AxisSide::Top,
    AxisSide::Right,
    AxisSide::Bottom,
    AxisSide::Left,
];

fn side_index(side: AxisSide) -> usize {
    match side {
        AxisSide::Top => 0,
        AxisSide::Right => 1,
        AxisSide::Bottom => 2,
        AxisSide::Left => 3,
    }
}

fn adjacent(side: AxisSide) -> (AxisSide, AxisSide) {
    if side.is_horizontal() {
        (AxisSide::Left, AxisSide::Right)
    } else {
        (AxisSide::Top, AxisSide::Bottom)
    }
}

/// Legend box: key painters stacked vertically, pinned at a fractional
/// alignment inside the field.
pub struct Legend {
    keys: Vec<Box<dyn Painter>>,
    pub h_align: f64,
    pub v_align: f64,
    pub padding: f64,
}

impl Legend {
    pub fn new() -> Self {
        Self {
            keys: Vec::new(),
            h_align: 1.0,
            v_align: 0.0,
            padding: 1.0,
        }
    }

    pub fn add_key(&mut self, key: Box<dyn Painter>) {
        self.keys.push(adopt(key));
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    fn configure(
        &mut self,
        ctx: &mut dyn DrawContext,
        style: &Theme,
        field_w: f64,
        field_h: f64,
    ) -> Result<()> {
        let pad = self.padding * style.small_scale;
        let gap = style.small_scale;
        let mut sizes = Vec::with_capacity(self.keys.len());
        let mut box_w: f64 = 0.0;
        let mut box_h: f64 = 0.0;
        for key in &mut self.keys {
            let min = key.get_minimum_size(ctx, style)?;
            box_w = box_w.max(min.width);
            if !sizes.is_empty() {
                box_h += gap;
            }
            box_h += min.height;
            sizes.push(min);
        }
        let x0 = pad + self.h_align * (field_w - box_w - 2.0 * pad).max(0.0);
        let mut y = pad + self.v_align * (field_h - box_h - 2.0 * pad).max(0.0);
        for (key, min) in self.keys.iter_mut().zip(sizes.iter()) {
            configure_child_at(
                key.as_mut(),
                ctx,
                style,
                x0,
                y,
                Extents::sized(min.width, min.height),
            )?;
            y += min.height + gap;
        }
        Ok(())
    }

    fn paint(&mut self, ctx: &mut dyn DrawContext, style: &Theme) -> Result<()> {
        for key in &mut self.keys {
            key.paint(ctx, style)?;
        }
        Ok(())
    }
}

impl Default for Legend {
    fn default() -> Self {
        Self::new()
    }
}

struct OuterPainter {
    painter: Box<dyn Painter>,
    side: AxisSide,
    pos: f64,
    min: Extents,
}

pub struct RectPlot {
    core: PainterCore,
    default_field: FieldRef,
    side_painters: [AxisPainterRef; 4],
    field_painters: Vec<Box<dyn FieldPainter>>,
    outer_painters: Vec<OuterPainter>,
    legend: Legend,
    next_dsn: usize,
    /// Padding between stacked outer painters, multiples of small_scale.
    pub outer_padding: f64,
    /// Desired field width / height ratio, if constrained.
    pub field_aspect: Option<f64>,
    magic_spec: String,
    // Computed at configure time.
    field_w: f64,
    field_h: f64,
    field_dx: f64,
    field_dy: f64,
    axis_outward: [f64; 4],
}

impl RectPlot {
    /// Smallest field the plot will accept.
    pub const MIN_FIELD: f64 = 32.0;

    pub fn new() -> Self {
        let field = crate::transform::RectField::new().shared();
        let blank = || -> AxisPainterRef { Rc::new(RefCell::new(BlankAxisPainter)) };
        let mut plot = Self {
            core: PainterCore::new(StyleToken::Foreground),
            default_field: field,
            side_painters: [blank(), blank(), blank(), blank()],
            field_painters: Vec::new(),
            outer_painters: Vec::new(),
            legend: Legend::new(),
            next_dsn: 0,
            outer_padding: 1.0,
            field_aspect: None,
            magic_spec: String::new(),
            field_w: 0.0,
            field_h: 0.0,
            field_dx: 0.0,
            field_dy: 0.0,
            axis_outward: [0.0; 4],
        };
        plot.magic_axis_painters("lb")
            .expect("default magic spec is valid");
        plot
    }

    pub fn field(&self) -> FieldRef {
        Rc::clone(&self.default_field)
    }

    /// Attach a field painter with the default policy: keyed into the
    /// legend, bounds recomputed, no nudging.
    pub fn add(&mut self, fp: Box<dyn FieldPainter>) -> Result<()> {
        self.add_with(fp, true, true, false, false)
    }

    /// Attach a field painter. `autokey` adds its key painter to the
    /// legend; `rebound` recomputes the default field's bounds from all
    /// painters; `nudge_x`/`nudge_y` round the bounds afterwards.
    pub fn add_with(
        &mut self,
        mut fp: Box<dyn FieldPainter>,
        autokey: bool,
        rebound: bool,
        nudge_x: bool,
        nudge_y: bool,
    ) -> Result<()> {
        if fp.field().is_none() {
            fp.set_field(self.field());
        }
        if fp.wants_data_style() {
            fp.set_data_style(self.next_dsn);
            self.next_dsn += 1;
        }
        if autokey {
            if let Some(key) = fp.key_painter() {
                self.legend.add_key(key);
            }
        }
        fp.core_mut().attach();
        self.field_painters.push(fp);
        if rebound {
            self.rebound(nudge_x, nudge_y);
        }
        Ok(())
    }

    /// Recompute the default field's bounds as the union of all attached
    /// painters' data bounds.
    pub fn rebound(&mut self, nudge_x: bool, nudge_y: bool) {
        let mut bounds = DataBounds::default();
        for fp in &self.field_painters {
            let on_default = fp
                .field()
                .map(|f| Rc::ptr_eq(f, &self.default_field))
                .unwrap_or(false);
            if on_default {
                bounds = bounds.union(&fp.data_bounds());
            }
        }
        let mut field = self.default_field.borrow_mut();
        apply_bounds(&mut field.xaxis, bounds.xmin, bounds.xmax);
        apply_bounds(&mut field.yaxis, bounds.ymin, bounds.ymax);
        if nudge_x {
            field.xaxis.nudge_bounds();
        }
        if nudge_y {
            field.yaxis.nudge_bounds();
        }
    }

    /// Swap the default field's axes between linear and logarithmic,
    /// preserving bounds, and refresh the matching side painters.
    pub fn set_lin_log_axes(&mut self, want_x_log: bool, want_y_log: bool) -> Result<()> {
        {
            let mut field = self.default_field.borrow_mut();
            field.xaxis = convert_lin_log(&field.xaxis, want_x_log)?;
            field.yaxis = convert_lin_log(&field.yaxis, want_y_log)?;
        }
        let spec = self.magic_spec.clone();
        self.magic_axis_painters(&spec)
    }

    /// Select which sides carry real axis painters. `h` shares one
    /// painter between top and bottom, `v` between left and right;
    /// `t r b l` create an independent painter per side; unselected
    /// sides get a bare baseline.
    pub fn magic_axis_painters(&mut self, spec: &str) -> Result<()> {
        let mut flags = HashMap::new();
        for c in spec.chars() {
            if !matches!(c, 'h' | 'v' | 't' | 'r' | 'b' | 'l') {
                return Err(PlotError::domain(format!(
                    "unknown side flag {c:?} in axis spec {spec:?}"
                )));
            }
            flags.insert(c, true);
        }
        let has = |c: char| flags.contains_key(&c);

        let blank = || -> AxisPainterRef { Rc::new(RefCell::new(BlankAxisPainter)) };
        let mut sides: [AxisPainterRef; 4] = [blank(), blank(), blank(), blank()];

        if has('h') {
            let shared = default_painter(&self.default_field, WhichAxis::X);
            sides[side_index(AxisSide::Top)] = Rc::clone(&shared);
            sides[side_index(AxisSide::Bottom)] = shared;
        }
        if has('v') {
            let shared = default_painter(&self.default_field, WhichAxis::Y);
            sides[side_index(AxisSide::Left)] = Rc::clone(&shared);
            sides[side_index(AxisSide::Right)] = shared;
        }
        for (flag, side) in [
            ('t', AxisSide::Top),
            ('r', AxisSide::Right),
            ('b', AxisSide::Bottom),
            ('l', AxisSide::Left),
        ] {
            if has(flag) {
                sides[side_index(side)] =
                    default_painter(&self.default_field, side.which_axis());
            }
        }
        self.side_painters = sides;
        self.magic_spec = spec.to_string();
        Ok(())
    }

    pub fn side_painter(&self, side: AxisSide) -> AxisPainterRef {
        Rc::clone(&self.side_painters[side_index(side)])
    }

    /// Share an axis painter (typically another plot's) on a side.
    pub fn set_side_painter(&mut self, side: AxisSide, painter: AxisPainterRef) {
        self.side_painters[side_index(side)] = painter;
    }

    /// Pin a painter (a title, a label) to a side at a fractional
    /// position along it.
    pub fn add_outer(&mut self, painter: Box<dyn Painter>, side: AxisSide, pos: f64) {
        self.outer_painters.push(OuterPainter {
            painter: adopt(painter),
            side,
            pos,
            min: Extents::zero(),
        });
    }

    pub fn legend_mut(&mut self) -> &mut Legend {
        &mut self.legend
    }

    /// Field dimensions computed by the last `configure_painting`.
    pub fn field_size(&self) -> (f64, f64) {
        (self.field_w, self.field_h)
    }

    /// Round the axis bounds on every non-blank side.
    pub fn nudge_all_bounds(&mut self) {
        for painter in &self.side_painters {
            painter.borrow_mut().nudge_bounds();
        }
    }

    /// Wire up the named sources, then pull rounds until every stream is
    /// exhausted, feeding each field painter's sink. Bounds are
    /// recomputed afterwards.
    pub fn flush_bag(
        &mut self,
        bag: &mut Bag,
        sources: HashMap<String, Box<dyn DataSource>>,
    ) -> Result<()> {
        bag.start_flushing(sources)?;
        while bag.start_new_round() {
            for fp in &mut self.field_painters {
                fp.absorb_round(bag)?;
            }
        }
        self.rebound(false, false);
        Ok(())
    }

    /// `(outward, along)` for each side's axis painter.
    fn measure_axes(
        &mut self,
        ctx: &mut dyn DrawContext,
        style: &Theme,
    ) -> Result<([f64; 4], [f64; 4])> {
        let mut outward = [0.0; 4];
        let mut along = [0.0; 4];
        for side in SIDES {
            let helper = AxisPaintHelper {
                side,
                width: self.field_w,
                height: self.field_h,
            };
            let painter = &self.side_painters[side_index(side)];
            let (o, a) = painter.borrow_mut().space_exterior(&helper, ctx, style)?;
            outward[side_index(side)] = o;
            along[side_index(side)] = a;
        }
        Ok((outward, along))
    }

    /// Total exterior margin per side: the side's own outward need,
    /// bumped so labels sticking out along adjacent sides stay inside,
    /// plus the accumulated extents of outer painters.
    fn exteriors(
        &mut self,
        ctx: &mut dyn DrawContext,
        style: &Theme,
    ) -> Result<[f64; 4]> {
        let (outward, along) = self.measure_axes(ctx, style)?;
        let pad = self.outer_padding * style.small_scale;
        let mut ext = [0.0; 4];
        for side in SIDES {
            let (a1, a2) = adjacent(side);
            let mut e = outward[side_index(side)]
                .max(along[side_index(a1)] / 2.0)
                .max(along[side_index(a2)] / 2.0);
            for op in &mut self.outer_painters {
                if op.side == side {
                    op.min = op.painter.get_minimum_size(ctx, style)?;
                    let outward_extent = if side.is_horizontal() {
                        op.min.total_height()
                    } else {
                        op.min.total_width()
                    };
                    e += outward_extent + pad;
                }
            }
            ext[side_index(side)] = e;
        }
        self.axis_outward = outward;
        Ok(ext)
    }

    fn place_outer_painters(&mut self, ctx: &mut dyn DrawContext, style: &Theme) -> Result<()> {
        let pad = self.outer_padding * style.small_scale;
        let (fw, fh) = (self.field_w, self.field_h);
        // Stacking cursor per side, starting past the axis labels.
        let mut cursor = self.axis_outward;
        for i in 0..self.outer_painters.len() {
            let (side, pos, min) = {
                let op = &self.outer_painters[i];
                (op.side, op.pos, op.min)
            };
            let c = cursor[side_index(side)] + pad;
            let (dx, dy) = match side {
                AxisSide::Bottom => (pos * (fw - min.width), fh + c),
                AxisSide::Top => (pos * (fw - min.width), -c - min.height),
                AxisSide::Left => (-c - min.width, (1.0 - pos) * (fh - min.height)),
                AxisSide::Right => (fw + c, (1.0 - pos) * (fh - min.height)),
            };
            cursor[side_index(side)] = c
                + if side.is_horizontal() {
                    min.total_height()
                } else {
                    min.total_width()
                };
            let op = &mut self.outer_painters[i];
            configure_child_at(
                op.painter.as_mut(),
                ctx,
                style,
                dx,
                dy,
                Extents::sized(min.width, min.height),
            )?;
        }
        Ok(())
    }
}

impl Default for RectPlot {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_bounds(axis: &mut Axis, lo: Option<f64>, hi: Option<f64>) {
    let (cur_lo, cur_hi) = axis.bounds();
    let mut lo = lo.unwrap_or(cur_lo);
    let mut hi = hi.unwrap_or(cur_hi);
    // Degenerate spans widen by half a unit on each side.
    if (hi - lo).abs() < f64::EPSILON {
        lo -= 0.5;
        hi += 0.5;
    }
    match axis {
        Axis::Linear(a) => {
            a.min = lo;
            a.max = hi;
        }
        Axis::Logarithmic(a) => {
            if let Ok(new) = LogAxis::from_linear_bounds(lo, hi) {
                *a = new;
            }
        }
        Axis::Angular(a) => {
            a.min = lo;
            a.max = hi;
        }
        Axis::Discrete(_) => {}
    }
}

fn convert_lin_log(axis: &Axis, want_log: bool) -> Result<Axis> {
    let (lo, hi) = axis.bounds();
    match (axis, want_log) {
        (Axis::Logarithmic(_), true) | (Axis::Discrete(_) | Axis::Angular(_), _) => {
            Ok(axis.clone())
        }
        (_, true) => Ok(Axis::Logarithmic(LogAxis::from_linear_bounds(lo, hi)?)),
        (Axis::Logarithmic(_), false) => Ok(Axis::Linear(LinearAxis::new(lo, hi)?)),
        (_, false) => Ok(axis.clone()),
    }
}

impl Painter for RectPlot {
    fn core(&self) -> &PainterCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PainterCore {
        &mut self.core
    }

    fn get_minimum_size(&mut self, ctx: &mut dyn DrawContext, style: &Theme) -> Result<Extents> {
        let ext = self.exteriors(ctx, style)?;
        Ok(Extents {
            width: Self::MIN_FIELD,
            height: Self::MIN_FIELD,
            border_top: ext[side_index(AxisSide::Top)],
            border_right: ext[side_index(AxisSide::Right)],
            border_bottom: ext[side_index(AxisSide::Bottom)],
            border_left: ext[side_index(AxisSide::Left)],
        })
    }

    fn configure_painting(
        &mut self,
        ctx: &mut dyn DrawContext,
        style: &Theme,
        alloc: Extents,
    ) -> Result<()> {
        if alloc.width < Self::MIN_FIELD || alloc.height < Self::MIN_FIELD {
            return Err(PlotError::ContextTooSmall {
                need_w: Self::MIN_FIELD,
                need_h: Self::MIN_FIELD,
                have_w: alloc.width,
                have_h: alloc.height,
            });
        }
        self.core.accept(ctx, alloc)?;

        // Aspect constraint shrinks the field and re-centers it; the
        // freed space joins the perpendicular margins.
        let (mut fw, mut fh) = (alloc.width, alloc.height);
        if let Some(aspect) = self.field_aspect {
            if fw / fh > aspect {
                fw = aspect * fh;
            } else {
                fh = fw / aspect;
            }
        }
        self.field_dx = (alloc.width - fw) / 2.0;
        self.field_dy = (alloc.height - fh) / 2.0;
        self.field_w = fw;
        self.field_h = fh;

        // Remeasure with the final field dims so outer placement uses
        // fresh axis exteriors.
        let (outward, _) = self.measure_axes(ctx, style)?;
        self.axis_outward = outward;

        ctx.save();
        ctx.translate(self.field_dx, self.field_dy);
        let field_alloc = Extents::sized(fw, fh);
        let result = (|| -> Result<()> {
            for fp in &mut self.field_painters {
                fp.configure_painting(ctx, style, field_alloc)?;
            }
            self.legend.configure(ctx, style, fw, fh)?;
            self.place_outer_painters(ctx, style)
        })();
        ctx.restore();
        result
    }

    fn do_paint(&mut self, ctx: &mut dyn DrawContext, style: &Theme) -> Result<()> {
        ctx.save();
        ctx.translate(self.field_dx, self.field_dy);

        // Axes first.
        for side in SIDES {
            let helper = AxisPaintHelper {
                side,
                width: self.field_w,
                height: self.field_h,
            };
            self.side_painters[side_index(side)]
                .borrow_mut()
                .paint(&helper, ctx, style)?;
        }

        // Field painters in insertion order, clipped to the field.
        ctx.save();
        ctx.rectangle(0.0, 0.0, self.field_w, self.field_h);
        ctx.clip()?;
        ctx.new_path();
        for fp in &mut self.field_painters {
            fp.paint(ctx, style)?;
        }
        if !self.legend.is_empty() {
            self.legend.paint(ctx, style)?;
        }
        ctx.restore();

        // Outer painters, unclipped.
        for op in &mut self.outer_painters {
            op.painter.paint(ctx, style)?;
        }
        ctx.restore();
        Ok(())
    }
}
