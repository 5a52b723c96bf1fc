use vecplot::backend::{Op, RecordingContext};
use vecplot::data::{ColumnRequest, DataHolder};
use vecplot::stamps::{
    draw_symbol, paint_many, DataThemedStamp, PrimaryStamp, Stamp, StampShape, WithYErrorBars,
};
use vecplot::theme::Theme;
use vecplot::transform::RectField;
use vecplot::XYDataPainter;

fn unit_transformer() -> vecplot::Transformer {
    // 100x100 field over [0, 10] x [0, 10].
    RectField::new().transformer(100.0, 100.0, true)
}

#[test]
fn symbols_emit_the_expected_paths() {
    let mut ctx = RecordingContext::new();
    draw_symbol(&mut ctx, StampShape::Circle, 6.0, true).unwrap();
    assert_eq!(ctx.count(|op| matches!(op, Op::Arc(..))), 1);
    assert_eq!(ctx.count(|op| matches!(op, Op::Fill)), 1);

    let mut ctx = RecordingContext::new();
    draw_symbol(&mut ctx, StampShape::Square, 6.0, false).unwrap();
    assert_eq!(ctx.count(|op| matches!(op, Op::Rectangle(..))), 1);
    assert_eq!(ctx.count(|op| matches!(op, Op::Stroke)), 1);

    // Open shapes stroke even when fill is requested.
    let mut ctx = RecordingContext::new();
    draw_symbol(&mut ctx, StampShape::X, 6.0, true).unwrap();
    assert_eq!(ctx.count(|op| matches!(op, Op::Stroke)), 1);
    assert_eq!(ctx.count(|op| matches!(op, Op::Fill)), 0);
    assert_eq!(ctx.count(|op| matches!(op, Op::LineTo(..))), 2);

    let mut ctx = RecordingContext::new();
    draw_symbol(&mut ctx, StampShape::UpTriangle, 6.0, true).unwrap();
    assert_eq!(ctx.count(|op| matches!(op, Op::ClosePath)), 1);
    assert_eq!(ctx.count(|op| matches!(op, Op::Fill)), 1);
}

#[test]
fn primary_stamp_translates_to_the_point() {
    let mut holder = DataHolder::new();
    let slots = holder.register(&ColumnRequest {
        xs: 1,
        ys: 1,
        ..ColumnRequest::default()
    });
    holder.set_xy(slots.x_start, slots.y_start, &[5.0], &[5.0]);

    let stamp = PrimaryStamp::new(StampShape::Diamond);
    let mut ctx = RecordingContext::new();
    let style = Theme::default();
    let xform = unit_transformer();
    paint_many(
        &stamp, &mut ctx, &style, &xform, &holder, slots.x_start, slots.y_start, 0,
    )
    .unwrap();
    // (5, 5) maps to the field center; y flips.
    assert!(ctx
        .ops()
        .iter()
        .any(|op| matches!(op, Op::Translate(x, y) if (*x - 50.0).abs() < 1e-9 && (*y - 50.0).abs() < 1e-9)));
    assert_eq!(ctx.count(|op| matches!(op, Op::Save)), 1);
    assert_eq!(ctx.count(|op| matches!(op, Op::Restore)), 1);
}

#[test]
fn error_bar_decorator_registers_two_y_columns() {
    let painter = XYDataPainter::new(
        false,
        Some(Box::new(WithYErrorBars::new(Box::new(PrimaryStamp::new(
            StampShape::Circle,
        ))))),
    );
    // x, y, plus the decorator's lo/hi.
    assert_eq!(painter.sink_spec(), "FFFF");
}

#[test]
fn error_bar_decorator_draws_bar_then_substamp() {
    let mut holder = DataHolder::new();
    let base = holder.register(&ColumnRequest {
        xs: 1,
        ys: 1,
        ..ColumnRequest::default()
    });
    let mut stamp = WithYErrorBars::new(Box::new(PrimaryStamp::new(StampShape::Circle)));
    stamp.register_columns(&mut holder);

    holder.set_xy(base.x_start, base.y_start, &[5.0], &[5.0]);
    // Error bar from y=4 to y=6, in the decorator's own columns.
    holder.set_y_col(1, &[4.0]);
    holder.set_y_col(2, &[6.0]);

    let mut ctx = RecordingContext::new();
    let style = Theme::default();
    let xform = unit_transformer();
    paint_many(
        &stamp, &mut ctx, &style, &xform, &holder, base.x_start, base.y_start, 0,
    )
    .unwrap();

    // One vertical segment: x = 50 at both ends, spanning y 40..60.
    let bar: Vec<(f64, f64)> = ctx
        .ops()
        .iter()
        .filter_map(|op| match op {
            Op::LineTo(x, y) => Some((*x, *y)),
            _ => None,
        })
        .collect();
    assert!(bar.contains(&(50.0, 40.0)));
    // The wrapped circle still paints.
    assert_eq!(ctx.count(|op| matches!(op, Op::Arc(..))), 1);
}

#[test]
fn data_themed_stamp_follows_the_palette() {
    let mut holder = DataHolder::new();
    let slots = holder.register(&ColumnRequest {
        xs: 1,
        ys: 1,
        ..ColumnRequest::default()
    });
    holder.set_xy(slots.x_start, slots.y_start, &[2.0], &[2.0]);

    let stamp = DataThemedStamp::new();
    let style = Theme::default();
    let xform = unit_transformer();

    // dsn 1 picks the second palette entry: a square.
    let mut ctx = RecordingContext::new();
    paint_many(
        &stamp, &mut ctx, &style, &xform, &holder, slots.x_start, slots.y_start, 1,
    )
    .unwrap();
    assert_eq!(ctx.count(|op| matches!(op, Op::Rectangle(..))), 1);

    let c = style.data_color(1);
    assert!(ctx
        .ops()
        .iter()
        .any(|op| matches!(op, Op::SetSourceRgb(r, g, b) if *r == c.r && *g == c.g && *b == c.b)));
}
