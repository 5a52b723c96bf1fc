use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use vecplot::axes::{Axis, DiscreteAxis, LinearAxis};
use vecplot::backend::{Op, RecordingContext};
use vecplot::bag::{Bag, DataSource, FunctionFilter, IndexMapFilter, Row, Value, VecSource};
use vecplot::plot_types::FieldPainter;
use vecplot::rendering::render;
use vecplot::stamps::{PrimaryStamp, StampShape};
use vecplot::theme::Theme;
use vecplot::transform::RectField;
use vecplot::{ContinuousSteppedPainter, FilledBand, RectPlot, XYDataPainter};

/// Twelve months of (month, value, dv) rows.
fn month_rows() -> Vec<Row> {
    (0..12)
        .map(|m| {
            vec![
                Value::Float(m as f64),
                Value::Float(5.0 + (m as f64 * 0.7).sin()),
                Value::Float(0.5),
            ]
        })
        .collect()
}

#[test]
fn band_and_scatter_from_one_source() {
    let mut plot = RectPlot::new();
    {
        let field = plot.field();
        field.borrow_mut().xaxis =
            Axis::Discrete(DiscreteAxis::range(0, 11, true).unwrap());
    }
    plot.magic_axis_painters("lb").unwrap();

    let mut bag = Bag::new();

    // Band fed through a value +/- dv function filter.
    let band_filter = FunctionFilter::new("FFF", "FFF", |row: &Row| {
        let m = row[0].as_f64().unwrap();
        let v = row[1].as_f64().unwrap();
        let dv = row[2].as_f64().unwrap();
        vec![Value::Float(m), Value::Float(v - dv), Value::Float(v + dv)]
    })
    .unwrap();
    let f_band = bag.add_filter(Box::new(band_filter)).unwrap();
    bag.expose_sink(bag.filter_input(f_band), "rows").unwrap();

    let mut band = FilledBand::new();
    band.link_from(&mut bag, f_band).unwrap();

    // Scatter keeps (month, value) via an index map.
    let f_scatter = bag
        .add_filter(Box::new(IndexMapFilter::new("FFF", vec![0, 1]).unwrap()))
        .unwrap();
    bag.expose_sink(bag.filter_input(f_scatter), "rows").unwrap();

    let mut scatter = XYDataPainter::new(
        false,
        Some(Box::new(PrimaryStamp::new(StampShape::UpTriangle))),
    );
    scatter.link_from(&mut bag, f_scatter).unwrap();

    plot.add_with(Box::new(band), false, false, false, false)
        .unwrap();
    plot.add_with(Box::new(scatter), false, false, false, false)
        .unwrap();

    // Chunks of four force three pull rounds.
    let mut sources: HashMap<String, Box<dyn DataSource>> = HashMap::new();
    sources.insert(
        "rows".to_string(),
        Box::new(VecSource::new("FFF", month_rows(), 4).unwrap()),
    );
    plot.flush_bag(&mut bag, sources).unwrap();

    let mut ctx = RecordingContext::new();
    render(&mut plot, &mut ctx, &Theme::default(), 400.0, 300.0).unwrap();

    // Fills: one background blank, twelve band cells, twelve triangles.
    assert_eq!(ctx.count(|op| matches!(op, Op::Fill)), 25);
    // Rectangles: background, the field clip, twelve band cells.
    assert_eq!(ctx.count(|op| matches!(op, Op::Rectangle(..))), 14);
    // Each triangle closes its path once.
    assert_eq!(ctx.count(|op| matches!(op, Op::ClosePath)), 12);
    assert_eq!(ctx.save_depth(), 0);
}

#[test]
fn histogram_stairsteps() {
    // 1000 normal deviates via Box-Muller, deterministic seed.
    let mut rng = StdRng::seed_from_u64(7);
    let samples: Vec<f64> = (0..1000)
        .map(|_| {
            let u1: f64 = 1.0 - rng.random::<f64>();
            let u2: f64 = rng.random::<f64>();
            (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
        })
        .collect();

    // 11 bins across [-5, 5].
    let nbins = 11;
    let width = 10.0 / nbins as f64;
    let mut counts = vec![0.0; nbins];
    for s in samples {
        if (-5.0..5.0).contains(&s) {
            counts[((s + 5.0) / width) as usize] += 1.0;
        }
    }
    let edges: Vec<f64> = (0..nbins).map(|i| -5.0 + i as f64 * width).collect();

    let top = counts.iter().cloned().fold(0.0, f64::max);
    let field = RectField::new().shared();
    {
        let mut f = field.borrow_mut();
        f.xaxis = Axis::Linear(LinearAxis::new(-5.0, 5.0).unwrap());
        f.yaxis = Axis::Linear(LinearAxis::new(0.0, top + 1.0).unwrap());
    }

    let mut painter = ContinuousSteppedPainter::new();
    painter.set_data(&edges, &counts);
    painter.set_field(field);

    let mut ctx = RecordingContext::new();
    render(&mut painter, &mut ctx, &Theme::default(), 400.0, 300.0).unwrap();

    // 11 bins: one opening move, then per transition a vertical and a
    // horizontal segment (10 of each), plus the final extension to the
    // derived right edge: 2*10 + 1 = 21 line segments.
    assert_eq!(ctx.count(|op| matches!(op, Op::MoveTo(..))), 1);
    assert_eq!(ctx.count(|op| matches!(op, Op::LineTo(..))), 21);
    assert_eq!(ctx.count(|op| matches!(op, Op::Stroke)), 1);

    // The derived right edge is the last left edge plus one bin width,
    // which is the field's right boundary here.
    let last_line = ctx
        .ops()
        .iter()
        .rev()
        .find_map(|op| match op {
            Op::LineTo(x, y) => Some((*x, *y)),
            _ => None,
        })
        .unwrap();
    assert!((last_line.0 - 400.0).abs() < 1e-6);
}

#[test]
fn discrete_steps_join_with_connectors() {
    use vecplot::DiscreteSteppedPainter;

    let field = RectField::new().shared();
    {
        let mut f = field.borrow_mut();
        f.xaxis = Axis::Discrete(DiscreteAxis::range(0, 3, true).unwrap());
        f.yaxis = Axis::Linear(LinearAxis::new(0.0, 4.0).unwrap());
    }

    let mut painter = DiscreteSteppedPainter::new(true);
    painter.set_data(&[0.0, 1.0, 2.0, 3.0], &[1.0, 3.0, 2.0, 2.0]);
    painter.set_field(field);

    let mut ctx = RecordingContext::new();
    render(&mut painter, &mut ctx, &Theme::default(), 200.0, 100.0).unwrap();

    // Four horizontal steps plus three connectors.
    assert_eq!(ctx.count(|op| matches!(op, Op::LineTo(..))), 7);
    assert_eq!(ctx.count(|op| matches!(op, Op::MoveTo(..))), 7);

    // First step starts at the field's left edge, last ends at its
    // right edge.
    let moves: Vec<(f64, f64)> = ctx
        .ops()
        .iter()
        .filter_map(|op| match op {
            Op::MoveTo(x, y) => Some((*x, *y)),
            _ => None,
        })
        .collect();
    assert!((moves[0].0 - 0.0).abs() < 1e-9);
    let lines: Vec<(f64, f64)> = ctx
        .ops()
        .iter()
        .filter_map(|op| match op {
            Op::LineTo(x, y) => Some((*x, *y)),
            _ => None,
        })
        .collect();
    let max_x = lines.iter().map(|p| p.0).fold(0.0, f64::max);
    assert!((max_x - 200.0).abs() < 1e-9);
}
