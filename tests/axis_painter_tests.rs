use vecplot::axis_painters::{format_number, linear_ticks, log_ticks, LabelFormat};

#[test]
fn linear_ticks_decade_span_densifies() {
    // span 10: log10 is exactly 1, fraction 0 < 0.3, so mip drops to 0
    // and inc = 1/5 = 0.2. Majors land on the integers.
    let ticks = linear_ticks(0.0, 10.0, 5);
    assert_eq!(ticks.len(), 51);
    let majors: Vec<f64> = ticks.iter().filter(|t| t.major).map(|t| t.value).collect();
    assert_eq!(majors.len(), 11);
    for (i, v) in majors.iter().enumerate() {
        assert!((v - i as f64).abs() < 1e-9);
    }
}

#[test]
fn linear_ticks_symmetric_span() {
    // span 2: inc = 0.2, majors where the coefficient is divisible by 5.
    let ticks = linear_ticks(-1.0, 1.0, 5);
    let majors: Vec<f64> = ticks.iter().filter(|t| t.major).map(|t| t.value).collect();
    assert_eq!(majors, vec![-1.0, 0.0, 1.0]);
    // All ticks are 0.2 apart in axis fraction terms.
    for w in ticks.windows(2) {
        assert!((w[1].value - w[0].value - 0.2).abs() < 1e-9);
    }
}

#[test]
fn linear_ticks_zero_clamp_invariant() {
    // Spanning zero: no tick may sit in the float-drift dead zone
    // (0, 1e-6 * max bound).
    let ticks = linear_ticks(-0.05, 1.0, 5);
    let dead = 1e-6;
    for t in &ticks {
        assert!(t.value == 0.0 || t.value.abs() >= dead);
    }
    assert!(ticks.iter().any(|t| t.value == 0.0));
}

#[test]
fn linear_ticks_fractions_cover_bounds() {
    let ticks = linear_ticks(2.0, 8.0, 4);
    for t in &ticks {
        assert!(t.frac >= -1e-9 && t.frac <= 1.0 + 1e-9);
        assert!((t.frac - (t.value - 2.0) / 6.0).abs() < 1e-9);
    }
}

#[test]
fn log_ticks_majors_and_minors() {
    let ticks = log_ticks(-2.0, 1.0);
    let majors: Vec<f64> = ticks.iter().filter(|t| t.major).map(|t| t.value).collect();
    assert_eq!(majors, vec![-2.0, -1.0, 0.0, 1.0]);
    // 8 minors (j = 2..9) inside each of the three decades.
    let minors = ticks.iter().filter(|t| !t.major).count();
    assert_eq!(minors, 24);
    // Sorted by position.
    for w in ticks.windows(2) {
        assert!(w[0].frac <= w[1].frac);
    }
}

#[test]
fn number_formatting() {
    assert_eq!(format_number(0.0), "0");
    assert_eq!(format_number(0.5), "0.5");
    assert_eq!(format_number(3.0), "3");
    assert_eq!(format_number(-0.5), "-0.5");
    assert_eq!(format_number(1234.56), "1235");
    assert_eq!(format_number(0.125), "0.125");
}

#[test]
fn label_format_variants() {
    assert_eq!(LabelFormat::Auto.format(2.5), "2.5");
    assert_eq!(LabelFormat::Precision(2).format(2.5), "2.50");
    let f = LabelFormat::Func(Box::new(|v| format!("<{v}>")));
    assert_eq!(f.format(3.0), "<3>");
}
