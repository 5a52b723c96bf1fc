use vecplot::axes::{
    AngularAxis, AngularMode, Axis, DiscreteAxis, LinearAxis, LogAxis, OUT_OF_DOMAIN,
};

#[test]
fn linear_transform_endpoints() {
    let a = LinearAxis::new(-3.0, 7.0).unwrap();
    assert_eq!(a.transform(-3.0), 0.0);
    assert_eq!(a.transform(7.0), 1.0);
    assert_eq!(a.transform(2.0), 0.5);
    // Values outside the bounds map outside [0, 1]; clamping is the
    // transformer's job, not the axis's.
    assert!(a.transform(100.0) > 1.0);
    assert!(a.transform(-100.0) < 0.0);
}

#[test]
fn linear_rejects_degenerate_bounds() {
    assert!(LinearAxis::new(1.0, 1.0).is_err());
    assert!(LinearAxis::new(2.0, 1.0).is_err());
}

#[test]
fn linear_nudge_rounds_outward_and_is_idempotent() {
    // span 9.4 -> unit 10^0 = 1; floor(0.3) = 0, ceil(9.7) = 10.
    let mut a = LinearAxis::new(0.3, 9.7).unwrap();
    a.nudge_bounds();
    assert_eq!((a.min, a.max), (0.0, 10.0));
    a.nudge_bounds();
    assert_eq!((a.min, a.max), (0.0, 10.0));
}

#[test]
fn log_sentinel_for_nonpositive() {
    let a = LogAxis::new(-2.0, 2.0).unwrap();
    assert_eq!(a.transform(0.0), OUT_OF_DOMAIN);
    assert_eq!(a.transform(-5.0), OUT_OF_DOMAIN);
    assert!(!a.inbounds(0.0));
    assert!(!a.inbounds(-1.0));
    assert!(a.inbounds(1.0));
    // 10^0 sits at the midpoint of [-2, 2].
    assert!((a.transform(1.0) - 0.5).abs() < 1e-12);
}

#[test]
fn log_from_linear_bounds_defaults_nonpositive_to_minus_eight() {
    let a = LogAxis::from_linear_bounds(0.0, 100.0).unwrap();
    assert_eq!(a.logmin, -8.0);
    assert_eq!(a.logmax, 2.0);
}

#[test]
fn log_nudge_rounds_to_integers() {
    let mut a = LogAxis::new(-1.7, 1.2).unwrap();
    a.nudge_bounds();
    assert_eq!((a.logmin, a.logmax), (-2.0, 2.0));
    a.nudge_bounds();
    assert_eq!((a.logmin, a.logmax), (-2.0, 2.0));
}

#[test]
fn discrete_transform_is_strictly_monotone() {
    let a = DiscreteAxis::new(vec![1.0, 2.0, 5.0, 9.0], true).unwrap();
    let fracs: Vec<f64> = (0..4).map(|i| a.transform_index(i)).collect();
    for w in fracs.windows(2) {
        assert!(w[0] < w[1]);
    }
    // Padded mapping: index 0 of 4 ordinates -> (0 + 0.5) / 5 = 0.1.
    assert!((a.transform(1.0) - 0.1).abs() < 1e-12);
}

#[test]
fn discrete_unknown_ordinate() {
    let a = DiscreteAxis::range(0, 11, true).unwrap();
    assert!(a.index_of(3.0).is_ok());
    assert!(a.index_of(3.5).is_err());
    assert!(!a.inbounds(12.5));
    assert_eq!(a.transform(99.0), OUT_OF_DOMAIN);
}

#[test]
fn discrete_unpadded_spans_the_edges() {
    let a = DiscreteAxis::range(0, 3, false).unwrap();
    assert_eq!(a.transform_index(0), 0.0);
    assert_eq!(a.transform_index(3), 1.0);
}

#[test]
fn angular_increment_pick_for_a_full_day() {
    // 24h span = 86400s. The 2h entry gives 12 minor intervals, above
    // its threshold max(8, 9) = 9; the coarser entries fall below theirs.
    let a = AngularAxis::new(0.0, 2.0 * std::f64::consts::PI, AngularMode::PosHours).unwrap();
    assert_eq!(a.pick_increment().secincr, 7200.0);
}

#[test]
fn angular_wrap_modes() {
    assert!((AngularMode::PosDegrees.wrap(370.0) - 10.0).abs() < 1e-9);
    assert!((AngularMode::CenterDegrees.wrap(190.0) + 170.0).abs() < 1e-9);
    assert!((AngularMode::PosHours.wrap(25.0) - 1.0).abs() < 1e-9);
    assert!((AngularMode::CenterHours.wrap(13.0) + 11.0).abs() < 1e-9);
    // Latitude folds at the poles.
    assert!((AngularMode::Latitude.wrap(100.0) - 80.0).abs() < 1e-9);
    assert!((AngularMode::Latitude.wrap(-100.0) + 80.0).abs() < 1e-9);
}

#[test]
fn angular_nudge_is_idempotent() {
    let mut a = AngularAxis::new(0.13, 1.91, AngularMode::PosDegrees).unwrap();
    a.nudge_bounds();
    let (min, max) = (a.min, a.max);
    a.nudge_bounds();
    assert_eq!((a.min, a.max), (min, max));
    assert!(min <= 0.13 && max >= 1.91);
}

#[test]
fn axis_enum_dispatch() {
    let axis = Axis::Linear(LinearAxis::new(0.0, 4.0).unwrap());
    assert_eq!(axis.transform(2.0), 0.5);
    assert_eq!(axis.bounds(), (0.0, 4.0));
    assert!(axis.inbounds(4.0));
    assert!(!axis.inbounds(4.1));

    let log = Axis::Logarithmic(LogAxis::new(0.0, 2.0).unwrap());
    let (lo, hi) = log.bounds();
    assert!((lo - 1.0).abs() < 1e-9);
    assert!((hi - 100.0).abs() < 1e-9);
}
