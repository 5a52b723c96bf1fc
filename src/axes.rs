//! Axis abstractions: linear, logarithmic, discrete and angular mappings
//! from data space to the unit interval.
//!
//! `transform` may return values outside [0, 1]; weak clamping is the
//! [`Transformer`](crate::transform::Transformer)'s job.

use crate::errors::{PlotError, Result};

/// Sentinel returned for values with no valid mapping (non-positive on a
/// log axis, unknown discrete ordinates). Far enough outside the field
/// that the clip rectangle discards anything drawn there.
pub const OUT_OF_DOMAIN: f64 = -10.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AxisKind {
    Linear,
    Logarithmic,
    Discrete,
    Angular,
}

#[derive(Clone, Debug)]
pub enum Axis {
    Linear(LinearAxis),
    Logarithmic(LogAxis),
    Discrete(DiscreteAxis),
    Angular(AngularAxis),
}

impl Axis {
    pub fn kind(&self) -> AxisKind {
        match self {
            Self::Linear(_) => AxisKind::Linear,
            Self::Logarithmic(_) => AxisKind::Logarithmic,
            Self::Discrete(_) => AxisKind::Discrete,
            Self::Angular(_) => AxisKind::Angular,
        }
    }

    /// Map a data value to a fraction of the axis, approximately [0, 1].
    pub fn transform(&self, v: f64) -> f64 {
        match self {
            Self::Linear(a) => a.transform(v),
            Self::Logarithmic(a) => a.transform(v),
            Self::Discrete(a) => a.transform(v),
            Self::Angular(a) => a.transform(v),
        }
    }

    pub fn inbounds(&self, v: f64) -> bool {
        match self {
            Self::Linear(a) => a.inbounds(v),
            Self::Logarithmic(a) => a.inbounds(v),
            Self::Discrete(a) => a.inbounds(v),
            Self::Angular(a) => a.inbounds(v),
        }
    }

    /// Data-space bounds. For discrete axes, the first and last ordinate;
    /// for logarithmic, the decoded (non-log) limits.
    pub fn bounds(&self) -> (f64, f64) {
        match self {
            Self::Linear(a) => (a.min, a.max),
            Self::Logarithmic(a) => (a.min(), a.max()),
            Self::Discrete(a) => a.bounds(),
            Self::Angular(a) => (a.min, a.max),
        }
    }

    /// Grow the bounds to include `[lo, hi]`.
    pub fn include(&mut self, lo: f64, hi: f64) {
        match self {
            Self::Linear(a) => {
                a.min = a.min.min(lo);
                a.max = a.max.max(hi);
            }
            Self::Logarithmic(a) => a.include(lo, hi),
            Self::Angular(a) => {
                a.min = a.min.min(lo);
                a.max = a.max.max(hi);
            }
            // A discrete axis owns its ordinate set; data cannot widen it.
            Self::Discrete(_) => {}
        }
    }

    /// Round the bounds outward to round numbers. Idempotent.
    pub fn nudge_bounds(&mut self) {
        match self {
            Self::Linear(a) => a.nudge_bounds(),
            Self::Logarithmic(a) => a.nudge_bounds(),
            Self::Discrete(_) => {}
            Self::Angular(a) => a.nudge_bounds(),
        }
    }
}

/// `transform(v) = (v - min) / (max - min)`.
#[derive(Clone, Debug)]
pub struct LinearAxis {
    pub min: f64,
    pub max: f64,
}

impl LinearAxis {
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if min >= max {
            return Err(PlotError::domain(format!(
                "linear axis requires min < max, got [{min}, {max}]"
            )));
        }
        Ok(Self { min, max })
    }

    pub fn transform(&self, v: f64) -> f64 {
        (v - self.min) / (self.max - self.min)
    }

    pub fn inbounds(&self, v: f64) -> bool {
        v >= self.min && v <= self.max
    }

    /// Round `min` and `max` outward to multiples of
    /// `10^floor(log10(span))`. The epsilon keeps an already-nudged
    /// bound from creeping on the next call.
    pub fn nudge_bounds(&mut self) {
        let span = self.max - self.min;
        let unit = 10f64.powf(span.log10().floor());
        self.min = (self.min / unit + 1e-9).floor() * unit;
        self.max = (self.max / unit - 1e-9).ceil() * unit;
    }
}

/// Stores `log10` of its limits. Non-positive values map to the
/// [`OUT_OF_DOMAIN`] sentinel rather than raising.
#[derive(Clone, Debug)]
pub struct LogAxis {
    pub logmin: f64,
    pub logmax: f64,
}

impl LogAxis {
    pub fn new(logmin: f64, logmax: f64) -> Result<Self> {
        if logmin >= logmax {
            return Err(PlotError::domain(format!(
                "log axis requires logmin < logmax, got [{logmin}, {logmax}]"
            )));
        }
        Ok(Self { logmin, logmax })
    }

    /// Build from linear-space limits; non-positive limits fall back to
    /// 1e-8.
    pub fn from_linear_bounds(min: f64, max: f64) -> Result<Self> {
        let logmin = if min > 0.0 { min.log10() } else { -8.0 };
        let logmax = if max > 0.0 { max.log10() } else { -8.0 };
        Self::new(logmin, logmax)
    }

    pub fn min(&self) -> f64 {
        10f64.powf(self.logmin)
    }

    pub fn max(&self) -> f64 {
        10f64.powf(self.logmax)
    }

    pub fn transform(&self, v: f64) -> f64 {
        if v <= 0.0 {
            return OUT_OF_DOMAIN;
        }
        (v.log10() - self.logmin) / (self.logmax - self.logmin)
    }

    pub fn inbounds(&self, v: f64) -> bool {
        if v <= 0.0 {
            return false;
        }
        let lv = v.log10();
        lv >= self.logmin && lv <= self.logmax
    }

    pub fn include(&mut self, lo: f64, hi: f64) {
        if lo > 0.0 {
            self.logmin = self.logmin.min(lo.log10());
        }
        if hi > 0.0 {
            self.logmax = self.logmax.max(hi.log10());
        }
    }

    /// Round `logmin` down and `logmax` up to integers.
    pub fn nudge_bounds(&mut self) {
        self.logmin = (self.logmin + 1e-9).floor();
        self.logmax = (self.logmax - 1e-9).ceil();
        if self.logmax - self.logmin < 1.0 {
            self.logmax = self.logmin + 1.0;
        }
    }
}

/// An ordered set of ordinates mapped to evenly spaced fractions.
#[derive(Clone, Debug)]
pub struct DiscreteAxis {
    ordinates: Vec<f64>,
    pub pad_boundaries: bool,
}

impl DiscreteAxis {
    pub fn new(ordinates: Vec<f64>, pad_boundaries: bool) -> Result<Self> {
        if ordinates.len() < 2 {
            return Err(PlotError::domain(
                "discrete axis needs at least two ordinates",
            ));
        }
        if ordinates.windows(2).any(|w| w[0] >= w[1]) {
            return Err(PlotError::domain(
                "discrete axis ordinates must be strictly increasing",
            ));
        }
        Ok(Self {
            ordinates,
            pad_boundaries,
        })
    }

    /// Consecutive integers `min..=max`.
    pub fn range(min: i64, max: i64, pad_boundaries: bool) -> Result<Self> {
        if min >= max {
            return Err(PlotError::domain(format!(
                "discrete axis requires min < max, got [{min}, {max}]"
            )));
        }
        Self::new((min..=max).map(|i| i as f64).collect(), pad_boundaries)
    }

    pub fn ordinates(&self) -> &[f64] {
        &self.ordinates
    }

    pub fn len(&self) -> usize {
        self.ordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordinates.is_empty()
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.ordinates[0], *self.ordinates.last().unwrap())
    }

    /// Index of an ordinate; unknown values are a caller bug.
    pub fn index_of(&self, v: f64) -> Result<usize> {
        self.ordinates
            .iter()
            .position(|&o| (o - v).abs() < 1e-9)
            .ok_or_else(|| PlotError::domain(format!("value {v} is not an ordinate of this axis")))
    }

    /// Fraction assigned to ordinate index `i`.
    pub fn transform_index(&self, i: usize) -> f64 {
        let n = self.ordinates.len() as f64;
        if self.pad_boundaries {
            (i as f64 + 0.5) / (n + 1.0)
        } else {
            i as f64 / (n - 1.0)
        }
    }

    pub fn transform(&self, v: f64) -> f64 {
        match self.index_of(v) {
            Ok(i) => self.transform_index(i),
            Err(_) => OUT_OF_DOMAIN,
        }
    }

    pub fn inbounds(&self, v: f64) -> bool {
        self.index_of(v).is_ok()
    }
}

/// Wrap/labeling conventions for an angular axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AngularMode {
    /// 0..360 degrees.
    PosDegrees,
    /// 0..24 hours.
    PosHours,
    /// -180..180 degrees.
    CenterDegrees,
    /// -12..12 hours.
    CenterHours,
    /// -90..90 degrees, folding at the poles.
    Latitude,
}

impl AngularMode {
    /// Scale factor from radians to the labeling unit (degrees or hours).
    pub fn unit_factor(&self) -> f64 {
        match self {
            Self::PosDegrees | Self::CenterDegrees | Self::Latitude => {
                180.0 / std::f64::consts::PI
            }
            Self::PosHours | Self::CenterHours => 12.0 / std::f64::consts::PI,
        }
    }

    /// Full wrap period in the labeling unit.
    fn period(&self) -> f64 {
        match self {
            Self::PosDegrees | Self::CenterDegrees => 360.0,
            Self::PosHours | Self::CenterHours => 24.0,
            Self::Latitude => 360.0,
        }
    }

    /// Wrap a value (in labeling units) per the mode.
    pub fn wrap(&self, v: f64) -> f64 {
        let period = self.period();
        let positive = v.rem_euclid(period);
        match self {
            Self::PosDegrees | Self::PosHours => positive,
            Self::CenterDegrees | Self::CenterHours => {
                if positive > period / 2.0 {
                    positive - period
                } else {
                    positive
                }
            }
            Self::Latitude => {
                // Fold: 91 -> 89, 179 -> 1, -91 -> -89.
                let centered = if positive > 180.0 {
                    positive - 360.0
                } else {
                    positive
                };
                if centered > 90.0 {
                    180.0 - centered
                } else if centered < -90.0 {
                    -180.0 - centered
                } else {
                    centered
                }
            }
        }
    }

    pub fn unit_suffixes(&self) -> [&'static str; 3] {
        match self {
            Self::PosHours | Self::CenterHours => ["h", "m", "s"],
            _ => ["\u{00b0}", "'", "\""],
        }
    }
}

/// One row of the angular increment table:
/// (minor increment in seconds of unit, majors per minor, label detail).
#[derive(Clone, Copy, Debug)]
pub struct AngularIncrement {
    pub secincr: f64,
    pub major_per_minor: u32,
    pub detail: u8,
}

const fn incr(secincr: f64, major_per_minor: u32, detail: u8) -> AngularIncrement {
    AngularIncrement {
        secincr,
        major_per_minor,
        detail,
    }
}

/// Fixed table, finest first. Seconds of unit: arcseconds for degree
/// modes, time-seconds for hour modes.
pub const ANGULAR_INCREMENTS: &[AngularIncrement] = &[
    incr(1.0, 4, 3),
    incr(5.0, 4, 3),
    incr(15.0, 4, 3),
    incr(30.0, 2, 3),
    incr(60.0, 4, 2),
    incr(300.0, 4, 2),
    incr(900.0, 4, 2),
    incr(1800.0, 2, 2),
    incr(3600.0, 4, 1),
    incr(7200.0, 3, 1),
    incr(10800.0, 2, 1),
    incr(21600.0, 4, 1),
    incr(36000.0, 3, 1),
    incr(108000.0, 3, 1),
    incr(324000.0, 2, 1),
];

/// Angles in radians; labeled in degrees or hours per the mode.
#[derive(Clone, Debug)]
pub struct AngularAxis {
    pub min: f64,
    pub max: f64,
    pub mode: AngularMode,
}

impl AngularAxis {
    pub fn new(min: f64, max: f64, mode: AngularMode) -> Result<Self> {
        if min >= max {
            return Err(PlotError::domain(format!(
                "angular axis requires min < max, got [{min}, {max}]"
            )));
        }
        Ok(Self { min, max, mode })
    }

    pub fn transform(&self, v: f64) -> f64 {
        (v - self.min) / (self.max - self.min)
    }

    pub fn inbounds(&self, v: f64) -> bool {
        v >= self.min && v <= self.max
    }

    /// Span in seconds of the labeling unit.
    pub fn span_seconds(&self) -> f64 {
        (self.max - self.min) * self.mode.unit_factor() * 3600.0
    }

    /// Pick the coarsest table entry still yielding more than
    /// `max(8, 3 * major_per_minor)` minor intervals across the span.
    pub fn pick_increment(&self) -> AngularIncrement {
        let span = self.span_seconds();
        let mut chosen = ANGULAR_INCREMENTS[0];
        for entry in ANGULAR_INCREMENTS {
            let wanted = (3 * entry.major_per_minor).max(8) as f64;
            if span / entry.secincr > wanted {
                chosen = *entry;
            }
        }
        chosen
    }

    /// Round outward to multiples of the selected minor increment,
    /// iterating until the selection stabilizes so a second nudge is a
    /// no-op.
    pub fn nudge_bounds(&mut self) {
        for _ in 0..4 {
            let incr_rad = self.pick_increment().secincr / (self.mode.unit_factor() * 3600.0);
            let min = (self.min / incr_rad + 1e-9).floor() * incr_rad;
            let max = (self.max / incr_rad - 1e-9).ceil() * incr_rad;
            if (min - self.min).abs() < 1e-12 && (max - self.max).abs() < 1e-12 {
                return;
            }
            self.min = min;
            self.max = max;
        }
    }
}
