//! Curve generators: map a position along the curve to a period-local point
//!
//! Both families return coordinates relative to the start of the period that
//! contains `t`, with `y` measured upward from the centerline. The renderer
//! places periods side by side.

use crate::config::{CurveFamily, ShapeParameters};
use std::f64::consts::{PI, TAU};

/// Arc radius of the rounded family as a fraction of the wavelength
const SECTIONS_PER_WAVELENGTH: f64 = 4.0;
/// Exponent range for squareness: p = 1 / (1 + squareness * 9)
const SQUARENESS_EXPONENT_RANGE: f64 = 9.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub fn lerp(self, other: Point, t: f64) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Reduce `t` into `[0, wavelength)`, handling negative `t`.
/// Returns 0 for a wavelength that is not a positive finite number.
pub fn normalize_parameter(t: f64, wavelength: f64) -> f64 {
    if !(wavelength > 0.0 && wavelength.is_finite() && t.is_finite()) {
        return 0.0;
    }
    let reduced = t.rem_euclid(wavelength);
    // rem_euclid rounds up to exactly `wavelength` for tiny negative inputs
    if reduced >= wavelength {
        0.0
    } else {
        reduced
    }
}

/// A periodic curve family the renderer can draw
pub trait CurveGenerator {
    /// Period-local point at distance `t` along the curve parameter
    fn point_at(&self, params: &ShapeParameters, t: f64) -> Point;

    /// True when equal steps of `t` already travel equal distances
    fn is_arc_length_uniform(&self) -> bool;
}

/// Sine wave reshaped toward a square wave by `squareness`
#[derive(Clone, Copy, Debug, Default)]
pub struct SineCurve;

impl SineCurve {
    pub fn exponent(squareness: f64) -> f64 {
        1.0 / (1.0 + squareness.max(0.0) * SQUARENESS_EXPONENT_RANGE)
    }
}

impl CurveGenerator for SineCurve {
    fn point_at(&self, params: &ShapeParameters, t: f64) -> Point {
        if !(params.wavelength > 0.0 && params.wavelength.is_finite()) {
            return Point::default();
        }

        let local = normalize_parameter(t, params.wavelength);
        let theta = local / params.wavelength * TAU;
        let s = theta.sin();
        let shaped = s.signum() * s.abs().powf(Self::exponent(params.squareness));
        Point::new(local, params.amplitude * shaped)
    }

    fn is_arc_length_uniform(&self) -> bool {
        false
    }
}

/// Arc-length positions where each of the four sections ends
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SectionBoundaries {
    pub radius: f64,
    pub vertical_length: f64,
    pub arc_length: f64,
    pub rise_end: f64,
    pub top_arc_end: f64,
    pub fall_end: f64,
    pub total_arc_length: f64,
}

impl SectionBoundaries {
    pub fn new(amplitude: f64, wavelength: f64) -> Self {
        let radius = (wavelength / SECTIONS_PER_WAVELENGTH).max(0.0);
        let vertical_length = 2.0 * amplitude.max(0.0);
        let arc_length = PI * radius;
        let total_arc_length = 2.0 * vertical_length + 2.0 * arc_length;

        Self {
            radius,
            vertical_length,
            arc_length,
            rise_end: vertical_length,
            top_arc_end: vertical_length + arc_length,
            fall_end: 2.0 * vertical_length + arc_length,
            total_arc_length,
        }
    }
}

/// Rounded square wave: vertical rise, top semicircle, vertical fall, bottom semicircle.
/// Each section is parameterized by arc length, so sampling is already uniform.
#[derive(Clone, Copy, Debug, Default)]
pub struct RoundedCurve;

impl CurveGenerator for RoundedCurve {
    fn point_at(&self, params: &ShapeParameters, t: f64) -> Point {
        let wavelength = params.wavelength;
        if !(wavelength > 0.0 && wavelength.is_finite()) {
            return Point::default();
        }

        let amp = params.amplitude.max(0.0);
        let sections = SectionBoundaries::new(amp, wavelength);
        if !(sections.total_arc_length > 0.0) {
            return Point::default();
        }

        let r = sections.radius;
        let local = normalize_parameter(t, wavelength);
        let arc_pos = local / wavelength * sections.total_arc_length;

        if arc_pos < sections.rise_end {
            let progress = arc_pos / sections.vertical_length;
            Point::new(0.0, -amp + 2.0 * amp * progress)
        } else if arc_pos < sections.top_arc_end {
            let progress = (arc_pos - sections.rise_end) / sections.arc_length;
            Point::new(
                r + r * (PI * (1.0 - progress)).cos(),
                amp + r * (PI * progress).sin(),
            )
        } else if arc_pos < sections.fall_end {
            let progress = (arc_pos - sections.top_arc_end) / sections.vertical_length;
            Point::new(2.0 * r, amp - 2.0 * amp * progress)
        } else {
            let progress = (arc_pos - sections.fall_end) / sections.arc_length;
            Point::new(
                3.0 * r + r * (PI * (1.0 - progress)).cos(),
                -amp - r * (PI * progress).sin(),
            )
        }
    }

    fn is_arc_length_uniform(&self) -> bool {
        true
    }
}

static SINE: SineCurve = SineCurve;
static ROUNDED: RoundedCurve = RoundedCurve;

impl CurveFamily {
    pub fn generator(self) -> &'static dyn CurveGenerator {
        match self {
            CurveFamily::Sine => &SINE,
            CurveFamily::Rounded => &ROUNDED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    fn params(amplitude: f64, wavelength: f64, squareness: f64) -> ShapeParameters {
        ShapeParameters {
            amplitude,
            wavelength,
            cycles: 2.0,
            speed: 0.0,
            thickness: 2.0,
            squareness,
        }
    }

    #[rstest]
    #[case(0.0, 200.0, 0.0)]
    #[case(-50.0, 200.0, 150.0)]
    #[case(450.0, 200.0, 50.0)]
    #[case(-0.0, 10.0, 0.0)]
    fn normalize_wraps_into_period(#[case] t: f64, #[case] wavelength: f64, #[case] expected: f64) {
        assert_abs_diff_eq!(normalize_parameter(t, wavelength), expected, epsilon = 1e-9);
    }

    #[test]
    fn normalize_guards_degenerate_wavelength() {
        assert_eq!(normalize_parameter(12.0, 0.0), 0.0);
        assert_eq!(normalize_parameter(12.0, -5.0), 0.0);
        assert_eq!(normalize_parameter(f64::NAN, 10.0), 0.0);
        assert_eq!(normalize_parameter(12.0, f64::INFINITY), 0.0);
    }

    #[test]
    fn normalize_never_returns_the_wavelength() {
        let reduced = normalize_parameter(-1e-18, 200.0);
        assert!(reduced < 200.0);
    }

    #[rstest]
    #[case(CurveFamily::Sine, 0.0)]
    #[case(CurveFamily::Sine, 0.8)]
    #[case(CurveFamily::Rounded, 0.0)]
    fn periodic_in_wavelength(#[case] family: CurveFamily, #[case] squareness: f64) {
        let p = params(40.0, 120.0, squareness);
        let generator = family.generator();
        for i in 0..60 {
            let t = -300.0 + i as f64 * 11.3;
            let a = generator.point_at(&p, t);
            let b = generator.point_at(&p, t + p.wavelength);
            assert_abs_diff_eq!(a.x, b.x, epsilon = 1e-6);
            assert_abs_diff_eq!(a.y, b.y, epsilon = 1e-6);
        }
    }

    #[rstest]
    #[case(CurveFamily::Sine)]
    #[case(CurveFamily::Rounded)]
    fn negative_input_matches_positive(#[case] family: CurveFamily) {
        let p = params(100.0, 200.0, 0.3);
        let generator = family.generator();
        let neg = generator.point_at(&p, -0.5 * p.wavelength);
        let pos = generator.point_at(&p, 0.5 * p.wavelength);
        assert_abs_diff_eq!(neg.x, pos.x, epsilon = 1e-9);
        assert_abs_diff_eq!(neg.y, pos.y, epsilon = 1e-9);
    }

    #[test]
    fn sine_peaks_at_quarter_wavelength() {
        let p = params(100.0, 200.0, 0.0);
        let peak = SineCurve.point_at(&p, 50.0);
        assert_abs_diff_eq!(peak.y, 100.0, epsilon = 1e-9);
        let trough = SineCurve.point_at(&p, 150.0);
        assert_abs_diff_eq!(trough.y, -100.0, epsilon = 1e-9);
    }

    #[test]
    fn squareness_pushes_toward_square_wave() {
        let smooth = SineCurve.point_at(&params(100.0, 200.0, 0.0), 10.0);
        let square = SineCurve.point_at(&params(100.0, 200.0, 1.0), 10.0);
        assert!(square.y > smooth.y);
        assert!(square.y > 80.0);
        assert_abs_diff_eq!(SineCurve::exponent(1.0), 0.1, epsilon = 1e-12);
        assert_abs_diff_eq!(SineCurve::exponent(-3.0), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn rounded_sections_join_continuously() {
        let p = params(30.0, 80.0, 0.0);
        let sections = SectionBoundaries::new(p.amplitude, p.wavelength);
        let to_t = |arc: f64| arc / sections.total_arc_length * p.wavelength;
        for boundary in [sections.rise_end, sections.top_arc_end, sections.fall_end] {
            let before = RoundedCurve.point_at(&p, to_t(boundary) - 1e-7);
            let after = RoundedCurve.point_at(&p, to_t(boundary) + 1e-7);
            assert!(before.distance(after) < 1e-3, "gap at {}", boundary);
        }
    }

    // Amplitude fixes the straight sides, so the peak grows with the arc radius
    #[rstest]
    #[case(30.0, 80.0, 50.0)]
    #[case(30.0, 160.0, 70.0)]
    #[case(10.0, 400.0, 110.0)]
    fn rounded_extents(#[case] amplitude: f64, #[case] wavelength: f64, #[case] peak: f64) {
        let p = params(amplitude, wavelength, 0.0);
        let start = RoundedCurve.point_at(&p, 0.0);
        assert_abs_diff_eq!(start.x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(start.y, -amplitude, epsilon = 1e-9);

        let mut top = f64::MIN;
        let mut right = f64::MIN;
        for i in 0..4000 {
            let pt = RoundedCurve.point_at(&p, i as f64 * p.wavelength / 4000.0);
            top = top.max(pt.y);
            right = right.max(pt.x);
        }
        assert_abs_diff_eq!(top, peak, epsilon = 1e-3);
        assert!(right <= p.wavelength + 1e-9);
    }

    #[test]
    fn rounded_steps_travel_equal_distances() {
        let p = params(30.0, 80.0, 0.0);
        let step = p.wavelength / 400.0;
        let distances: Vec<f64> = (0..400)
            .map(|i| {
                let a = RoundedCurve.point_at(&p, i as f64 * step);
                let b = RoundedCurve.point_at(&p, (i as f64 + 0.5) * step);
                a.distance(b)
            })
            .collect();
        let mean = distances.iter().sum::<f64>() / distances.len() as f64;
        for d in distances {
            assert!((d - mean).abs() / mean < 0.01);
        }
    }

    #[test]
    fn degenerate_inputs_stay_finite() {
        for family in [CurveFamily::Sine, CurveFamily::Rounded] {
            let generator = family.generator();
            for p in [params(0.0, 0.0, 0.0), params(10.0, -4.0, 0.5), params(-3.0, 20.0, f64::NAN)] {
                let pt = generator.point_at(&p, 7.5);
                assert!(pt.is_finite(), "{:?} {:?}", family, p);
            }
        }
    }

    #[test]
    fn only_rounded_is_arc_length_uniform() {
        assert!(!CurveFamily::Sine.generator().is_arc_length_uniform());
        assert!(CurveFamily::Rounded.generator().is_arc_length_uniform());
    }
}
