//! Arc-length resampling for curves sampled uniformly in their parameter
//!
//! Steep parts of a sampled curve pack many samples into little horizontal
//! space while flat parts spread them out. Resampling to equal arc-length
//! spacing keeps the drawn path and its motion uniform in speed.

use super::geometry::Point;

/// Reusable resampler that keeps its cumulative-length buffer between frames
#[derive(Debug, Default)]
pub struct ArcLengthResampler {
    cumulative: Vec<f64>,
}

impl ArcLengthResampler {
    /// Total length of the last resampled input
    #[cfg(test)]
    pub fn total_length(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Resample `raw` into `segments + 1` points spaced evenly by arc length.
    /// `out` is cleared first.
    pub fn resample_into(&mut self, raw: &[Point], segments: usize, out: &mut Vec<Point>) {
        out.clear();
        self.cumulative.clear();

        let Some(&first) = raw.first() else {
            return;
        };

        self.cumulative.reserve(raw.len());
        self.cumulative.push(0.0);
        let mut total = 0.0;
        for pair in raw.windows(2) {
            total += pair[0].distance(pair[1]);
            self.cumulative.push(total);
        }

        // Zero-length or poisoned input collapses to the first point
        if !(total > 0.0 && total.is_finite()) {
            out.resize(segments + 1, first);
            return;
        }

        out.reserve(segments + 1);
        if segments == 0 {
            out.push(first);
            return;
        }

        let last = raw.len() - 1;
        for j in 0..=segments {
            let target = total * j as f64 / segments as f64;
            if j == segments {
                out.push(raw[last]);
                break;
            }

            // First cumulative entry at or past the target closes the bracket
            let upper = self.cumulative.partition_point(|&c| c < target).clamp(1, last);
            let lower = upper - 1;
            let seg_start = self.cumulative[lower];
            let seg_len = self.cumulative[upper] - seg_start;
            let progress = if seg_len > 0.0 {
                ((target - seg_start) / seg_len).clamp(0.0, 1.0)
            } else {
                0.0
            };
            out.push(raw[lower].lerp(raw[upper], progress));
        }
    }
}

/// One-shot form of [`ArcLengthResampler::resample_into`]
#[cfg(test)]
pub fn resample_by_arc_length(raw: &[Point], segments: usize) -> Vec<Point> {
    let mut out = Vec::new();
    ArcLengthResampler::default().resample_into(raw, segments, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShapeParameters;
    use crate::wave::geometry::{CurveGenerator, SineCurve};
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    fn sine_points(squareness: f64, samples: usize) -> Vec<Point> {
        let params = ShapeParameters {
            amplitude: 100.0,
            wavelength: 200.0,
            cycles: 2.0,
            speed: 0.0,
            thickness: 2.0,
            squareness,
        };
        let span = params.total_span();
        (0..=samples)
            .map(|i| {
                let t = span * i as f64 / samples as f64;
                let p = SineCurve.point_at(&params, t);
                Point::new(t, -p.y)
            })
            .collect()
    }

    fn spacings(points: &[Point]) -> Vec<f64> {
        points.windows(2).map(|w| w[0].distance(w[1])).collect()
    }

    #[rstest]
    #[case(0.0)]
    #[case(0.9)]
    fn output_spacing_is_uniform(#[case] squareness: f64) {
        let out = resample_by_arc_length(&sine_points(squareness, 1000), 500);
        assert_eq!(out.len(), 501);

        let gaps = spacings(&out);
        let mean = gaps.iter().sum::<f64>() / gaps.len() as f64;
        for gap in gaps {
            assert!((gap - mean).abs() <= mean * 0.05, "gap {} vs mean {}", gap, mean);
        }
    }

    #[test]
    fn raw_sampling_is_not_uniform_when_square() {
        let gaps = spacings(&sine_points(0.9, 1000));
        let max = gaps.iter().cloned().fold(f64::MIN, f64::max);
        let min = gaps.iter().cloned().fold(f64::MAX, f64::min);
        assert!(max > min * 10.0);
    }

    #[test]
    fn endpoints_are_preserved() {
        let raw = sine_points(0.5, 1000);
        let out = resample_by_arc_length(&raw, 500);
        assert_eq!(out[0], raw[0]);
        assert_eq!(out[500], raw[1000]);
    }

    #[test]
    fn straight_line_interpolates() {
        let raw = vec![Point::new(0.0, 0.0), Point::new(3.0, 4.0), Point::new(6.0, 8.0)];
        let out = resample_by_arc_length(&raw, 4);
        assert_eq!(out.len(), 5);
        assert_abs_diff_eq!(out[1].x, 1.5, epsilon = 1e-12);
        assert_abs_diff_eq!(out[1].y, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(out[2].x, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn repeated_raw_points_are_skipped() {
        let raw = vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 0.0),
        ];
        let out = resample_by_arc_length(&raw, 10);
        for (i, p) in out.iter().enumerate() {
            assert_abs_diff_eq!(p.x, i as f64, epsilon = 1e-12);
        }
    }

    #[test]
    fn zero_length_curve_collapses_to_first_point() {
        let raw = vec![Point::new(5.0, 7.0); 20];
        let out = resample_by_arc_length(&raw, 8);
        assert_eq!(out.len(), 9);
        assert!(out.iter().all(|p| *p == Point::new(5.0, 7.0)));
    }

    #[test]
    fn empty_and_zero_segment_inputs() {
        assert!(resample_by_arc_length(&[], 10).is_empty());
        let raw = vec![Point::new(1.0, 1.0), Point::new(2.0, 2.0)];
        assert_eq!(resample_by_arc_length(&raw, 0), vec![Point::new(1.0, 1.0)]);
    }

    #[test]
    fn reports_total_length() {
        let mut resampler = ArcLengthResampler::default();
        let mut out = Vec::new();
        let raw = vec![Point::new(0.0, 0.0), Point::new(3.0, 4.0)];
        resampler.resample_into(&raw, 2, &mut out);
        assert_abs_diff_eq!(resampler.total_length(), 5.0, epsilon = 1e-12);
    }
}
