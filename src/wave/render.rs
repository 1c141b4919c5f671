//! Frame rendering against an abstract 2D canvas

use super::geometry::{normalize_parameter, Point};
use super::resample::ArcLengthResampler;
use crate::colors;
use crate::config::WaveSettings;
use crossterm::style::Color;
use std::f64::consts::TAU;

/// Raw samples taken across the whole span for the resampled family
pub const RAW_SAMPLES: usize = 1000;
/// Points stroked after arc-length resampling
pub const RENDER_SAMPLES: usize = 500;
/// Samples per wavelength for families that are already arc-length uniform
pub const SAMPLES_PER_WAVELENGTH: f64 = 400.0;
/// Upper bound on direct samples so absurd cycle counts cannot stall a frame
const MAX_DIRECT_SAMPLES: usize = 200_000;
const COUNT_EPSILON: f64 = 1e-6;

const CENTERLINE_WIDTH: f64 = 1.0;

/// 2D drawing surface. Coordinates are logical units; the backing store is
/// `logical size * scale` pixels.
pub trait Canvas {
    /// Logical size (backing size divided by scale)
    fn size(&self) -> (f64, f64);
    fn backing_size(&self) -> (usize, usize);
    fn scale(&self) -> f64;
    /// Recompute the backing store for a displayed size and pixel ratio
    fn resize(&mut self, surface: Surface);

    fn clear(&mut self);
    fn set_stroke_color(&mut self, color: Color);
    fn set_line_width(&mut self, width: f64);
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64);
    fn stroke(&mut self);

    fn has_area(&self) -> bool {
        let (w, h) = self.backing_size();
        w > 0 && h > 0
    }
}

/// Displayed size and pixel ratio of a canvas, as delivered by a resize signal
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Surface {
    pub width: f64,
    pub height: f64,
    pub scale: f64,
}

impl Surface {
    pub fn new(width: f64, height: f64, scale: f64) -> Self {
        let scale = if scale > 0.0 && scale.is_finite() { scale } else { 1.0 };
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
            scale,
        }
    }

    /// Backing store size in whole pixels
    pub fn backing_size(&self) -> (usize, usize) {
        (
            (self.width * self.scale).round() as usize,
            (self.height * self.scale).round() as usize,
        )
    }
}

/// What one render call produced
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub points: usize,
    pub segments: usize,
    pub resampled: bool,
}

/// Turns a settings snapshot and a phase into draw calls
#[derive(Debug, Default)]
pub struct FrameRenderer {
    raw: Vec<Point>,
    path: Vec<Point>,
    resampler: ArcLengthResampler,
}

impl FrameRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw one frame: clear, centerline, then the wave path
    pub fn render<C: Canvas + ?Sized>(
        &mut self,
        canvas: &mut C,
        settings: &WaveSettings,
        actual_phase: f64,
    ) -> FrameStats {
        let (width, height) = canvas.size();
        let center_y = height / 2.0;

        canvas.clear();

        canvas.set_stroke_color(colors::centerline_color(settings.mode));
        canvas.set_line_width(CENTERLINE_WIDTH);
        canvas.begin_path();
        canvas.move_to(0.0, center_y);
        canvas.line_to(width, center_y);
        canvas.stroke();

        let params = &settings.params;
        let wavelength = params.wavelength;
        let span = params.total_span();
        if !(params.cycles > 0.0) || !(wavelength > 0.0) || !span.is_finite() {
            return FrameStats::default();
        }

        let phase = if actual_phase.is_finite() { actual_phase } else { 0.0 };
        let generator = settings.family.generator();
        let origin_x = width / 2.0 - span / 2.0 - phase;

        // Absolute x is the start of the period containing t plus the local x,
        // shifted so the span starting at `phase` is centered on the canvas.
        // The period start comes from the same reduction the generator uses.
        let place = |t: f64| -> Point {
            let local = generator.point_at(params, t);
            let period_start = t - normalize_parameter(t, wavelength);
            Point::new(origin_x + period_start + local.x, center_y - local.y)
        };

        let resampled = !generator.is_arc_length_uniform();
        self.raw.clear();
        if resampled {
            self.raw.extend(
                (0..=RAW_SAMPLES)
                    .map(|i| place(phase + span * i as f64 / RAW_SAMPLES as f64))
                    .filter(|p| p.is_finite()),
            );
            self.resampler.resample_into(&self.raw, RENDER_SAMPLES, &mut self.path);
        } else {
            let step = wavelength / SAMPLES_PER_WAVELENGTH;
            let count = ((params.cycles * SAMPLES_PER_WAVELENGTH + COUNT_EPSILON).floor() as usize)
                .min(MAX_DIRECT_SAMPLES);
            self.path.clear();
            self.path.extend(
                (0..=count)
                    .map(|i| place(phase + i as f64 * step))
                    .filter(|p| p.is_finite()),
            );
        }

        let Some(&first) = self.path.first() else {
            return FrameStats::default();
        };

        canvas.set_stroke_color(colors::stroke_color(settings.mode));
        canvas.begin_path();

        // A zero-length path still shows up as a dot
        if self.path.iter().all(|p| *p == first) {
            canvas.set_line_width(params.thickness / 2.0);
            canvas.arc(first.x, first.y, params.thickness / 4.0, 0.0, TAU);
            canvas.stroke();
            return FrameStats {
                points: 1,
                segments: 0,
                resampled,
            };
        }

        canvas.set_line_width(params.thickness);
        canvas.move_to(first.x, first.y);
        for p in &self.path[1..] {
            canvas.line_to(p.x, p.y);
        }
        canvas.stroke();

        FrameStats {
            points: self.path.len(),
            segments: self.path.len() - 1,
            resampled,
        }
    }
}
